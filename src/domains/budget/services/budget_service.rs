use crate::shared::database::{BudgetRepository, Database, MemberRepository, MonthRepository};
use crate::shared::errors::BudgetError;
use crate::shared::utils::required_text;
use crate::domains::budget::models::{Budget, BudgetSummary, CreateBudgetRequest, Role, UpdateBudgetRequest};
use crate::domains::budget::services::access;
use crate::domains::ledger::models::{current_label, MonthCreate, MAX_LABEL_LEN};
use crate::domains::audit::models::{AuditAction, AuditEntry, EntityType};
use crate::domains::audit::services::{is_noop, AuditService};
use crate::domains::realtime::models::BudgetEvent;
use crate::domains::realtime::services::EventHub;

/// 예산 이름 최대 길이
const MAX_NAME_LEN: usize = 100;

/// 예산 서비스
/// 역할: NestJS의 Service 같은 것
/// BudgetService: budget lifecycle (create, list, rename, delete)
#[derive(Clone)]
pub struct BudgetService {
    db: Database,
    events: EventHub,
}

impl BudgetService {
    pub fn new(db: Database, events: EventHub) -> Self {
        Self { db, events }
    }

    /// 예산 생성
    /// Create a budget
    ///
    /// 생성자는 OWNER가 되고, 첫 달(started = true)이 함께 만들어집니다.
    pub async fn create_budget(
        &self,
        user_id: u64,
        request: CreateBudgetRequest,
    ) -> Result<BudgetSummary, BudgetError> {
        let name = required_text(&request.name, "name", MAX_NAME_LEN).map_err(BudgetError::Validation)?;
        let label = match request.first_month.as_deref() {
            Some(raw) => required_text(raw, "first_month", MAX_LABEL_LEN).map_err(BudgetError::Validation)?,
            None => current_label(),
        };

        let mut tx = self.db.pool().begin().await?;

        let budget = BudgetRepository::create(&mut tx, &name, user_id).await?;
        let owner = MemberRepository::upsert(&mut tx, budget.id, user_id, Role::Owner).await?;
        let month = MonthRepository::create(
            &mut tx,
            &MonthCreate {
                budget_id: budget.id,
                position: 1,
                label,
                started: true,
            },
        )
        .await?;

        AuditService::record(&mut tx, AuditEntry::created(budget.id, user_id, EntityType::Budget, budget.id, &budget)).await?;
        AuditService::record(&mut tx, AuditEntry::created(budget.id, user_id, EntityType::Member, user_id, &owner)).await?;
        AuditService::record(&mut tx, AuditEntry::created(budget.id, user_id, EntityType::Month, month.id, &month)).await?;

        tx.commit().await?;

        tracing::info!(budget_id = budget.id, user_id, "budget created");

        Ok(BudgetSummary {
            budget,
            role: Role::Owner,
        })
    }

    /// 내가 속한 예산 목록
    /// Budgets the user is a member of
    pub async fn list_budgets(&self, user_id: u64) -> Result<Vec<BudgetSummary>, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        let budgets = BudgetRepository::list_for_user(&mut conn, user_id).await?;
        Ok(budgets)
    }

    pub async fn get_budget(&self, budget_id: u64, user_id: u64) -> Result<BudgetSummary, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        let role = access::require_role(&mut conn, budget_id, user_id, Role::Viewer).await?;

        let budget = BudgetRepository::find_by_id(&mut conn, budget_id)
            .await?
            .ok_or(BudgetError::BudgetNotFound { id: budget_id })?;

        Ok(BudgetSummary { budget, role })
    }

    /// 예산 이름 변경 (OWNER)
    pub async fn rename_budget(
        &self,
        budget_id: u64,
        user_id: u64,
        request: UpdateBudgetRequest,
    ) -> Result<Budget, BudgetError> {
        let name = required_text(&request.name, "name", MAX_NAME_LEN).map_err(BudgetError::Validation)?;

        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Owner).await?;

        let before = BudgetRepository::find_by_id(&mut tx, budget_id)
            .await?
            .ok_or(BudgetError::BudgetNotFound { id: budget_id })?;
        let after = BudgetRepository::rename(&mut tx, budget_id, &name).await?;

        let entry = AuditEntry::updated(budget_id, user_id, EntityType::Budget, budget_id, &before, &after);
        if !is_noop(&entry) {
            AuditService::record(&mut tx, entry).await?;
        }
        tx.commit().await?;

        self.events.publish(BudgetEvent::new(
            budget_id,
            EntityType::Budget,
            AuditAction::Update,
            budget_id,
            user_id,
            &after,
        ));

        Ok(after)
    }

    /// 예산 삭제 (OWNER, 월/계좌/거래/멤버/초대 cascade)
    /// Delete a budget; audit rows are kept
    pub async fn delete_budget(&self, budget_id: u64, user_id: u64) -> Result<(), BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Owner).await?;

        let before = BudgetRepository::find_by_id(&mut tx, budget_id)
            .await?
            .ok_or(BudgetError::BudgetNotFound { id: budget_id })?;

        AuditService::record(
            &mut tx,
            AuditEntry::deleted(budget_id, user_id, EntityType::Budget, budget_id, &before),
        )
        .await?;
        BudgetRepository::delete(&mut tx, budget_id).await?;
        tx.commit().await?;

        tracing::info!(budget_id, user_id, "budget deleted");

        self.events.publish(BudgetEvent::new(
            budget_id,
            EntityType::Budget,
            AuditAction::Delete,
            budget_id,
            user_id,
            &before,
        ));

        Ok(())
    }
}
