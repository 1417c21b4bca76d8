use sqlx::PgConnection;
use crate::shared::database::{AccountRepository, Database, MonthRepository, TransactionRepository};
use crate::shared::errors::BudgetError;
use crate::shared::utils::required_text;
use crate::domains::budget::models::Role;
use crate::domains::budget::services::access;
use crate::domains::ledger::models::{
    current_label, next_label, CreateMonthRequest, Month, MonthCreate, MonthDetailResponse,
    UpdateMonthRequest, MAX_LABEL_LEN,
};
use crate::domains::ledger::services::recalculation_service::recalculate_from;
use crate::domains::audit::models::{AuditAction, AuditEntry, EntityType};
use crate::domains::audit::services::{is_noop, AuditService};
use crate::domains::realtime::models::BudgetEvent;
use crate::domains::realtime::services::EventHub;

/// 예산 안의 월 조회 (없으면 MonthNotFound)
pub(crate) async fn find_month(conn: &mut PgConnection, budget_id: u64, month_id: u64) -> Result<Month, BudgetError> {
    MonthRepository::find_in_budget(conn, budget_id, month_id)
        .await?
        .ok_or(BudgetError::MonthNotFound { id: month_id })
}

/// 월 서비스
/// Month lifecycle; every mutation recalculates the chain from the touched month
#[derive(Clone)]
pub struct MonthService {
    db: Database,
    events: EventHub,
}

impl MonthService {
    pub fn new(db: Database, events: EventHub) -> Self {
        Self { db, events }
    }

    pub async fn list_months(&self, budget_id: u64, user_id: u64) -> Result<Vec<Month>, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        access::require_role(&mut conn, budget_id, user_id, Role::Viewer).await?;

        let months = MonthRepository::list(&mut conn, budget_id).await?;
        Ok(months)
    }

    /// 월 상세 (계좌 + 누적 잔액 순서의 거래)
    pub async fn get_month(
        &self,
        budget_id: u64,
        month_id: u64,
        user_id: u64,
    ) -> Result<MonthDetailResponse, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        access::require_role(&mut conn, budget_id, user_id, Role::Viewer).await?;

        let month = find_month(&mut conn, budget_id, month_id).await?;
        let accounts = AccountRepository::list_by_month(&mut conn, month_id).await?;
        let transactions = TransactionRepository::list_by_month(&mut conn, month_id).await?;

        Ok(MonthDetailResponse {
            month,
            accounts,
            transactions,
        })
    }

    /// 새 월 추가 (마지막 월 뒤)
    /// Append a month after the last one
    ///
    /// 이전 월의 계좌(이름, 잔고)를 복사하고, 레이블이 없으면 이전 월의
    /// 다음 달(또는 현재 월)을 사용합니다.
    pub async fn create_month(
        &self,
        budget_id: u64,
        user_id: u64,
        request: CreateMonthRequest,
    ) -> Result<Month, BudgetError> {
        let requested_label = match request.label.as_deref() {
            Some(raw) => Some(required_text(raw, "label", MAX_LABEL_LEN).map_err(BudgetError::Validation)?),
            None => None,
        };

        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;

        let previous = MonthRepository::find_last(&mut tx, budget_id).await?;
        let label = requested_label
            .or_else(|| previous.as_ref().and_then(|m| next_label(&m.label)))
            .unwrap_or_else(current_label);

        let created = MonthRepository::create(
            &mut tx,
            &MonthCreate {
                budget_id,
                position: previous.as_ref().map_or(1, |m| m.position + 1),
                label,
                // 이전 월이 없으면 체인의 기준점
                started: request.started.unwrap_or(previous.is_none()),
            },
        )
        .await?;

        let copied = match &previous {
            Some(prev) => AccountRepository::copy_to_month(&mut tx, prev.id, created.id).await?,
            None => Vec::new(),
        };

        let report = recalculate_from(&mut tx, budget_id, created.position).await?;
        let month = find_month(&mut tx, budget_id, created.id).await?;

        AuditService::record(&mut tx, AuditEntry::created(budget_id, user_id, EntityType::Month, month.id, &month)).await?;
        for account in &copied {
            AuditService::record(
                &mut tx,
                AuditEntry::created(budget_id, user_id, EntityType::Account, account.id, account),
            )
            .await?;
        }
        tx.commit().await?;

        tracing::info!(budget_id, month_id = month.id, position = month.position, copied_accounts = copied.len(), "month created");

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Month, AuditAction::Create, month.id, user_id, &month)
                .with_recalculated(report.changed_months),
        );

        Ok(month)
    }

    pub async fn update_month(
        &self,
        budget_id: u64,
        month_id: u64,
        user_id: u64,
        request: UpdateMonthRequest,
    ) -> Result<Month, BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;

        let before = find_month(&mut tx, budget_id, month_id).await?;
        let label = match request.label.as_deref() {
            Some(raw) => required_text(raw, "label", MAX_LABEL_LEN).map_err(BudgetError::Validation)?,
            None => before.label.clone(),
        };
        let started = request.started.unwrap_or(before.started);

        MonthRepository::update(&mut tx, month_id, &label, started).await?;
        let report = recalculate_from(&mut tx, budget_id, before.position).await?;
        let after = find_month(&mut tx, budget_id, month_id).await?;

        let entry = AuditEntry::updated(budget_id, user_id, EntityType::Month, month_id, &before, &after);
        if !is_noop(&entry) {
            AuditService::record(&mut tx, entry).await?;
        }
        tx.commit().await?;

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Month, AuditAction::Update, month_id, user_id, &after)
                .with_recalculated(report.changed_months),
        );

        Ok(after)
    }

    /// 월 삭제 (예산의 유일한 월은 삭제 불가)
    /// Delete a month; its accounts and transactions cascade
    pub async fn delete_month(&self, budget_id: u64, month_id: u64, user_id: u64) -> Result<(), BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;

        let before = find_month(&mut tx, budget_id, month_id).await?;
        if MonthRepository::count(&mut tx, budget_id).await? <= 1 {
            return Err(BudgetError::Validation(
                "Cannot delete the only month of a budget".to_string(),
            ));
        }

        MonthRepository::delete(&mut tx, month_id).await?;
        // 삭제된 자리부터 뒤의 월들이 새 이전 월을 기준으로 재계산됨
        let report = recalculate_from(&mut tx, budget_id, before.position).await?;

        AuditService::record(&mut tx, AuditEntry::deleted(budget_id, user_id, EntityType::Month, month_id, &before)).await?;
        tx.commit().await?;

        tracing::info!(budget_id, month_id, "month deleted");

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Month, AuditAction::Delete, month_id, user_id, &before)
                .with_recalculated(report.changed_months),
        );

        Ok(())
    }
}
