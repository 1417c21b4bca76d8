use crate::shared::database::{AccountRepository, Database};
use crate::shared::errors::BudgetError;
use crate::shared::utils::{money_in_range, required_text};
use crate::domains::budget::models::Role;
use crate::domains::budget::services::access;
use crate::domains::ledger::models::{Account, CreateAccountRequest, UpdateAccountRequest};
use crate::domains::ledger::services::month_service::find_month;
use crate::domains::ledger::services::recalculation_service::recalculate_from;
use crate::domains::audit::models::{AuditAction, AuditEntry, EntityType};
use crate::domains::audit::services::{is_noop, AuditService};
use crate::domains::realtime::models::BudgetEvent;
use crate::domains::realtime::services::EventHub;

const MAX_ACCOUNT_NAME_LEN: usize = 100;

/// 계좌 서비스
/// Accounts of a month; balance changes move the month's anchor
#[derive(Clone)]
pub struct AccountService {
    db: Database,
    events: EventHub,
}

impl AccountService {
    pub fn new(db: Database, events: EventHub) -> Self {
        Self { db, events }
    }

    pub async fn list_accounts(&self, budget_id: u64, month_id: u64, user_id: u64) -> Result<Vec<Account>, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        access::require_role(&mut conn, budget_id, user_id, Role::Viewer).await?;
        find_month(&mut conn, budget_id, month_id).await?;

        let accounts = AccountRepository::list_by_month(&mut conn, month_id).await?;
        Ok(accounts)
    }

    pub async fn create_account(
        &self,
        budget_id: u64,
        month_id: u64,
        user_id: u64,
        request: CreateAccountRequest,
    ) -> Result<Account, BudgetError> {
        let name = required_text(&request.name, "name", MAX_ACCOUNT_NAME_LEN).map_err(BudgetError::Validation)?;
        let balance = money_in_range(request.balance, "balance").map_err(BudgetError::Validation)?;

        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;
        let month = find_month(&mut tx, budget_id, month_id).await?;

        let account = AccountRepository::create(&mut tx, month_id, &name, balance).await?;
        let report = recalculate_from(&mut tx, budget_id, month.position).await?;

        AuditService::record(
            &mut tx,
            AuditEntry::created(budget_id, user_id, EntityType::Account, account.id, &account),
        )
        .await?;
        tx.commit().await?;

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Account, AuditAction::Create, account.id, user_id, &account)
                .with_recalculated(report.changed_months),
        );

        Ok(account)
    }

    /// 계좌 수정 (보낸 필드만 변경)
    pub async fn update_account(
        &self,
        budget_id: u64,
        account_id: u64,
        user_id: u64,
        request: UpdateAccountRequest,
    ) -> Result<Account, BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;

        let before = AccountRepository::find_in_budget(&mut tx, budget_id, account_id)
            .await?
            .ok_or(BudgetError::AccountNotFound { id: account_id })?;
        let name = match request.name.as_deref() {
            Some(raw) => required_text(raw, "name", MAX_ACCOUNT_NAME_LEN).map_err(BudgetError::Validation)?,
            None => before.name.clone(),
        };
        let balance = match request.balance {
            Some(balance) => money_in_range(balance, "balance").map_err(BudgetError::Validation)?,
            None => before.balance,
        };

        let after = AccountRepository::update(&mut tx, account_id, &name, balance).await?;
        let month = find_month(&mut tx, budget_id, before.month_id).await?;
        let report = recalculate_from(&mut tx, budget_id, month.position).await?;

        let entry = AuditEntry::updated(budget_id, user_id, EntityType::Account, account_id, &before, &after);
        if !is_noop(&entry) {
            AuditService::record(&mut tx, entry).await?;
        }
        tx.commit().await?;

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Account, AuditAction::Update, account_id, user_id, &after)
                .with_recalculated(report.changed_months),
        );

        Ok(after)
    }

    pub async fn delete_account(&self, budget_id: u64, account_id: u64, user_id: u64) -> Result<(), BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;

        let before = AccountRepository::find_in_budget(&mut tx, budget_id, account_id)
            .await?
            .ok_or(BudgetError::AccountNotFound { id: account_id })?;
        let month = find_month(&mut tx, budget_id, before.month_id).await?;

        AccountRepository::delete(&mut tx, account_id).await?;
        let report = recalculate_from(&mut tx, budget_id, month.position).await?;

        AuditService::record(
            &mut tx,
            AuditEntry::deleted(budget_id, user_id, EntityType::Account, account_id, &before),
        )
        .await?;
        tx.commit().await?;

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Account, AuditAction::Delete, account_id, user_id, &before)
                .with_recalculated(report.changed_months),
        );

        Ok(())
    }
}
