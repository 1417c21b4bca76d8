use crate::shared::database::{Database, TransactionRepository};
use crate::shared::errors::BudgetError;
use crate::shared::utils::{money_in_range, required_text};
use crate::domains::budget::models::Role;
use crate::domains::budget::services::access;
use crate::domains::ledger::models::{
    parse_date, CreateTransactionRequest, Transaction, TransactionWrite, UpdateTransactionRequest,
};
use crate::domains::ledger::services::month_service::find_month;
use crate::domains::ledger::services::recalculation_service::recalculate_from;
use crate::domains::audit::models::{AuditAction, AuditEntry, EntityType};
use crate::domains::audit::services::{is_noop, AuditService};
use crate::domains::realtime::models::BudgetEvent;
use crate::domains::realtime::services::EventHub;
use chrono::NaiveDate;
use rust_decimal::Decimal;

const MAX_DESCRIPTION_LEN: usize = 255;

fn validate_date(raw: &str) -> Result<NaiveDate, BudgetError> {
    parse_date(raw).ok_or_else(|| {
        BudgetError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw.trim()))
    })
}

fn validate_amount(amount: Decimal) -> Result<Decimal, BudgetError> {
    money_in_range(amount, "amount").map_err(BudgetError::Validation)
}

fn validate_description(raw: &str) -> Result<String, BudgetError> {
    required_text(raw, "description", MAX_DESCRIPTION_LEN).map_err(BudgetError::Validation)
}

/// 거래 서비스
/// Transactions of a month; each mutation re-derives running balances
#[derive(Clone)]
pub struct TransactionService {
    db: Database,
    events: EventHub,
}

impl TransactionService {
    pub fn new(db: Database, events: EventHub) -> Self {
        Self { db, events }
    }

    /// 월의 거래 목록 (누적 잔액 순서)
    pub async fn list_transactions(
        &self,
        budget_id: u64,
        month_id: u64,
        user_id: u64,
    ) -> Result<Vec<Transaction>, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        access::require_role(&mut conn, budget_id, user_id, Role::Viewer).await?;
        find_month(&mut conn, budget_id, month_id).await?;

        let transactions = TransactionRepository::list_by_month(&mut conn, month_id).await?;
        Ok(transactions)
    }

    pub async fn create_transaction(
        &self,
        budget_id: u64,
        month_id: u64,
        user_id: u64,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, BudgetError> {
        let data = TransactionWrite {
            description: validate_description(&request.description)?,
            date: validate_date(&request.date)?,
            amount: validate_amount(request.amount)?,
            paid: request.paid.unwrap_or(false),
        };

        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;
        let month = find_month(&mut tx, budget_id, month_id).await?;

        let inserted = TransactionRepository::create(&mut tx, month_id, &data).await?;
        let report = recalculate_from(&mut tx, budget_id, month.position).await?;
        // 재계산된 누적 잔액을 반영한 값
        let created = TransactionRepository::find_in_budget(&mut tx, budget_id, inserted.id)
            .await?
            .ok_or(BudgetError::TransactionNotFound { id: inserted.id })?;

        AuditService::record(
            &mut tx,
            AuditEntry::created(budget_id, user_id, EntityType::Transaction, created.id, &created),
        )
        .await?;
        tx.commit().await?;

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Transaction, AuditAction::Create, created.id, user_id, &created)
                .with_recalculated(report.changed_months),
        );

        Ok(created)
    }

    /// 거래 수정 (보낸 필드만 변경)
    pub async fn update_transaction(
        &self,
        budget_id: u64,
        transaction_id: u64,
        user_id: u64,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction, BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;

        let before = TransactionRepository::find_in_budget(&mut tx, budget_id, transaction_id)
            .await?
            .ok_or(BudgetError::TransactionNotFound { id: transaction_id })?;

        let data = TransactionWrite {
            description: match request.description.as_deref() {
                Some(raw) => validate_description(raw)?,
                None => before.description.clone(),
            },
            date: match request.date.as_deref() {
                Some(raw) => validate_date(raw)?,
                None => before.date,
            },
            amount: match request.amount {
                Some(amount) => validate_amount(amount)?,
                None => before.amount,
            },
            paid: request.paid.unwrap_or(before.paid),
        };

        TransactionRepository::update(&mut tx, transaction_id, &data).await?;
        let month = find_month(&mut tx, budget_id, before.month_id).await?;
        let report = recalculate_from(&mut tx, budget_id, month.position).await?;
        let after = TransactionRepository::find_in_budget(&mut tx, budget_id, transaction_id)
            .await?
            .ok_or(BudgetError::TransactionNotFound { id: transaction_id })?;

        let entry = AuditEntry::updated(budget_id, user_id, EntityType::Transaction, transaction_id, &before, &after);
        if !is_noop(&entry) {
            AuditService::record(&mut tx, entry).await?;
        }
        tx.commit().await?;

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Transaction, AuditAction::Update, transaction_id, user_id, &after)
                .with_recalculated(report.changed_months),
        );

        Ok(after)
    }

    pub async fn delete_transaction(&self, budget_id: u64, transaction_id: u64, user_id: u64) -> Result<(), BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;

        let before = TransactionRepository::find_in_budget(&mut tx, budget_id, transaction_id)
            .await?
            .ok_or(BudgetError::TransactionNotFound { id: transaction_id })?;
        let month = find_month(&mut tx, budget_id, before.month_id).await?;

        TransactionRepository::delete(&mut tx, transaction_id).await?;
        let report = recalculate_from(&mut tx, budget_id, month.position).await?;

        AuditService::record(
            &mut tx,
            AuditEntry::deleted(budget_id, user_id, EntityType::Transaction, transaction_id, &before),
        )
        .await?;
        tx.commit().await?;

        self.events.publish(
            BudgetEvent::new(budget_id, EntityType::Transaction, AuditAction::Delete, transaction_id, user_id, &before)
                .with_recalculated(report.changed_months),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert_eq!(validate_date(" 2024-03-01 ").unwrap(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(matches!(validate_date("2024-3-1x"), Err(BudgetError::Validation(_))));
    }

    #[test]
    fn test_validate_description() {
        assert_eq!(validate_description("  Rent ").unwrap(), "Rent");
        assert!(validate_description("").is_err());
    }

    #[test]
    fn test_validate_amount_rejects_huge_values() {
        assert_eq!(validate_amount(Decimal::new(-4_250, 2)).unwrap(), Decimal::new(-4_250, 2));
        assert!(matches!(validate_amount(Decimal::MAX), Err(BudgetError::Validation(_))));
        assert!(matches!(validate_amount(Decimal::MIN), Err(BudgetError::Validation(_))));
    }
}
