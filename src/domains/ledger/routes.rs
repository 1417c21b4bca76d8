use axum::{
    routing::{get, post, put},
    Router,
};
use crate::shared::services::AppState;

use super::handlers::{account_handler, month_handler, transaction_handler};

/// 원장 라우터 생성 (예산 라우터와 함께 `/api/budgets` 아래에 병합)
/// Create ledger router, merged under `/api/budgets`
///
/// # Routes
///
/// ## Months
/// - `GET|POST       /api/budgets/:id/months`
/// - `GET|PUT|DELETE /api/budgets/:id/months/:month_id`
/// - `POST           /api/budgets/:id/recalculate` - 전체 재계산
///
/// ## Accounts
/// - `GET|POST   /api/budgets/:id/months/:month_id/accounts`
/// - `PUT|DELETE /api/budgets/:id/accounts/:account_id`
///
/// ## Transactions
/// - `GET|POST   /api/budgets/:id/months/:month_id/transactions`
/// - `PUT|DELETE /api/budgets/:id/transactions/:transaction_id`
pub fn create_ledger_router() -> Router<AppState> {
    Router::new()
        // Months
        .route(
            "/:id/months",
            get(month_handler::list_months).post(month_handler::create_month),
        )
        .route(
            "/:id/months/:month_id",
            get(month_handler::get_month)
                .put(month_handler::update_month)
                .delete(month_handler::delete_month),
        )
        .route("/:id/recalculate", post(month_handler::recalculate_budget))
        // Accounts
        .route(
            "/:id/months/:month_id/accounts",
            get(account_handler::list_accounts).post(account_handler::create_account),
        )
        .route(
            "/:id/accounts/:account_id",
            put(account_handler::update_account).delete(account_handler::delete_account),
        )
        // Transactions
        .route(
            "/:id/months/:month_id/transactions",
            get(transaction_handler::list_transactions).post(transaction_handler::create_transaction),
        )
        .route(
            "/:id/transactions/:transaction_id",
            put(transaction_handler::update_transaction).delete(transaction_handler::delete_transaction),
        )
}
