// =====================================================
// 예산 서비스 통합 테스트 (PostgreSQL 필요)
// =====================================================
// 목적: 서비스 계층을 실제 DB와 함께 실행하여 검증
//
// 실행 방법:
//   TEST_DATABASE_URL=postgresql://... \
//   cargo test --test budget_flow -- --ignored --test-threads=1
//
// 각 테스트는 시작 시 모든 테이블을 비우므로 단일 스레드로 실행해야 합니다.
// =====================================================

mod common;

use common::*;
use rust_decimal::Decimal;

use budget_api::domains::audit::models::{AuditAction, AuditQuery, EntityType};
use budget_api::domains::budget::models::{
    CreateBudgetRequest, CreateInviteRequest, Role, UpdateBudgetRequest,
};
use budget_api::domains::ledger::models::{
    CreateAccountRequest, CreateMonthRequest, CreateTransactionRequest, UpdateTransactionRequest,
};
use budget_api::shared::errors::BudgetError;

fn create_budget_request(name: &str) -> CreateBudgetRequest {
    CreateBudgetRequest {
        name: name.to_string(),
        first_month: Some("2024-03".to_string()),
    }
}

fn transaction_request(description: &str, date: &str, amount: i64, paid: bool) -> CreateTransactionRequest {
    CreateTransactionRequest {
        description: description.to_string(),
        date: date.to_string(),
        amount: Decimal::from(amount),
        paid: Some(paid),
    }
}

#[tokio::test]
#[ignore]
async fn test_month_chain_follows_ledger_changes() {
    let ctx = setup_test().await;
    let owner = ctx.signup("owner@example.com").await;

    let budget_service = &ctx.state.budget_state.budget_service;
    let month_service = &ctx.state.ledger_state.month_service;
    let account_service = &ctx.state.ledger_state.account_service;
    let transaction_service = &ctx.state.ledger_state.transaction_service;

    let budget = budget_service
        .create_budget(owner.id, create_budget_request("Household"))
        .await
        .unwrap();
    assert_eq!(budget.role, Role::Owner);
    let budget_id = budget.budget.id;

    let months = month_service.list_months(budget_id, owner.id).await.unwrap();
    assert_eq!(months.len(), 1);
    let march = months[0].clone();
    assert_eq!(march.label, "2024-03");
    assert!(march.started);

    account_service
        .create_account(
            budget_id,
            march.id,
            owner.id,
            CreateAccountRequest {
                name: "Checking".to_string(),
                balance: Decimal::from(1000),
            },
        )
        .await
        .unwrap();

    let rent = transaction_service
        .create_transaction(budget_id, march.id, owner.id, transaction_request("Rent", "2024-03-05", -300, false))
        .await
        .unwrap();
    transaction_service
        .create_transaction(budget_id, march.id, owner.id, transaction_request("Salary", "2024-03-01", 500, true))
        .await
        .unwrap();

    // 다음 월: 레이블 자동, 계좌 복사, 이전 마감 잔액에서 시작
    let april = month_service
        .create_month(budget_id, owner.id, CreateMonthRequest::default())
        .await
        .unwrap();
    assert_eq!(april.label, "2024-04");
    assert_eq!(april.position, march.position + 1);
    assert!(!april.started);
    assert_eq!(april.starting_balance, Decimal::from(700));

    let copied = account_service.list_accounts(budget_id, april.id, owner.id).await.unwrap();
    assert_eq!(copied.len(), 1);
    assert_eq!(copied[0].name, "Checking");

    // 앞 월 거래 변경 → 뒤 월로 전파
    let updated = transaction_service
        .update_transaction(
            budget_id,
            rent.id,
            owner.id,
            UpdateTransactionRequest {
                amount: Some(Decimal::from(-400)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.balance, Decimal::from(600));

    let months = month_service.list_months(budget_id, owner.id).await.unwrap();
    assert_eq!(months[0].closing_balance, Decimal::from(600));
    assert_eq!(months[1].starting_balance, Decimal::from(600));
    assert_eq!(months[1].closing_balance, Decimal::from(600));

    // 첫 월 삭제 → 남은 월이 계좌 합계에서 시작
    month_service.delete_month(budget_id, march.id, owner.id).await.unwrap();
    let months = month_service.list_months(budget_id, owner.id).await.unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].starting_balance, Decimal::from(1000));

    // 마지막 월은 삭제 불가
    let err = month_service.delete_month(budget_id, months[0].id, owner.id).await.unwrap_err();
    assert!(matches!(err, BudgetError::Validation(_)));

    // 이미 일관된 상태라면 전체 재계산은 아무것도 바꾸지 않음
    let report = ctx
        .state
        .ledger_state
        .recalculation_service
        .recalculate_budget(budget_id, owner.id)
        .await
        .unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_invite_roles_and_membership_rules() {
    let ctx = setup_test().await;
    let owner = ctx.signup("owner@example.com").await;
    let friend = ctx.signup("friend@example.com").await;
    let stranger = ctx.signup("stranger@example.com").await;

    let budget_state = &ctx.state.budget_state;
    let budget = budget_state
        .budget_service
        .create_budget(owner.id, create_budget_request("Shared"))
        .await
        .unwrap();
    let budget_id = budget.budget.id;

    // 비멤버는 존재 자체를 알 수 없음
    let err = budget_state.budget_service.get_budget(budget_id, stranger.id).await.unwrap_err();
    assert!(matches!(err, BudgetError::BudgetNotFound { .. }));

    // OWNER 역할로는 초대 불가
    let err = budget_state
        .invite_service
        .create_invite(
            budget_id,
            owner.id,
            CreateInviteRequest { email: "friend@example.com".to_string(), role: Role::Owner },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::Validation(_)));

    budget_state
        .invite_service
        .create_invite(
            budget_id,
            owner.id,
            CreateInviteRequest { email: " Friend@Example.com ".to_string(), role: Role::Viewer },
        )
        .await
        .unwrap();
    let token = ctx.mailer.last_token_for("friend@example.com").unwrap();

    // 다른 사람의 초대는 수락 불가
    let err = budget_state
        .invite_service
        .accept_invite(stranger.id, &stranger.email, &token)
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::InvalidInvite(_)));

    let member = budget_state
        .invite_service
        .accept_invite(friend.id, &friend.email, &token)
        .await
        .unwrap();
    assert_eq!(member.role, Role::Viewer);

    // 사용한 토큰은 재사용 불가
    let err = budget_state
        .invite_service
        .accept_invite(friend.id, &friend.email, &token)
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::InvalidInvite(_)));

    // VIEWER는 원장을 수정할 수 없음
    let month = ctx.state.ledger_state.month_service.list_months(budget_id, friend.id).await.unwrap()[0].clone();
    let err = ctx
        .state
        .ledger_state
        .transaction_service
        .create_transaction(budget_id, month.id, friend.id, transaction_request("Coffee", "2024-03-02", -5, false))
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::Forbidden { required: Role::Editor }));

    // 마지막 OWNER는 나갈 수도, 강등될 수도 없음
    let err = budget_state.member_service.remove_member(budget_id, owner.id, owner.id).await.unwrap_err();
    assert!(matches!(err, BudgetError::LastOwner));
    let err = budget_state
        .member_service
        .change_role(budget_id, owner.id, owner.id, Role::Editor)
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::LastOwner));

    // 승격 후에는 원래 OWNER가 나갈 수 있음
    budget_state.member_service.change_role(budget_id, owner.id, friend.id, Role::Owner).await.unwrap();
    budget_state.member_service.remove_member(budget_id, owner.id, owner.id).await.unwrap();

    let members = budget_state.member_service.list_members(budget_id, friend.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, friend.id);
}

#[tokio::test]
#[ignore]
async fn test_changes_are_audited_and_broadcast() {
    let ctx = setup_test().await;
    let owner = ctx.signup("owner@example.com").await;

    let budget = ctx
        .state
        .budget_state
        .budget_service
        .create_budget(owner.id, create_budget_request("Audited"))
        .await
        .unwrap();
    let budget_id = budget.budget.id;
    let month = ctx.state.ledger_state.month_service.list_months(budget_id, owner.id).await.unwrap()[0].clone();

    let mut rx = ctx.state.realtime_state.event_hub.subscribe(budget_id);

    let created = ctx
        .state
        .ledger_state
        .transaction_service
        .create_transaction(budget_id, month.id, owner.id, transaction_request("Groceries", "2024-03-10", -80, false))
        .await
        .unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.budget_id, budget_id);
    assert_eq!(event.entity_type, EntityType::Transaction);
    assert_eq!(event.action, AuditAction::Create);
    assert_eq!(event.entity_id, created.id);
    assert_eq!(event.recalculated_months, vec![month.id]);

    let logs = ctx
        .state
        .audit_state
        .audit_service
        .list(
            budget_id,
            owner.id,
            &AuditQuery { limit: None, offset: None, entity_type: Some("transaction".to_string()) },
        )
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::Create);
    assert_eq!(logs[0].entity_id, created.id);
    assert!(logs[0].before.is_none());
}

#[tokio::test]
#[ignore]
async fn test_concurrent_owner_departures_keep_one_owner() {
    let ctx = setup_test().await;
    let owner = ctx.signup("owner@example.com").await;
    let partner = ctx.signup("partner@example.com").await;

    let budget_state = &ctx.state.budget_state;
    let budget = budget_state
        .budget_service
        .create_budget(owner.id, create_budget_request("Joint"))
        .await
        .unwrap();
    let budget_id = budget.budget.id;

    budget_state
        .invite_service
        .create_invite(
            budget_id,
            owner.id,
            CreateInviteRequest { email: partner.email.clone(), role: Role::Editor },
        )
        .await
        .unwrap();
    let token = ctx.mailer.last_token_for(&partner.email).unwrap();
    budget_state.invite_service.accept_invite(partner.id, &partner.email, &token).await.unwrap();
    budget_state.member_service.change_role(budget_id, owner.id, partner.id, Role::Owner).await.unwrap();

    // 두 OWNER가 동시에 탈퇴 → 정확히 하나만 성공
    let (first, second) = tokio::join!(
        budget_state.member_service.remove_member(budget_id, owner.id, owner.id),
        budget_state.member_service.remove_member(budget_id, partner.id, partner.id),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(r, Err(BudgetError::LastOwner))));

    let mut conn = ctx.db.pool().acquire().await.unwrap();
    let owners = budget_api::shared::database::MemberRepository::count_owners(&mut conn, budget_id)
        .await
        .unwrap();
    assert_eq!(owners, 1);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_ledger_writes_leave_chain_consistent() {
    let ctx = setup_test().await;
    let owner = ctx.signup("owner@example.com").await;

    let budget = ctx
        .state
        .budget_state
        .budget_service
        .create_budget(owner.id, create_budget_request("Busy"))
        .await
        .unwrap();
    let budget_id = budget.budget.id;

    let month_service = &ctx.state.ledger_state.month_service;
    let transaction_service = &ctx.state.ledger_state.transaction_service;
    let march = month_service.list_months(budget_id, owner.id).await.unwrap()[0].clone();
    let april = month_service
        .create_month(budget_id, owner.id, CreateMonthRequest::default())
        .await
        .unwrap();

    // 서로 다른 월에 동시 기록
    let (a, b) = tokio::join!(
        transaction_service.create_transaction(budget_id, march.id, owner.id, transaction_request("Rent", "2024-03-05", -300, false)),
        transaction_service.create_transaction(budget_id, april.id, owner.id, transaction_request("Bonus", "2024-04-02", 200, false)),
    );
    a.unwrap();
    b.unwrap();

    // 저장된 잔액이 이미 일관되므로 전체 재계산은 아무것도 바꾸지 않음
    let report = ctx
        .state
        .ledger_state
        .recalculation_service
        .recalculate_budget(budget_id, owner.id)
        .await
        .unwrap();
    assert!(report.is_empty());

    let months = month_service.list_months(budget_id, owner.id).await.unwrap();
    assert_eq!(months[0].closing_balance, Decimal::from(-300));
    assert_eq!(months[1].starting_balance, Decimal::from(-300));
    assert_eq!(months[1].closing_balance, Decimal::from(-100));
}

#[tokio::test]
#[ignore]
async fn test_out_of_range_amounts_are_rejected() {
    let ctx = setup_test().await;
    let owner = ctx.signup("owner@example.com").await;

    let budget = ctx
        .state
        .budget_state
        .budget_service
        .create_budget(owner.id, create_budget_request("Huge"))
        .await
        .unwrap();
    let budget_id = budget.budget.id;
    let month = ctx.state.ledger_state.month_service.list_months(budget_id, owner.id).await.unwrap()[0].clone();

    let mut request = transaction_request("Lottery", "2024-03-01", 0, false);
    request.amount = Decimal::MAX;
    let err = ctx
        .state
        .ledger_state
        .transaction_service
        .create_transaction(budget_id, month.id, owner.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::Validation(_)));

    let err = ctx
        .state
        .ledger_state
        .account_service
        .create_account(
            budget_id,
            month.id,
            owner.id,
            CreateAccountRequest { name: "Vault".to_string(), balance: Decimal::MIN },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::Validation(_)));

    // 아무것도 저장되지 않음
    let transactions = ctx
        .state
        .ledger_state
        .transaction_service
        .list_transactions(budget_id, month.id, owner.id)
        .await
        .unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_rename_to_same_name_is_not_audited() {
    let ctx = setup_test().await;
    let owner = ctx.signup("owner@example.com").await;

    let budget_service = &ctx.state.budget_state.budget_service;
    let budget = budget_service
        .create_budget(owner.id, create_budget_request("Groceries"))
        .await
        .unwrap();
    let budget_id = budget.budget.id;

    budget_service
        .rename_budget(budget_id, owner.id, UpdateBudgetRequest { name: " Groceries ".to_string() })
        .await
        .unwrap();
    let renamed = budget_service
        .rename_budget(budget_id, owner.id, UpdateBudgetRequest { name: "Food".to_string() })
        .await
        .unwrap();
    assert_eq!(renamed.name, "Food");

    let logs = ctx
        .state
        .audit_state
        .audit_service
        .list(
            budget_id,
            owner.id,
            &AuditQuery { limit: None, offset: None, entity_type: Some("budget".to_string()) },
        )
        .await
        .unwrap();

    // 생성 1건 + 실제 이름 변경 1건
    assert_eq!(logs.len(), 2);
    assert_eq!(logs.iter().filter(|l| l.action == AuditAction::Update).count(), 1);
}
