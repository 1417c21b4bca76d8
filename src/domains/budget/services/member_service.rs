use sqlx::PgConnection;
use crate::shared::database::{Database, MemberRepository};
use crate::shared::errors::BudgetError;
use crate::domains::budget::models::{BudgetMember, Role};
use crate::domains::budget::services::access;
use crate::domains::audit::models::{AuditAction, AuditEntry, EntityType};
use crate::domains::audit::services::AuditService;
use crate::domains::realtime::models::BudgetEvent;
use crate::domains::realtime::services::EventHub;

/// 멤버 서비스
/// BudgetMember management (list, change role, remove / leave)
#[derive(Clone)]
pub struct MemberService {
    db: Database,
    events: EventHub,
}

impl MemberService {
    pub fn new(db: Database, events: EventHub) -> Self {
        Self { db, events }
    }

    pub async fn list_members(&self, budget_id: u64, user_id: u64) -> Result<Vec<BudgetMember>, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        access::require_role(&mut conn, budget_id, user_id, Role::Viewer).await?;

        let members = MemberRepository::list(&mut conn, budget_id).await?;
        Ok(members)
    }

    /// 멤버 역할 변경 (OWNER)
    /// Change a member's role; the last owner cannot be demoted
    pub async fn change_role(
        &self,
        budget_id: u64,
        actor_id: u64,
        target_user_id: u64,
        role: Role,
    ) -> Result<BudgetMember, BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, actor_id, Role::Owner).await?;

        let before = MemberRepository::find(&mut tx, budget_id, target_user_id)
            .await?
            .ok_or(BudgetError::MemberNotFound { user_id: target_user_id })?;

        if before.role == role {
            return Ok(before);
        }
        if before.role == Role::Owner {
            ensure_other_owner(&mut tx, budget_id).await?;
        }

        MemberRepository::update_role(&mut tx, budget_id, target_user_id, role).await?;
        let after = MemberRepository::find(&mut tx, budget_id, target_user_id)
            .await?
            .ok_or(BudgetError::MemberNotFound { user_id: target_user_id })?;

        AuditService::record(
            &mut tx,
            AuditEntry::updated(budget_id, actor_id, EntityType::Member, target_user_id, &before, &after),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(budget_id, target_user_id, from = %before.role, to = %after.role, "member role changed");

        self.events.publish(BudgetEvent::new(
            budget_id,
            EntityType::Member,
            AuditAction::Update,
            target_user_id,
            actor_id,
            &after,
        ));

        Ok(after)
    }

    /// 멤버 제거 / 탈퇴
    /// Remove a member (OWNER) or leave the budget (self)
    pub async fn remove_member(
        &self,
        budget_id: u64,
        actor_id: u64,
        target_user_id: u64,
    ) -> Result<(), BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        let actor_role = access::require_role_for_update(&mut tx, budget_id, actor_id, Role::Viewer).await?;

        // 본인 탈퇴는 역할과 무관하게 허용
        if actor_id != target_user_id {
            access::check(actor_role, Role::Owner)?;
        }

        let before = MemberRepository::find(&mut tx, budget_id, target_user_id)
            .await?
            .ok_or(BudgetError::MemberNotFound { user_id: target_user_id })?;

        if before.role == Role::Owner {
            ensure_other_owner(&mut tx, budget_id).await?;
        }

        MemberRepository::remove(&mut tx, budget_id, target_user_id).await?;
        AuditService::record(
            &mut tx,
            AuditEntry::deleted(budget_id, actor_id, EntityType::Member, target_user_id, &before),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(budget_id, target_user_id, actor_id, "member removed");

        self.events.publish(BudgetEvent::new(
            budget_id,
            EntityType::Member,
            AuditAction::Delete,
            target_user_id,
            actor_id,
            &before,
        ));

        Ok(())
    }
}

/// OWNER가 한 명 이상 더 남는지 확인
async fn ensure_other_owner(conn: &mut PgConnection, budget_id: u64) -> Result<(), BudgetError> {
    let owners = MemberRepository::count_owners(conn, budget_id).await?;
    if owners <= 1 {
        return Err(BudgetError::LastOwner);
    }
    Ok(())
}
