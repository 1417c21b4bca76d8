// =====================================================
// InviteService - 예산 초대
// =====================================================
// 흐름:
// 1. OWNER가 이메일 + 역할로 초대 생성 → 랜덤 토큰 발급, 해시만 DB 저장
// 2. 메일로 토큰 링크 발송 (실패해도 초대는 유지, 로그만 남김)
// 3. 초대받은 사용자가 토큰으로 수락/거절
//
// 토큰 원문은 메일에만 존재하고 DB에는 SHA-256 해시만 남습니다.
// =====================================================

use std::sync::Arc;
use chrono::{Duration, Utc};
use crate::shared::clients::{MailMessage, Mailer};
use crate::shared::config::AppConfig;
use crate::shared::database::{Database, InviteRepository, MemberRepository};
use crate::shared::errors::BudgetError;
use crate::shared::utils::{generate_token, hash_token, normalize_email};
use crate::domains::budget::models::{
    BudgetInvite, BudgetMember, CreateInviteRequest, InviteCreate, InviteStatus, Role,
};
use crate::domains::budget::services::access;
use crate::domains::audit::models::{AuditAction, AuditEntry, EntityType};
use crate::domains::audit::services::AuditService;
use crate::domains::realtime::models::BudgetEvent;
use crate::domains::realtime::services::EventHub;

/// 초대 토큰 바이트 수 (base64url 43자)
const INVITE_TOKEN_BYTES: usize = 32;

/// 초대 서비스
/// Budget invitation workflow
#[derive(Clone)]
pub struct InviteService {
    db: Database,
    events: EventHub,
    mailer: Arc<dyn Mailer>,
    expiry: Duration,
    app_base_url: String,
    mail_from: String,
}

impl InviteService {
    pub fn new(db: Database, events: EventHub, mailer: Arc<dyn Mailer>, config: &AppConfig) -> Self {
        Self {
            db,
            events,
            mailer,
            expiry: Duration::days(config.invite_expiry_days),
            app_base_url: config.app_base_url.trim_end_matches('/').to_string(),
            mail_from: config.mail_from.clone(),
        }
    }

    /// 초대 생성 (OWNER)
    /// Invite an email address as EDITOR or VIEWER
    ///
    /// 같은 이메일의 대기 중 초대는 취소되고 새 초대로 대체됩니다.
    pub async fn create_invite(
        &self,
        budget_id: u64,
        user_id: u64,
        request: CreateInviteRequest,
    ) -> Result<BudgetInvite, BudgetError> {
        let email = normalize_email(&request.email).map_err(BudgetError::Validation)?;
        if request.role == Role::Owner {
            return Err(BudgetError::Validation(
                "Invites can only grant EDITOR or VIEWER".to_string(),
            ));
        }

        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Owner).await?;

        if MemberRepository::is_member_email(&mut tx, budget_id, &email).await? {
            return Err(BudgetError::Conflict(format!("{} is already a member", email)));
        }

        // 기존 대기 초대 대체
        let replaced = InviteRepository::revoke_pending_for_email(&mut tx, budget_id, &email).await?;
        for revoked in &replaced {
            let mut before = revoked.clone();
            before.status = InviteStatus::Pending;
            AuditService::record(
                &mut tx,
                AuditEntry::updated(budget_id, user_id, EntityType::Invite, revoked.id, &before, revoked),
            )
            .await?;
        }

        let token = generate_token(INVITE_TOKEN_BYTES);
        let invite = InviteRepository::create(
            &mut tx,
            &InviteCreate {
                budget_id,
                email: email.clone(),
                role: request.role,
                invited_by: user_id,
                token_hash: hash_token(&token),
                expires_at: Utc::now() + self.expiry,
            },
        )
        .await?;

        AuditService::record(
            &mut tx,
            AuditEntry::created(budget_id, user_id, EntityType::Invite, invite.id, &invite),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(budget_id, invite_id = invite.id, replaced = replaced.len(), "invite created");

        self.events.publish(BudgetEvent::new(
            budget_id,
            EntityType::Invite,
            AuditAction::Create,
            invite.id,
            user_id,
            &invite,
        ));

        // 메일 실패는 초대를 실패시키지 않음
        if let Err(e) = self.mailer.send(self.invite_mail(&invite, &token)).await {
            tracing::warn!(invite_id = invite.id, error = %e, "failed to send invite mail");
        }

        Ok(invite)
    }

    /// 대기 중 초대 목록 (OWNER)
    pub async fn list_invites(&self, budget_id: u64, user_id: u64) -> Result<Vec<BudgetInvite>, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        access::require_role(&mut conn, budget_id, user_id, Role::Owner).await?;

        let invites = InviteRepository::list_pending(&mut conn, budget_id).await?;
        Ok(invites)
    }

    /// 초대 취소 (OWNER)
    pub async fn revoke_invite(&self, budget_id: u64, user_id: u64, invite_id: u64) -> Result<BudgetInvite, BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Owner).await?;

        let before = InviteRepository::find_by_id(&mut tx, budget_id, invite_id)
            .await?
            .ok_or(BudgetError::InviteNotFound)?;
        if before.status != InviteStatus::Pending {
            return Err(BudgetError::InvalidInvite(format!(
                "Invite is already {}",
                before.status.as_str()
            )));
        }

        let after = InviteRepository::set_status(&mut tx, invite_id, InviteStatus::Revoked).await?;
        AuditService::record(
            &mut tx,
            AuditEntry::updated(budget_id, user_id, EntityType::Invite, invite_id, &before, &after),
        )
        .await?;
        tx.commit().await?;

        self.events.publish(BudgetEvent::new(
            budget_id,
            EntityType::Invite,
            AuditAction::Update,
            invite_id,
            user_id,
            &after,
        ));

        Ok(after)
    }

    /// 초대 수락
    /// Accept an invitation; the caller becomes a member with the invited role
    ///
    /// 이미 멤버라면 기존 역할과 초대 역할 중 높은 쪽을 유지합니다.
    pub async fn accept_invite(
        &self,
        user_id: u64,
        user_email: &str,
        token: &str,
    ) -> Result<BudgetMember, BudgetError> {
        let mut tx = self.db.pool().begin().await?;

        let before = InviteRepository::find_by_token_hash_for_update(&mut tx, &hash_token(token.trim()))
            .await?
            .ok_or(BudgetError::InviteNotFound)?;
        ensure_usable(&before, user_email)?;

        let budget_id = before.budget_id;
        let existing = MemberRepository::find(&mut tx, budget_id, user_id).await?;
        let role = match &existing {
            Some(member) => member.role.max(before.role),
            None => before.role,
        };

        let member = MemberRepository::upsert(&mut tx, budget_id, user_id, role).await?;
        let after = InviteRepository::set_status(&mut tx, before.id, InviteStatus::Accepted).await?;

        AuditService::record(
            &mut tx,
            AuditEntry::updated(budget_id, user_id, EntityType::Invite, before.id, &before, &after),
        )
        .await?;
        let member_entry = match &existing {
            Some(previous) => AuditEntry::updated(budget_id, user_id, EntityType::Member, user_id, previous, &member),
            None => AuditEntry::created(budget_id, user_id, EntityType::Member, user_id, &member),
        };
        AuditService::record(&mut tx, member_entry).await?;
        tx.commit().await?;

        tracing::info!(budget_id, user_id, role = %member.role, "invite accepted");

        let action = if existing.is_some() { AuditAction::Update } else { AuditAction::Create };
        self.events.publish(BudgetEvent::new(budget_id, EntityType::Member, action, user_id, user_id, &member));

        Ok(member)
    }

    /// 초대 거절
    pub async fn decline_invite(
        &self,
        user_id: u64,
        user_email: &str,
        token: &str,
    ) -> Result<BudgetInvite, BudgetError> {
        let mut tx = self.db.pool().begin().await?;

        let before = InviteRepository::find_by_token_hash_for_update(&mut tx, &hash_token(token.trim()))
            .await?
            .ok_or(BudgetError::InviteNotFound)?;
        ensure_usable(&before, user_email)?;

        let after = InviteRepository::set_status(&mut tx, before.id, InviteStatus::Declined).await?;
        AuditService::record(
            &mut tx,
            AuditEntry::updated(before.budget_id, user_id, EntityType::Invite, before.id, &before, &after),
        )
        .await?;
        tx.commit().await?;

        self.events.publish(BudgetEvent::new(
            after.budget_id,
            EntityType::Invite,
            AuditAction::Update,
            after.id,
            user_id,
            &after,
        ));

        Ok(after)
    }

    fn invite_mail(&self, invite: &BudgetInvite, token: &str) -> MailMessage {
        let link = format!("{}/invites/accept?token={}", self.app_base_url, token);
        MailMessage {
            from: self.mail_from.clone(),
            to: invite.email.clone(),
            subject: "You have been invited to a shared budget".to_string(),
            text: format!(
                "You were invited to join a budget as {}.\n\nAccept the invitation: {}\n\nThis link expires on {}.",
                invite.role,
                link,
                invite.expires_at.format("%Y-%m-%d %H:%M UTC"),
            ),
        }
    }
}

/// 수락/거절 가능한 초대인지 확인
/// Pending, unexpired and addressed to the caller
fn ensure_usable(invite: &BudgetInvite, user_email: &str) -> Result<(), BudgetError> {
    if invite.status != InviteStatus::Pending {
        return Err(BudgetError::InvalidInvite(format!(
            "Invite is already {}",
            invite.status.as_str()
        )));
    }
    if invite.is_expired(Utc::now()) {
        return Err(BudgetError::InvalidInvite("Invite has expired".to_string()));
    }
    if !invite.email.eq_ignore_ascii_case(user_email.trim()) {
        return Err(BudgetError::InvalidInvite(
            "Invite was sent to a different email address".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invite(status: InviteStatus, expires_in: Duration) -> BudgetInvite {
        let now = Utc::now();
        BudgetInvite {
            id: 1,
            budget_id: 7,
            email: "bob@example.com".to_string(),
            role: Role::Editor,
            status,
            invited_by: 1,
            token_hash: hash_token("token"),
            expires_at: now + expires_in,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pending_invite_for_same_email_is_usable() {
        let invite = invite(InviteStatus::Pending, Duration::days(7));
        assert!(ensure_usable(&invite, "Bob@Example.com").is_ok());
    }

    #[test]
    fn test_used_or_revoked_invite_is_rejected() {
        for status in [InviteStatus::Accepted, InviteStatus::Declined, InviteStatus::Revoked] {
            let invite = invite(status, Duration::days(7));
            assert!(matches!(
                ensure_usable(&invite, "bob@example.com"),
                Err(BudgetError::InvalidInvite(_))
            ));
        }
    }

    #[test]
    fn test_expired_invite_is_rejected() {
        let invite = invite(InviteStatus::Pending, Duration::seconds(-1));
        assert!(matches!(
            ensure_usable(&invite, "bob@example.com"),
            Err(BudgetError::InvalidInvite(_))
        ));
    }

    #[test]
    fn test_other_email_is_rejected() {
        let invite = invite(InviteStatus::Pending, Duration::days(1));
        assert!(ensure_usable(&invite, "mallory@example.com").is_err());
    }
}
