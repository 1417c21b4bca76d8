use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use crate::domains::budget::models::Role;
use crate::domains::budget::services::access;
use crate::domains::realtime::models::{LaggedNotice, SubscribeQuery};
use crate::domains::realtime::services::Subscription;
use crate::shared::errors::{ApiError, BudgetError};
use crate::shared::services::AppState;

/// 예산 실시간 구독 (WebSocket)
/// Subscribe to a budget's change events
///
/// 브라우저 WebSocket은 헤더를 보낼 수 없으므로 Access Token을 쿼리로 받습니다.
/// 업그레이드 전에 토큰과 VIEWER 권한을 확인하고, 구독도 미리 걸어 두어
/// 업그레이드 도중 발행된 이벤트를 놓치지 않습니다.
#[utoipa::path(
    get,
    path = "/api/ws",
    params(
        ("token" = String, Query, description = "Access token"),
        ("budget_id" = u64, Query, description = "Budget to subscribe to")
    ),
    responses(
        (status = 101, description = "Switching to WebSocket"),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Budget not found or caller is not a member"),
    ),
    tag = "Realtime"
)]
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Query(query): Query<SubscribeQuery>,
) -> Result<Response, ApiError> {
    let claims = app_state.auth_state.jwt_service.verify_access_token(&query.token)?;
    let user_id = claims.user_id;
    let budget_id = query.budget_id;

    let mut conn = app_state.db.pool().acquire().await.map_err(BudgetError::from)?;
    access::require_role(&mut conn, budget_id, user_id, Role::Viewer).await?;
    drop(conn);

    let rx = app_state.realtime_state.event_hub.subscribe(budget_id);
    tracing::debug!(budget_id, user_id, "websocket subscription accepted");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, rx, budget_id, user_id)))
}

/// 이벤트 → 클라이언트 전달 결과
enum Forward {
    Continue,
    /// 연결 종료 (멤버 제거/예산 삭제, 채널 닫힘, 전송 실패)
    Stop,
}

async fn handle_socket(
    socket: WebSocket,
    mut rx: Subscription,
    budget_id: u64,
    user_id: u64,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // 클라이언트로 이벤트 전송 태스크
    let mut send_task = tokio::spawn(async move {
        loop {
            let outcome = match rx.recv().await {
                Ok(event) => {
                    let closes = event.removes_member(user_id);
                    match send_json(&mut ws_sender, &event).await {
                        Forward::Continue if closes => {
                            let _ = ws_sender.send(Message::Close(None)).await;
                            Forward::Stop
                        }
                        other => other,
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(budget_id, user_id, skipped, "websocket subscriber lagged");
                    send_json(&mut ws_sender, &LaggedNotice::new(skipped)).await
                }
                Err(RecvError::Closed) => Forward::Stop,
            };

            if let Forward::Stop = outcome {
                break;
            }
        }
    });

    // 클라이언트 메시지 수신 태스크 (Close만 처리)
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // 둘 중 하나가 종료되면 전체 종료
    let send_finished = tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            true
        }
        _ = (&mut recv_task) => {
            send_task.abort();
            false
        }
    };

    // 취소된 송신 태스크가 끝나야 구독(rx)이 drop되어 채널이 정리됨
    if !send_finished {
        let _ = send_task.await;
    }

    tracing::debug!(budget_id, user_id, "websocket closed");
}

async fn send_json<S, T>(sender: &mut S, value: &T) -> Forward
where
    S: SinkExt<Message> + Unpin,
    T: serde::Serialize,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize websocket message");
            return Forward::Continue;
        }
    };

    match sender.send(Message::Text(json)).await {
        Ok(()) => Forward::Continue,
        Err(_) => Forward::Stop,
    }
}
