use serde::Serialize;
use uuid::Uuid;

/// Social events fanned out after state changes. Delivery is best-effort:
/// nothing in the request path depends on a notification landing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocialEvent {
    InvitationReceived {
        competition_id: Uuid,
        competition_name: String,
        inviter_id: Uuid,
    },
    CompetitionJoined {
        competition_id: Uuid,
        user_id: Uuid,
    },
    ParticipantLeft {
        competition_id: Uuid,
        user_id: Uuid,
    },
    WinnerDecided {
        competition_id: Uuid,
        competition_name: String,
        total_points: i32,
    },
}

#[async_trait::async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Fire and forget. Implementations swallow their own failures; callers
    /// never see them.
    async fn notify(&self, recipient: Uuid, event: &SocialEvent);
}

/// Default dispatcher: records the event in the log stream. Stands in for
/// the push pipeline in development and tests.
pub struct LogDispatcher;

#[async_trait::async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn notify(&self, recipient: Uuid, event: &SocialEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => tracing::info!(%recipient, %payload, "social event"),
            Err(e) => tracing::warn!(%recipient, error = %e, "failed to serialize social event"),
        }
    }
}
