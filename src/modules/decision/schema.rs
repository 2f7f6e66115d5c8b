use serde::Serialize;
use sqlx::prelude::FromRow;

/// One row per ordered (actor, recipient) pair; later decisions overwrite earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DecisionEntity {
    pub actor_user_id: String,
    pub recipient_user_id: String,
    pub liked: bool,
    pub decided_at: chrono::DateTime<chrono::Utc>,
}
