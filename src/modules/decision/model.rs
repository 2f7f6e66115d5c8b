use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

#[derive(Debug, Clone)]
pub struct NewDecision {
    pub actor_id: String,
    pub recipient_id: String,
    pub liked: bool,
    pub decided_at: chrono::DateTime<chrono::Utc>,
}

/// Which likers of a recipient a feed query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikerFilter {
    All,
    /// Only likers the recipient has not liked back.
    NotReciprocated,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct LikerRow {
    pub actor_user_id: String,
    pub decided_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Liker {
    pub actor_id: String,
    pub unix_timestamp: u64,
}

impl From<LikerRow> for Liker {
    fn from(row: LikerRow) -> Self {
        Liker {
            actor_id: row.actor_user_id,
            unix_timestamp: row.decided_at.timestamp().max(0) as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLikedYouResponse {
    pub likers: Vec<Liker>,
    pub next_pagination_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountLikedYouResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutDecisionResponse {
    pub mutual_likes: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PutDecisionBody {
    #[validate(length(min = 1, max = 64))]
    pub actor_user_id: String,
    #[validate(length(min = 1, max = 64))]
    pub recipient_user_id: String,
    pub liked_recipient: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipientPath {
    #[validate(length(min = 1, max = 64))]
    pub recipient_user_id: String,
}

/// Tokens are never validated here; an unreadable one means the first page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub pagination_token: Option<String>,
}
