use crate::{
    api::error,
    modules::decision::{model::NewDecision, repository::DecisionTx},
};

/// Mutuality from the two directed decisions of a pair; a missing row counts as no like.
pub fn is_mutual(forward: Option<bool>, reverse: Option<bool>) -> bool {
    forward.unwrap_or(false) && reverse.unwrap_or(false)
}

/// Upserts `decision` and reports whether the pair now likes each other.
///
/// The mutuality read runs after the upsert inside `tx`, so it sees this write plus
/// whatever the other side had committed before the pair lock was taken.
pub async fn record_decision(
    tx: &mut dyn DecisionTx,
    decision: &NewDecision,
) -> Result<bool, error::SystemError> {
    tx.upsert(decision).await?;

    // a pass can never complete a match
    if !decision.liked {
        return Ok(false);
    }

    tx.exists_mutual(&decision.actor_id, &decision.recipient_id).await
}
