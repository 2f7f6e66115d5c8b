use crate::{
    api::error,
    modules::decision::{
        model::{LikerFilter, LikerRow, NewDecision},
        schema::DecisionEntity,
    },
};

/// A store transaction scoped to one write request.
///
/// Dropping it without calling `commit` rolls back every write made through it.
#[async_trait::async_trait]
pub trait DecisionTx: Send {
    /// Writes or overwrites the (actor, recipient) row. Concurrent upserts on the same
    /// unordered pair are serialized until this transaction ends.
    async fn upsert(
        &mut self,
        decision: &NewDecision,
    ) -> Result<DecisionEntity, error::SystemError>;

    /// Both directions between `user_a` and `user_b` are recorded as likes, as seen by
    /// this transaction.
    async fn exists_mutual(
        &mut self,
        user_a: &str,
        user_b: &str,
    ) -> Result<bool, error::SystemError>;

    async fn commit(self: Box<Self>) -> Result<(), error::SystemError>;
}

#[async_trait::async_trait]
pub trait DecisionRepository: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn DecisionTx>, error::SystemError>;

    /// Likers of `recipient_id`, newest decision first, ties by actor id ascending.
    async fn find_likers(
        &self,
        recipient_id: &str,
        filter: LikerFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<LikerRow>, error::SystemError>;

    async fn count_likers(&self, recipient_id: &str) -> Result<u64, error::SystemError>;
}
