//! In-memory decision store.
//!
//! One transaction runs at a time: `begin` takes the table lock and holds it until the
//! transaction is committed or dropped. Writes are staged and only applied on commit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    api::error,
    modules::decision::{
        model::{LikerFilter, LikerRow, NewDecision},
        reciprocity::is_mutual,
        repository::{DecisionRepository, DecisionTx},
        schema::DecisionEntity,
    },
};

type PairKey = (String, String);
type Table = HashMap<PairKey, DecisionEntity>;

fn key(actor: &str, recipient: &str) -> PairKey {
    (actor.to_string(), recipient.to_string())
}

#[derive(Clone, Default)]
pub struct DecisionRepositoryMemory {
    table: Arc<Mutex<Table>>,
    /// Extra wait inside `exists_mutual`, to hold a transaction open.
    mutual_check_delay: Option<Duration>,
}

impl DecisionRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mutual_check_delay(mut self, delay: Duration) -> Self {
        self.mutual_check_delay = Some(delay);
        self
    }

    pub async fn rows(&self) -> Vec<DecisionEntity> {
        let table = self.table.lock().await;
        let mut rows: Vec<DecisionEntity> = table.values().cloned().collect();
        rows.sort_by(|a, b| {
            (&a.actor_user_id, &a.recipient_user_id).cmp(&(&b.actor_user_id, &b.recipient_user_id))
        });
        rows
    }

    /// Writes a row directly, bypassing transactions.
    pub async fn seed(&self, decision: NewDecision) {
        let mut table = self.table.lock().await;
        table.insert(key(&decision.actor_id, &decision.recipient_id), entity_from(decision));
    }
}

fn entity_from(decision: NewDecision) -> DecisionEntity {
    DecisionEntity {
        actor_user_id: decision.actor_id,
        recipient_user_id: decision.recipient_id,
        liked: decision.liked,
        decided_at: decision.decided_at,
    }
}

fn liked(table: &Table, staged: &Table, actor: &str, recipient: &str) -> Option<bool> {
    let k = key(actor, recipient);
    staged.get(&k).or_else(|| table.get(&k)).map(|d| d.liked)
}

pub struct DecisionTxMemory {
    table: OwnedMutexGuard<Table>,
    staged: Table,
    mutual_check_delay: Option<Duration>,
}

#[async_trait::async_trait]
impl DecisionTx for DecisionTxMemory {
    async fn upsert(
        &mut self,
        decision: &NewDecision,
    ) -> Result<DecisionEntity, error::SystemError> {
        let entity = entity_from(decision.clone());
        self.staged.insert(key(&decision.actor_id, &decision.recipient_id), entity.clone());
        Ok(entity)
    }

    async fn exists_mutual(
        &mut self,
        user_a: &str,
        user_b: &str,
    ) -> Result<bool, error::SystemError> {
        if let Some(delay) = self.mutual_check_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(is_mutual(
            liked(&self.table, &self.staged, user_a, user_b),
            liked(&self.table, &self.staged, user_b, user_a),
        ))
    }

    async fn commit(self: Box<Self>) -> Result<(), error::SystemError> {
        let DecisionTxMemory { mut table, staged, .. } = *self;
        table.extend(staged);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DecisionRepository for DecisionRepositoryMemory {
    async fn begin(&self) -> Result<Box<dyn DecisionTx>, error::SystemError> {
        let table = self.table.clone().lock_owned().await;
        Ok(Box::new(DecisionTxMemory {
            table,
            staged: HashMap::new(),
            mutual_check_delay: self.mutual_check_delay,
        }))
    }

    async fn find_likers(
        &self,
        recipient_id: &str,
        filter: LikerFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<LikerRow>, error::SystemError> {
        let table = self.table.lock().await;

        let mut likers: Vec<LikerRow> = table
            .values()
            .filter(|d| d.recipient_user_id == recipient_id && d.liked)
            .filter(|d| match filter {
                LikerFilter::All => true,
                LikerFilter::NotReciprocated => {
                    table.get(&key(recipient_id, &d.actor_user_id)).map(|r| r.liked) != Some(true)
                }
            })
            .map(|d| LikerRow { actor_user_id: d.actor_user_id.clone(), decided_at: d.decided_at })
            .collect();

        likers.sort_by(|a, b| {
            b.decided_at.cmp(&a.decided_at).then_with(|| a.actor_user_id.cmp(&b.actor_user_id))
        });

        Ok(likers
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect())
    }

    async fn count_likers(&self, recipient_id: &str) -> Result<u64, error::SystemError> {
        let table = self.table.lock().await;
        Ok(table.values().filter(|d| d.recipient_user_id == recipient_id && d.liked).count() as u64)
    }
}
