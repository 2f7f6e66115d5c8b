use crate::{
    api::error,
    modules::decision::{
        model::{LikerFilter, LikerRow, NewDecision},
        reciprocity::is_mutual,
        repository::{DecisionRepository, DecisionTx},
        schema::DecisionEntity,
    },
};

#[derive(Clone)]
pub struct DecisionRepositoryPg {
    pool: sqlx::PgPool,
}

impl DecisionRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

pub struct DecisionTxPg {
    tx: sqlx::Transaction<'static, sqlx::Postgres>,
}

// OFFSET is a signed bigint in postgres
fn offset_param(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

async fn lock_pair<'e, E>(user_a: &str, user_b: &str, tx: E) -> Result<(), error::SystemError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    // same key for (a, b) and (b, a); released at commit or rollback
    sqlx::query(
        r#"
        SELECT pg_advisory_xact_lock(
            hashtextextended(LEAST($1::text, $2::text) || ':' || GREATEST($1::text, $2::text), 0)
        )
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .execute(tx)
    .await?;

    Ok(())
}

async fn upsert_decision<'e, E>(
    decision: &NewDecision,
    tx: E,
) -> Result<DecisionEntity, error::SystemError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let entity = sqlx::query_as::<_, DecisionEntity>(
        r#"
        INSERT INTO decisions (actor_user_id, recipient_user_id, liked, decided_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (actor_user_id, recipient_user_id)
        DO UPDATE SET liked = EXCLUDED.liked, decided_at = EXCLUDED.decided_at
        RETURNING *
        "#,
    )
    .bind(&decision.actor_id)
    .bind(&decision.recipient_id)
    .bind(decision.liked)
    .bind(decision.decided_at)
    .fetch_one(tx)
    .await?;

    Ok(entity)
}

async fn find_mutual<'e, E>(user_a: &str, user_b: &str, tx: E) -> Result<bool, error::SystemError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let (forward, reverse) = sqlx::query_as::<_, (Option<bool>, Option<bool>)>(
        r#"
        SELECT
            (SELECT liked FROM decisions WHERE actor_user_id = $1 AND recipient_user_id = $2),
            (SELECT liked FROM decisions WHERE actor_user_id = $2 AND recipient_user_id = $1)
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_one(tx)
    .await?;

    Ok(is_mutual(forward, reverse))
}

#[async_trait::async_trait]
impl DecisionTx for DecisionTxPg {
    async fn upsert(
        &mut self,
        decision: &NewDecision,
    ) -> Result<DecisionEntity, error::SystemError> {
        lock_pair(&decision.actor_id, &decision.recipient_id, &mut *self.tx).await?;
        upsert_decision(decision, &mut *self.tx).await
    }

    async fn exists_mutual(
        &mut self,
        user_a: &str,
        user_b: &str,
    ) -> Result<bool, error::SystemError> {
        find_mutual(user_a, user_b, &mut *self.tx).await
    }

    async fn commit(self: Box<Self>) -> Result<(), error::SystemError> {
        let DecisionTxPg { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DecisionRepository for DecisionRepositoryPg {
    async fn begin(&self) -> Result<Box<dyn DecisionTx>, error::SystemError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(DecisionTxPg { tx }))
    }

    async fn find_likers(
        &self,
        recipient_id: &str,
        filter: LikerFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<LikerRow>, error::SystemError> {
        // has partial index on (recipient_user_id, decided_at DESC, actor_user_id) where liked

        let likers = match filter {
            LikerFilter::All => {
                sqlx::query_as::<_, LikerRow>(
                    r#"
                    SELECT actor_user_id, decided_at
                    FROM decisions
                    WHERE recipient_user_id = $1 AND liked
                    ORDER BY decided_at DESC, actor_user_id ASC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(recipient_id)
                .bind(limit as i64)
                .bind(offset_param(offset))
                .fetch_all(&self.pool)
                .await?
            }
            LikerFilter::NotReciprocated => {
                sqlx::query_as::<_, LikerRow>(
                    r#"
                    SELECT d1.actor_user_id, d1.decided_at
                    FROM decisions d1
                    WHERE d1.recipient_user_id = $1 AND d1.liked
                    AND NOT EXISTS (
                        SELECT 1 FROM decisions d2
                        WHERE d2.actor_user_id = d1.recipient_user_id
                        AND d2.recipient_user_id = d1.actor_user_id
                        AND d2.liked
                    )
                    ORDER BY d1.decided_at DESC, d1.actor_user_id ASC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(recipient_id)
                .bind(limit as i64)
                .bind(offset_param(offset))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(likers)
    }

    async fn count_likers(&self, recipient_id: &str) -> Result<u64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM decisions WHERE recipient_user_id = $1 AND liked",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }
}
