use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    api::error,
    modules::decision::{
        cursor::PageCursor,
        feed::{FeedConfig, LikedYouFeed},
        model::{
            CountLikedYouResponse, Liker, LikerFilter, ListLikedYouResponse, NewDecision,
            PutDecisionResponse,
        },
        reciprocity,
        repository::DecisionRepository,
    },
};

fn require_user_id(id: &str, field: &'static str) -> Result<(), error::SystemError> {
    if id.trim().is_empty() {
        return Err(error::SystemError::bad_request(format!("{field} is required")));
    }
    Ok(())
}

#[derive(Clone)]
pub struct DecisionService<R>
where
    R: DecisionRepository,
{
    repo: Arc<R>,
    feed: LikedYouFeed<R>,
    request_timeout: Duration,
}

impl<R> DecisionService<R>
where
    R: DecisionRepository,
{
    pub fn with_dependencies(repo: Arc<R>, config: FeedConfig) -> Self {
        let feed = LikedYouFeed::new(repo.clone(), config.page_size);
        tracing::info!(page_size = feed.page_size(), "DecisionService initialized");
        DecisionService { repo, feed, request_timeout: config.request_timeout }
    }

    /// Runs `fut` under the request deadline. On expiry the future is dropped, which rolls
    /// back any transaction it holds.
    async fn with_deadline<T, F>(
        &self,
        op: &'static str,
        fut: F,
    ) -> Result<T, error::SystemError>
    where
        F: Future<Output = Result<T, error::SystemError>>,
    {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(res) => res,
            Err(_) => {
                let timeout_ms = self.request_timeout.as_millis() as u64;
                tracing::warn!(op, timeout_ms, "deadline exceeded");
                Err(error::SystemError::aborted(format!("{op} exceeded its deadline")))
            }
        }
    }

    async fn list(
        &self,
        recipient_id: &str,
        pagination_token: Option<&str>,
        filter: LikerFilter,
    ) -> Result<ListLikedYouResponse, error::SystemError> {
        require_user_id(recipient_id, "recipientUserId")?;
        let cursor = PageCursor::decode(pagination_token);

        let page = self
            .with_deadline("list likers", self.feed.page(recipient_id, filter, cursor))
            .await?;

        tracing::debug!(
            recipient_id,
            ?filter,
            offset = cursor.offset(),
            returned = page.likers.len(),
            more = page.next.is_some(),
            "liked-you page served"
        );

        Ok(ListLikedYouResponse {
            likers: page.likers.into_iter().map(Liker::from).collect(),
            next_pagination_token: page.next.map(|c| c.encode()),
        })
    }

    pub async fn list_liked_you(
        &self,
        recipient_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<ListLikedYouResponse, error::SystemError> {
        self.list(recipient_id, pagination_token, LikerFilter::All).await
    }

    pub async fn list_new_liked_you(
        &self,
        recipient_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<ListLikedYouResponse, error::SystemError> {
        self.list(recipient_id, pagination_token, LikerFilter::NotReciprocated).await
    }

    pub async fn count_liked_you(
        &self,
        recipient_id: &str,
    ) -> Result<CountLikedYouResponse, error::SystemError> {
        require_user_id(recipient_id, "recipientUserId")?;
        let count =
            self.with_deadline("count likers", self.repo.count_likers(recipient_id)).await?;
        Ok(CountLikedYouResponse { count })
    }

    /// Records the decision and reports whether it completed a mutual like.
    ///
    /// Flow, all in one transaction:
    /// 1. Upsert the (actor, recipient) row
    /// 2. Read both directions of the pair
    /// 3. Commit
    pub async fn put_decision(
        &self,
        actor_id: &str,
        recipient_id: &str,
        liked: bool,
    ) -> Result<PutDecisionResponse, error::SystemError> {
        require_user_id(actor_id, "actorUserId")?;
        require_user_id(recipient_id, "recipientUserId")?;

        let decision = NewDecision {
            actor_id: actor_id.to_string(),
            recipient_id: recipient_id.to_string(),
            liked,
            decided_at: chrono::Utc::now(),
        };

        let mutual_likes = self
            .with_deadline("put decision", async {
                let mut tx = self.repo.begin().await?;
                let mutual = reciprocity::record_decision(tx.as_mut(), &decision).await?;
                tx.commit().await?;
                Ok::<_, error::SystemError>(mutual)
            })
            .await?;

        tracing::info!(actor_id, recipient_id, liked, mutual_likes, "decision recorded");

        Ok(PutDecisionResponse { mutual_likes })
    }
}
