use std::{sync::Arc, time::Duration};

use crate::{
    api::error,
    constants::DEFAULT_PAGE_SIZE,
    modules::decision::{
        cursor::PageCursor,
        model::{LikerFilter, LikerRow},
        repository::DecisionRepository,
    },
};

#[derive(Debug, Clone, Copy)]
pub struct FeedConfig {
    pub page_size: u32,
    /// Deadline for one request's store work.
    pub request_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, request_timeout: Duration::from_secs(5) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub likers: Vec<LikerRow>,
    /// Absent once the feed is exhausted.
    pub next: Option<PageCursor>,
}

#[derive(Clone)]
pub struct LikedYouFeed<R>
where
    R: DecisionRepository,
{
    repo: Arc<R>,
    page_size: u32,
}

impl<R> LikedYouFeed<R>
where
    R: DecisionRepository,
{
    pub fn new(repo: Arc<R>, page_size: u32) -> Self {
        LikedYouFeed { repo, page_size: page_size.max(1) }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// One page starting at `cursor`.
    ///
    /// Fetches one row past the page so a next cursor is only issued when more rows exist.
    pub async fn page(
        &self,
        recipient_id: &str,
        filter: LikerFilter,
        cursor: PageCursor,
    ) -> Result<FeedPage, error::SystemError> {
        let mut likers = self
            .repo
            .find_likers(recipient_id, filter, self.page_size.saturating_add(1), cursor.offset())
            .await?;

        let next = if likers.len() > self.page_size as usize {
            likers.truncate(self.page_size as usize);
            Some(cursor.advance(self.page_size))
        } else {
            None
        };

        Ok(FeedPage { likers, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::decision::{model::NewDecision, repository_memory::DecisionRepositoryMemory};
    use chrono::TimeZone;

    async fn seed_likers(repo: &DecisionRepositoryMemory, recipient: &str, count: i64) {
        for i in 0..count {
            repo.seed(NewDecision {
                actor_id: format!("actor-{i:02}"),
                recipient_id: recipient.to_string(),
                liked: true,
                decided_at: chrono::Utc.timestamp_opt(1_700_000_000 + i, 0).unwrap(),
            })
            .await;
        }
    }

    #[tokio::test]
    async fn test_zero_page_size_is_clamped() {
        let feed = LikedYouFeed::new(Arc::new(DecisionRepositoryMemory::new()), 0);
        assert_eq!(feed.page_size(), 1);
    }

    #[tokio::test]
    async fn test_exact_multiple_of_page_size_has_no_trailing_cursor() {
        let repo = Arc::new(DecisionRepositoryMemory::new());
        seed_likers(&repo, "x", 20).await;
        let feed = LikedYouFeed::new(repo, 10);

        let first = feed.page("x", LikerFilter::All, PageCursor::default()).await.unwrap();
        assert_eq!(first.likers.len(), 10);
        let next = first.next.expect("first page should have a next cursor");

        let second = feed.page("x", LikerFilter::All, next).await.unwrap();
        assert_eq!(second.likers.len(), 10);
        assert!(second.next.is_none());
    }

    #[tokio::test]
    async fn test_pages_do_not_overlap() {
        let repo = Arc::new(DecisionRepositoryMemory::new());
        seed_likers(&repo, "x", 7).await;
        let feed = LikedYouFeed::new(repo, 3);

        let mut seen = Vec::new();
        let mut cursor = PageCursor::default();
        loop {
            let page = feed.page("x", LikerFilter::All, cursor).await.unwrap();
            seen.extend(page.likers.into_iter().map(|l| l.actor_user_id));
            match page.next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        let expected: Vec<String> = (0..7).rev().map(|i| format!("actor-{i:02}")).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_cursor_past_end_is_empty() {
        let repo = Arc::new(DecisionRepositoryMemory::new());
        seed_likers(&repo, "x", 3).await;
        let feed = LikedYouFeed::new(repo, 10);

        let cursor = PageCursor::default().advance(50);
        let page = feed.page("x", LikerFilter::All, cursor).await.unwrap();
        assert!(page.likers.is_empty());
        assert!(page.next.is_none());
    }
}
