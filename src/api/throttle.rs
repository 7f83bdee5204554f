// src/api/throttle.rs
//! A repository wrapper that caps requests in flight across all callers.
//!
//! Category listings, the four enrichment passes and image downloads each
//! fan out on their own; routing them through one [`ThrottledRepository`]
//! keeps the total against the wiki at the configured concurrency.

use super::query::ApiQuery;
use super::{ApiResponse, WikiRepository};
use crate::error::AppError;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Holds one semaphore permit for the duration of every request.
pub struct ThrottledRepository {
    inner: Arc<dyn WikiRepository>,
    permits: Semaphore,
    limit: usize,
}

impl ThrottledRepository {
    pub fn new(inner: Arc<dyn WikiRepository>, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            inner,
            permits: Semaphore::new(limit),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    async fn acquire(&self) -> Result<tokio::sync::SemaphorePermit<'_>, AppError> {
        self.permits
            .acquire()
            .await
            .map_err(|e| AppError::InternalError {
                message: "request limiter closed".to_string(),
                source: Some(Box::new(e)),
            })
    }
}

#[async_trait::async_trait]
impl WikiRepository for ThrottledRepository {
    async fn query(&self, query: &ApiQuery) -> Result<ApiResponse<String>, AppError> {
        let _permit = self.acquire().await?;
        self.inner.query(query).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let _permit = self.acquire().await?;
        self.inner.download(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counting {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Counting {
        async fn hold(&self) {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl WikiRepository for Counting {
        async fn query(&self, _query: &ApiQuery) -> Result<ApiResponse<String>, AppError> {
            self.hold().await;
            Ok(ApiResponse::ok("https://wiki.test", "<api />"))
        }

        async fn download(&self, _url: &str) -> Result<Vec<u8>, AppError> {
            self.hold().await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_queries_and_downloads_share_the_limit() {
        let counting = Arc::new(Counting::default());
        let throttled = ThrottledRepository::new(counting.clone(), 3);
        let query = ApiQuery::new();

        let queries = (0..10).map(|_| throttled.query(&query));
        let downloads = (0..10).map(|_| throttled.download("https://upload.test/a.png"));
        let (q, d) = tokio::join!(
            futures::future::join_all(queries),
            futures::future::join_all(downloads)
        );

        assert!(q.iter().all(Result::is_ok));
        assert!(d.iter().all(Result::is_ok));
        assert_eq!(counting.peak.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_zero_limit_still_admits_one() {
        let throttled = ThrottledRepository::new(Arc::new(Counting::default()), 0);
        assert_eq!(throttled.limit(), 1);
    }
}
