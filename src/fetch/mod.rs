//! Fetch orchestration over the injected chain index.
//!
//! The chain query API and balance API are external collaborators, consumed
//! only through the traits below (implementations wrap the actual RPC
//! client; tests inject mocks). Every call runs through the retry policy
//! with exponential backoff, and a terminal failure surfaces as
//! [`DataError::FetchFailed`], never swallowed. No timeout is applied by
//! default: a hung upstream waits indefinitely, and callers that need a
//! deadline wrap the orchestrator call themselves.

pub mod accounts;
pub mod posts;
pub mod spaces;

pub use accounts::{format_balance, AccountOrchestrator, AccountView, WalletAccount};
pub use posts::PostOrchestrator;
pub use spaces::SpaceOrchestrator;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{DataError, Result};
use crate::model::{CompositeRecord, ProfileWithContent, SpaceWithContent};

/// Transport or upstream failure reported by an API implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

/// Raw balance record for an account. Absent entirely when the account has
/// no chain presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub free: u128,
}

/// Read access to the chain content index.
#[async_trait]
pub trait QueryApi: Send + Sync {
    /// Composite records for the given post ids, hidden content included
    async fn find_posts_with_all_details(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<CompositeRecord>, FetchError>;

    /// Composite records for the given post ids, public visibility only
    async fn find_public_posts_with_all_details(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<CompositeRecord>, FetchError>;

    async fn post_ids_by_space_id(
        &self,
        space_id: &str,
    ) -> std::result::Result<Vec<String>, FetchError>;

    async fn space_ids_followed_by_account(
        &self,
        account_id: &str,
    ) -> std::result::Result<Vec<String>, FetchError>;

    async fn space_ids_by_owner(
        &self,
        account_id: &str,
    ) -> std::result::Result<Vec<String>, FetchError>;

    async fn space_id_by_handle(
        &self,
        handle: &str,
    ) -> std::result::Result<Option<String>, FetchError>;

    async fn find_spaces(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<SpaceWithContent>, FetchError>;

    /// Spaces not surfaced on public listings (owner dashboards)
    async fn find_unlisted_spaces(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<SpaceWithContent>, FetchError>;

    async fn find_profiles(
        &self,
        addresses: &[String],
    ) -> std::result::Result<Vec<ProfileWithContent>, FetchError>;

    /// Normalize a wallet address into the canonical chain account id
    fn canonical_account_id(&self, address: &str) -> String;
}

/// Read access to account balances.
#[async_trait]
pub trait BalanceApi: Send + Sync {
    async fn balance_of(
        &self,
        address: &str,
    ) -> std::result::Result<Option<BalanceRecord>, FetchError>;
}

/// Run one external call under the configured retry policy.
pub(crate) async fn with_retry<T, F, Fut>(
    config: &AppConfig,
    operation: &str,
    mut call: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, FetchError>>,
{
    let max_attempts = config.fetch_retries.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        match call().await {
            Ok(value) => return Ok(value),
            Err(error) if attempts >= max_attempts => {
                warn!(operation, attempts, error = %error, "fetch failed, giving up");
                return Err(DataError::FetchFailed {
                    cause: format!("{operation}: {error}"),
                });
            }
            Err(error) => {
                debug!(operation, attempt = attempts, error = %error, "fetch attempt failed, retrying");
            }
        }

        // Exponential backoff
        let delay = Duration::from_millis(config.retry_base_delay_ms * 2u64.pow(attempts - 1));
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> AppConfig {
        AppConfig {
            fetch_retries: 3,
            retry_base_delay_ms: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_config(), "flaky", || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(FetchError("connection reset".to_string()))
                } else {
                    Ok(42u32)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_fetch_failed() {
        let calls = AtomicU32::new(0);
        let result: Result<u32> = with_retry(&fast_config(), "down", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError("upstream down".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(DataError::FetchFailed { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
