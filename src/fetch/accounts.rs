//! Account overview: concurrent balance and profile resolution.
//!
//! Balances for N accounts are dispatched in parallel alongside one batch
//! profile lookup, then joined; wall time is bounded by the slowest single
//! call, not the sum.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::{with_retry, BalanceApi, QueryApi};
use crate::config::AppConfig;
use crate::error::Result;

/// Wallet account as handed over by the wallet extension layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: String,
    /// Display name from the wallet's own metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Joined account view: canonical id, display name, formatted balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub balance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Orchestrates account/balance lookups.
pub struct AccountOrchestrator<Q, B> {
    query: Arc<Q>,
    balances: Arc<B>,
    config: AppConfig,
}

impl<Q: QueryApi, B: BalanceApi> AccountOrchestrator<Q, B> {
    pub fn new(query: Arc<Q>, balances: Arc<B>, config: AppConfig) -> Self {
        Self {
            query,
            balances,
            config,
        }
    }

    /// Balance and profile for every wallet account.
    ///
    /// Name priority: on-chain profile name → wallet metadata name → the
    /// canonical account id.
    pub async fn accounts_overview(&self, accounts: &[WalletAccount]) -> Result<Vec<AccountView>> {
        let addresses: Vec<String> = accounts
            .iter()
            .map(|account| account.address.clone())
            .collect();

        let balance_fetches = join_all(accounts.iter().map(|account| async move {
            with_retry(&self.config, "balance_of", || {
                self.balances.balance_of(&account.address)
            })
            .await
        }));
        let profile_fetch = with_retry(&self.config, "find_profiles", || {
            self.query.find_profiles(&addresses)
        });

        let (balance_results, profiles) = tokio::join!(balance_fetches, profile_fetch);
        let profiles = profiles?;

        let mut views = Vec::with_capacity(accounts.len());
        for (account, balance) in accounts.iter().zip(balance_results) {
            let balance = balance?;
            let id = self.query.canonical_account_id(&account.address);

            let content = profiles
                .iter()
                .find(|profile| profile.profile.id == id)
                .and_then(|profile| profile.content.as_ref());
            let name = content
                .map(|content| content.name.clone())
                .or_else(|| account.name.clone())
                .unwrap_or_else(|| id.clone());

            views.push(AccountView {
                id,
                name,
                balance: format_balance(
                    balance.map(|record| record.free),
                    self.config.token.decimals,
                ),
                avatar: content.and_then(|content| content.avatar.clone()),
            });
        }
        Ok(views)
    }

    /// Formatted balance for one address.
    pub async fn account_balance(&self, address: &str) -> Result<String> {
        let balance = with_retry(&self.config, "balance_of", || {
            self.balances.balance_of(address)
        })
        .await?;
        Ok(format_balance(
            balance.map(|record| record.free),
            self.config.token.decimals,
        ))
    }
}

/// Fixed-point render of a raw integer balance.
///
/// The fraction keeps the token's full decimal precision, zero-padded; an
/// absent balance renders as `0.0000`.
pub fn format_balance(raw: Option<u128>, decimals: u32) -> String {
    let Some(raw) = raw else {
        return "0.0000".to_string();
    };
    if decimals == 0 {
        return format!("{raw}.0000");
    }
    let scale = 10u128.pow(decimals);
    format!(
        "{}.{:0width$}",
        raw / scale,
        raw % scale,
        width = decimals as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_balance_fixed_point() {
        assert_eq!(format_balance(Some(123456), 4), "12.3456");
        assert_eq!(format_balance(Some(1), 4), "0.0001");
        assert_eq!(format_balance(Some(120000), 4), "12.0000");
    }

    #[test]
    fn test_format_balance_absent_is_zero() {
        assert_eq!(format_balance(None, 4), "0.0000");
        assert_eq!(format_balance(None, 10), "0.0000");
    }

    #[test]
    fn test_format_balance_zero_decimals() {
        assert_eq!(format_balance(Some(7), 0), "7.0000");
    }
}
