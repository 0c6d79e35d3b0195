//! The produced interface: program-wide TVL and borrowed figures.

use crate::config::Config;
use crate::datasource::{AccountSource, TokenBalanceSource};
use crate::decode::{decode_or_missing, AccountKind};
use crate::domain::{Deal, Decimal, GlobalMarketState, Pubkey};
use crate::error::{AppError, DataInconsistency};
use crate::orchestration::borrowed::market_outstanding_credit;
use crate::pda;
use futures::future::try_join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

/// Explicit context value holding the fetch collaborators and config.
///
/// Every entry point builds its working set fresh; nothing is cached
/// across invocations and nothing is process-wide.
pub struct Aggregator {
    accounts: Arc<dyn AccountSource>,
    tokens: Arc<dyn TokenBalanceSource>,
    config: Config,
}

impl Aggregator {
    pub fn new(
        accounts: Arc<dyn AccountSource>,
        tokens: Arc<dyn TokenBalanceSource>,
        config: Config,
    ) -> Self {
        Self {
            accounts,
            tokens,
            config,
        }
    }

    /// Pooled funds held by each market's signing authority, keyed by
    /// asset identifier.
    pub async fn total_value_locked(&self) -> Result<HashMap<String, Decimal>, AppError> {
        let markets = try_join_all(self.config.market_seeds.iter().map(|seed| async move {
            let (market, _) = pda::find_market_address(seed, &self.config.program_id)?;
            let state = self.market_state(seed, &market).await?;
            let (authority, _) =
                pda::find_signing_authority_address(&market, &self.config.program_id)?;
            Ok::<_, AppError>((state.base_token_mint, authority))
        }))
        .await?;

        let mut by_mint: BTreeMap<Pubkey, Vec<(Pubkey, Pubkey)>> = BTreeMap::new();
        for (mint, authority) in markets {
            by_mint.entry(mint).or_default().push((mint, authority));
        }

        let mut locked = HashMap::new();
        for (mint, pairs) in by_mint {
            let total = self.tokens.sum_balances(&pairs).await?;
            info!(mint = %mint, total = %total, "total value locked");
            locked.insert(asset_key(&mint), total);
        }
        Ok(locked)
    }

    /// Outstanding principal across all in-progress deals of every market,
    /// keyed by asset identifier.
    pub async fn total_borrowed(&self) -> Result<HashMap<String, Decimal>, AppError> {
        let raw = self
            .accounts
            .program_accounts(AccountKind::Deal.discriminator())
            .await?;
        let deals: Vec<(Pubkey, Deal)> = raw
            .iter()
            .filter_map(|(address, data)| {
                decode_or_missing::<Deal>(address, data).map(|deal| (*address, deal))
            })
            .collect();
        info!(
            fetched = raw.len(),
            decoded = deals.len(),
            "candidate deal accounts"
        );

        let per_market = try_join_all(
            self.config
                .market_seeds
                .iter()
                .map(|seed| self.market_borrowed(seed, &deals)),
        )
        .await?;

        let mut totals: BTreeMap<Pubkey, u128> = BTreeMap::new();
        for (mint, amount) in per_market {
            *totals.entry(mint).or_default() += amount;
        }

        let mut borrowed = HashMap::new();
        for (mint, total) in totals {
            let amount = Decimal::from_u128(total)
                .map_err(|_| DataInconsistency::AggregateOutOfRange { mint })?;
            borrowed.insert(asset_key(&mint), amount);
        }
        Ok(borrowed)
    }

    async fn market_borrowed(
        &self,
        seed: &str,
        deals: &[(Pubkey, Deal)],
    ) -> Result<(Pubkey, u128), AppError> {
        let (market, _) = pda::find_market_address(seed, &self.config.program_id)?;
        let state = self.market_state(seed, &market).await?;
        let total = market_outstanding_credit(
            self.accounts.as_ref(),
            &self.config.program_id,
            &market,
            deals,
            seed,
        )
        .await?;
        info!(market = seed, outstanding = %total, "market outstanding credit");
        Ok((state.base_token_mint, total))
    }

    async fn market_state(
        &self,
        seed: &str,
        market: &Pubkey,
    ) -> Result<GlobalMarketState, AppError> {
        let mut infos = self
            .accounts
            .multiple_accounts(std::slice::from_ref(market))
            .await?;
        infos
            .pop()
            .flatten()
            .and_then(|data| decode_or_missing::<GlobalMarketState>(market, &data))
            .ok_or_else(|| {
                DataInconsistency::MissingMarketState {
                    market: seed.to_string(),
                }
                .into()
            })
    }
}

/// Result-map key for an asset on this ledger.
fn asset_key(mint: &Pubkey) -> String {
    format!("solana:{}", mint)
}
