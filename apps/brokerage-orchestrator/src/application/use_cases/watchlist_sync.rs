//! Watchlist Synchronizer
//!
//! Watchlist CRUD against the brokerage API, the default-watchlist
//! cross-reference on the local profile, and ticker / membership enrichment
//! of watchlists and positions.
//!
//! Mutations that return the new state do so by re-reading upstream after
//! the mutation response is observed. Enrichment failures never fail the
//! operation; they come back as an [`Enriched`] warning. Cancellation is not
//! an enrichment failure and always ends the operation with `Cancelled`.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;

use crate::application::dto::{Enriched, EnrichmentStage};
use crate::application::error::OrchestrationError;
use crate::application::ports::{BrokerGatewayPort, InstrumentCatalogPort, ProfilePort};
use crate::application::routes;
use crate::application::use_cases::market_data_joiner::MarketDataJoiner;
use crate::application::use_cases::support::{
    decode, dispatch, expect_success, parse_symbol, require_account, require_account_id,
};
use crate::domain::market_data::TickerMap;
use crate::domain::position::{EnrichedPosition, Position, enrich_positions};
use crate::domain::profile::{ProfilePatch, UserProfile};
use crate::domain::shared::{AccountId, Symbol, WatchlistId};
use crate::domain::watchlist::{
    AddAssetRequest, CreateWatchlistRequest, DEFAULT_WATCHLIST_NAME, EnrichedWatchlist,
    UpdateWatchlistRequest, Watchlist,
};

/// Default number of watchlists enriched concurrently by `list`.
pub const DEFAULT_LIST_FANOUT: usize = 4;

/// Watchlist CRUD, default-watchlist bookkeeping and enrichment.
pub struct WatchlistSynchronizer<G, P, C>
where
    G: BrokerGatewayPort,
    P: ProfilePort,
    C: InstrumentCatalogPort,
{
    gateway: Arc<G>,
    profiles: Arc<P>,
    catalog: Arc<C>,
    joiner: MarketDataJoiner<G>,
    fanout: usize,
}

impl<G, P, C> WatchlistSynchronizer<G, P, C>
where
    G: BrokerGatewayPort,
    P: ProfilePort,
    C: InstrumentCatalogPort,
{
    /// Create a new WatchlistSynchronizer.
    ///
    /// `fanout` bounds concurrent snapshot calls in `list`; zero is treated as one.
    pub fn new(gateway: Arc<G>, profiles: Arc<P>, catalog: Arc<C>, fanout: usize) -> Self {
        Self {
            joiner: MarketDataJoiner::new(Arc::clone(&gateway)),
            gateway,
            profiles,
            catalog,
            fanout: fanout.max(1),
        }
    }

    /// Create a watchlist and return it as created upstream.
    pub async fn create(
        &self,
        account_id: &AccountId,
        name: &str,
        symbols: &[Symbol],
        cancel: &CancellationToken,
    ) -> Result<Watchlist, OrchestrationError> {
        require_account_id(account_id)?;
        if name.trim().is_empty() {
            return Err(OrchestrationError::invalid_input("watchlist name must not be empty"));
        }

        let payload = CreateWatchlistRequest {
            name: name.to_string(),
            symbols: symbols.to_vec(),
        };
        let request = routes::watchlists(account_id).post().with_body(&payload)?;
        let created: Watchlist = decode(dispatch(self.gateway.as_ref(), request, cancel).await?)?;

        tracing::info!(
            account_id = %account_id,
            watchlist_id = %created.id,
            assets = created.assets.len(),
            "Created watchlist"
        );
        Ok(created)
    }

    /// Fetch one watchlist and attach tickers with a single snapshot call.
    pub async fn get(
        &self,
        account_id: &AccountId,
        watchlist_id: &WatchlistId,
        cancel: &CancellationToken,
    ) -> Result<Enriched<EnrichedWatchlist>, OrchestrationError> {
        require_account_id(account_id)?;
        require_watchlist_id(watchlist_id)?;

        let watchlist = self.fetch(account_id, watchlist_id, cancel).await?;
        self.enrich_watchlist(&watchlist, cancel).await
    }

    /// List watchlists, each enriched with its own snapshot call.
    ///
    /// Snapshot calls run with bounded concurrency; results keep upstream
    /// order. A failed snapshot call leaves that watchlist's tickers empty.
    pub async fn list(
        &self,
        account_id: &AccountId,
        cancel: &CancellationToken,
    ) -> Result<Enriched<Vec<EnrichedWatchlist>>, OrchestrationError> {
        require_account_id(account_id)?;

        let request = routes::watchlists(account_id).get();
        let watchlists: Vec<Watchlist> =
            decode(dispatch(self.gateway.as_ref(), request, cancel).await?)?;

        let enriched: Vec<Enriched<EnrichedWatchlist>> = stream::iter(watchlists.iter())
            .map(|watchlist| self.enrich_watchlist(watchlist, cancel))
            .buffered(self.fanout)
            .try_collect()
            .await?;

        let mut result = Enriched::complete(Vec::with_capacity(enriched.len()));
        for item in enriched {
            if let Some(err) = item.enrichment_error {
                for failure in err.failures {
                    result = result.with_failure(
                        failure.stage,
                        format!("watchlist {}: {}", item.primary.id, failure.message),
                    );
                }
            }
            result.primary.push(item.primary);
        }

        tracing::debug!(
            account_id = %account_id,
            watchlists = result.primary.len(),
            complete = result.is_complete(),
            "Listed watchlists"
        );
        Ok(result)
    }

    /// Replace a watchlist's name and asset set.
    pub async fn update(
        &self,
        account_id: &AccountId,
        watchlist_id: &WatchlistId,
        name: &str,
        symbols: &[Symbol],
        cancel: &CancellationToken,
    ) -> Result<Watchlist, OrchestrationError> {
        require_account_id(account_id)?;
        require_watchlist_id(watchlist_id)?;

        let payload = UpdateWatchlistRequest {
            name: name.to_string(),
            symbols: symbols.to_vec(),
        };
        let request = routes::watchlist(account_id, watchlist_id)
            .put()
            .with_body(&payload)?;
        let updated: Watchlist = decode(dispatch(self.gateway.as_ref(), request, cancel).await?)?;

        tracing::info!(
            account_id = %account_id,
            watchlist_id = %watchlist_id,
            "Updated watchlist"
        );
        Ok(updated)
    }

    /// Delete a watchlist. Only `204 No Content` counts as success.
    pub async fn delete(
        &self,
        account_id: &AccountId,
        watchlist_id: &WatchlistId,
        cancel: &CancellationToken,
    ) -> Result<(), OrchestrationError> {
        require_account_id(account_id)?;
        require_watchlist_id(watchlist_id)?;

        let request = routes::watchlist(account_id, watchlist_id).delete();
        let response = dispatch(self.gateway.as_ref(), request, cancel).await?;
        if response.status != 204 {
            return Err(OrchestrationError::UpstreamRejected {
                status: response.status,
                body: response.json_value(),
            });
        }

        tracing::info!(
            account_id = %account_id,
            watchlist_id = %watchlist_id,
            "Deleted watchlist"
        );
        Ok(())
    }

    /// Append a symbol, then return the watchlist as re-read upstream.
    pub async fn add_asset(
        &self,
        account_id: &AccountId,
        watchlist_id: &WatchlistId,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Watchlist, OrchestrationError> {
        require_account_id(account_id)?;
        require_watchlist_id(watchlist_id)?;
        let symbol = parse_symbol(symbol)?;

        self.post_asset(account_id, watchlist_id, &symbol, cancel)
            .await?;
        self.fetch(account_id, watchlist_id, cancel).await
    }

    /// Remove a symbol, then return the watchlist as re-read upstream.
    pub async fn remove_asset(
        &self,
        account_id: &AccountId,
        watchlist_id: &WatchlistId,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Watchlist, OrchestrationError> {
        require_account_id(account_id)?;
        require_watchlist_id(watchlist_id)?;
        let symbol = parse_symbol(symbol)?;

        let request = routes::watchlist_asset(account_id, watchlist_id, &symbol).delete();
        expect_success(dispatch(self.gateway.as_ref(), request, cancel).await?)?;
        tracing::info!(
            account_id = %account_id,
            watchlist_id = %watchlist_id,
            symbol = %symbol,
            "Removed asset from watchlist"
        );

        self.fetch(account_id, watchlist_id, cancel).await
    }

    /// Add a symbol to the profile's default watchlist, creating it first
    /// when the profile has none.
    ///
    /// The create-or-add decision uses the stored profile, not the caller's
    /// copy, so a caller holding a stale profile reuses the recorded
    /// default instead of creating another one.
    ///
    /// On creation the upstream-assigned identifier is written to the
    /// profile and the created watchlist is returned. That local write is
    /// attempted even if `cancel` fires after the create call; if it fails
    /// the error is `ReconciliationPending` with the new identifier.
    pub async fn ensure_default_and_add(
        &self,
        profile: &UserProfile,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Watchlist, OrchestrationError> {
        require_account(profile)?;
        let symbol = parse_symbol(symbol)?;

        let current = self.profiles.get(profile.id).await?;
        let account_id = require_account(&current)?;

        if let Some(watchlist_id) = current
            .default_watchlist()
            .filter(|id| !id.as_str().trim().is_empty())
        {
            return self
                .add_asset(account_id, watchlist_id, symbol.as_str(), cancel)
                .await;
        }

        let created = self
            .create(account_id, DEFAULT_WATCHLIST_NAME, &[symbol], cancel)
            .await?;

        let patch = ProfilePatch::default_watchlist(created.id.clone());
        if let Err(e) = self.profiles.update(profile.id, patch).await {
            tracing::error!(
                user_id = %profile.id,
                watchlist_id = %created.id,
                error = %e,
                "Default watchlist created upstream but profile update failed"
            );
            return Err(OrchestrationError::ReconciliationPending {
                resource: "watchlist",
                upstream_id: created.id.into_inner(),
                message: e.to_string(),
            });
        }

        tracing::info!(
            user_id = %profile.id,
            watchlist_id = %created.id,
            "Recorded default watchlist"
        );
        Ok(created)
    }

    /// Open positions with catalog names, tickers and default-watchlist membership.
    ///
    /// Only the positions call or cancellation can fail the operation.
    /// Snapshot and default-watchlist lookups run concurrently and degrade
    /// on any other failure.
    pub async fn positions_with_enrichment(
        &self,
        account_id: &AccountId,
        default_watchlist: Option<&WatchlistId>,
        cancel: &CancellationToken,
    ) -> Result<Enriched<Vec<EnrichedPosition>>, OrchestrationError> {
        require_account_id(account_id)?;

        let request = routes::positions(account_id).get();
        let positions: Vec<Position> =
            decode(dispatch(self.gateway.as_ref(), request, cancel).await?)?;

        let symbols: Vec<Symbol> = positions.iter().map(|p| p.symbol.clone()).collect();
        let default_watchlist = default_watchlist.filter(|id| !id.as_str().trim().is_empty());

        let tickers_fut = self.joiner.snapshot(&symbols, cancel);
        let membership_fut = async {
            match default_watchlist {
                Some(watchlist_id) => Some(self.fetch(account_id, watchlist_id, cancel).await),
                None => None,
            }
        };
        let (tickers, membership) = futures::join!(tickers_fut, membership_fut);

        let mut warnings = Vec::new();
        let tickers = match tickers {
            Ok(tickers) => tickers,
            Err(OrchestrationError::Cancelled) => return Err(OrchestrationError::Cancelled),
            Err(e) => {
                tracing::warn!(account_id = %account_id, error = %e, "Position tickers unavailable");
                warnings.push((EnrichmentStage::Tickers, e.to_string()));
                TickerMap::new()
            }
        };
        let watchlisted = match membership {
            Some(Ok(watchlist)) => Some(watchlist.symbol_set()),
            Some(Err(OrchestrationError::Cancelled)) => return Err(OrchestrationError::Cancelled),
            Some(Err(e)) => {
                tracing::warn!(
                    account_id = %account_id,
                    error = %e,
                    "Default watchlist unavailable for membership"
                );
                warnings.push((EnrichmentStage::WatchlistMembership, e.to_string()));
                None
            }
            None => None,
        };

        let enriched = enrich_positions(
            &positions,
            |symbol| self.catalog.name_for(symbol),
            &tickers,
            watchlisted.as_ref(),
        );

        Ok(warnings
            .into_iter()
            .fold(Enriched::complete(enriched), |acc, (stage, message)| {
                acc.with_failure(stage, message)
            }))
    }

    async fn fetch(
        &self,
        account_id: &AccountId,
        watchlist_id: &WatchlistId,
        cancel: &CancellationToken,
    ) -> Result<Watchlist, OrchestrationError> {
        let request = routes::watchlist(account_id, watchlist_id).get();
        decode(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    async fn post_asset(
        &self,
        account_id: &AccountId,
        watchlist_id: &WatchlistId,
        symbol: &Symbol,
        cancel: &CancellationToken,
    ) -> Result<(), OrchestrationError> {
        let payload = AddAssetRequest {
            symbol: symbol.clone(),
        };
        let request = routes::watchlist(account_id, watchlist_id)
            .post()
            .with_body(&payload)?;
        expect_success(dispatch(self.gateway.as_ref(), request, cancel).await?)?;

        tracing::info!(
            account_id = %account_id,
            watchlist_id = %watchlist_id,
            symbol = %symbol,
            "Added asset to watchlist"
        );
        Ok(())
    }

    async fn enrich_watchlist(
        &self,
        watchlist: &Watchlist,
        cancel: &CancellationToken,
    ) -> Result<Enriched<EnrichedWatchlist>, OrchestrationError> {
        match self.joiner.snapshot(&watchlist.symbols(), cancel).await {
            Ok(tickers) => Ok(Enriched::complete(watchlist.enrich(&tickers))),
            Err(OrchestrationError::Cancelled) => Err(OrchestrationError::Cancelled),
            Err(e) => {
                tracing::warn!(
                    watchlist_id = %watchlist.id,
                    error = %e,
                    "Watchlist tickers unavailable"
                );
                Ok(Enriched::complete(watchlist.without_tickers())
                    .with_failure(EnrichmentStage::Tickers, e.to_string()))
            }
        }
    }
}

fn require_watchlist_id(watchlist_id: &WatchlistId) -> Result<(), OrchestrationError> {
    if watchlist_id.as_str().trim().is_empty() {
        return Err(OrchestrationError::invalid_input("watchlist id must not be empty"));
    }
    Ok(())
}
