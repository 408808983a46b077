//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::ports::{BrokerGatewayPort, InstrumentCatalogPort, ProfilePort};
use crate::application::use_cases::{
    AccountDesk, AccountOnboarder, DEFAULT_LIST_FANOUT, MarketDataJoiner, MarketQueries,
    OrderDesk, OrderGuard, WatchlistSynchronizer,
};
use crate::domain::account::DaytradePolicy;

/// Tunables shared by the use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseCaseSettings {
    /// Day-trade ceiling enforced by the order guard.
    pub daytrade_policy: DaytradePolicy,
    /// Concurrent watchlist fetches when listing.
    pub list_fanout: usize,
}

impl Default for UseCaseSettings {
    fn default() -> Self {
        Self {
            daytrade_policy: DaytradePolicy::default(),
            list_fanout: DEFAULT_LIST_FANOUT,
        }
    }
}

/// Dependency injection container.
///
/// Holds the wired ports. Use cases are cheap to build and are created on
/// demand from the shared ports.
pub struct Container<G, P, C>
where
    G: BrokerGatewayPort + 'static,
    P: ProfilePort + 'static,
    C: InstrumentCatalogPort + 'static,
{
    // Ports
    gateway: Arc<G>,
    profiles: Arc<P>,
    catalog: Arc<C>,

    settings: UseCaseSettings,
}

impl<G, P, C> Container<G, P, C>
where
    G: BrokerGatewayPort + 'static,
    P: ProfilePort + 'static,
    C: InstrumentCatalogPort + 'static,
{
    /// Create a new container with all dependencies.
    pub const fn new(
        gateway: Arc<G>,
        profiles: Arc<P>,
        catalog: Arc<C>,
        settings: UseCaseSettings,
    ) -> Self {
        Self {
            gateway,
            profiles,
            catalog,
            settings,
        }
    }

    /// Get the broker gateway port.
    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    /// Get the profile port.
    pub fn profiles(&self) -> Arc<P> {
        Arc::clone(&self.profiles)
    }

    /// Get the instrument catalog port.
    pub fn catalog(&self) -> Arc<C> {
        Arc::clone(&self.catalog)
    }

    /// Active settings.
    pub const fn settings(&self) -> UseCaseSettings {
        self.settings
    }

    /// Create an `OrderGuard`.
    pub fn order_guard(&self) -> OrderGuard<G> {
        OrderGuard::new(Arc::clone(&self.gateway), self.settings.daytrade_policy)
    }

    /// Create an `OrderDesk`.
    pub fn order_desk(&self) -> OrderDesk<G> {
        OrderDesk::new(Arc::clone(&self.gateway), self.order_guard())
    }

    /// Create a `MarketDataJoiner`.
    pub fn market_data_joiner(&self) -> MarketDataJoiner<G> {
        MarketDataJoiner::new(Arc::clone(&self.gateway))
    }

    /// Create a `WatchlistSynchronizer`.
    pub fn watchlist_synchronizer(&self) -> WatchlistSynchronizer<G, P, C> {
        WatchlistSynchronizer::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.profiles),
            Arc::clone(&self.catalog),
            self.settings.list_fanout,
        )
    }

    /// Create an `AccountOnboarder`.
    pub fn account_onboarder(&self) -> AccountOnboarder<G, P> {
        AccountOnboarder::new(Arc::clone(&self.gateway), Arc::clone(&self.profiles))
    }

    /// Create an `AccountDesk`.
    pub fn account_desk(&self) -> AccountDesk<G> {
        AccountDesk::new(Arc::clone(&self.gateway))
    }

    /// Create a `MarketQueries`.
    pub fn market_queries(&self) -> MarketQueries<G> {
        MarketQueries::new(Arc::clone(&self.gateway))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::HttpMethod;
    use crate::application::ports::testing::ScriptedGateway;
    use crate::domain::shared::AccountId;
    use crate::infrastructure::catalog::StaticInstrumentCatalog;
    use crate::infrastructure::persistence::InMemoryProfileStore;
    use tokio_util::sync::CancellationToken;

    type TestContainer = Container<ScriptedGateway, InMemoryProfileStore, StaticInstrumentCatalog>;

    fn container(gateway: ScriptedGateway, settings: UseCaseSettings) -> TestContainer {
        Container::new(
            Arc::new(gateway),
            Arc::new(InMemoryProfileStore::new()),
            Arc::new(StaticInstrumentCatalog::built_in()),
            settings,
        )
    }

    #[test]
    fn default_settings() {
        let settings = UseCaseSettings::default();
        assert_eq!(settings.daytrade_policy.ceiling(), 3);
        assert_eq!(settings.list_fanout, 4);
    }

    #[test]
    fn accessors_share_ports() {
        let container = container(ScriptedGateway::new(), UseCaseSettings::default());

        assert!(Arc::ptr_eq(&container.gateway(), &container.gateway()));
        assert!(Arc::ptr_eq(&container.profiles(), &container.profiles()));
        assert!(Arc::ptr_eq(&container.catalog(), &container.catalog()));
    }

    #[test]
    fn guard_uses_configured_ceiling() {
        let container = container(
            ScriptedGateway::new(),
            UseCaseSettings {
                daytrade_policy: DaytradePolicy::new(5),
                ..UseCaseSettings::default()
            },
        );

        assert_eq!(container.order_guard().policy().ceiling(), 5);
    }

    #[tokio::test]
    async fn use_cases_share_the_gateway() {
        let container = container(
            ScriptedGateway::new().on_json(
                HttpMethod::Get,
                "/v1/trading/accounts/acct-1/account",
                200,
                &serde_json::json!({"id": "acct-1", "daytrade_count": 0}),
            ),
            UseCaseSettings::default(),
        );

        let auth = container
            .order_guard()
            .authorize(&AccountId::new("acct-1"), &CancellationToken::new())
            .await;

        assert!(auth.ok);
        assert_eq!(container.gateway().calls().len(), 1);
    }
}
