use crate::gateway::SymbolDataSource;

/// User-initiated store mutations for one request cycle: at most one add and
/// one remove per target list, plus the bulk import flag.
#[derive(Debug, Default, Clone)]
pub struct MutationIntents {
    pub import_all: bool,
    pub add: Option<String>,
    pub remove: Option<String>,
    pub pin: Option<String>,
    pub unpin: Option<String>,
}

impl MutationIntents {
    pub fn is_empty(&self) -> bool {
        !self.import_all
            && self.add.is_none()
            && self.remove.is_none()
            && self.pin.is_none()
            && self.unpin.is_none()
    }
}

/// Apply all intents against the stores before any read of the same cycle,
/// so the composer observes post-mutation state without a second round trip.
///
/// The watchlist chain runs import-all first, then add, then remove.  The
/// pin chain targets an independent store and runs concurrently with it.
/// Failed mutations are already swallowed inside the gateway; the read that
/// follows simply reflects unchanged state.
pub async fn apply(source: &dyn SymbolDataSource, intents: &MutationIntents) {
    if intents.is_empty() {
        return;
    }

    let watch = async {
        if intents.import_all {
            source.import_watchlist().await;
        }
        if let Some(sym) = &intents.add {
            source.add_watchlist(sym).await;
        }
        if let Some(sym) = &intents.remove {
            source.remove_watchlist(sym).await;
        }
    };

    let pins = async {
        if let Some(sym) = &intents.pin {
            source.add_pin(sym).await;
        }
        if let Some(sym) = &intents.unpin {
            source.remove_pin(sym).await;
        }
    };

    tokio::join!(watch, pins);
}

#[cfg(test)]
pub(crate) mod stub {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::gateway::SymbolDataSource;
    use crate::model::{
        AlertsCheck, Backtest, Explanation, PortfolioSimulation, RiskProfile, Trend, UniverseItem,
    };
    use crate::symbols::to_storage;

    /// In-memory store double for the upstream collaborator.
    #[derive(Default)]
    pub struct StubSource {
        pub watchlist: Mutex<Vec<String>>,
        pub pins: Mutex<Vec<String>>,
        pub trends: Vec<Trend>,
        pub backtests: Vec<Backtest>,
        /// When set, list reads behave as a failed upstream call.
        pub trends_fail: bool,
    }

    #[async_trait]
    impl SymbolDataSource for StubSource {
        async fn trends(&self, symbols: &[String], _risk: RiskProfile) -> Vec<Trend> {
            if self.trends_fail {
                return Vec::new();
            }
            self.trends
                .iter()
                .filter(|t| symbols.contains(&t.symbol))
                .cloned()
                .collect()
        }

        async fn backtests(
            &self,
            symbols: &[String],
            _lookback: u32,
            _risk: RiskProfile,
        ) -> Vec<Backtest> {
            self.backtests
                .iter()
                .filter(|b| symbols.contains(&b.symbol))
                .cloned()
                .collect()
        }

        async fn explanation(&self, _symbol: &str, _risk: RiskProfile) -> Option<Explanation> {
            None
        }

        async fn simulation(
            &self,
            _symbol: &str,
            _risk: RiskProfile,
            _lookback: u32,
            _capital: f64,
        ) -> Option<PortfolioSimulation> {
            None
        }

        async fn alerts_check(&self, _risk: RiskProfile, _max: u32) -> Option<AlertsCheck> {
            None
        }

        async fn watchlist(&self) -> Vec<String> {
            self.watchlist.lock().unwrap().clone()
        }

        async fn add_watchlist(&self, symbol: &str) {
            let pair = to_storage(symbol);
            let mut list = self.watchlist.lock().unwrap();
            if !list.contains(&pair) {
                list.push(pair);
            }
        }

        async fn remove_watchlist(&self, symbol: &str) {
            let pair = to_storage(symbol);
            self.watchlist.lock().unwrap().retain(|s| *s != pair);
        }

        async fn import_watchlist(&self) {}

        async fn pins(&self) -> Vec<String> {
            self.pins.lock().unwrap().clone()
        }

        async fn add_pin(&self, symbol: &str) {
            let pair = to_storage(symbol);
            let mut list = self.pins.lock().unwrap();
            if !list.contains(&pair) {
                list.push(pair);
            }
        }

        async fn remove_pin(&self, symbol: &str) {
            let pair = to_storage(symbol);
            self.pins.lock().unwrap().retain(|s| *s != pair);
        }

        async fn universe_total(&self) -> Option<u64> {
            None
        }

        async fn universe_search(&self, _query: &str, _limit: u32) -> Vec<UniverseItem> {
            Vec::new()
        }
    }
}
