use std::collections::HashMap;

use crate::gateway::SymbolDataSource;
use crate::model::{
    AlertsCheck, Backtest, Explanation, PortfolioSimulation, RiskProfile, Trend, UniverseItem,
};

/// Request-scoped parameters shared by the fan-out calls.
#[derive(Debug, Clone)]
pub struct CycleParams {
    pub risk: RiskProfile,
    pub lookback: u32,
    pub capital: f64,
    pub alerts_max_symbols: u32,
    /// Free-text universe search; `None` skips the search call.
    pub search: Option<String>,
    pub search_limit: u32,
}

/// Everything one page render pulled from upstream, each section already
/// degraded to its default where the call failed.
#[derive(Debug, Default)]
pub struct PageData {
    pub trends: Vec<Trend>,
    pub backtests: Vec<Backtest>,
    pub explanation: Option<Explanation>,
    pub simulation: Option<PortfolioSimulation>,
    pub alerts: Option<AlertsCheck>,
    pub universe_total: Option<u64>,
    pub universe_matches: Vec<UniverseItem>,
}

impl PageData {
    /// O(1) symbol → backtest join map.  A symbol present in the trend list
    /// but absent here simply has no backtest attached.
    pub fn backtests_by_symbol(&self) -> HashMap<&str, &Backtest> {
        self.backtests.iter().map(|b| (b.symbol.as_str(), b)).collect()
    }
}

/// Issue every Source Gateway call for one render concurrently and wait for
/// all of them to settle — a join-all, not a race.  Each call degrades
/// internally, so one failing upstream never blocks or cancels the others.
///
/// `focus` drives the single-object calls (explanation, simulation); when
/// the composed page is empty those calls are skipped.
pub async fn gather(
    source: &dyn SymbolDataSource,
    page_symbols: &[String],
    focus: Option<&str>,
    params: &CycleParams,
) -> PageData {
    let explanation_fut = async {
        match focus {
            Some(sym) => source.explanation(sym, params.risk).await,
            None => None,
        }
    };
    let simulation_fut = async {
        match focus {
            Some(sym) => {
                source
                    .simulation(sym, params.risk, params.lookback, params.capital)
                    .await
            }
            None => None,
        }
    };
    let search_fut = async {
        match params.search.as_deref() {
            Some(q) if !q.trim().is_empty() => {
                source.universe_search(q.trim(), params.search_limit).await
            }
            _ => Vec::new(),
        }
    };

    let (trends, backtests, explanation, simulation, alerts, universe_total, universe_matches) =
        tokio::join!(
            source.trends(page_symbols, params.risk),
            source.backtests(page_symbols, params.lookback, params.risk),
            explanation_fut,
            simulation_fut,
            source.alerts_check(params.risk, params.alerts_max_symbols),
            source.universe_total(),
            search_fut,
        );

    PageData {
        trends,
        backtests,
        explanation,
        simulation,
        alerts,
        universe_total,
        universe_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EquityPoint, VolatilityRegime};
    use crate::relay::stub::StubSource;

    fn trend(symbol: &str, p: f64) -> Trend {
        Trend {
            symbol: symbol.to_string(),
            horizon: "24h".to_string(),
            risk_profile: RiskProfile::Moderate,
            up_probability: p,
            momentum_score: 0.1,
            volatility_regime: VolatilityRegime::Medium,
            explanation: String::new(),
        }
    }

    fn backtest(symbol: &str, alpha: f64) -> Backtest {
        Backtest {
            symbol: symbol.to_string(),
            bars_tested: 180,
            risk_profile: RiskProfile::Moderate,
            signal_accuracy: 0.55,
            strategy_return: alpha,
            buy_hold_return: 0.0,
            alpha_vs_buy_hold: alpha,
            max_drawdown: 0.05,
            notes: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            equity_curve: vec![EquityPoint { t: 0, strategy: 1.0, buy_hold: 1.0 }],
        }
    }

    fn params() -> CycleParams {
        CycleParams {
            risk: RiskProfile::Moderate,
            lookback: 240,
            capital: 10_000.0,
            alerts_max_symbols: 200,
            search: None,
            search_limit: 25,
        }
    }

    #[tokio::test]
    async fn failing_trends_does_not_block_backtests() {
        let source = StubSource {
            trends: vec![trend("BTCUSDT", 0.6)],
            backtests: vec![backtest("BTCUSDT", 0.1)],
            trends_fail: true,
            ..Default::default()
        };
        let syms = vec!["BTCUSDT".to_string()];

        let page = gather(&source, &syms, Some("BTCUSDT"), &params()).await;

        assert!(page.trends.is_empty());
        assert_eq!(page.backtests.len(), 1);
    }

    #[tokio::test]
    async fn join_map_tolerates_symbols_missing_a_backtest() {
        let source = StubSource {
            trends: vec![trend("BTCUSDT", 0.6), trend("ETHUSDT", 0.5)],
            backtests: vec![backtest("BTCUSDT", 0.1)],
            ..Default::default()
        };
        let syms = vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()];

        let page = gather(&source, &syms, None, &params()).await;
        let by_symbol = page.backtests_by_symbol();

        assert!(by_symbol.contains_key("BTCUSDT"));
        assert!(!by_symbol.contains_key("ETHUSDT"));
        assert_eq!(page.trends.len(), 2);
    }

    #[tokio::test]
    async fn empty_page_skips_single_object_calls() {
        let source = StubSource::default();
        let page = gather(&source, &[], None, &params()).await;

        assert!(page.trends.is_empty());
        assert!(page.explanation.is_none());
        assert!(page.simulation.is_none());
    }
}
