use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::BoardConfig;
use crate::model::{
    AlertsCheck, Backtest, Explanation, PortfolioSimulation, RiskProfile, Trend, UniverseItem,
};
use crate::symbols::{seed_watchlist, to_query};

/// One operation per upstream data kind.
///
/// Every method is fail-open: transport failures and non-success responses
/// both collapse to the typed default, so nothing above this layer ever
/// observes a network error.  No call is retried.
#[async_trait]
pub trait SymbolDataSource: Send + Sync {
    async fn trends(&self, symbols: &[String], risk: RiskProfile) -> Vec<Trend>;
    async fn backtests(&self, symbols: &[String], lookback: u32, risk: RiskProfile)
        -> Vec<Backtest>;
    async fn explanation(&self, symbol: &str, risk: RiskProfile) -> Option<Explanation>;
    async fn simulation(
        &self,
        symbol: &str,
        risk: RiskProfile,
        lookback: u32,
        capital: f64,
    ) -> Option<PortfolioSimulation>;
    async fn alerts_check(&self, risk: RiskProfile, max_symbols: u32) -> Option<AlertsCheck>;

    async fn watchlist(&self) -> Vec<String>;
    async fn add_watchlist(&self, symbol: &str);
    async fn remove_watchlist(&self, symbol: &str);
    async fn import_watchlist(&self);

    async fn pins(&self) -> Vec<String>;
    async fn add_pin(&self, symbol: &str);
    async fn remove_pin(&self, symbol: &str);

    async fn universe_total(&self) -> Option<u64>;
    async fn universe_search(&self, query: &str, limit: u32) -> Vec<UniverseItem>;
}

// ── Wire envelopes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SymbolListResponse {
    symbols: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UniverseResponse {
    total: u64,
    items: Vec<UniverseItem>,
}

// ── HTTP implementation ──────────────────────────────────────────────────

/// Gateway to the upstream trend API over HTTP/JSON.
pub struct HttpGateway {
    http: reqwest::Client,
    base: String,
}

impl HttpGateway {
    pub fn new(cfg: &BoardConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(cfg.http_timeout)
            .user_agent(cfg.user_agent.clone())
            .build()
            .unwrap_or_default();
        Self {
            http,
            base: cfg.api_base.clone(),
        }
    }

    /// GET a JSON document; any failure (transport, status, decode) ⇒ `None`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Option<T> {
        let url = format!("{}{path}", self.base);
        match self.http.get(&url).query(query).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<T>().await {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::debug!("decode failed for {path}: {e}");
                    None
                }
            },
            Ok(resp) => {
                tracing::debug!("upstream {path} returned {}", resp.status());
                None
            }
            Err(e) => {
                tracing::debug!("upstream {path} unreachable: {e}");
                None
            }
        }
    }

    /// Fire a mutation; the response body is ignored, failure is logged only.
    async fn mutate(&self, method: reqwest::Method, path: &str) {
        let url = format!("{}{path}", self.base);
        match self.http.request(method.clone(), &url).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                tracing::warn!("mutation {method} {path} returned {}", resp.status());
            }
            Err(e) => {
                tracing::warn!("mutation {method} {path} failed: {e}");
            }
        }
    }

    fn joined_query_symbols(symbols: &[String]) -> String {
        symbols.iter().map(|s| to_query(s)).collect::<Vec<_>>().join(",")
    }
}

#[async_trait]
impl SymbolDataSource for HttpGateway {
    async fn trends(&self, symbols: &[String], risk: RiskProfile) -> Vec<Trend> {
        if symbols.is_empty() {
            return Vec::new();
        }
        let q = [
            ("symbols", Self::joined_query_symbols(symbols)),
            ("risk", risk.as_str().to_string()),
        ];
        self.get_json::<Vec<Trend>>("/v1/trends", &q).await.unwrap_or_default()
    }

    async fn backtests(
        &self,
        symbols: &[String],
        lookback: u32,
        risk: RiskProfile,
    ) -> Vec<Backtest> {
        if symbols.is_empty() {
            return Vec::new();
        }
        let q = [
            ("symbols", Self::joined_query_symbols(symbols)),
            ("lookback", lookback.to_string()),
            ("risk", risk.as_str().to_string()),
        ];
        let mut out = self.get_json::<Vec<Backtest>>("/v1/backtest", &q).await.unwrap_or_default();
        // An empty equity curve means the backtest is unavailable, not a
        // degenerate chart.  Upstream reports drawdown as a signed dip.
        out.retain(|b| !b.equity_curve.is_empty());
        for b in &mut out {
            b.max_drawdown = b.max_drawdown.abs();
        }
        out
    }

    async fn explanation(&self, symbol: &str, risk: RiskProfile) -> Option<Explanation> {
        let path = format!("/v1/explain/{}", to_query(symbol));
        let q = [("risk", risk.as_str().to_string())];
        self.get_json(&path, &q).await
    }

    async fn simulation(
        &self,
        symbol: &str,
        risk: RiskProfile,
        lookback: u32,
        capital: f64,
    ) -> Option<PortfolioSimulation> {
        let path = format!("/v1/portfolio/simulate/{}", to_query(symbol));
        let q = [
            ("risk", risk.as_str().to_string()),
            ("lookback", lookback.to_string()),
            ("initial_capital", capital.to_string()),
        ];
        self.get_json(&path, &q).await
    }

    async fn alerts_check(&self, risk: RiskProfile, max_symbols: u32) -> Option<AlertsCheck> {
        let q = [
            ("risk", risk.as_str().to_string()),
            ("max_symbols", max_symbols.clamp(1, 2000).to_string()),
        ];
        self.get_json("/v1/alerts/check", &q).await
    }

    async fn watchlist(&self) -> Vec<String> {
        match self.get_json::<SymbolListResponse>("/v1/watchlist", &[]).await {
            Some(resp) if !resp.symbols.is_empty() => resp.symbols,
            // Unreachable or empty store: fall back to the seed set so the
            // page is never symbol-less.
            _ => seed_watchlist(),
        }
    }

    async fn add_watchlist(&self, symbol: &str) {
        let path = format!("/v1/watchlist/{}", to_query(symbol));
        self.mutate(reqwest::Method::POST, &path).await;
    }

    async fn remove_watchlist(&self, symbol: &str) {
        let path = format!("/v1/watchlist/{}", to_query(symbol));
        self.mutate(reqwest::Method::DELETE, &path).await;
    }

    async fn import_watchlist(&self) {
        self.mutate(reqwest::Method::POST, "/v1/watchlist/import/coingecko").await;
    }

    async fn pins(&self) -> Vec<String> {
        self.get_json::<SymbolListResponse>("/v1/pins", &[])
            .await
            .map(|r| r.symbols)
            .unwrap_or_default()
    }

    async fn add_pin(&self, symbol: &str) {
        let path = format!("/v1/pins/{}", to_query(symbol));
        self.mutate(reqwest::Method::POST, &path).await;
    }

    async fn remove_pin(&self, symbol: &str) {
        let path = format!("/v1/pins/{}", to_query(symbol));
        self.mutate(reqwest::Method::DELETE, &path).await;
    }

    async fn universe_total(&self) -> Option<u64> {
        let q = [("limit", "1".to_string())];
        self.get_json::<UniverseResponse>("/v1/universe/coingecko", &q)
            .await
            .map(|r| r.total)
    }

    async fn universe_search(&self, query: &str, limit: u32) -> Vec<UniverseItem> {
        let q = [
            ("search", query.to_string()),
            ("limit", limit.clamp(1, 2000).to_string()),
        ];
        self.get_json::<UniverseResponse>("/v1/universe/coingecko", &q)
            .await
            .map(|r| r.items)
            .unwrap_or_default()
    }
}
