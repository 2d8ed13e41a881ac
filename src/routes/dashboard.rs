use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::aggregate::{self, CycleParams};
use crate::chart::{self, Canvas};
use crate::model::{
    snap_capital, snap_lookback, snap_page_size, Backtest, MarketMode, Outlook, RiskProfile,
    SortKey,
};
use crate::rank;
use crate::relay::{self, MutationIntents};
use crate::state::AppState;
use crate::symbols::{self, to_storage};

/// Headline equity-curve surface.
const EQUITY_CANVAS: Canvas = Canvas::new(640.0, 220.0, 16.0);
/// Per-card strategy sparkline surface.
const SPARK_CANVAS: Canvas = Canvas::new(120.0, 36.0, 4.0);

const ALERTS_MAX_SYMBOLS: u32 = 200;
const SEARCH_LIMIT: u32 = 25;

// ── Query params ─────────────────────────────────────────────────────────
//
// Every field is optional; out-of-domain values snap silently to the
// documented defaults — an invalid parameter is never an error.

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    risk: Option<String>,
    mode: Option<String>,
    sort: Option<String>,
    lookback: Option<u32>,
    limit: Option<usize>,
    capital: Option<f64>,
    /// Focus symbol for explanation/simulation; defaults to the first
    /// composed page symbol.
    symbol: Option<String>,
    /// Universe search query.
    q: Option<String>,

    // Mutation intents, applied before any read of this cycle.
    add: Option<String>,
    remove: Option<String>,
    pin: Option<String>,
    unpin: Option<String>,
    #[serde(default)]
    import_all: bool,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard", get(api_dashboard))
}

// ── Handler ──────────────────────────────────────────────────────────────

/// One full render cycle: mutations, composition, concurrent fan-out,
/// ranking, chart projection, page model.  Degraded upstreams produce
/// empty sections, never an error response.
async fn api_dashboard(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DashboardQuery>,
) -> Json<Value> {
    let risk = RiskProfile::parse_or_default(q.risk.as_deref().unwrap_or(""));
    let mode = MarketMode::parse_or_default(q.mode.as_deref().unwrap_or(""));
    let sort = SortKey::parse_or_default(q.sort.as_deref().unwrap_or(""));
    let lookback = snap_lookback(q.lookback.unwrap_or(0));
    let page_size = snap_page_size(q.limit.unwrap_or(0));
    let capital = snap_capital(q.capital.unwrap_or(f64::NAN));

    // Writes land before any read of the same cycle.
    let intents = MutationIntents {
        import_all: q.import_all,
        add: q.add.clone(),
        remove: q.remove.clone(),
        pin: q.pin.clone(),
        unpin: q.unpin.clone(),
    };
    relay::apply(state.source.as_ref(), &intents).await;

    let (watchlist, pins) = tokio::join!(state.source.watchlist(), state.source.pins());
    let composed = symbols::compose(&watchlist, &pins, mode, page_size, &state.categories);

    let focus = q
        .symbol
        .as_deref()
        .map(to_storage)
        .or_else(|| composed.page.first().cloned());

    let params = CycleParams {
        risk,
        lookback,
        capital,
        alerts_max_symbols: ALERTS_MAX_SYMBOLS,
        search: q.q.clone(),
        search_limit: SEARCH_LIMIT,
    };
    let page = aggregate::gather(state.source.as_ref(), &composed.page, focus.as_deref(), &params)
        .await;

    let ranked = rank::rank(&page.backtests, sort);
    let by_symbol = page.backtests_by_symbol();

    // Trend cards follow the composed (pinned-first) symbol order.
    let pinned: std::collections::HashSet<String> =
        pins.iter().map(|s| to_storage(s)).collect();
    let trend_by_symbol: std::collections::HashMap<&str, _> =
        page.trends.iter().map(|t| (t.symbol.as_str(), t)).collect();

    let cards: Vec<Value> = composed
        .page
        .iter()
        .filter_map(|sym| trend_by_symbol.get(sym.as_str()).map(|t| (sym, *t)))
        .map(|(sym, t)| {
            let bt = by_symbol.get(sym.as_str());
            let spark = bt.and_then(|b| {
                let strategy: Vec<f64> = b.equity_curve.iter().map(|p| p.strategy).collect();
                chart::sparkline(&strategy, SPARK_CANVAS)
            });
            json!({
                "symbol": sym,
                "horizon": t.horizon,
                "up_probability": t.up_probability,
                "outlook": Outlook::from_probability(t.up_probability),
                "momentum_score": t.momentum_score,
                "volatility_regime": t.volatility_regime,
                "explanation": t.explanation,
                "pinned": pinned.contains(sym),
                "alpha": bt.map(|b| b.alpha_vs_buy_hold),
                "accuracy": bt.map(|b| b.signal_accuracy),
                "sparkline": spark,
            })
        })
        .collect();

    let primary_chart = ranked.first().and_then(equity_chart);

    let backtest_rows: Vec<Value> = ranked
        .iter()
        .map(|b| {
            json!({
                "symbol": b.symbol,
                "bars_tested": b.bars_tested,
                "signal_accuracy": b.signal_accuracy,
                "strategy_return": b.strategy_return,
                "buy_hold_return": b.buy_hold_return,
                "alpha_vs_buy_hold": b.alpha_vs_buy_hold,
                "max_drawdown": b.max_drawdown,
                "start_time": b.start_time,
                "end_time": b.end_time,
                "notes": b.notes,
            })
        })
        .collect();

    Json(json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "params": {
            "risk": risk,
            "mode": mode,
            "sort": sort,
            "lookback": lookback,
            "limit": page_size,
            "capital": capital,
        },
        "watchlist": {
            "total": composed.full.len(),
            "shown": composed.page.len(),
            "symbols": composed.full,
        },
        "pins": pins,
        "focus": focus,
        "trends": cards,
        "backtests": backtest_rows,
        "equity_chart": primary_chart,
        "explanation": page.explanation,
        "simulation": page.simulation,
        "alerts": page.alerts,
        "universe": {
            "total": page.universe_total,
            "matches": page.universe_matches,
        },
    }))
}

/// Project the primary backtest's strategy and buy-hold curves onto one
/// shared scale.  `None` when the curve is empty — the page renders the
/// "no chart data" state instead of a zero-length polyline.
fn equity_chart(bt: &Backtest) -> Option<Value> {
    let strategy: Vec<f64> = bt.equity_curve.iter().map(|p| p.strategy).collect();
    let buy_hold: Vec<f64> = bt.equity_curve.iter().map(|p| p.buy_hold).collect();

    let projected = chart::project(&[strategy.as_slice(), buy_hold.as_slice()], EQUITY_CANVAS)?;
    Some(json!({
        "symbol": bt.symbol,
        "width": EQUITY_CANVAS.width,
        "height": EQUITY_CANVAS.height,
        "strategy": &projected[0],
        "buy_hold": &projected[1],
    }))
}
