use serde::{Deserialize, Serialize};

// ── Closed enums ─────────────────────────────────────────────────────────
//
// Every user-supplied enum parameter is normalized at the request boundary:
// trim, lowercase, unknown ⇒ documented default.  Invalid input is never an
// error.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Self::Conservative,
            "aggressive" => Self::Aggressive,
            _ => Self::Moderate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketMode {
    All,
    LargeCap,
    Defi,
    Meme,
}

impl MarketMode {
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "large-cap" | "largecap" => Self::LargeCap,
            "defi" => Self::Defi,
            "meme" => Self::Meme,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::LargeCap => "large-cap",
            Self::Defi => "defi",
            Self::Meme => "meme",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Alpha,
    Accuracy,
    Drawdown,
}

impl SortKey {
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "accuracy" => Self::Accuracy,
            "drawdown" => Self::Drawdown,
            _ => Self::Alpha,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Accuracy => "accuracy",
            Self::Drawdown => "drawdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityRegime {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Bullish,
    Neutral,
    Bearish,
}

impl Outlook {
    /// Classify an up-probability into a display outlook.
    ///
    /// Thresholds match the upstream explain endpoint: ≥ 0.56 bullish,
    /// ≤ 0.44 bearish, neutral in between.
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.56 {
            Self::Bullish
        } else if p <= 0.44 {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Neutral => "neutral",
            Self::Bearish => "bearish",
        }
    }
}

// ── Numeric parameter snapping ───────────────────────────────────────────

pub const LOOKBACK_CHOICES: [u32; 4] = [120, 240, 360, 720];
pub const PAGE_SIZE_CHOICES: [usize; 4] = [12, 24, 50, 100];

pub const DEFAULT_LOOKBACK: u32 = 240;
pub const DEFAULT_PAGE_SIZE: usize = 24;
pub const DEFAULT_CAPITAL: f64 = 10_000.0;

/// Snap a requested lookback window to the enumerated set, default 240.
pub fn snap_lookback(v: u32) -> u32 {
    if LOOKBACK_CHOICES.contains(&v) {
        v
    } else {
        DEFAULT_LOOKBACK
    }
}

/// Snap a requested analysis page size to the enumerated set, default 24.
pub fn snap_page_size(v: usize) -> usize {
    if PAGE_SIZE_CHOICES.contains(&v) {
        v
    } else {
        DEFAULT_PAGE_SIZE
    }
}

/// Validate requested starting capital: finite and ≥ 100, otherwise default.
pub fn snap_capital(v: f64) -> f64 {
    if v.is_finite() && v >= 100.0 {
        v
    } else {
        DEFAULT_CAPITAL
    }
}

// ── Upstream wire types ──────────────────────────────────────────────────
//
// Field names mirror the upstream trend API JSON exactly.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trend {
    pub symbol: String,
    pub horizon: String,
    pub risk_profile: RiskProfile,
    pub up_probability: f64,
    pub momentum_score: f64,
    pub volatility_regime: VolatilityRegime,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    pub t: i64,
    pub strategy: f64,
    pub buy_hold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backtest {
    pub symbol: String,
    pub bars_tested: u32,
    pub risk_profile: RiskProfile,
    pub signal_accuracy: f64,
    pub strategy_return: f64,
    pub buy_hold_return: f64,
    pub alpha_vs_buy_hold: f64,
    /// Non-negative fraction; normalized at the gateway boundary.
    pub max_drawdown: f64,
    pub notes: String,
    pub start_time: String,
    pub end_time: String,
    pub equity_curve: Vec<EquityPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub symbol: String,
    pub risk_profile: RiskProfile,
    pub outlook: Outlook,
    pub confidence: f64,
    pub drivers: Vec<String>,
    pub caution: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSimulation {
    pub symbol: String,
    pub risk_profile: RiskProfile,
    pub initial_capital: f64,
    pub position_size_pct: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub trades: u32,
    pub win_rate: f64,
    pub final_equity: f64,
    pub pnl_pct: f64,
    pub max_drawdown: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertFlip {
    pub symbol: String,
    pub from_outlook: String,
    pub to_outlook: String,
    pub up_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsCheck {
    pub risk_profile: RiskProfile,
    pub checked_at: String,
    pub flips: Vec<AlertFlip>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseItem {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_params_fall_back_to_defaults() {
        assert_eq!(RiskProfile::parse_or_default("AGGRESSIVE "), RiskProfile::Aggressive);
        assert_eq!(RiskProfile::parse_or_default("yolo"), RiskProfile::Moderate);
        assert_eq!(MarketMode::parse_or_default("large-cap"), MarketMode::LargeCap);
        assert_eq!(MarketMode::parse_or_default("smallcap"), MarketMode::All);
        assert_eq!(SortKey::parse_or_default("drawdown"), SortKey::Drawdown);
        assert_eq!(SortKey::parse_or_default(""), SortKey::Alpha);
    }

    #[test]
    fn numeric_params_snap_to_enumerated_domains() {
        assert_eq!(snap_lookback(360), 360);
        assert_eq!(snap_lookback(300), 240);
        assert_eq!(snap_page_size(50), 50);
        assert_eq!(snap_page_size(0), 24);
        assert_eq!(snap_page_size(10_000), 24);
        assert!((snap_capital(500.0) - 500.0).abs() < 1e-9);
        assert!((snap_capital(99.0) - 10_000.0).abs() < 1e-9);
        assert!((snap_capital(f64::NAN) - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn outlook_thresholds_match_upstream_pills() {
        assert_eq!(Outlook::from_probability(0.56), Outlook::Bullish);
        assert_eq!(Outlook::from_probability(0.559), Outlook::Neutral);
        assert_eq!(Outlook::from_probability(0.44), Outlook::Bearish);
        assert_eq!(Outlook::from_probability(0.441), Outlook::Neutral);
        assert_eq!(Outlook::from_probability(0.95), Outlook::Bullish);
        assert_eq!(Outlook::from_probability(0.05), Outlook::Bearish);
    }
}
