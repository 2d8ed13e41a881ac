use crate::model::{Backtest, SortKey};

/// Order backtests by the selected metric, non-mutating.
///
/// Alpha and accuracy rank descending (higher is better); drawdown ranks
/// ascending (lower is better).  The sort is stable, so ties keep their
/// pre-sort relative order and re-ranking an already ranked sequence is a
/// no-op.  The first element is the primary backtest for the headline
/// equity-curve display.
pub fn rank(backtests: &[Backtest], key: SortKey) -> Vec<Backtest> {
    let mut out = backtests.to_vec();
    match key {
        SortKey::Alpha => {
            out.sort_by(|a, b| b.alpha_vs_buy_hold.total_cmp(&a.alpha_vs_buy_hold));
        }
        SortKey::Accuracy => {
            out.sort_by(|a, b| b.signal_accuracy.total_cmp(&a.signal_accuracy));
        }
        SortKey::Drawdown => {
            out.sort_by(|a, b| a.max_drawdown.total_cmp(&b.max_drawdown));
        }
    }
    out
}
