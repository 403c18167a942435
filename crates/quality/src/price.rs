use serde::Serialize;

use crate::error::GroupError;

/// Price extremes of a group and the derived savings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSpread {
    pub lowest: f64,
    pub highest: f64,
    pub savings: f64,
    pub savings_percent: i64,
}

impl PriceSpread {
    /// `highest / lowest`, always ≥ 1.
    pub fn ratio(&self) -> f64 {
        self.highest / self.lowest
    }
}

/// Lowest/highest/savings over `prices`. Every price must be positive.
pub fn price_spread(prices: &[f64]) -> Result<PriceSpread, GroupError> {
    if prices.is_empty() {
        return Err(GroupError::TooFewProducts { count: 0 });
    }
    if let Some((position, &price)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p <= 0.0)
    {
        return Err(GroupError::InvalidPrice { position, price });
    }

    let lowest = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let savings = highest - lowest;

    Ok(PriceSpread {
        lowest,
        highest,
        savings,
        savings_percent: (100.0 * savings / highest).round() as i64,
    })
}

/// `max(prices) / min(prices)`.
pub fn price_ratio(prices: &[f64]) -> Result<f64, GroupError> {
    price_spread(prices).map(|s| s.ratio())
}
