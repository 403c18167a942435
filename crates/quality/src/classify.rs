use crate::config::Thresholds;
use crate::model::QualityTier;

/// Assign a quality tier from average similarity and price ratio.
///
/// Checked in order: HIGH, then MEDIUM, then LOW as the catch-all. An
/// undefined ratio (`None`) is always LOW.
pub fn classify(avg_similarity: f64, price_ratio: Option<f64>, thresholds: &Thresholds) -> QualityTier {
    let Some(ratio) = price_ratio else {
        return QualityTier::Low;
    };

    if avg_similarity >= thresholds.high_min_similarity && ratio <= thresholds.high_max_price_ratio {
        QualityTier::High
    } else if avg_similarity >= thresholds.medium_min_similarity
        && ratio <= thresholds.medium_max_price_ratio
    {
        QualityTier::Medium
    } else {
        QualityTier::Low
    }
}
