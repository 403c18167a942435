//! CSV export of the per-group evaluation table.

use std::io::Write;

use serde::Serialize;

use pricematch_quality::GroupEvaluation;

/// One flat row per group. Optional values become empty cells.
#[derive(Serialize)]
struct EvaluationRow<'a> {
    index: usize,
    category: &'a str,
    brand: &'a str,
    products: usize,
    avg_similarity: String,
    price_ratio: Option<String>,
    tier: String,
    lowest_price: Option<f64>,
    highest_price: Option<f64>,
    savings: Option<f64>,
    savings_percent: Option<i64>,
    issue_count: usize,
    issues: String,
    error: Option<String>,
}

impl<'a> EvaluationRow<'a> {
    fn from_evaluation(e: &'a GroupEvaluation) -> Self {
        Self {
            index: e.index,
            category: &e.category,
            brand: e.brand.as_deref().unwrap_or(""),
            products: e.product_count,
            avg_similarity: format!("{:.4}", e.avg_similarity),
            price_ratio: e.price_ratio.map(|r| format!("{:.4}", r)),
            tier: e.tier.to_string(),
            lowest_price: e.lowest_price,
            highest_price: e.highest_price,
            savings: e.savings,
            savings_percent: e.savings_percent,
            issue_count: e.issues.len(),
            issues: e
                .issues
                .iter()
                .map(|i| i.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            error: e.error.as_ref().map(|err| err.to_string()),
        }
    }
}

/// Write the evaluations in dataset order with a header row.
pub fn write_evaluations_csv<W: Write>(writer: W, evaluations: &[GroupEvaluation]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for evaluation in evaluations {
        wtr.serialize(EvaluationRow::from_evaluation(evaluation))?;
    }
    wtr.flush()?;
    Ok(())
}
