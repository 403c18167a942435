use rayon::prelude::*;

use crate::classify::classify;
use crate::config::QualityConfig;
use crate::model::{GroupEvaluation, MatchGroup, QualityRun, QualityTier, RunMeta};
use crate::price::price_spread;
use crate::report::build_report;
use crate::rules::{detect_conflicts, RuleContext};
use crate::similarity::{mean_score, pairwise_scores};

/// Evaluate every group and build the report.
///
/// Groups are evaluated in parallel; results keep dataset order, so the output
/// is the same as a sequential run.
pub fn run(config: &QualityConfig, groups: &[MatchGroup]) -> QualityRun {
    let evaluations: Vec<GroupEvaluation> = groups
        .par_iter()
        .enumerate()
        .map(|(index, group)| evaluate_group(index, group, config))
        .collect();

    let report = build_report(groups, &evaluations, &config.report);

    log::info!(
        "evaluated {} groups: {} high, {} medium, {} low, {} flagged, {} malformed",
        report.total_groups,
        tier_count(&report.tiers, QualityTier::High),
        tier_count(&report.tiers, QualityTier::Medium),
        tier_count(&report.tiers, QualityTier::Low),
        report.flagged,
        report.malformed,
    );
    if !report.missing_stores.is_empty() {
        log::warn!("stores with no listings: {}", report.missing_stores.join(", "));
    }

    QualityRun {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            disabled_rules: config.rules.disabled.clone(),
        },
        report,
        groups: evaluations,
    }
}

fn tier_count(tiers: &[crate::model::TierStat], tier: QualityTier) -> usize {
    tiers.iter().find(|t| t.tier == tier).map_or(0, |t| t.count)
}

/// Score, classify and check one group. Never fails: malformed members and
/// bad prices are recorded on the evaluation and force the LOW tier.
pub fn evaluate_group(index: usize, group: &MatchGroup, config: &QualityConfig) -> GroupEvaluation {
    let mut evaluation = GroupEvaluation {
        index,
        match_key: group.match_key.clone(),
        category: group.category.clone(),
        brand: group.brand.clone(),
        product_count: group.products.len(),
        avg_similarity: 0.0,
        price_ratio: None,
        tier: QualityTier::Low,
        issues: Vec::new(),
        lowest_price: None,
        highest_price: None,
        savings: None,
        savings_percent: None,
        error: None,
    };

    let validated = match group.validate() {
        Ok(v) => v,
        Err(err) => {
            log::debug!("group {index}: {err}");
            evaluation.error = Some(err);
            return evaluation;
        }
    };

    let pairs = pairwise_scores(&validated.titles);
    evaluation.avg_similarity = mean_score(&pairs);

    match price_spread(&validated.prices) {
        Ok(spread) => {
            evaluation.price_ratio = Some(spread.ratio());
            evaluation.lowest_price = Some(spread.lowest);
            evaluation.highest_price = Some(spread.highest);
            evaluation.savings = Some(spread.savings);
            evaluation.savings_percent = Some(spread.savings_percent);
        }
        Err(err) => {
            log::debug!("group {index}: {err}");
            evaluation.error = Some(err);
        }
    }

    evaluation.tier = classify(
        evaluation.avg_similarity,
        evaluation.price_ratio,
        &config.thresholds,
    );

    let ctx = RuleContext {
        titles: &validated.titles,
        category: &group.category,
        pairs: &pairs,
        price_ratio: evaluation.price_ratio,
        thresholds: &config.thresholds,
    };
    evaluation.issues = detect_conflicts(&ctx, &config.rules);

    if !evaluation.issues.is_empty() {
        log::debug!(
            "group {index} ({}): {} issue(s), tier {}",
            group.category,
            evaluation.issues.len(),
            evaluation.tier
        );
    }

    evaluation
}
