//! Read-only projections over evaluated groups for human review.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use ordered_float::OrderedFloat;

use crate::config::ReportConfig;
use crate::error::GroupError;
use crate::model::{
    GroupDigest, GroupEvaluation, IssueKind, ListingDigest, MatchGroup, NamedCount, QualityReport,
    QualityTier, TierStat, GENERIC_BRAND,
};

const UNKNOWN_STORE: &str = "unknown";

/// Build the summary report. `evaluations[i].index` must refer into `groups`.
pub fn build_report(
    groups: &[MatchGroup],
    evaluations: &[GroupEvaluation],
    config: &ReportConfig,
) -> QualityReport {
    let total = evaluations.len();

    let tiers: Vec<TierStat> = QualityTier::ALL
        .iter()
        .map(|&tier| {
            let count = evaluations.iter().filter(|e| e.tier == tier).count();
            TierStat {
                tier,
                count,
                percent: percent(count, total),
            }
        })
        .collect();

    let malformed_indices: Vec<usize> = evaluations
        .iter()
        .filter(|e| e.is_malformed())
        .map(|e| e.index)
        .collect();
    let invalid_price = evaluations
        .iter()
        .filter(|e| matches!(e.error, Some(GroupError::InvalidPrice { .. })))
        .count();
    let flagged = evaluations.iter().filter(|e| e.is_flagged()).count();
    let clean = evaluations
        .iter()
        .filter(|e| !e.is_flagged() && e.error.is_none())
        .count();

    let mut issue_counts: BTreeMap<IssueKind, usize> = BTreeMap::new();
    for issue in evaluations.iter().flat_map(|e| &e.issues) {
        *issue_counts.entry(issue.kind).or_insert(0) += 1;
    }
    let issue_counts = sorted_counts(issue_counts.into_iter().map(|(k, n)| (k.to_string(), n)));

    let mut categories: HashMap<&str, usize> = HashMap::new();
    for g in groups {
        *categories.entry(g.category.as_str()).or_insert(0) += 1;
    }

    let mut stores: HashMap<&str, usize> = HashMap::new();
    for listing in groups.iter().flat_map(|g| &g.products) {
        let name = listing.source.trim();
        let name = if name.is_empty() { UNKNOWN_STORE } else { name };
        *stores.entry(name).or_insert(0) += 1;
    }
    let missing_stores: Vec<String> = config
        .expected_stores
        .iter()
        .filter(|s| !stores.contains_key(s.as_str()))
        .cloned()
        .collect();

    let title_only = groups.iter().filter(|g| g.is_title_only()).count();
    let mut brands: HashMap<&str, usize> = HashMap::new();
    for brand in groups.iter().filter_map(|g| g.brand.as_deref()) {
        if brand != GENERIC_BRAND {
            *brands.entry(brand).or_insert(0) += 1;
        }
    }

    let high: Vec<&GroupEvaluation> = evaluations
        .iter()
        .filter(|e| e.tier == QualityTier::High)
        .collect();
    let high_tier_savings: f64 = high.iter().filter_map(|e| e.savings).sum();

    let mut by_savings = high.clone();
    by_savings.sort_by_key(|e| (Reverse(OrderedFloat(e.savings.unwrap_or(0.0))), e.index));
    let top_savings: Vec<GroupDigest> = by_savings
        .into_iter()
        .take(config.top_savings)
        .filter_map(|e| digest(groups, e))
        .collect();

    let review_sample: Vec<GroupDigest> = evaluations
        .iter()
        .filter(|e| e.tier == QualityTier::Low || e.is_flagged())
        .take(config.review_sample)
        .filter_map(|e| digest(groups, e))
        .collect();

    // Title-only groups have no brand/SKU anchor, so they are sampled even
    // when they score HIGH.
    let generic_sample: Vec<GroupDigest> = evaluations
        .iter()
        .filter(|e| groups.get(e.index).is_some_and(MatchGroup::is_title_only))
        .take(config.generic_sample)
        .filter_map(|e| digest(groups, e))
        .collect();

    QualityReport {
        total_groups: total,
        tiers,
        malformed: malformed_indices.len(),
        malformed_indices,
        invalid_price,
        flagged,
        clean,
        issue_counts,
        categories: sorted_counts(categories.into_iter().map(|(k, n)| (k.to_string(), n))),
        stores: sorted_counts(stores.into_iter().map(|(k, n)| (k.to_string(), n))),
        missing_stores,
        brand_based: groups.len() - title_only,
        title_only,
        brands: sorted_counts(brands.into_iter().map(|(k, n)| (k.to_string(), n))),
        high_tier_savings,
        top_savings,
        review_sample,
        generic_sample,
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

/// Descending by count, ties by name.
fn sorted_counts(counts: impl Iterator<Item = (String, usize)>) -> Vec<NamedCount> {
    let mut out: Vec<NamedCount> = counts.map(|(name, count)| NamedCount { name, count }).collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

fn digest(groups: &[MatchGroup], e: &GroupEvaluation) -> Option<GroupDigest> {
    let group = groups.get(e.index)?;
    Some(GroupDigest {
        index: e.index,
        category: e.category.clone(),
        tier: e.tier,
        avg_similarity: e.avg_similarity,
        price_ratio: e.price_ratio,
        savings: e.savings,
        savings_percent: e.savings_percent,
        issues: e.issues.iter().map(|i| i.message.clone()).collect(),
        products: group
            .products
            .iter()
            .map(|p| ListingDigest {
                title: p.title.clone(),
                price: p.price,
                source: p.source.clone(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QualityConfig;
    use crate::engine::evaluate_group;
    use crate::model::Listing;

    fn group(category: &str, brand: Option<&str>, items: &[(&str, f64, &str)]) -> MatchGroup {
        let mut g = MatchGroup::new(
            category,
            items
                .iter()
                .map(|(t, p, s)| Listing::new(*t, *p, *s))
                .collect(),
        );
        g.brand = brand.map(str::to_string);
        g
    }

    fn evaluate(groups: &[MatchGroup]) -> Vec<GroupEvaluation> {
        let config = QualityConfig::default();
        groups
            .iter()
            .enumerate()
            .map(|(i, g)| evaluate_group(i, g, &config))
            .collect()
    }

    fn fixture() -> Vec<MatchGroup> {
        vec![
            // HIGH, savings 20
            group("floormat", Some("generic"), &[("Model 3 Floor Mats", 100.0, "Tesery"), ("Model 3 Floor Mats", 120.0, "Yeslak")]),
            // HIGH, savings 50
            group("ppf", Some("xpel"), &[("Model Y Door Sill PPF", 150.0, "Tesery"), ("Model Y Door Sill PPF", 200.0, "TapTes")]),
            // LOW: price spread
            group("bodykit", Some("generic"), &[("Model 3 Diffuser", 100.0, "Hansshow"), ("Model 3 Diffuser", 400.0, "Yeslak")]),
            // malformed
            group("floormat", None, &[("Model 3 Floor Mats", 100.0, "Tesery")]),
        ]
    }

    #[test]
    fn tier_counts_and_percentages() {
        let groups = fixture();
        let report = build_report(&groups, &evaluate(&groups), &ReportConfig::default());
        assert_eq!(report.total_groups, 4);
        assert_eq!(report.tiers[0], TierStat { tier: QualityTier::High, count: 2, percent: 50.0 });
        assert_eq!(report.tiers[1].count, 0);
        assert_eq!(report.tiers[2].count, 2);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.malformed_indices, vec![3]);
        assert_eq!(report.flagged, 1);
        assert_eq!(report.clean, 2);
        assert_eq!(report.issue_counts, vec![NamedCount { name: "high_price_spread".into(), count: 1 }]);
    }

    #[test]
    fn category_and_store_breakdowns_sorted_descending() {
        let groups = fixture();
        let report = build_report(&groups, &evaluate(&groups), &ReportConfig::default());

        assert_eq!(report.categories[0], NamedCount { name: "floormat".into(), count: 2 });
        assert_eq!(report.categories.len(), 3);
        // ties break by name
        assert_eq!(report.categories[1].name, "bodykit");

        assert_eq!(report.stores[0], NamedCount { name: "Tesery".into(), count: 3 });
        assert_eq!(report.stores[1], NamedCount { name: "Yeslak".into(), count: 2 });
        assert!(report.missing_stores.contains(&"EVANNEX".to_string()));
        assert!(!report.missing_stores.contains(&"Tesery".to_string()));
    }

    #[test]
    fn brand_based_vs_title_only() {
        let groups = fixture();
        let report = build_report(&groups, &evaluate(&groups), &ReportConfig::default());
        assert_eq!(report.title_only, 2);
        assert_eq!(report.brand_based, 2);
        assert_eq!(report.brands, vec![NamedCount { name: "xpel".into(), count: 1 }]);
    }

    #[test]
    fn top_savings_limited_to_high_tier() {
        let groups = fixture();
        let config = ReportConfig {
            top_savings: 1,
            ..ReportConfig::default()
        };
        let report = build_report(&groups, &evaluate(&groups), &config);
        assert_eq!(report.top_savings.len(), 1);
        assert_eq!(report.top_savings[0].index, 1);
        assert_eq!(report.top_savings[0].savings, Some(50.0));
        assert_eq!(report.high_tier_savings, 70.0);
    }

    #[test]
    fn review_sample_is_bounded() {
        let groups = fixture();
        let evaluations = evaluate(&groups);

        let report = build_report(&groups, &evaluations, &ReportConfig::default());
        let indices: Vec<usize> = report.review_sample.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![2, 3]);
        assert_eq!(report.review_sample[0].issues.len(), 1);

        let config = ReportConfig {
            review_sample: 1,
            ..ReportConfig::default()
        };
        let report = build_report(&groups, &evaluations, &config);
        assert_eq!(report.review_sample.len(), 1);
    }

    #[test]
    fn generic_sample_takes_title_only_groups_of_any_tier() {
        let groups = fixture();
        let evaluations = evaluate(&groups);

        let report = build_report(&groups, &evaluations, &ReportConfig::default());
        let indices: Vec<usize> = report.generic_sample.iter().map(|d| d.index).collect();
        // group 0 is HIGH and clean, so only this sample surfaces it
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(report.generic_sample[0].tier, QualityTier::High);
        assert_eq!(report.generic_sample[0].products.len(), 2);

        let config = ReportConfig {
            generic_sample: 1,
            ..ReportConfig::default()
        };
        let report = build_report(&groups, &evaluations, &config);
        assert_eq!(report.generic_sample.len(), 1);

        let config = ReportConfig {
            generic_sample: 0,
            ..ReportConfig::default()
        };
        assert!(build_report(&groups, &evaluations, &config).generic_sample.is_empty());
    }

    #[test]
    fn empty_dataset() {
        let report = build_report(&[], &[], &ReportConfig::default());
        assert_eq!(report.total_groups, 0);
        assert!(report.tiers.iter().all(|t| t.count == 0 && t.percent == 0.0));
        assert_eq!(report.missing_stores.len(), 11);
        assert_eq!(report.high_tier_savings, 0.0);
    }
}
