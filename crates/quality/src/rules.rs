//! Conflict rules — keyword detectors for groups that mix different products.
//!
//! Every rule is one row of [`RULES`]: a kind, a category scope and a detector.
//! Rules are independent of each other; each sees the same read-only
//! [`RuleContext`] and returns zero or more messages. Adding a rule means
//! adding a row.
//!
//! Detectors only depend on the *set* of titles, never on their order, so the
//! issues raised for a group do not change when its products are reordered.

use crate::config::{RulesConfig, Thresholds};
use crate::model::{Issue, IssueKind};
use crate::similarity::PairScore;

/// Model-year / trim codes. Matched as substrings.
pub const VARIANT_TERMS: [&str; 6] = ["pre-refresh", "prerefresh", "highland", "juniper", "plaid", "refresh"];

/// Placement terms in priority order; a title takes the first one it contains.
pub const PLACEMENT_TERMS: [&str; 6] = ["headlight", "taillight", "front", "rear", "interior", "exterior"];

const HEADLIGHT_TERMS: [&str; 2] = ["headlight", "head light"];
const TAILLIGHT_TERMS: [&str; 3] = ["taillight", "tail light", "rear light"];
const FRONT_SPOILER_TERMS: [&str; 2] = ["front spoiler", "front lip"];
const REAR_SPOILER_TERMS: [&str; 2] = ["rear spoiler", "trunk spoiler"];
const SIDE_SKIRT_TERMS: [&str; 2] = ["side skirt", "skirts"];
const EXTERIOR_PPF_TERMS: [&str; 4] = ["exterior", "front", "hood", "bumper"];

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Everything a detector may look at for one group.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Lowercased titles.
    pub titles: &'a [String],
    pub category: &'a str,
    pub pairs: &'a [PairScore],
    pub price_ratio: Option<f64>,
    pub thresholds: &'a Thresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    All,
    Category(&'static str),
}

impl RuleScope {
    pub fn applies_to(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => c.eq_ignore_ascii_case(category.trim()),
        }
    }
}

pub struct ConflictRule {
    pub kind: IssueKind,
    pub scope: RuleScope,
    detect: fn(&RuleContext<'_>) -> Vec<String>,
}

impl ConflictRule {
    pub fn detect(&self, ctx: &RuleContext<'_>) -> Vec<String> {
        (self.detect)(ctx)
    }
}

pub const RULES: &[ConflictRule] = &[
    ConflictRule {
        kind: IssueKind::LowPairSimilarity,
        scope: RuleScope::All,
        detect: low_pair_similarity,
    },
    ConflictRule {
        kind: IssueKind::HighPriceSpread,
        scope: RuleScope::All,
        detect: high_price_spread,
    },
    ConflictRule {
        kind: IssueKind::MixedVariant,
        scope: RuleScope::All,
        detect: mixed_variant,
    },
    ConflictRule {
        kind: IssueKind::MixedPlacement,
        scope: RuleScope::All,
        detect: mixed_placement,
    },
    ConflictRule {
        kind: IssueKind::SpoilerSkirt,
        scope: RuleScope::All,
        detect: spoiler_skirt,
    },
    ConflictRule {
        kind: IssueKind::DiffuserSpoiler,
        scope: RuleScope::All,
        detect: diffuser_spoiler,
    },
    ConflictRule {
        kind: IssueKind::HeadlightTaillight,
        scope: RuleScope::All,
        detect: headlight_taillight,
    },
    ConflictRule {
        kind: IssueKind::FrontRearSpoiler,
        scope: RuleScope::Category("bodykit"),
        detect: front_rear_spoiler,
    },
    ConflictRule {
        kind: IssueKind::SpoilerSideSkirts,
        scope: RuleScope::Category("bodykit"),
        detect: spoiler_side_skirts,
    },
    ConflictRule {
        kind: IssueKind::InteriorExteriorPpf,
        scope: RuleScope::Category("ppf"),
        detect: interior_exterior_ppf,
    },
];

/// Run every enabled, in-scope rule. Issues come out in table order.
pub fn detect_conflicts(ctx: &RuleContext<'_>, rules: &RulesConfig) -> Vec<Issue> {
    RULES
        .iter()
        .filter(|rule| rules.is_enabled(rule.kind) && rule.scope.applies_to(ctx.category))
        .flat_map(|rule| {
            rule.detect(ctx)
                .into_iter()
                .map(move |message| Issue::new(rule.kind, message))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn contains_any(title: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| title.contains(t))
}

/// True if one title satisfies `a` and a *different* title satisfies `b`.
fn cross_match(titles: &[String], a: impl Fn(&str) -> bool, b: impl Fn(&str) -> bool) -> bool {
    titles.iter().enumerate().any(|(i, left)| {
        a(left)
            && titles
                .iter()
                .enumerate()
                .any(|(j, right)| i != j && b(right))
    })
}

/// Variant terms present anywhere in the titles, in vocabulary order.
pub fn variant_terms_in(titles: &[String]) -> Vec<&'static str> {
    VARIANT_TERMS
        .iter()
        .copied()
        .filter(|term| titles.iter().any(|t| t.contains(term)))
        .collect()
}

/// First placement term the title contains, if any.
pub fn placement_of(title: &str) -> Option<&'static str> {
    PLACEMENT_TERMS.iter().copied().find(|term| title.contains(term))
}

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

fn low_pair_similarity(ctx: &RuleContext<'_>) -> Vec<String> {
    let mut messages: Vec<String> = ctx
        .pairs
        .iter()
        .filter(|p| p.score < ctx.thresholds.low_pair_similarity)
        .map(|p| {
            let (a, b) = (&ctx.titles[p.left], &ctx.titles[p.right]);
            let (first, second) = if a <= b { (a, b) } else { (b, a) };
            format!(
                "Low similarity ({:.0}%) between \"{first}\" and \"{second}\"",
                p.score * 100.0
            )
        })
        .collect();
    messages.sort();
    messages
}

fn high_price_spread(ctx: &RuleContext<'_>) -> Vec<String> {
    match ctx.price_ratio {
        Some(ratio) if ratio > ctx.thresholds.high_spread_ratio => {
            vec![format!("High price ratio: {ratio:.2}x")]
        }
        _ => Vec::new(),
    }
}

fn mixed_variant(ctx: &RuleContext<'_>) -> Vec<String> {
    let found = variant_terms_in(ctx.titles);
    if found.len() >= 2 {
        vec![format!("Mixed variants: {}", found.join(", "))]
    } else {
        Vec::new()
    }
}

fn mixed_placement(ctx: &RuleContext<'_>) -> Vec<String> {
    let seen: Vec<&str> = PLACEMENT_TERMS
        .iter()
        .copied()
        .filter(|term| ctx.titles.iter().any(|t| placement_of(t) == Some(*term)))
        .collect();
    if seen.len() >= 2 {
        vec![format!("Mixed placement: {}", seen.join(" vs "))]
    } else {
        Vec::new()
    }
}

fn spoiler_skirt(ctx: &RuleContext<'_>) -> Vec<String> {
    if cross_match(ctx.titles, |t| t.contains("spoiler"), |t| t.contains("skirt")) {
        vec!["Spoiler vs Skirt mismatch".to_string()]
    } else {
        Vec::new()
    }
}

fn diffuser_spoiler(ctx: &RuleContext<'_>) -> Vec<String> {
    if cross_match(ctx.titles, |t| t.contains("diffuser"), |t| t.contains("spoiler")) {
        vec!["Diffuser vs Spoiler mismatch".to_string()]
    } else {
        Vec::new()
    }
}

fn headlight_taillight(ctx: &RuleContext<'_>) -> Vec<String> {
    if cross_match(
        ctx.titles,
        |t| contains_any(t, &HEADLIGHT_TERMS),
        |t| contains_any(t, &TAILLIGHT_TERMS),
    ) {
        vec!["Headlight vs Taillight mismatch".to_string()]
    } else {
        Vec::new()
    }
}

fn front_rear_spoiler(ctx: &RuleContext<'_>) -> Vec<String> {
    if cross_match(
        ctx.titles,
        |t| contains_any(t, &FRONT_SPOILER_TERMS),
        |t| contains_any(t, &REAR_SPOILER_TERMS) && !t.contains("front"),
    ) {
        vec!["Front vs Rear spoiler mismatch".to_string()]
    } else {
        Vec::new()
    }
}

fn spoiler_side_skirts(ctx: &RuleContext<'_>) -> Vec<String> {
    if cross_match(
        ctx.titles,
        |t| t.contains("spoiler") && !t.contains("side"),
        |t| contains_any(t, &SIDE_SKIRT_TERMS),
    ) {
        vec!["Spoiler vs Side skirts mismatch".to_string()]
    } else {
        Vec::new()
    }
}

fn interior_exterior_ppf(ctx: &RuleContext<'_>) -> Vec<String> {
    if cross_match(
        ctx.titles,
        |t| t.contains("interior"),
        |t| contains_any(t, &EXTERIOR_PPF_TERMS),
    ) {
        vec!["Interior vs Exterior PPF mismatch".to_string()]
    } else {
        Vec::new()
    }
}
