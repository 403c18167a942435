use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GroupError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single scraped listing from one store.
///
/// `title` and `price` are validated per group rather than at decode time so
/// that one bad record marks its group malformed instead of failing the load.
/// Explicit `null`s decode like absent keys.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl Listing {
    pub fn new(title: impl Into<String>, price: f64, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: Some(price),
            source: source.into(),
            ..Self::default()
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Brand value the grouping step writes for title-only groups.
pub const GENERIC_BRAND: &str = "generic";

/// A set of listings believed to be the same product.
///
/// Persisted copies of `lowestPrice`/`highestPrice`/`savings` are not read;
/// they are always derived from `products` (see [`crate::price::PriceSpread`]).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<Listing>,
}

impl MatchGroup {
    pub fn new(category: impl Into<String>, products: Vec<Listing>) -> Self {
        Self {
            category: category.into(),
            products,
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// True when the group was formed from titles alone (no known brand/SKU).
    pub fn is_title_only(&self) -> bool {
        self.brand.as_deref() == Some(GENERIC_BRAND)
    }

    /// Checks the members and returns lowercased titles and prices.
    pub fn validate(&self) -> Result<ValidatedGroup, GroupError> {
        if self.products.len() < 2 {
            return Err(GroupError::TooFewProducts {
                count: self.products.len(),
            });
        }

        let mut titles = Vec::with_capacity(self.products.len());
        let mut prices = Vec::with_capacity(self.products.len());
        for (position, listing) in self.products.iter().enumerate() {
            if listing.title.trim().is_empty() {
                return Err(GroupError::MissingTitle { position });
            }
            let price = listing.price.ok_or(GroupError::MissingPrice { position })?;
            if !price.is_finite() {
                return Err(GroupError::MissingPrice { position });
            }
            titles.push(listing.title.to_lowercase());
            prices.push(price);
        }

        Ok(ValidatedGroup { titles, prices })
    }
}

/// Lowercased titles and prices of a group whose members passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedGroup {
    pub titles: Vec<String>,
    pub prices: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityTier {
    High,
    Medium,
    Low,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [Self::High, Self::Medium, Self::Low];
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// Kind of semantic conflict raised by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    LowPairSimilarity,
    HighPriceSpread,
    MixedVariant,
    MixedPlacement,
    SpoilerSkirt,
    DiffuserSpoiler,
    HeadlightTaillight,
    FrontRearSpoiler,
    SpoilerSideSkirts,
    InteriorExteriorPpf,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowPairSimilarity => write!(f, "low_pair_similarity"),
            Self::HighPriceSpread => write!(f, "high_price_spread"),
            Self::MixedVariant => write!(f, "mixed_variant"),
            Self::MixedPlacement => write!(f, "mixed_placement"),
            Self::SpoilerSkirt => write!(f, "spoiler_skirt"),
            Self::DiffuserSpoiler => write!(f, "diffuser_spoiler"),
            Self::HeadlightTaillight => write!(f, "headlight_taillight"),
            Self::FrontRearSpoiler => write!(f, "front_rear_spoiler"),
            Self::SpoilerSideSkirts => write!(f, "spoiler_side_skirts"),
            Self::InteriorExteriorPpf => write!(f, "interior_exterior_ppf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Per-group output of one evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct GroupEvaluation {
    /// Position of the group in the dataset.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_key: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub product_count: usize,
    pub avg_similarity: f64,
    /// `None` when the ratio is undefined (malformed group or non-positive price).
    pub price_ratio: Option<f64>,
    pub tier: QualityTier,
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GroupError>,
}

impl GroupEvaluation {
    pub fn is_flagged(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Members failed validation; see `error`.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.error,
            Some(
                GroupError::TooFewProducts { .. }
                    | GroupError::MissingTitle { .. }
                    | GroupError::MissingPrice { .. }
            )
        )
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierStat {
    pub tier: QualityTier,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

/// Compact view of a group for the review lists.
#[derive(Debug, Clone, Serialize)]
pub struct GroupDigest {
    pub index: usize,
    pub category: String,
    pub tier: QualityTier,
    pub avg_similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_percent: Option<i64>,
    pub issues: Vec<String>,
    pub products: Vec<ListingDigest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingDigest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub total_groups: usize,
    pub tiers: Vec<TierStat>,
    pub malformed: usize,
    pub malformed_indices: Vec<usize>,
    pub invalid_price: usize,
    pub flagged: usize,
    pub clean: usize,
    pub issue_counts: Vec<NamedCount>,
    pub categories: Vec<NamedCount>,
    pub stores: Vec<NamedCount>,
    pub missing_stores: Vec<String>,
    pub brand_based: usize,
    pub title_only: usize,
    pub brands: Vec<NamedCount>,
    pub high_tier_savings: f64,
    pub top_savings: Vec<GroupDigest>,
    pub review_sample: Vec<GroupDigest>,
    pub generic_sample: Vec<GroupDigest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
    pub disabled_rules: Vec<IssueKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityRun {
    pub meta: RunMeta,
    pub report: QualityReport,
    pub groups: Vec<GroupEvaluation>,
}
