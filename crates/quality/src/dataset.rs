//! Decoding of the persisted match dataset (`matches.json`).

use std::io::Read;

use crate::error::QualityError;
use crate::model::MatchGroup;

/// Parse the JSON array of match groups written by the grouping step.
///
/// Any decode failure rejects the whole dataset; groups are never partially
/// loaded.
pub fn parse_dataset(json: &str) -> Result<Vec<MatchGroup>, QualityError> {
    serde_json::from_str(json).map_err(|e| QualityError::DatasetLoad(e.to_string()))
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Vec<MatchGroup>, QualityError> {
    serde_json::from_reader(reader).map_err(|e| QualityError::DatasetLoad(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GroupError;

    const SAMPLE: &str = r#"[
  {
    "matchKey": "tesla model 3 floor mats",
    "category": "floormat",
    "subType": "fullset",
    "models": ["model3"],
    "brand": "generic",
    "lowestPrice": 89.0,
    "highestPrice": 129.0,
    "savings": 40.0,
    "savingsPercent": 31,
    "avgSimilarity": 92,
    "products": [
      {"title": "Tesla Model 3 Floor Mats", "price": 89.0, "source": "Tesery", "url": "https://a.example/1", "scrapedAt": "2025-01-02T00:00:00Z"},
      {"title": "Tesla Model 3 Floor Mats Set", "price": 129.0, "source": "Yeslak", "vendor": "Yeslak"}
    ]
  },
  {
    "category": "ppf",
    "products": [{"title": "Interior PPF", "source": "TapTes"}]
  }
]"#;

    #[test]
    fn parse_groups_with_optional_fields() {
        let groups = parse_dataset(SAMPLE).unwrap();
        assert_eq!(groups.len(), 2);

        let g = &groups[0];
        assert_eq!(g.category, "floormat");
        assert_eq!(g.sub_type.as_deref(), Some("fullset"));
        assert!(g.is_title_only());
        assert_eq!(g.products.len(), 2);
        assert_eq!(g.products[0].price, Some(89.0));
        assert_eq!(g.products[0].scraped_at.as_deref(), Some("2025-01-02T00:00:00Z"));

        // absent brand/subType and a product without price still decode
        let g = &groups[1];
        assert!(g.brand.is_none());
        assert!(g.sub_type.is_none());
        assert_eq!(g.products[0].price, None);
    }

    #[test]
    fn explicit_nulls_decode_as_absent() {
        let json = r#"[
  {"category": "floormat", "products": [
    {"title": "Model 3 Floor Mats", "price": 100, "source": "Tesery"},
    {"title": "Model 3 Floor Mats", "price": 100, "source": "Yeslak"}
  ]},
  {"category": null, "models": null, "brand": null, "products": [
    {"title": null, "price": 10, "source": "Tesery", "url": null},
    {"title": "Model 3 Puddle Lights", "price": null, "source": null}
  ]},
  {"category": "lighting", "products": null}
]"#;
        let groups = parse_dataset(json).unwrap();
        assert_eq!(groups.len(), 3);

        let g = &groups[1];
        assert_eq!(g.category, "");
        assert!(g.models.is_empty());
        assert_eq!(g.products[0].title, "");
        assert_eq!(g.products[1].source, "");
        assert_eq!(g.products[1].price, None);
        assert_eq!(g.validate().unwrap_err(), GroupError::MissingTitle { position: 0 });

        assert!(groups[2].products.is_empty());
    }

    #[test]
    fn read_from_reader() {
        let groups = read_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_dataset("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let err = parse_dataset("[{\"category\": ").unwrap_err();
        assert!(matches!(err, QualityError::DatasetLoad(_)));
        assert!(err.to_string().starts_with("dataset load error"));
    }

    #[test]
    fn wrong_shape_is_a_load_error() {
        assert!(matches!(
            parse_dataset("{\"matches\": []}"),
            Err(QualityError::DatasetLoad(_))
        ));
    }
}
