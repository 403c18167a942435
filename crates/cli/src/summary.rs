//! Human-readable run summary (stderr).

use std::io::{self, Write};

use pricematch_quality::model::{GroupDigest, NamedCount};
use pricematch_quality::QualityRun;

const RULE: &str = "------------------------------------------------------------";

pub fn write_summary<W: Write>(out: &mut W, run: &QualityRun) -> io::Result<()> {
    let r = &run.report;

    writeln!(out, "Match quality: {} groups", r.total_groups)?;
    writeln!(out, "{}", RULE)?;
    for stat in &r.tiers {
        writeln!(out, "  {:<7} {:>6}  ({:.1}%)", stat.tier.to_string(), stat.count, stat.percent)?;
    }
    writeln!(
        out,
        "  flagged {}, clean {}, malformed {}, invalid price {}",
        r.flagged, r.clean, r.malformed, r.invalid_price
    )?;
    if !r.malformed_indices.is_empty() {
        let indices: Vec<String> = r.malformed_indices.iter().map(|i| i.to_string()).collect();
        writeln!(out, "  malformed groups: {}", indices.join(", "))?;
    }

    write_counts(out, "Issues", &r.issue_counts)?;
    write_counts(out, "Categories", &r.categories)?;
    write_counts(out, "Stores", &r.stores)?;
    if !r.missing_stores.is_empty() {
        writeln!(out, "  missing: {}", r.missing_stores.join(", "))?;
    }

    writeln!(out)?;
    writeln!(out, "Matching: {} brand-based, {} title-only", r.brand_based, r.title_only)?;
    for brand in &r.brands {
        writeln!(out, "  {:<24} {:>6}", brand.name, brand.count)?;
    }

    writeln!(out)?;
    writeln!(out, "Top savings (HIGH tier, total ${:.2})", r.high_tier_savings)?;
    for digest in &r.top_savings {
        writeln!(
            out,
            "  #{:<5} ${:>9.2} ({}%)  {}",
            digest.index,
            digest.savings.unwrap_or(0.0),
            digest.savings_percent.unwrap_or(0),
            digest.products.first().map_or("", |p| p.title.as_str()),
        )?;
    }

    write_digests(out, "Needs review", &r.review_sample)?;
    write_digests(out, "Title-only spot check", &r.generic_sample)?;
    Ok(())
}

fn write_counts<W: Write>(out: &mut W, title: &str, counts: &[NamedCount]) -> io::Result<()> {
    if counts.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    for c in counts {
        writeln!(out, "  {:<24} {:>6}", c.name, c.count)?;
    }
    Ok(())
}

fn write_digests<W: Write>(out: &mut W, title: &str, digests: &[GroupDigest]) -> io::Result<()> {
    if digests.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    for digest in digests {
        writeln!(
            out,
            "  #{} [{}] {} sim {:.0}%",
            digest.index,
            digest.tier,
            digest.category,
            digest.avg_similarity * 100.0
        )?;
        for issue in &digest.issues {
            writeln!(out, "      ! {}", issue)?;
        }
        for product in &digest.products {
            let price = product.price.map_or("-".to_string(), |p| format!("${:.2}", p));
            writeln!(out, "      {:>9}  {}  ({})", price, product.title, product.source)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricematch_quality::{Listing, MatchGroup, QualityConfig};

    fn render(groups: &[MatchGroup]) -> String {
        let run = pricematch_quality::run(&QualityConfig::default(), groups);
        let mut buf = Vec::new();
        write_summary(&mut buf, &run).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn summary_lists_tiers_and_review_groups() {
        let groups = vec![
            MatchGroup::new(
                "floormat",
                vec![
                    Listing::new("Tesla Model 3 Floor Mats", 100.0, "Tesery"),
                    Listing::new("Tesla Model 3 Floor Mats", 90.0, "Yeslak"),
                ],
            ),
            MatchGroup::new(
                "bodykit",
                vec![
                    Listing::new("Tesla Model 3 Front Spoiler", 50.0, "Hansshow"),
                    Listing::new("Tesla Model 3 Rear Spoiler", 55.0, "Yeslak"),
                ],
            ),
        ];
        let text = render(&groups);

        assert!(text.starts_with("Match quality: 2 groups\n"));
        assert!(text.contains("  HIGH         1  (50.0%)"));
        assert!(text.contains("Top savings (HIGH tier, total $10.00)"));
        assert!(text.contains("      ! Front vs Rear spoiler mismatch"));
        assert!(text.contains("  missing: TapTes, EVANNEX, RPM Tesla"));
        assert!(!text.contains("Title-only spot check"));
    }

    #[test]
    fn summary_lists_title_only_groups_for_spot_check() {
        let groups = vec![MatchGroup::new(
            "floormat",
            vec![
                Listing::new("Tesla Model 3 Floor Mats", 100.0, "Tesery"),
                Listing::new("Tesla Model 3 Floor Mats", 100.0, "Yeslak"),
            ],
        )
        .with_brand("generic")];
        let text = render(&groups);

        assert!(!text.contains("Needs review"));
        assert!(text.contains("Title-only spot check\n  #0 [HIGH] floormat sim 100%\n"));
        assert!(text.contains("        $100.00  Tesla Model 3 Floor Mats  (Yeslak)"));
    }

    #[test]
    fn write_errors_propagate() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let run = pricematch_quality::run(&QualityConfig::default(), &[]);
        let err = write_summary(&mut Closed, &run).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
