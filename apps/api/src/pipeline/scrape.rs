//! Last-resort regex scraper for service output that was requested as JSON
//! but came back as prose. Isolated here so the structured path stays the
//! primary contract and this can be removed without touching the coordinator.

use regex::Regex;

use crate::models::package::QualityMetrics;

fn score_after(label: &str, text: &str) -> Option<f64> {
    // Matches e.g. "relevance: 0.8", "Relevance Score - 0.85", "relevance 0.9/1"
    let pattern = Regex::new(&format!(r"(?i){label}[^0-9]*([01](?:\.[0-9]+)?)")).ok()?;
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Scrapes the five rubric scores out of free text. Returns `None` when not
/// a single labelled score is present, so the caller can fall back to
/// neutral metrics instead of trusting fabricated values.
pub fn scrape_quality_metrics(text: &str) -> Option<QualityMetrics> {
    let relevance = score_after("relevance", text);
    let clarity = score_after("clarity", text);
    let completeness = score_after("completeness", text);
    let consistency = score_after("consistency", text);
    let overall = score_after("overall", text);

    if [relevance, clarity, completeness, consistency, overall]
        .iter()
        .all(|s| s.is_none())
    {
        return None;
    }

    let relevance = relevance.unwrap_or(0.7);
    let clarity = clarity.unwrap_or(0.7);
    let completeness = completeness.unwrap_or(0.7);
    let consistency = consistency.unwrap_or(0.7);
    let overall =
        overall.unwrap_or((relevance + clarity + completeness + consistency) / 4.0);

    Some(
        QualityMetrics {
            relevance,
            clarity,
            completeness,
            consistency,
            overall,
        }
        .clamped(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrapes_labelled_scores() {
        let text = "Relevance: 0.9\nClarity: 0.8\nCompleteness: 0.7\n\
                    Consistency: 0.95\nOverall: 0.85";
        let metrics = scrape_quality_metrics(text).unwrap();
        assert_eq!(metrics.relevance, 0.9);
        assert_eq!(metrics.overall, 0.85);
    }

    #[test]
    fn test_missing_overall_is_averaged() {
        let text = "relevance 0.8, clarity 0.6, completeness 0.8, consistency 0.6";
        let metrics = scrape_quality_metrics(text).unwrap();
        assert!((metrics.overall - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_partial_scores_default_to_good() {
        let text = "The relevance score is 0.9; the rest reads well.";
        let metrics = scrape_quality_metrics(text).unwrap();
        assert_eq!(metrics.relevance, 0.9);
        assert_eq!(metrics.clarity, 0.7);
    }

    #[test]
    fn test_no_scores_yields_none() {
        assert!(scrape_quality_metrics("This question is quite good.").is_none());
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let text = "relevance: 1.8 overall: 0.9";
        let metrics = scrape_quality_metrics(text).unwrap();
        assert!(metrics.relevance <= 1.0);
    }
}
