//! Ranking of correlation output into the top-N summary.

use serde::{Deserialize, Serialize};

use crate::correlate::{CorrelationEntry, NearbyPoi};

/// Matches shown per category for each summary entry.
pub const DISPLAY_MATCHES: usize = 3;
/// Anchors kept in the summary by default.
pub const SUMMARY_ENTRIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub name: String,
    pub distance_miles: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub anchor_name: String,
    /// Nearest secondary matches, at most [`DISPLAY_MATCHES`].
    pub secondary: Vec<RankedMatch>,
    /// Nearest tertiary matches, at most [`DISPLAY_MATCHES`].
    pub tertiary: Vec<RankedMatch>,
    pub total_secondary: usize,
    pub total_tertiary: usize,
}

impl SummaryEntry {
    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.total_secondary + self.total_tertiary
    }
}

fn nearest(matches: &[NearbyPoi]) -> Vec<RankedMatch> {
    let mut ranked: Vec<RankedMatch> = matches
        .iter()
        .map(|m| RankedMatch {
            name: m.record.name.clone(),
            distance_miles: m.distance_miles,
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    ranked.truncate(DISPLAY_MATCHES);
    ranked
}

fn summarize_entry(entry: &CorrelationEntry) -> SummaryEntry {
    SummaryEntry {
        anchor_name: entry.anchor.name.clone(),
        secondary: nearest(&entry.secondary),
        tertiary: nearest(&entry.tertiary),
        total_secondary: entry.secondary.len(),
        total_tertiary: entry.tertiary.len(),
    }
}

/// Ranks anchors by total nearby hits, descending, and keeps the first `top_n`.
///
/// Both sorts are stable: anchors with equal totals keep correlation order and
/// equidistant matches keep input order.
#[must_use]
pub fn summarize(entries: &[CorrelationEntry], top_n: usize) -> Vec<SummaryEntry> {
    let mut summary: Vec<SummaryEntry> = entries.iter().map(summarize_entry).collect();
    summary.sort_by(|a, b| b.total_hits().cmp(&a.total_hits()));
    summary.truncate(top_n);
    summary
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::correlate::correlate;
    use crate::geometry::destination_point;
    use crate::types::{Coordinate, PoiRecord};

    const TIMES_SQUARE: Coordinate = Coordinate::new(40.7580, -73.9855);

    fn poi(name: &str, coordinate: Coordinate) -> PoiRecord {
        PoiRecord {
            name: name.to_owned(),
            address: format!("{name}, New York"),
            coordinate,
            category: "test".to_owned(),
            raw: json!({}),
        }
    }

    fn ring(prefix: &str, center: Coordinate, distances: &[f64]) -> Vec<NearbyPoi> {
        distances
            .iter()
            .enumerate()
            .map(|(i, d)| NearbyPoi {
                record: poi(&format!("{prefix} {i}"), destination_point(center, 0.0, *d)),
                distance_miles: *d,
            })
            .collect()
    }

    fn entry(name: &str, secondary: usize, tertiary: usize) -> CorrelationEntry {
        let center = TIMES_SQUARE;
        let distances: Vec<f64> = (1..=secondary.max(tertiary))
            .map(|i| f64::from(u32::try_from(i).unwrap()) * 0.1)
            .collect();
        CorrelationEntry {
            anchor: poi(name, center),
            secondary: ring("S", center, &distances[..secondary]),
            tertiary: ring("T", center, &distances[..tertiary]),
        }
    }

    #[test]
    fn times_square_scenario() {
        let anchors = vec![poi("Times Square", TIMES_SQUARE)];
        let books = vec![poi("Corner Books", Coordinate::new(40.7589, -73.9851))];
        let entries = correlate(&anchors, &books, &[], 1.0);

        let summary = summarize(&entries, SUMMARY_ENTRIES);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_secondary, 1);
        assert_eq!(summary[0].total_tertiary, 0);
        let d = summary[0].secondary[0].distance_miles;
        assert!((d - 0.06).abs() <= 0.02, "distance was {d}");
    }

    #[test]
    fn matches_sorted_by_distance_and_truncated() {
        let center = TIMES_SQUARE;
        let e = CorrelationEntry {
            anchor: poi("Anchor", center),
            secondary: ring("S", center, &[0.8, 0.1, 0.5, 0.3, 0.9]),
            tertiary: ring("T", center, &[0.4]),
        };

        let summary = summarize(&[e], SUMMARY_ENTRIES);
        let s = &summary[0];

        assert_eq!(s.total_secondary, 5);
        assert_eq!(s.total_tertiary, 1);
        assert_eq!(s.total_hits(), 6);
        let shown: Vec<&str> = s.secondary.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(shown, vec!["S 1", "S 3", "S 2"]);
        assert!(s
            .secondary
            .windows(2)
            .all(|w| w[0].distance_miles <= w[1].distance_miles));
    }

    #[test]
    fn summary_never_exceeds_top_n() {
        let entries = vec![
            entry("a", 1, 0),
            entry("b", 2, 2),
            entry("c", 0, 1),
            entry("d", 5, 1),
            entry("e", 3, 0),
        ];

        let summary = summarize(&entries, SUMMARY_ENTRIES);
        let order: Vec<&str> = summary.iter().map(|s| s.anchor_name.as_str()).collect();

        assert_eq!(order, vec!["d", "b", "e"]);
        for s in &summary {
            assert!(s.secondary.len() <= DISPLAY_MATCHES);
            assert!(s.tertiary.len() <= DISPLAY_MATCHES);
        }
        assert_eq!(summary[0].total_secondary, 5);
    }

    #[test]
    fn ties_keep_correlation_order() {
        let entries = vec![entry("first", 1, 1), entry("second", 2, 0), entry("third", 0, 2)];

        let summary = summarize(&entries, SUMMARY_ENTRIES);
        let order: Vec<&str> = summary.iter().map(|s| s.anchor_name.as_str()).collect();

        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_correlation_gives_empty_summary() {
        assert!(summarize(&[], SUMMARY_ENTRIES).is_empty());
    }
}
