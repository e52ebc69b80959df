//! Measurement histograms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Measurement outcome counts for one job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementResults {
    /// Job the counts belong to.
    pub job_id: String,
    /// Shots requested.
    pub shots: u32,
    /// Bitstring to observed count.
    pub counts: BTreeMap<String, u64>,
}

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeProbability {
    /// Measured bitstring.
    pub bitstring: String,
    /// Times observed.
    pub count: u64,
    /// count / total.
    pub probability: f64,
}

impl MeasurementResults {
    /// Total number of recorded outcomes.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Outcomes with their probabilities, ordered by bitstring.
    pub fn probabilities(&self) -> Vec<OutcomeProbability> {
        let total = self.total();
        self.counts
            .iter()
            .map(|(bitstring, &count)| OutcomeProbability {
                bitstring: bitstring.clone(),
                count,
                probability: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            })
            .collect()
    }

    /// The most frequent outcome. Ties go to the lexicographically smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (k, &v)| match best {
                Some((_, c)) if c >= v => best,
                _ => Some((k.as_str(), v)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell() -> MeasurementResults {
        MeasurementResults {
            job_id: "j1".into(),
            shots: 1000,
            counts: [("00".to_string(), 510), ("11".to_string(), 490)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_total_and_probabilities() {
        let r = bell();
        assert_eq!(r.total(), 1000);
        let p = r.probabilities();
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].bitstring, "00");
        assert!((p[0].probability - 0.51).abs() < 1e-12);
        assert!((p.iter().map(|o| o.probability).sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_most_frequent() {
        assert_eq!(bell().most_frequent(), Some(("00", 510)));
        assert_eq!(MeasurementResults::default().most_frequent(), None);
    }

    #[test]
    fn test_tie_prefers_smallest_bitstring() {
        let r = MeasurementResults {
            counts: [("01".to_string(), 5), ("10".to_string(), 5)]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        assert_eq!(r.most_frequent(), Some(("01", 5)));
    }

    #[test]
    fn test_empty_probabilities() {
        let r = MeasurementResults {
            counts: [("0".to_string(), 0)].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(r.probabilities()[0].probability, 0.0);
    }
}
