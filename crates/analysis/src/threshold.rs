//! Caller-supplied cutoffs for hub and bottleneck classification.

use chainrisk_types::ConfigurationError;
use serde::{Deserialize, Serialize};

/// How to decide which scores are "high".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    /// Scores at or above this value qualify.
    Fixed(f64),
    /// Scores at or above this percentile (0–100) of the distribution qualify.
    Percentile(f64),
}

impl Threshold {
    /// Check the threshold is usable. `name` labels the error.
    pub fn validate(&self, name: &'static str) -> Result<(), ConfigurationError> {
        let ok = match *self {
            Threshold::Fixed(v) => v.is_finite() && v >= 0.0,
            Threshold::Percentile(p) => p.is_finite() && (0.0..=100.0).contains(&p),
        };
        if ok {
            Ok(())
        } else {
            let value = match *self {
                Threshold::Fixed(v) | Threshold::Percentile(v) => v,
            };
            Err(ConfigurationError::InvalidThreshold { name, value })
        }
    }

    /// Resolve to an absolute cutoff for the given scores.
    ///
    /// Percentiles interpolate linearly between closest ranks and are
    /// clamped to [0, 100]. An empty score set resolves to positive infinity
    /// so nothing qualifies.
    pub fn cutoff(&self, scores: &[f64]) -> f64 {
        match *self {
            Threshold::Fixed(v) => v,
            Threshold::Percentile(p) => {
                if scores.is_empty() {
                    return f64::INFINITY;
                }
                let mut sorted = scores.to_vec();
                sorted.sort_by(f64::total_cmp);
                let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
                let lo = rank.floor() as usize;
                let hi = rank.ceil() as usize;
                let frac = rank - lo as f64;
                sorted[lo] + (sorted[hi] - sorted[lo]) * frac
            }
        }
    }

    /// Indices of scores that qualify.
    ///
    /// A zero score never qualifies: a node with no incoming edges is not a
    /// hub and a node on no path is not a bottleneck, whatever the cutoff.
    pub fn select(&self, scores: &[f64]) -> Vec<usize> {
        let cutoff = self.cutoff(scores);
        scores
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s > 0.0 && s >= cutoff)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_threshold() {
        let t = Threshold::Fixed(0.5);
        assert_eq!(t.select(&[0.1, 0.5, 0.9, 0.0]), vec![1, 2]);
    }

    #[test]
    fn test_percentile_interpolates() {
        let t = Threshold::Percentile(50.0);
        assert_eq!(t.cutoff(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(t.select(&[4.0, 1.0, 3.0, 2.0]), vec![0, 2]);

        assert_eq!(Threshold::Percentile(100.0).cutoff(&[1.0, 7.0, 3.0]), 7.0);
        assert_eq!(Threshold::Percentile(0.0).cutoff(&[1.0, 7.0, 3.0]), 1.0);
    }

    #[test]
    fn test_out_of_range_percentile_is_clamped() {
        let scores = [1.0, 7.0, 3.0];
        assert_eq!(Threshold::Percentile(150.0).cutoff(&scores), 7.0);
        assert_eq!(Threshold::Percentile(-20.0).cutoff(&scores), 1.0);
        assert_eq!(Threshold::Percentile(150.0).select(&scores), vec![1]);
    }

    #[test]
    fn test_zero_scores_never_selected() {
        let t = Threshold::Percentile(0.0);
        assert!(t.select(&[0.0, 0.0, 0.0]).is_empty());
        assert!(Threshold::Fixed(0.0).select(&[0.0]).is_empty());
    }

    #[test]
    fn test_empty_scores() {
        assert!(Threshold::Percentile(90.0).select(&[]).is_empty());
    }

    #[test]
    fn test_validation() {
        assert!(Threshold::Percentile(101.0).validate("hub").is_err());
        assert!(Threshold::Percentile(f64::NAN).validate("hub").is_err());
        assert!(Threshold::Fixed(-1.0).validate("bottleneck").is_err());
        assert!(Threshold::Fixed(0.2).validate("bottleneck").is_ok());
        assert_eq!(
            Threshold::Fixed(-1.0).validate("bottleneck"),
            Err(ConfigurationError::InvalidThreshold {
                name: "bottleneck",
                value: -1.0
            })
        );
    }
}
