//! Assessment score to local failure probability.

use serde::{Deserialize, Serialize};

/// Scores at or above `min_score` fail with `probability`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBand {
    pub min_score: f64,
    pub probability: f64,
}

/// How an assessment `risk_score` becomes a node's `local_risk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RiskMapping {
    /// Scores already are probabilities. Unscored nodes get 0.
    Direct,
    /// First band the score reaches, else `base_rate`. Unscored nodes get
    /// `base_rate` too.
    Banded {
        bands: Vec<RiskBand>,
        base_rate: f64,
    },
}

impl RiskMapping {
    /// Assessment table: scores of 0.9 and up fail 20% of the time, 0.7 and
    /// up 10%, everything else at a 2% base rate.
    pub fn assessment_bands() -> Self {
        RiskMapping::banded(
            [
                RiskBand {
                    min_score: 0.9,
                    probability: 0.20,
                },
                RiskBand {
                    min_score: 0.7,
                    probability: 0.10,
                },
            ],
            0.02,
        )
    }

    /// Banded mapping; bands are checked highest `min_score` first.
    pub fn banded(bands: impl IntoIterator<Item = RiskBand>, base_rate: f64) -> Self {
        let mut bands: Vec<RiskBand> = bands.into_iter().collect();
        bands.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));
        RiskMapping::Banded { bands, base_rate }
    }

    /// Local failure probability for an optional score.
    pub fn probability(&self, score: Option<f64>) -> f64 {
        match self {
            RiskMapping::Direct => score.unwrap_or(0.0),
            RiskMapping::Banded { bands, base_rate } => score
                .and_then(|s| bands.iter().find(|band| s >= band.min_score))
                .map_or(*base_rate, |band| band.probability),
        }
    }
}

impl Default for RiskMapping {
    fn default() -> Self {
        RiskMapping::assessment_bands()
    }
}
