//! Normalization schemes for the bipartite transition operators.
//!
//! # Overview
//!
//! The four schemes share one iteration and differ only in how the two
//! directional transition matrices are derived from the adjacency `W` and
//! the generalized degree vectors `K_d` (row sums) and `K_p` (column
//! sums):
//!
//! | Normalizer | Row→Col `S_d`                 | Col→Row `S_p`                 |
//! |------------|-------------------------------|-------------------------------|
//! | HITS       | `W`                           | `Wᵗ`                          |
//! | CoHITS     | `K_d⁻¹ · W`                   | `K_p⁻¹ · Wᵗ`                  |
//! | BGRM       | `K_d⁻¹ · W · K_p⁻¹`           | `K_p⁻¹ · Wᵗ · K_d⁻¹`          |
//! | BiRank     | `K_d^{-1/2} · W · K_p^{-1/2}` | `K_p^{-1/2} · Wᵗ · K_d^{-1/2}`|
//!
//! Neither operator is materialized. Each is a diagonal-scaled view of
//! `W`: `S_d[i][j] = left[i] · W[i][j] · right[j]`, so the solver carries
//! four per-node scaling vectors ([`TransitionScaling`]) and streams the
//! sparse entries of `W` directly.
//!
//! Wherever a degree is 0 the inverse terms are defined as 0, not ∞: an
//! isolate neither receives nor propagates mass, and stays pinned at
//! score 0 for the whole run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RankError;

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Selects how the bipartite adjacency is normalized before iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalizer {
    /// No normalization: raw weights in both directions. Scores grow with
    /// raw degree, so hubs dominate.
    #[default]
    Hits,
    /// Out-degree normalization: each node divides its outgoing mass by
    /// its own generalized degree, PageRank-style.
    CoHits,
    /// Symmetric double normalization by both endpoint degrees.
    Bgrm,
    /// Square-root symmetric normalization. The scheme with a proven
    /// convergence guarantee for damping factors in (0, 1).
    BiRank,
}

impl Normalizer {
    /// Scaling vectors realizing this scheme over degree vectors `kd`
    /// (rows) and `kp` (columns).
    #[must_use]
    pub fn transition_scaling(self, kd: &[f64], kp: &[f64]) -> TransitionScaling {
        match self {
            Self::Hits => TransitionScaling {
                sd_left: ones(kd.len()),
                sd_right: ones(kp.len()),
                sp_left: ones(kp.len()),
                sp_right: ones(kd.len()),
            },
            Self::CoHits => TransitionScaling {
                sd_left: inverse(kd),
                sd_right: ones(kp.len()),
                sp_left: inverse(kp),
                sp_right: ones(kd.len()),
            },
            Self::Bgrm => TransitionScaling {
                sd_left: inverse(kd),
                sd_right: inverse(kp),
                sp_left: inverse(kp),
                sp_right: inverse(kd),
            },
            Self::BiRank => TransitionScaling {
                sd_left: inverse_sqrt(kd),
                sd_right: inverse_sqrt(kp),
                sp_left: inverse_sqrt(kp),
                sp_right: inverse_sqrt(kd),
            },
        }
    }
}

impl fmt::Display for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hits => "HITS",
            Self::CoHits => "CoHITS",
            Self::Bgrm => "BGRM",
            Self::BiRank => "BiRank",
        })
    }
}

impl FromStr for Normalizer {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hits" => Ok(Self::Hits),
            "cohits" => Ok(Self::CoHits),
            "bgrm" => Ok(Self::Bgrm),
            "birank" => Ok(Self::BiRank),
            _ => Err(RankError::InvalidInput(format!(
                "unknown normalizer {s:?} (expected HITS, CoHITS, BGRM, or BiRank)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// TransitionScaling
// ---------------------------------------------------------------------------

/// Per-node diagonal scaling realizing `S_d` and `S_p` without
/// materializing them.
///
/// For an edge `(i, j)` with weight `w`:
///
/// ```text
/// S_d contribution to row i:    sd_left[i] · w · sd_right[j] · c[j]
/// S_p contribution to column j: sp_left[j] · w · sp_right[i] · r[i]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionScaling {
    /// Row-indexed left factor of `S_d`.
    pub sd_left: Vec<f64>,
    /// Column-indexed right factor of `S_d`.
    pub sd_right: Vec<f64>,
    /// Column-indexed left factor of `S_p`.
    pub sp_left: Vec<f64>,
    /// Row-indexed right factor of `S_p`.
    pub sp_right: Vec<f64>,
}

fn ones(n: usize) -> Vec<f64> {
    vec![1.0; n]
}

fn inverse(degrees: &[f64]) -> Vec<f64> {
    degrees
        .iter()
        .map(|&k| if k > 0.0 { 1.0 / k } else { 0.0 })
        .collect()
}

fn inverse_sqrt(degrees: &[f64]) -> Vec<f64> {
    degrees
        .iter()
        .map(|&k| if k > 0.0 { 1.0 / k.sqrt() } else { 0.0 })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const KD: [f64; 3] = [2.0, 4.0, 0.0];
    const KP: [f64; 2] = [9.0, 1.0];

    #[test]
    fn hits_scaling_is_all_ones() {
        let s = Normalizer::Hits.transition_scaling(&KD, &KP);
        assert_eq!(s.sd_left, vec![1.0; 3]);
        assert_eq!(s.sd_right, vec![1.0; 2]);
        assert_eq!(s.sp_left, vec![1.0; 2]);
        assert_eq!(s.sp_right, vec![1.0; 3]);
    }

    #[test]
    fn cohits_divides_by_own_degree_only() {
        let s = Normalizer::CoHits.transition_scaling(&KD, &KP);
        assert_eq!(s.sd_left, vec![0.5, 0.25, 0.0]);
        assert_eq!(s.sd_right, vec![1.0, 1.0]);
        assert_eq!(s.sp_left, vec![1.0 / 9.0, 1.0]);
        assert_eq!(s.sp_right, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn bgrm_divides_by_both_degrees() {
        let s = Normalizer::Bgrm.transition_scaling(&KD, &KP);
        assert_eq!(s.sd_left, vec![0.5, 0.25, 0.0]);
        assert_eq!(s.sd_right, vec![1.0 / 9.0, 1.0]);
    }

    #[test]
    fn birank_uses_inverse_square_roots_symmetrically() {
        let s = Normalizer::BiRank.transition_scaling(&KD, &KP);
        assert_eq!(s.sd_left[0], 1.0 / 2.0_f64.sqrt());
        assert_eq!(s.sd_right[0], 1.0 / 3.0);
        // Symmetric scheme: the S_p factors mirror the S_d factors.
        assert_eq!(s.sp_right, s.sd_left);
        assert_eq!(s.sp_left, s.sd_right);
    }

    #[test]
    fn zero_degree_scales_to_zero_not_infinity() {
        for normalizer in [
            Normalizer::CoHits,
            Normalizer::Bgrm,
            Normalizer::BiRank,
        ] {
            let s = normalizer.transition_scaling(&KD, &KP);
            assert_eq!(s.sd_left[2], 0.0, "{normalizer} must pin isolates at 0");
            assert!(s.sd_left.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn parses_canonical_names_case_insensitively() {
        assert_eq!("HITS".parse::<Normalizer>().unwrap(), Normalizer::Hits);
        assert_eq!("CoHITS".parse::<Normalizer>().unwrap(), Normalizer::CoHits);
        assert_eq!("bgrm".parse::<Normalizer>().unwrap(), Normalizer::Bgrm);
        assert_eq!("BiRank".parse::<Normalizer>().unwrap(), Normalizer::BiRank);
        assert!("pagerank".parse::<Normalizer>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for normalizer in [
            Normalizer::Hits,
            Normalizer::CoHits,
            Normalizer::Bgrm,
            Normalizer::BiRank,
        ] {
            let parsed: Normalizer = normalizer.to_string().parse().unwrap();
            assert_eq!(parsed, normalizer);
        }
    }
}
