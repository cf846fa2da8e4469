use proptest::prelude::*;

use birank_core::rank::Normalizer;

/// Labeled edge as accepted by `BipartiteGraph::from_weighted_edges`.
pub type Edge = (String, String, f64);

fn label_edges(raw: Vec<(u8, u8, f64)>) -> Vec<Edge> {
    raw.into_iter()
        .map(|(s, r, w)| (format!("s{s}"), format!("r{r}"), w))
        .collect()
}

/// Edge lists with strictly positive weights.
///
/// Weights stay at or above 1 so that every normalizer, BGRM included,
/// yields a contracting iteration (a pendant pair with weight `w`
/// iterates with gain `alpha * beta / w^2` under BGRM).
pub fn arb_positive_edges() -> impl Strategy<Value = Vec<Edge>> + Clone {
    prop::collection::vec((0u8..6, 0u8..6, 1.0f64..4.0), 0..60).prop_map(label_edges)
}

/// Edge lists where some weights are exactly zero, which the builder
/// must intern but not store.
pub fn arb_mixed_weight_edges() -> impl Strategy<Value = Vec<Edge>> + Clone {
    let weight = prop_oneof![1 => Just(0.0f64), 3 => 1.0f64..4.0];
    prop::collection::vec((0u8..6, 0u8..6, weight), 0..60).prop_map(label_edges)
}

/// Edge lists that may contain negative or NaN weights, which the
/// builder must reject at the first offending row.
pub fn arb_signed_weight_edges() -> impl Strategy<Value = Vec<Edge>> + Clone {
    let weight = prop_oneof![
        3 => 1.0f64..4.0,
        1 => -4.0f64..-0.5,
        1 => Just(f64::NAN),
    ];
    prop::collection::vec((0u8..6, 0u8..6, weight), 1..40).prop_map(label_edges)
}

/// The three degree-normalized schemes, which converge on every graph
/// `arb_positive_edges` can produce.
pub fn arb_degree_normalizer() -> impl Strategy<Value = Normalizer> + Clone {
    prop_oneof![
        Just(Normalizer::CoHits),
        Just(Normalizer::Bgrm),
        Just(Normalizer::BiRank),
    ]
}
