// crates/mycel-reputation/src/openrank.rs
//
// OpenRank: seed-rooted trust propagation for Mycel.
//
// Personalized PageRank where every teleport (and every dangling node's mass)
// returns to the seed. Only identities reachable from the seed through
// positive-weight edges receive a score.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use mycel_core::{MycelError, ScoreMap, TrustAssignment, TrustRankingOracle};

/// Configuration for the OpenRank trust computation algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRankConfig {
    /// Damping factor (probability of following a trust edge vs. returning to the seed). Default: 0.85.
    pub damping_factor: f64,
    /// Maximum iterations for convergence. Default: 200.
    pub max_iterations: u32,
    /// Convergence threshold (L1 norm of score change). Default: 1e-9.
    pub convergence_threshold: f64,
}

impl Default for OpenRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 200,
            convergence_threshold: 1e-9,
        }
    }
}

/// Ranking oracle backed by [`compute_openrank`].
#[derive(Debug, Clone, Default)]
pub struct OpenRank {
    pub config: OpenRankConfig,
}

impl OpenRank {
    pub fn new(config: OpenRankConfig) -> Self {
        Self { config }
    }
}

impl TrustRankingOracle for OpenRank {
    fn rank(&self, seed: &str, edges: &[TrustAssignment]) -> Result<ScoreMap, MycelError> {
        compute_openrank(seed, edges, &self.config)
    }
}

/// Compute seed-personalized OpenRank scores.
///
/// Algorithm:
/// 1. Keep positive-weight edges and find the nodes reachable from the seed
/// 2. Row-normalize each node's outgoing weights into transition probabilities
/// 3. Power iteration: scores = d * M^T * scores + (1 - d + d * dangling) * e_seed
/// 4. Scale by the reachable node count so that 1.0 is an even share
///
/// The seed itself is omitted from the result.
pub fn compute_openrank(
    seed: &str,
    edges: &[TrustAssignment],
    config: &OpenRankConfig,
) -> Result<ScoreMap, MycelError> {
    if !(0.0..1.0).contains(&config.damping_factor) {
        return Err(MycelError::InvalidInput(format!(
            "damping factor must be in [0, 1), got {}",
            config.damping_factor
        )));
    }

    // Step 1: adjacency over positive edges, ordered for determinism
    let mut adjacency: BTreeMap<&str, Vec<(&str, f64)>> = BTreeMap::new();
    for edge in edges {
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(MycelError::InvalidInput(format!(
                "edge {} -> {} has invalid weight {}",
                edge.src, edge.dst, edge.weight
            )));
        }
        if edge.weight > 0.0 && edge.src != edge.dst {
            adjacency
                .entry(edge.src.as_str())
                .or_default()
                .push((edge.dst.as_str(), edge.weight));
        }
    }
    for targets in adjacency.values_mut() {
        targets.sort_by(|a, b| a.0.cmp(b.0).then(a.1.total_cmp(&b.1)));
    }

    let mut reachable: BTreeSet<&str> = BTreeSet::new();
    let mut queue = VecDeque::from([seed]);
    reachable.insert(seed);
    while let Some(node) = queue.pop_front() {
        for &(next, _) in adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]) {
            if reachable.insert(next) {
                queue.push_back(next);
            }
        }
    }
    if reachable.len() == 1 {
        return Ok(ScoreMap::new());
    }

    let ids: Vec<&str> = reachable.into_iter().collect();
    let n = ids.len();
    let index: BTreeMap<&str, usize> = ids.iter().enumerate().map(|(i, &u)| (u, i)).collect();
    let seed_idx = index[seed];

    // Step 2: row-normalized transitions; out[i] = [(j, p_ij)]
    let mut out: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for (i, &id) in ids.iter().enumerate() {
        if let Some(targets) = adjacency.get(id) {
            let row_sum: f64 = targets.iter().map(|(_, w)| w).sum();
            out[i] = targets
                .iter()
                .map(|&(dst, w)| (index[dst], w / row_sum))
                .collect();
        }
    }

    // Step 3: power iteration from the seed
    let d = config.damping_factor;
    let mut scores = vec![0.0_f64; n];
    scores[seed_idx] = 1.0;

    for _ in 0..config.max_iterations {
        let mut new_scores = vec![0.0_f64; n];
        let mut dangling_sum = 0.0;
        for (i, row) in out.iter().enumerate() {
            if row.is_empty() {
                dangling_sum += scores[i];
            }
            for &(j, p) in row {
                new_scores[j] += d * p * scores[i];
            }
        }
        new_scores[seed_idx] += (1.0 - d) + d * dangling_sum;

        let delta: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        scores = new_scores;
        if delta < config.convergence_threshold {
            break;
        }
    }

    // Step 4: scale and drop the seed
    let scale = n as f64;
    Ok(ids
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != seed_idx)
        .map(|(i, &id)| (id.to_string(), scores[i] * scale))
        .collect())
}
