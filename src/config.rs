/// Thresholds for one pruning run. A zero `min_support`, `min_confidence`
/// or `min_node_cov` switches that filter off.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneParams {
    pub min_weight: u64,
    pub min_confidence: f64,
    pub min_support: f64,
    pub p_cutoff: f64,
    pub weight_cutoff: u64,
    pub use_chi_square: bool,
    pub triple_nodes: bool,
    pub min_node_cov: u64,
    pub keep_paths: bool,
}

impl Default for PruneParams {
    fn default() -> Self {
        PruneParams {
            min_weight: 3,
            min_confidence: 0.2,
            min_support: 0.2,
            p_cutoff: 0.01,
            weight_cutoff: 10,
            use_chi_square: false,
            triple_nodes: true,
            min_node_cov: 0,
            keep_paths: false,
        }
    }
}

impl PruneParams {
    /// Minimum triple count for a triple to vote for its two links.
    pub fn triple_min_weight(&self) -> u64 {
        (0.8 * self.min_weight as f64).floor() as u64
    }
}
