//! Edge pruning passes. Every pass rebuilds the directed graph from the
//! links still alive, scores them against the path-derived tables and marks
//! the failing ones dead; links are never added back. Coverage comes from the
//! full link set and is shared by every pass, so a pass reapplied to its own
//! survivors removes nothing more.

use crate::config::PruneParams;
use crate::coverage;
use crate::gfa::GfaModel;
use crate::graph::DiGraph;
use crate::layering::assign_layers;
use crate::stats::Contingency;
use std::cell::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub name: &'static str,
    pub examined: usize,
    pub removed: usize,
}

/// Scores of one link against its neighbourhood.
#[derive(Debug, Clone)]
pub struct EdgeScore {
    pub link: usize,
    /// `None` when no path walks the link.
    pub weight: Option<u64>,
    /// 1 when the support filter is off or the source vertex is unlayered.
    pub support: f64,
    pub confidence_out: f64,
    pub confidence_in: f64,
    /// `None` outside the chi-square pass and for unlayered sources.
    pub contingency: Option<Contingency>,
    pub p_value: Option<f64>,
}

impl EdgeScore {
    fn passes_thresholds(&self, params: &PruneParams) -> bool {
        match self.weight {
            Some(w) => {
                w >= params.min_weight
                    && self.support >= params.min_support
                    && self.confidence_out >= params.min_confidence
                    && self.confidence_in >= params.min_confidence
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkVote {
    pub link: usize,
    pub votes: u64,
}

fn ratio(w: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        w as f64 / total as f64
    }
}

/// Coverage at the source vertex of every link, layered over all links of
/// the model. `None` when the source could not be layered.
fn source_coverage(model: &GfaModel) -> Vec<Option<u64>> {
    let graph = DiGraph::from_links(model.links.iter().enumerate());
    let layering = assign_layers(&graph);
    log::info!(
        "layered {} of {} vertices",
        layering.layered_count(),
        graph.vertex_count()
    );
    let coverage = coverage::estimate(&graph, &layering, model);

    let mut skipped = 0;
    let table: Vec<Option<u64>> = model
        .links
        .iter()
        .map(|link| {
            let u = graph.index_of(link.from())?;
            layering.layer(u).map(|_| coverage.get(u))
        })
        .collect();
    for (link, cov) in model.links.iter().zip(&table) {
        if cov.is_none() {
            log::debug!("{} leaves an unlayered vertex, no coverage test", link.key);
            skipped += 1;
        }
    }
    if skipped > 0 {
        log::warn!(
            "{} links leave unlayered vertices and skip the support and chi-square tests",
            skipped
        );
    }
    table
}

pub struct Pruner<'a> {
    model: &'a GfaModel,
    alive: Vec<bool>,
    weights: Vec<Option<u64>>,
    coverage: OnceCell<Vec<Option<u64>>>,
}

impl<'a> Pruner<'a> {
    pub fn new(model: &'a GfaModel) -> Self {
        Self::with_alive(model, vec![true; model.links.len()])
    }

    /// Resume from an earlier survivor set.
    pub fn with_alive(model: &'a GfaModel, alive: Vec<bool>) -> Self {
        let weights = model.links.iter().map(|l| model.link_weight(l)).collect();
        Pruner {
            model,
            alive,
            weights,
            coverage: OnceCell::new(),
        }
    }

    pub fn alive(&self) -> &[bool] {
        &self.alive
    }

    pub fn into_alive(self) -> Vec<bool> {
        self.alive
    }

    pub fn surviving(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    pub fn graph(&self) -> DiGraph {
        DiGraph::from_links(
            self.model
                .links
                .iter()
                .enumerate()
                .filter(|(i, _)| self.alive[*i]),
        )
    }

    /// Layered on first use only; thresholds without the support filter
    /// never need it.
    fn link_coverage(&self) -> &[Option<u64>] {
        self.coverage.get_or_init(|| source_coverage(self.model))
    }

    fn weight_sum<'g>(&self, adjs: impl Iterator<Item = &'g crate::graph::Adj>) -> u64 {
        adjs.map(|adj| self.weights[adj.link].unwrap_or(0)).sum()
    }

    pub fn score_edges(&self, params: &PruneParams) -> Vec<EdgeScore> {
        self.score_edges_with(params, params.use_chi_square)
    }

    fn score_edges_with(&self, params: &PruneParams, chi_square: bool) -> Vec<EdgeScore> {
        let graph = self.graph();
        log::debug!(
            "scoring {} links over {} vertices, weakly connected: {}",
            graph.edge_count(),
            graph.vertex_count(),
            graph.is_weakly_connected()
        );

        let coverage = if params.min_support > 0.0 || chi_square {
            Some(self.link_coverage())
        } else {
            None
        };

        let n = graph.vertex_count();
        let out_sum: Vec<u64> = (0..n)
            .map(|u| self.weight_sum(graph.successors(u).iter()))
            .collect();
        let in_sum: Vec<u64> = (0..n)
            .map(|v| self.weight_sum(graph.predecessors(v).iter()))
            .collect();

        let mut scores = Vec::with_capacity(graph.edge_count());
        for u in 0..n {
            for adj in graph.successors(u) {
                let v = adj.vertex;
                let w = match self.weights[adj.link] {
                    Some(w) => w,
                    None => {
                        scores.push(EdgeScore {
                            link: adj.link,
                            weight: None,
                            support: 0.0,
                            confidence_out: 0.0,
                            confidence_in: 0.0,
                            contingency: None,
                            p_value: None,
                        });
                        continue;
                    }
                };
                // unlayered sources are left out of the coverage tests
                let cov_u = coverage.and_then(|c| c[adj.link]);
                let support = match cov_u {
                    Some(cov) if params.min_support > 0.0 => ratio(w, cov),
                    _ => 1.0,
                };
                let contingency = match cov_u {
                    Some(cov) if chi_square => {
                        Some(Contingency::for_edge(w, out_sum[u], in_sum[v], cov))
                    }
                    _ => None,
                };
                scores.push(EdgeScore {
                    link: adj.link,
                    weight: Some(w),
                    support,
                    confidence_out: ratio(w, out_sum[u]),
                    confidence_in: ratio(w, in_sum[v]),
                    p_value: contingency.map(|t| t.chi_square().1),
                    contingency,
                });
            }
        }
        scores.sort_unstable_by_key(|s| s.link);
        scores
    }

    fn remove_where<F>(
        &mut self,
        name: &'static str,
        scores: &[EdgeScore],
        doomed: F,
    ) -> PassReport
    where
        F: Fn(&EdgeScore) -> bool,
    {
        let mut removed = 0;
        for score in scores.iter().filter(|s| doomed(s)) {
            self.alive[score.link] = false;
            removed += 1;
        }
        log::info!("{}: removed {} of {} links", name, removed, scores.len());
        PassReport {
            name,
            examined: scores.len(),
            removed,
        }
    }

    /// Keep a link iff its weight, support and both confidences reach the
    /// thresholds. Links without path evidence always go.
    pub fn threshold_pass(&mut self, params: &PruneParams) -> PassReport {
        let scores = self.score_edges_with(params, false);
        self.remove_where("threshold", &scores, |s| !s.passes_thresholds(params))
    }

    /// Threshold test, then drop low-weight links whose association with
    /// their endpoints is not significant.
    pub fn chi_square_pass(&mut self, params: &PruneParams) -> PassReport {
        let scores = self.score_edges_with(params, true);
        self.remove_where("chi-square", &scores, |s| {
            if !s.passes_thresholds(params) {
                return true;
            }
            match (s.weight, s.p_value) {
                (Some(w), Some(p)) => p > params.p_cutoff && w <= params.weight_cutoff,
                _ => false,
            }
        })
    }

    /// Every (in-link, out-link) pair around a vertex whose node triple is
    /// walked at least `min_triple` times votes for both links; links left
    /// without a vote are removed. Returns the votes of every link examined.
    pub fn triple_node_pass(&mut self, min_triple: u64) -> (PassReport, Vec<LinkVote>) {
        let graph = self.graph();
        let links = &self.model.links;
        let mut votes = vec![0u64; links.len()];

        for n in 0..graph.vertex_count() {
            let (preds, succs) = (graph.predecessors(n), graph.successors(n));
            if preds.is_empty() || succs.is_empty() {
                continue;
            }
            for p in preds {
                for s in succs {
                    let (in_link, out_link) = (&links[p.link], &links[s.link]);
                    if !(in_link.is_forward() && out_link.is_forward()) {
                        continue;
                    }
                    let supported = self
                        .model
                        .triple_weight(in_link.from(), graph.name(n), out_link.to())
                        .map_or(false, |w| w >= min_triple);
                    if supported {
                        votes[p.link] += 1;
                        votes[s.link] += 1;
                    }
                }
            }
        }

        let table: Vec<LinkVote> = (0..links.len())
            .filter(|&i| self.alive[i])
            .map(|i| LinkVote {
                link: i,
                votes: votes[i],
            })
            .collect();

        let mut removed = 0;
        for vote in table.iter().filter(|v| v.votes == 0) {
            self.alive[vote.link] = false;
            removed += 1;
        }
        log::info!(
            "triple-node: removed {} of {} links (min triple weight {})",
            removed,
            table.len(),
            min_triple
        );
        let report = PassReport {
            name: "triple-node",
            examined: table.len(),
            removed,
        };
        (report, table)
    }

    /// Drop links touching a node walked by fewer than `min_node_cov` paths.
    pub fn node_coverage_pass(&mut self, min_node_cov: u64) -> PassReport {
        let covered = |id: &str| self.model.path_count(id) >= min_node_cov;
        let doomed: Vec<usize> = self
            .model
            .links
            .iter()
            .enumerate()
            .filter(|(i, l)| self.alive[*i] && !(covered(l.from()) && covered(l.to())))
            .map(|(i, _)| i)
            .collect();
        let examined = self.surviving();
        for &i in &doomed {
            self.alive[i] = false;
        }
        log::info!(
            "node coverage: removed {} of {} links below {} paths",
            doomed.len(),
            examined,
            min_node_cov
        );
        PassReport {
            name: "node-coverage",
            examined,
            removed: doomed.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PruneOutcome {
    pub alive: Vec<bool>,
    pub passes: Vec<PassReport>,
    /// Present when the triple-node pass ran.
    pub votes: Option<Vec<LinkVote>>,
}

impl PruneOutcome {
    pub fn surviving(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }
}

/// Run the configured passes in order: node coverage, threshold or
/// chi-square, then triple-node consistency.
pub fn run(model: &GfaModel, params: &PruneParams) -> PruneOutcome {
    let mut pruner = Pruner::new(model);
    let mut passes = Vec::new();

    if params.min_node_cov > 0 {
        passes.push(pruner.node_coverage_pass(params.min_node_cov));
    }
    if params.use_chi_square {
        passes.push(pruner.chi_square_pass(params));
    } else {
        passes.push(pruner.threshold_pass(params));
    }
    let votes = if params.triple_nodes {
        let (report, votes) = pruner.triple_node_pass(params.triple_min_weight());
        passes.push(report);
        Some(votes)
    } else {
        None
    };

    PruneOutcome {
        alive: pruner.into_alive(),
        passes,
        votes,
    }
}
