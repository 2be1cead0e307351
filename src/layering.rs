//! Longest-path seeded layering, adapted from the hierarchical drawing
//! heuristic of Healy and Nikolov (Handbook of Graph Drawing, ch. 13).
//!
//! Layers stand in for genomic position: the seed path gets 1..L and every
//! other vertex is placed next to an already layered neighbour.

use crate::graph::DiGraph;

#[derive(Debug, Clone)]
pub struct Layering {
    layers: Vec<Option<i64>>,
    /// Vertices with no chain of links back to the seed path.
    pub unlayered: Vec<usize>,
}

impl Layering {
    pub fn layer(&self, v: usize) -> Option<i64> {
        self.layers.get(v).copied().flatten()
    }

    pub fn layered_count(&self) -> usize {
        self.layers.iter().filter(|l| l.is_some()).count()
    }
}

fn layer_from_neighbours(graph: &DiGraph, layers: &[Option<i64>], v: usize) -> Option<i64> {
    let from_succ = graph
        .successors(v)
        .iter()
        .filter_map(|adj| layers[adj.vertex])
        .min();
    if let Some(l) = from_succ {
        return Some(l - 1);
    }
    graph
        .predecessors(v)
        .iter()
        .filter_map(|adj| layers[adj.vertex])
        .max()
        .map(|l| l + 1)
}

pub fn assign_layers(graph: &DiGraph) -> Layering {
    let n = graph.vertex_count();
    let mut layers: Vec<Option<i64>> = vec![None; n];

    let mut seed = graph.longest_path();
    if seed.is_empty() && n > 0 {
        log::warn!("no acyclic seed path, seeding layering from {}", graph.name(0));
        seed.push(0);
    }
    for (i, &v) in seed.iter().enumerate() {
        layers[v] = Some(i as i64 + 1);
    }
    log::debug!("longest path seed has {} vertices", seed.len());

    let mut pending: Vec<usize> = (0..n).filter(|&v| layers[v].is_none()).collect();
    let mut sweeps = 0;
    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&v| match layer_from_neighbours(graph, &layers, v) {
            Some(l) => {
                layers[v] = Some(l);
                false
            }
            None => true,
        });
        sweeps += 1;
        if pending.len() == before {
            log::warn!(
                "{} vertices are not connected to the seed path and stay unlayered",
                pending.len()
            );
            break;
        }
    }
    log::debug!("layering finished after {} sweeps", sweeps);

    Layering {
        layers,
        unlayered: pending,
    }
}
