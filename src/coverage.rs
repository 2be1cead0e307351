use crate::gfa::GfaModel;
use crate::graph::DiGraph;
use crate::layering::Layering;
use std::collections::BTreeMap;

/// Estimated sequencing depth per vertex: the summed path weight of every
/// edge whose layer span `[layer(u), layer(v))` covers the vertex's layer.
#[derive(Debug, Clone)]
pub struct Coverage {
    per_vertex: Vec<u64>,
}

impl Coverage {
    /// Vertices whose layer no edge spans, and unlayered vertices, read 0.
    pub fn get(&self, v: usize) -> u64 {
        self.per_vertex.get(v).copied().unwrap_or(0)
    }
}

/// Accumulates each path-derived edge weight over the layers it crosses with
/// a difference map, then resolves vertices against the running sums.
pub fn estimate(graph: &DiGraph, layering: &Layering, model: &GfaModel) -> Coverage {
    let mut delta: BTreeMap<i64, i64> = BTreeMap::new();
    for ((u, v), &w) in &model.edge_weight {
        let (lu, lv) = match (
            graph.index_of(u).and_then(|i| layering.layer(i)),
            graph.index_of(v).and_then(|i| layering.layer(i)),
        ) {
            (Some(lu), Some(lv)) => (lu, lv),
            _ => continue,
        };
        if lu < lv {
            *delta.entry(lu).or_insert(0) += w as i64;
            *delta.entry(lv).or_insert(0) -= w as i64;
        }
    }

    let mut running = 0i64;
    let prefix: BTreeMap<i64, i64> = delta
        .into_iter()
        .map(|(layer, d)| {
            running += d;
            (layer, running)
        })
        .collect();

    let per_vertex = (0..graph.vertex_count())
        .map(|v| {
            layering
                .layer(v)
                .and_then(|l| prefix.range(..=l).next_back())
                .map(|(_, &sum)| sum.max(0) as u64)
                .unwrap_or(0)
        })
        .collect();
    Coverage { per_vertex }
}
