use crate::gfa::Link;
use std::collections::{HashMap, VecDeque};

/// One adjacency entry: the neighbouring vertex and the position of the
/// link record that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adj {
    pub vertex: usize,
    pub link: usize,
}

/// Simple directed graph over unqualified node ids. Vertices are numbered
/// in order of first appearance in the link set.
#[derive(Debug, Default)]
pub struct DiGraph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    succ: Vec<Vec<Adj>>,
    pred: Vec<Vec<Adj>>,
    edges: usize,
}

impl DiGraph {
    pub fn new() -> Self {
        Default::default()
    }

    /// Build from `(link position, link)` pairs.
    pub fn from_links<'a, I>(links: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a Link)>,
    {
        let mut graph = DiGraph::new();
        for (pos, link) in links {
            graph.add_edge(link.from(), link.to(), pos);
        }
        graph
    }

    fn add_vertex(&mut self, name: &str) -> usize {
        if let Some(&v) = self.index.get(name) {
            return v;
        }
        let v = self.names.len();
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), v);
        self.succ.push(Vec::new());
        self.pred.push(Vec::new());
        v
    }

    pub fn add_edge(&mut self, from: &str, to: &str, link: usize) {
        let u = self.add_vertex(from);
        let v = self.add_vertex(to);
        self.succ[u].push(Adj { vertex: v, link });
        self.pred[v].push(Adj { vertex: u, link });
        self.edges += 1;
    }

    pub fn vertex_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    pub fn name(&self, v: usize) -> &str {
        &self.names[v]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn successors(&self, v: usize) -> &[Adj] {
        &self.succ[v]
    }

    pub fn predecessors(&self, v: usize) -> &[Adj] {
        &self.pred[v]
    }

    /// Kahn order of the acyclic part of the graph. Vertices on or
    /// downstream of a cycle never reach in-degree zero and are left out.
    fn topological_order(&self) -> Vec<usize> {
        let mut indegree: Vec<usize> = self.pred.iter().map(|p| p.len()).collect();
        let mut queue: VecDeque<usize> = (0..self.vertex_count())
            .filter(|&v| indegree[v] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.vertex_count());
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for adj in &self.succ[v] {
                indegree[adj.vertex] -= 1;
                if indegree[adj.vertex] == 0 {
                    queue.push_back(adj.vertex);
                }
            }
        }
        order
    }

    /// Longest directed path (in edges) through the acyclic part of the
    /// graph; the first vertex in topological order reaching the maximum
    /// distance wins ties.
    pub fn longest_path(&self) -> Vec<usize> {
        let order = self.topological_order();
        if order.len() < self.vertex_count() {
            log::warn!(
                "graph has a cycle: {} of {} vertices are outside the acyclic part",
                self.vertex_count() - order.len(),
                self.vertex_count()
            );
        }
        let mut ordered = vec![false; self.vertex_count()];
        for &v in &order {
            ordered[v] = true;
        }

        let mut dist = vec![0usize; self.vertex_count()];
        let mut parent: Vec<Option<usize>> = vec![None; self.vertex_count()];
        for &v in &order {
            for adj in &self.succ[v] {
                if ordered[adj.vertex] && dist[v] + 1 > dist[adj.vertex] {
                    dist[adj.vertex] = dist[v] + 1;
                    parent[adj.vertex] = Some(v);
                }
            }
        }

        let mut end = match order.first() {
            Some(&v) => v,
            None => return Vec::new(),
        };
        for &v in &order {
            if dist[v] > dist[end] {
                end = v;
            }
        }

        let mut path = vec![end];
        while let Some(p) = parent[end] {
            path.push(p);
            end = p;
        }
        path.reverse();
        path
    }

    /// Weakly connected components, in order of their first vertex.
    pub fn weakly_connected_components(&self) -> Vec<Vec<usize>> {
        let mut uf = UnionFind::new(self.vertex_count());
        for (u, adjs) in self.succ.iter().enumerate() {
            for adj in adjs {
                uf.union(u, adj.vertex);
            }
        }

        let mut component_of: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for v in 0..self.vertex_count() {
            let root = uf.find(v);
            let c = *component_of.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[c].push(v);
        }
        components
    }

    pub fn is_weakly_connected(&self) -> bool {
        self.weakly_connected_components().len() == 1
    }
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
