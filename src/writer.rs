use crate::error::CmdError;
use crate::gfa::{GfaModel, LinkKey, Orient};
use crate::graph::DiGraph;
use crate::pruning::LinkVote;
use std::collections::HashSet;
use std::io::Write;

pub const HEADER: &str = "H\tVN:Z:1.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSummary {
    /// Sizes of all components formed by the surviving links, largest first.
    pub sizes: Vec<usize>,
    pub kept_size: usize,
    pub connected: bool,
}

/// The component that will be written out.
#[derive(Debug, Clone)]
pub struct Selection {
    pub nodes: HashSet<String>,
    pub links: Vec<usize>,
    pub summary: ComponentSummary,
}

/// Keep the component with the most vertices among those formed by the
/// surviving links; the first one discovered wins a tie.
pub fn select_largest_component(model: &GfaModel, alive: &[bool]) -> Selection {
    let surviving = move || {
        model
            .links
            .iter()
            .enumerate()
            .filter(move |(i, _)| alive[*i])
    };
    let graph = DiGraph::from_links(surviving());
    let components = graph.weakly_connected_components();

    let mut sizes: Vec<usize> = components.iter().map(|c| c.len()).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));

    let mut best: Option<&Vec<usize>> = None;
    for component in &components {
        if best.map_or(true, |b| component.len() > b.len()) {
            best = Some(component);
        }
    }
    let nodes: HashSet<String> = best
        .map(|c| c.iter().map(|&v| graph.name(v).to_owned()).collect())
        .unwrap_or_default();
    let links: Vec<usize> = surviving()
        .filter(|(_, l)| nodes.contains(l.from()) && nodes.contains(l.to()))
        .map(|(i, _)| i)
        .collect();

    let kept = DiGraph::from_links(links.iter().map(|&i| (i, &model.links[i])));
    let summary = ComponentSummary {
        sizes,
        kept_size: nodes.len(),
        connected: kept.is_weakly_connected(),
    };
    Selection {
        nodes,
        links,
        summary,
    }
}

fn path_is_kept(
    model: &GfaModel,
    selection: &Selection,
    kept_links: &HashSet<usize>,
    steps: &[String],
) -> bool {
    if steps.is_empty() || !steps.iter().all(|s| selection.nodes.contains(s)) {
        return false;
    }
    steps.windows(2).all(|pair| {
        let key = LinkKey {
            from: pair[0].clone(),
            from_orient: Orient::Forward,
            to: pair[1].clone(),
            to_orient: Orient::Forward,
        };
        model
            .link_position(&key)
            .map_or(false, |i| kept_links.contains(&i))
    })
}

fn write_record<W: Write>(out: &mut W, record: &[u8]) -> Result<(), CmdError> {
    out.write_all(record)
        .and_then(|_| out.write_all(b"\n"))
        .map_err(CmdError::WriteError)
}

/// Write the header, the node and link records of the selection, and when
/// `keep_paths` is set every path still fully walkable in it.
pub fn write_gfa<W: Write>(
    out: &mut W,
    model: &GfaModel,
    selection: &Selection,
    keep_paths: bool,
) -> Result<usize, CmdError> {
    writeln!(out, "{}", HEADER).map_err(CmdError::WriteError)?;
    for segment in model
        .segments
        .iter()
        .filter(|s| selection.nodes.contains(&s.id))
    {
        write_record(out, &segment.record)?;
    }
    for &i in &selection.links {
        write_record(out, &model.links[i].record)?;
    }

    let mut written_paths = 0;
    if keep_paths {
        let kept_links: HashSet<usize> = selection.links.iter().copied().collect();
        for path in &model.paths {
            if path_is_kept(model, selection, &kept_links, &path.steps) {
                write_record(out, &path.record)?;
                written_paths += 1;
            }
        }
    }
    Ok(written_paths)
}

/// `from\tto\tweight`, ascending by weight.
pub fn write_edge_weights<W: Write>(out: &mut W, model: &GfaModel) -> Result<(), CmdError> {
    for (u, v, w) in model.sorted_edge_weights() {
        writeln!(out, "{}\t{}\t{}", u, v, w).map_err(CmdError::WriteError)?;
    }
    Ok(())
}

/// `link\tvotes` for every link the triple-node pass examined.
pub fn write_votes<W: Write>(
    out: &mut W,
    model: &GfaModel,
    votes: &[LinkVote],
) -> Result<(), CmdError> {
    for vote in votes {
        writeln!(out, "{}\t{}", model.links[vote.link].key, vote.votes)
            .map_err(CmdError::WriteError)?;
    }
    Ok(())
}
