use crate::config::PruneParams;
use crate::error::CmdError;
use crate::writer::{self, ComponentSummary};
use crate::{gfa, pruning};
use std::fs::File;
use std::io::{BufWriter, Write};

fn create(path: &str) -> Result<BufWriter<File>, CmdError> {
    Ok(BufWriter::new(
        File::create(path).map_err(CmdError::CreateFileError)?,
    ))
}

/// Output files written for a prefix.
pub fn output_paths(prefix: &str) -> (String, String, String) {
    (
        format!("{}.gfa", prefix),
        format!("{}.edge_weights.tsv", prefix),
        format!("{}.triple_votes.tsv", prefix),
    )
}

/// Prune `gfa` and write `<prefix>.gfa` plus the side tables. Nothing is
/// written when parsing fails.
pub fn prune_gfa(
    gfa: &str,
    prefix: &str,
    params: &PruneParams,
) -> Result<ComponentSummary, CmdError> {
    let model = gfa::GfaParser::default().parse_file(gfa)?;
    log::info!("GFA file parsed successfully");
    log::info!(
        "input graph: {} nodes, {} links, {} paths, {} distinct path edges",
        model.segments.len(),
        model.links.len(),
        model.paths.len(),
        model.edge_weight.len()
    );
    log::debug!("{:?}", params);

    let outcome = pruning::run(&model, params);
    for pass in &outcome.passes {
        log::debug!(
            "pass {}: {} examined, {} removed",
            pass.name,
            pass.examined,
            pass.removed
        );
    }
    log::info!(
        "{} of {} links survive pruning",
        outcome.surviving(),
        model.links.len()
    );

    let selection = writer::select_largest_component(&model, &outcome.alive);
    if selection.links.is_empty() {
        log::warn!("no links survived pruning, the output holds the header only");
    }
    log::info!("component sizes: {:?}", selection.summary.sizes);

    let (gfa_path, weights_path, votes_path) = output_paths(prefix);
    let mut out = create(&gfa_path)?;
    let kept_paths = writer::write_gfa(&mut out, &model, &selection, params.keep_paths)?;
    out.flush().map_err(CmdError::WriteError)?;

    let mut out = create(&weights_path)?;
    writer::write_edge_weights(&mut out, &model)?;
    out.flush().map_err(CmdError::WriteError)?;

    if let Some(votes) = &outcome.votes {
        let mut out = create(&votes_path)?;
        writer::write_votes(&mut out, &model, votes)?;
        out.flush().map_err(CmdError::WriteError)?;
    }

    let kept_nodes = model
        .segments
        .iter()
        .filter(|s| selection.nodes.contains(&s.id))
        .count();
    log::info!(
        "pruned graph: {} nodes, {} links, {} paths",
        kept_nodes,
        selection.links.len(),
        kept_paths
    );
    log::info!(
        "the largest component is connected: {}, size: {}",
        selection.summary.connected,
        selection.summary.kept_size
    );
    Ok(selection.summary)
}
