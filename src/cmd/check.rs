use crate::error::CmdError;
use crate::gfa;
use crate::graph::DiGraph;

/// Report whether the links of `gfa` form one connected graph.
pub fn check_gfa(gfa: &str) -> Result<bool, CmdError> {
    let parser = gfa::GfaParserBuilder::new().get_links(true).build();
    let model = parser.parse_file(gfa)?;
    let graph = DiGraph::from_links(model.links.iter().enumerate());

    let mut sizes: Vec<usize> = graph
        .weakly_connected_components()
        .iter()
        .map(|c| c.len())
        .collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));

    log::info!(
        "{} links over {} nodes",
        graph.edge_count(),
        graph.vertex_count()
    );
    log::info!("component sizes: {:?}", sizes);
    let connected = sizes.len() == 1;
    println!("connected\t{}\ncomponents\t{}", connected, sizes.len());
    Ok(connected)
}
