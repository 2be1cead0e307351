use clap::Parser;
use gfaprune::cmd::{check, prune};
use gfaprune::config::PruneParams;
use gfaprune::error::CmdError;
use gfaprune::logging;
use gfaprune::resource;

const VERSION: &str = "version 0.1";
#[derive(Parser, Debug)]
#[command(
    version = VERSION,
    about = "gfaprune removes weakly supported links from a read-derived variation graph",
    long_about = None
)]
struct Args {
    /// more log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// only warnings and errors
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,
    #[clap(subcommand)]
    command: Subcli,
}

#[derive(Parser, Debug)]
#[allow(non_camel_case_types)]
enum Subcli {
    /// prune links lacking path support and keep the largest component
    prune {
        /// input gfa with forward-oriented P lines
        #[arg(short = 'g', long = "gfa", required = true)]
        input: String,
        /// output prefix
        #[arg(short = 'o', long = "output", required = true)]
        prefix: String,
        /// minimum number of paths walking a link
        #[arg(short = 'w', long = "min-weight", default_value_t = 3)]
        min_weight: u64,
        /// minimum share of the out-/in-weight of its endpoints, 0 disables
        #[arg(short = 'd', long = "min-confidence", default_value_t = 0.2)]
        min_confidence: f64,
        /// minimum share of the estimated coverage at the source, 0 disables
        #[arg(short = 's', long = "min-support", default_value_t = 0.2)]
        min_support: f64,
        /// use the chi-square test on top of the thresholds
        #[arg(long = "chi2")]
        chi2: bool,
        /// p-value above which a low-weight link is dropped
        #[arg(short = 'p', long = "p-cutoff", default_value_t = 0.01)]
        p_cutoff: f64,
        /// links heavier than this are never dropped by the chi-square test
        #[arg(long = "weight-cutoff", default_value_t = 10)]
        weight_cutoff: u64,
        /// run the triple-node pass [default: on without --chi2, off with it]
        #[arg(long = "triple-nodes")]
        triple_nodes: Option<bool>,
        /// drop nodes walked by fewer paths, 0 disables
        #[arg(long = "min-node-cov", default_value_t = 0)]
        min_node_cov: u64,
        /// copy P lines that remain fully walkable into the output
        #[arg(long = "keep-paths")]
        keep_paths: bool,
    },
    /// report whether the links of a gfa form one connected graph
    check {
        /// input gfa
        #[arg(short = 'g', long = "gfa", required = true)]
        input: String,
    },
}

fn main() -> Result<(), CmdError> {
    resource::start_clock();
    let arg: Args = Args::parse();
    logging::init_logging(logging::level_from_flags(arg.verbose, arg.quiet));

    match arg.command {
        Subcli::prune {
            input,
            prefix,
            min_weight,
            min_confidence,
            min_support,
            chi2,
            p_cutoff,
            weight_cutoff,
            triple_nodes,
            min_node_cov,
            keep_paths,
        } => {
            let params = PruneParams {
                min_weight,
                min_confidence,
                min_support,
                p_cutoff,
                weight_cutoff,
                use_chi_square: chi2,
                triple_nodes: triple_nodes.unwrap_or(!chi2),
                min_node_cov,
                keep_paths,
            };
            prune::prune_gfa(&input, &prefix, &params)?;
        }
        Subcli::check { input } => {
            check::check_gfa(&input)?;
        }
    }
    log::info!("Done!, gfaprune {}", VERSION);
    resource::report_usage();
    Ok(())
}
