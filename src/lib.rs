pub mod cmd;
pub mod config;
pub mod coverage;
pub mod error;
pub mod gfa;
pub mod graph;
pub mod layering;
pub mod logging;
pub mod pruning;
pub mod resource;
pub mod stats;
pub mod writer;
