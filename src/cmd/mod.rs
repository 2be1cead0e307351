pub mod check;
pub mod prune;
