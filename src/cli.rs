//! CLI domain: parse, route, output, and presentation only.
//! Tree and proof work is delegated to the library; handlers stay thin.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, CommandOutput};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_proof_explanation, format_proof_info, format_tree_info, format_verdict,
};
pub use route::RunContext;
