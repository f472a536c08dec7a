//! CLI command handlers, one file per command.

mod add;
mod check;
mod completions;
mod run;

pub use add::run_add;
pub use check::run_check;
pub use completions::run_completions;
pub use run::run_downloads;
