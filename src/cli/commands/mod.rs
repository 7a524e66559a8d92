//! CLI command implementations.
//!
//! One module per subcommand; `run.rs` calls the `execute_*` handlers.

mod common;
mod config;
mod draft;
mod export;
mod generate;
mod limits;
mod outline;
mod refine;
mod section;

pub use config::execute_config_command;
pub use draft::execute_draft_command;
pub use export::execute_export_command;
pub use generate::execute_generate_command;
pub use limits::execute_limits_command;
pub use outline::execute_outline_command;
pub use refine::execute_refine_command;
pub use section::execute_section_command;
