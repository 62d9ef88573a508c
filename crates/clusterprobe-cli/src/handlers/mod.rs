//! Command handlers - one module per subcommand
//!
//! Each handler keeps its pure helpers (config merging, table rendering)
//! separate from the printing entry point so they can be tested directly.

pub mod categories;
pub mod list;
pub mod run;

pub use categories::{execute_categories, render_categories};
pub use list::{execute_list, render_probe_table, selected_probes};
pub use run::{build_run_config, execute_run, findings, render_options, unique_formats};
