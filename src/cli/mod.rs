//! # CLI Module
//!
//! Command-line surface of the `connector-gen` binary.
//!
//! ## Commands
//!
//! - `generate <service> [--operation X] [--output-dir D] [--dry-run] [--force]`
//! - `generate-multi <service> [--tier N] [--output-dir D] [--dry-run] [--force]`
//! - `list-nodes`
//! - `list-operations <service>`
//! - `preview <service> [--operation X] [--file element|workflow|bpmn|readme|metadata]`
//! - `compare <service> [--operation X] --existing <path>`
//! - `audit <path> [--fail-on-error] [--errors-only]`
//! - `manifest <connectors-root> [--output <file>]`
//!
//! Global options: `--config <file>`, `--catalog <file>` (repeatable) and
//! `--verbose`. Flags override environment variables, which override the
//! config file.
//!
//! ## Examples
//!
//! ```bash
//! # Every Slack operation, previewed only
//! connector-gen generate slack --dry-run
//!
//! # Gmail as one connector with tier 1 and 2 operations
//! connector-gen generate-multi gmail --tier 2
//!
//! # Fail CI on structural errors
//! connector-gen audit connectors/generated --fail-on-error
//! ```
//!
//! Any error prints a red `Error:` line to stderr (followed by the valid
//! services or operations for failed lookups) and exits with status 1.

mod commands;


pub use commands::{execute, report_error, run_cli, Cli, Commands, PreviewFile};
