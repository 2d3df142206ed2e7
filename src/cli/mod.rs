//! # CLI Module
//!
//! Entry points of the `item-handlers` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Host one operation on the AWS Lambda runtime. This is the binary's
//! behaviour inside a deployed function:
//!
//! ```bash
//! TABLE_NAME=items item-handlers serve --operation create
//! ```
//!
//! Options:
//! - `--operation <OP>` - `create`, `list`, `get`, `update`, `delete` or
//!   `preflight` (also `ITEMS_OPERATION`)
//! - `--config <FILE>` - YAML settings file (also `ITEMS_CONFIG`)
//!
//! ### `invoke`
//!
//! Run one operation once and print the decorated response as JSON:
//!
//! ```bash
//! item-handlers invoke --operation create --memory --body '{"name":"Widget"}'
//! item-handlers invoke --operation get --id 01J9Z3M6 --config items.yaml
//! ```
//!
//! With `--memory` the operation runs against an in-process store,
//! optionally seeded from a JSON array of items (`--seed items.json`).

mod commands;


pub use commands::{build_handlers, invocation_request, run, run_cli, Cli, Commands};
