//! gigstream-core library.
//!
//! Read model and transaction payloads for the Gigstream marketplace
//! contract. The ledger is the only store: [`projection`] rebuilds typed
//! entities from events and objects on every call, and [`tx`] describes the
//! calls that change them.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for library failures (see
//!   [`error`]); `anyhow::Result` for config loading.
//! - **Logging**: `tracing` macros with structured fields. Per-item
//!   failures that are absorbed are logged at `warn`.
//! - **Time**: milliseconds since the Unix epoch, as `u64`.

pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod ledger;
pub mod model;
pub mod projection;
pub mod tx;
pub mod validate;

pub use error::{ErrorCode, LedgerError, ProjectionError};
pub use ledger::{LedgerQuery, MemoryLedger, RpcLedger};
pub use projection::{JobFeed, ProjectionBuilder, ViewContext};
