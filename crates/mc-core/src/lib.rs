//! `mc-core` — foundational types for the `mc` Monte-Carlo runtime.
//!
//! This crate is a dependency of every other `mc-*` crate.  It intentionally
//! has no `mc-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `WorkerId`, `BatchId`                                 |
//! | [`config`]      | `RunConfig` (seed, thread count, chunk size)          |
//! | [`error`]       | `McError`, `McResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ENV_CHUNK_SIZE, ENV_NUM_THREADS, ENV_SEED, RunConfig};
pub use error::{McError, McResult};
pub use ids::{BatchId, WorkerId};
