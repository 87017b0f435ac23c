//! Editing engine for prodcfg.
//!
//! - [`MutationEngine`]: pure add/delete/move/edit operations over a
//!   [`prodcfg_store::Snapshot`], keeping sibling `sortOrder` on a stride of
//!   ten and maintaining sync statuses and tombstones
//! - [`Mutation`]: the same operations as serializable commands
//! - [`grid`]: row-span projection for the base and detail grids
//! - [`EditorSession`]: single-writer owner of the current snapshot
//!
//! ```
//! use prodcfg_engine::{EditorSession, EngineConfig, Mutation, Outcome};
//! use prodcfg_store::Snapshot;
//!
//! let mut session = EditorSession::new(EngineConfig::default(), Snapshot::default());
//! let outcome = session.apply(Mutation::AddProduct { after: None }).unwrap();
//! assert!(matches!(outcome, Outcome::Created(_)));
//! assert_eq!(session.snapshot().products()[0].prefix, "NEW_P0");
//! ```

mod config;
mod engine;
mod error;
pub mod grid;
mod mutation;
mod order;
mod session;

pub use config::EngineConfig;
pub use engine::{Applied, MutationEngine, Outcome};
pub use error::{EngineError, EngineResult};
pub use grid::{DetailFilter, GridLayout, GridRow};
pub use mutation::Mutation;
pub use order::Direction;
pub use session::EditorSession;
