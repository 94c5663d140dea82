//! Build-time environment for aotgen.
//!
//! The [`ApplicationSnapshot`] is gathered once before generation starts and is
//! shared read-only by every generator. It answers existence probes through the
//! [`TypeResolver`] trait and carries the declared components and bundled
//! resources of the application.

mod resolver;
mod snapshot;
mod types;

pub use resolver::{Resolution, TypeEntry, TypeIndex, TypeResolver};
pub use snapshot::{ApplicationSnapshot, ComponentInfo, SnapshotError};
pub use types::TypeHandle;
