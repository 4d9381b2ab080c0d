//! Shared infrastructure utilities for Tessera.
//!
//! Cross-cutting helpers that don't belong in the domain-pure `tessera-types`
//! crate:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, ParentDirSyncPolicy, atomic_write,
    atomic_write_with_options,
};
