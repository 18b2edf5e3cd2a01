//! policykv: access-control policy persistence over a key-value backend.
//!
//! `core` holds the record model, codec and keyspace naming, and has no
//! runtime dependencies. `store` holds the backend trait, the in-memory
//! backend, the indexed store and its config loader. Most callers only need
//! [`prelude`].

pub mod core {
    pub use policykv_core::*;
}

pub mod store {
    pub use policykv_store::*;
}

/// Types needed to open a store and run queries against it.
pub mod prelude {
    pub use policykv_core::{Effect, Policy, PolicyStoreError, Result};
    pub use policykv_store::config::{load_from_file, StoreConfig};
    pub use policykv_store::{
        CandidateStrategy, KvBackend, KvPolicyStore, MemoryBackend, PolicyStore, RebuildReport,
    };
}
