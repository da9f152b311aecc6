//! In-process emulation of the remote document store collaborator.
//!
//! [`MemoryDocumentStore`] is an owner-filtered router registry with the
//! CRUD surface the registration UI performs (create, get, list, update,
//! delete) and a live change feed implementing the monitor's
//! [`DocumentStore`] contract. The host binary and the integration tests
//! run against it; production deployments substitute a real backend behind
//! the same trait.
//!
//! [`DocumentStore`]: routerwatch_monitor::DocumentStore

mod registry;

pub use registry::MemoryDocumentStore;
