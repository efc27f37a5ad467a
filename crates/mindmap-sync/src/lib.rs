//! Synchronization of the shared mind map with a realtime document store.
//!
//! The store and the identity service are capabilities behind traits
//! ([`DocumentStore`], [`IdentityProvider`]). [`SyncClient`] owns the
//! protocol: establish identity, subscribe to the singleton document,
//! replace local state with every snapshot, bootstrap a missing document,
//! and push saves back through the store. [`driver`] runs a client as a
//! single cooperative task and publishes [`SyncView`] snapshots.

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod identity;
pub mod memory;
pub mod remote;
pub mod store;
pub mod wire;

pub use client::{SyncClient, SyncSession, SyncState, SyncStatus};
pub use config::SyncConfig;
pub use driver::{spawn, SyncCommand, SyncHandle, SyncView};
pub use error::{SyncError, SyncResult};
pub use identity::{identity_from_config, AnonymousIdentity, IdentityProvider, TokenIdentity};
pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use store::{DocumentEvent, DocumentPath, DocumentStore, EventSink, StoredDocument, Subscription};
