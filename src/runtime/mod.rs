//! In-memory ledger runtime.
//!
//! Hosts the registry contracts end to end without an external network:
//!
//! - [`LedgerActor`] owns the committed [`WorldState`] and serialises every read and commit
//! - [`MemoryContext`] is the transaction context a contract sees during one proposal
//! - [`Peer`] deploys contracts and turns proposals into committed transactions
//! - [`RegistryNetwork`] wires both registries onto one peer
//! - [`setup_tracing`] initializes logging

pub mod actor;
pub mod client;
pub mod context;
pub mod error;
pub mod network;
pub mod peer;
pub mod tracing;
pub mod world_state;

pub use actor::{LedgerActor, LedgerRequest};
pub use client::LedgerClient;
pub use context::{Contracts, MemoryContext};
pub use error::{CommitError, PeerError};
pub use network::RegistryNetwork;
pub use peer::{Endorsement, Gateway, Peer};
pub use self::tracing::setup_tracing;
pub use world_state::{ReadRecord, TxRwSet, VersionedValue, WorldState, WriteRecord};
