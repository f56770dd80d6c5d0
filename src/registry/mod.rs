//! Generic ledger-backed registry.
//!
//! # Main Components
//!
//! - [`LedgerEntity`] - Trait that record types implement to be managed by a registry
//! - [`Registry`] - Create / Update / Read / Index / Transactions over any entity
//! - [`ReferenceValidator`] - Foreign-key checks through another contract
//! - [`TransactionItem`] - One replayed revision of a record
//! - [`RegistryError`] - The error taxonomy shared by both registries

pub mod codec;
pub mod engine;
pub mod entity;
pub mod error;
pub mod item;
pub mod validator;

pub use codec::CodecError;
pub use engine::Registry;
pub use entity::LedgerEntity;
pub use error::RegistryError;
pub use item::TransactionItem;
pub use validator::{ContractReferenceValidator, ReferenceValidator};
