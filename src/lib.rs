//! # Ledger Registry
//!
//! > **Versioned, audited registries as contracts over a shared ledger.**
//!
//! Two registries live here: **resource types** and **resources**, where every resource
//! references a resource type. Both are served by one generic engine. Records are
//! created and updated inside ledger transactions. Uniqueness is enforced through the
//! ledger's optimistic concurrency, and every committed revision can be replayed from
//! the key's history.
//!
//! ## Core Concepts
//!
//! ### Generics: one engine, two registries
//! [`Registry<E: LedgerEntity>`](registry::Registry) implements Create, Update, Read,
//! Index and Transactions once. [`ResourceType`](model::ResourceType) and
//! [`Resource`](model::Resource) only describe how they are built, merged and validated.
//!
//! ### Contracts only see a transaction context
//! Every operation takes a [`&dyn TransactionContext`](ledger::TransactionContext): point
//! reads, buffered writes, selector queries, key history and nested contract calls.
//! A real peer, the in-memory [`runtime`] and the scripted [`mock::MockStub`] all
//! implement it.
//!
//! ### Cross-registry validation
//! A resource's `resource_type_id` is checked at creation by calling the resource type
//! contract's `Read` entry point in the same transaction
//! ([`ContractReferenceValidator`](registry::ContractReferenceValidator)). The registries
//! never share storage.
//!
//! ## Module Tour
//!
//! - [`ledger`]: the transaction context trait, cursors and the selector query language
//! - [`registry`]: the generic engine, entity trait, codec and reference validator
//! - [`contract`]: string-argument entry points dispatched onto the engine
//! - [`resource_type_contract`], [`resource_contract`]: the two concrete contracts
//! - [`runtime`]: in-memory ledger actor, peer and [`RegistryNetwork`](runtime::RegistryNetwork)
//! - [`clients`]: typed clients over a peer gateway
//! - [`config`]: runtime tunables and `LEDGER_*` environment overrides
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod contract;
pub mod ledger;
pub mod mock;
pub mod model;
pub mod registry;
pub mod resource_contract;
pub mod resource_type_contract;
pub mod runtime;
