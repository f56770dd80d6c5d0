//! Typed clients over a [`Gateway`](crate::runtime::Gateway).
//!
//! Callers work with entities and DTOs; the client turns them into entry-point
//! arguments, picks submit or evaluate, and decodes the JSON payloads.

pub mod registry_client;

pub use registry_client::RegistryClient;
