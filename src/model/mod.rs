//! Record types implementing the [`LedgerEntity`](crate::registry::LedgerEntity) trait.

pub mod resource;
pub mod resource_type;

pub use resource::*;
pub use resource_type::*;
