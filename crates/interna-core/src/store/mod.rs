//! Entity store domain module.
//!
//! A store holds one ordered collection of entities of a single kind plus
//! the statistics summary derived from it, and keeps the two in lockstep
//! under every mutation.
//!
//! # Module Structure
//!
//! - `traits`: the `Entity`, `Category` and `Filters` contracts each entity kind implements
//! - `stats`: the one incremental statistics algebra shared by every kind
//! - `entity_store`: the generic `EntityStore<E>`
//! - `gateway`: the remote gateway boundary the coordinators call

mod entity_store;
pub mod gateway;
pub mod stats;
mod traits;

// Re-export public API
pub use entity_store::{EntityStore, Mutation, StoreSnapshot};
pub use gateway::{EntityGateway, FetchResult};
pub use stats::{Mean, Summary};
pub use traits::{Category, Entity, EntityId, Filters};
