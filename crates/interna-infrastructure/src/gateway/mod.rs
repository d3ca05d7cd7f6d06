//! Gateway implementations.
//!
//! The HTTP gateway to the remote API lives outside this workspace.
//! `MemoryGateway` implements the same contract against an in-process
//! record list and is used by tests and offline demos.

mod memory;
mod records;

pub use memory::MemoryGateway;
pub use records::{DraftContext, ServerRecord};
