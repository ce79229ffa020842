//! # Memory Management
//!
//! Pre-allocated pools for components.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once in `World::init`. During gameplay:
//! - No pool growth
//! - Slots are recycled through free lists
//! - Exhaustion is reported, never papered over

mod pool;

pub use pool::{PoolAllocator, PoolHandle};
