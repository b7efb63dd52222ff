//! Cache Module
//!
//! Provides the in-memory result cache with TTL expiration and oldest-write
//! eviction.

mod entry;
pub mod key;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use order::WriteOrder;
pub use stats::{round_to, CacheStatistics, CacheStats};
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
