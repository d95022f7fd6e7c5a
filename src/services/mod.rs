// Service exports
pub mod cache;
pub mod intros;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CachedProfileStore, CacheKey, CacheStats};
pub use intros::IntroStore;
pub use memory::InMemoryProfileStore;
pub use postgres::PostgresProfileStore;
pub use store::{ProfileStore, StoreError};
