mod memory_store;
mod redis_store;
mod seed;
mod store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use seed::{seed_demo_data, DEMO_EMAIL, DEMO_PASSWORD, DEMO_PROJECT};
pub use store::Store;
