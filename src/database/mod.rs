pub mod connection;
pub mod memory;
pub mod mongo;
pub mod store;

pub use memory::MemoryUserStore;
pub use mongo::MongoUserStore;
pub use store::CredentialStore;
