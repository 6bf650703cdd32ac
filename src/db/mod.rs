// src/db/mod.rs
// DOCUMENTATION: Storage module organization
// PURPOSE: Re-export storage components

pub mod kv_store;
pub mod user_data;

pub use kv_store::{FileStore, KeyValueStore};
#[cfg(test)]
pub use kv_store::MemoryStore;
pub use user_data::UserDataStore;
