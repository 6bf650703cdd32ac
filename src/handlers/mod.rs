// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod catalog;
pub mod favorites;
pub mod health;
pub mod places;
pub mod reviews;

pub use catalog::config as catalog_config;
pub use favorites::config as favorites_config;
pub use health::config as health_config;
pub use places::config as places_config;
pub use reviews::config as reviews_config;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::{MemoryStore, UserDataStore};
    use actix_web::web;
    use std::sync::{Arc, Mutex};

    /// Empty in-memory user store wrapped as app data
    pub(crate) fn user_store() -> web::Data<Mutex<UserDataStore>> {
        web::Data::new(Mutex::new(UserDataStore::load(Arc::new(MemoryStore::new()))))
    }
}
