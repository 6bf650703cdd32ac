// src/config/storage.rs
// DOCUMENTATION: Durable storage initialization
// PURPOSE: Prepare the data directory and load the user data store

use crate::config::Config;
use crate::db::{FileStore, UserDataStore};
use std::io;
use std::sync::Arc;

/// Initialize the file-backed user data store
/// DOCUMENTATION: Creates DATA_DIR if needed, then loads favorites and reviews
/// Called once during application startup in main.rs
pub fn init_user_store(config: &Config) -> io::Result<UserDataStore> {
    log::info!("Initializing user data store in {}", config.data_dir);

    let backend = FileStore::open(&config.data_dir)?;
    let store = UserDataStore::load(Arc::new(backend));

    log::info!(
        "User data store ready: {} favorites, {} reviewed places",
        store.favorites().len(),
        store.reviewed_place_count()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Place;
    use tokio_test::assert_ok;

    #[test]
    fn test_init_creates_directory_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().join("nested").to_string_lossy().into_owned(),
            ..Config::default()
        };

        let mut store = assert_ok!(init_user_store(&config));
        assert!(store.favorites().is_empty());
        assert_ok!(store.toggle_favorite(&Place::new("A", "X")));

        let reloaded = assert_ok!(init_user_store(&config));
        assert_eq!(reloaded.favorites().len(), 1);
    }
}
