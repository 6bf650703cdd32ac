// src/db/user_data.rs
// DOCUMENTATION: Favorites and reviews state container
// PURPOSE: Single-writer store keyed by place identity, rewritten in full on every mutation

use crate::db::KeyValueStore;
use crate::errors::PlacesError;
use crate::models::{Place, Review, UNSET_RATING};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Storage key of the serialized favorite list
pub const FAVORITES_KEY: &str = "pet_friendly_favorites";

/// Storage key of the serialized identity → reviews map
pub const REVIEWS_KEY: &str = "pet_friendly_reviews";

const MAX_RATING: u8 = 5;

/// Favorite snapshots and local reviews
/// DOCUMENTATION: Loaded once at startup, mutated in memory, persisted synchronously
pub struct UserDataStore {
    backend: Arc<dyn KeyValueStore>,
    favorites: Vec<Place>,
    reviews: BTreeMap<String, Vec<Review>>,
}

impl UserDataStore {
    /// Load both entries from `backend`
    /// DOCUMENTATION: Missing or corrupt entries load as empty and are logged
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let favorites: Vec<Place> = load_entry(backend.as_ref(), FAVORITES_KEY);
        let mut reviews: BTreeMap<String, Vec<Review>> =
            load_entry(backend.as_ref(), REVIEWS_KEY);
        drop_invalid_reviews(&mut reviews);

        Self {
            backend,
            favorites,
            reviews,
        }
    }

    pub fn favorites(&self) -> &[Place] {
        &self.favorites
    }

    pub fn is_favorite(&self, place: &Place) -> bool {
        let id = place.identity();
        self.favorites.iter().any(|p| p.identity() == id)
    }

    /// Add the place if no favorite shares its identity, otherwise remove it
    /// Returns whether the place is a favorite afterwards
    pub fn toggle_favorite(&mut self, place: &Place) -> Result<bool, PlacesError> {
        let id = place.identity();
        let before = self.favorites.len();
        self.favorites.retain(|p| p.identity() != id);

        let now_favorite = self.favorites.len() == before;
        if now_favorite {
            self.favorites.push(place.snapshot());
        }

        log::info!(
            "Favorite {} {}",
            if now_favorite { "added" } else { "removed" },
            id
        );

        self.persist(FAVORITES_KEY, &self.favorites)?;
        Ok(now_favorite)
    }

    /// Append a review; a rating of 0 means "unset" and is ignored
    /// Returns whether a review was stored
    pub fn add_review(
        &mut self,
        place: &Place,
        rating: u8,
        comment: &str,
    ) -> Result<bool, PlacesError> {
        if rating == UNSET_RATING {
            log::debug!("Ignoring review without rating for {}", place.identity());
            return Ok(false);
        }
        if rating > MAX_RATING {
            return Err(PlacesError::ValidationError(format!(
                "rating must be between 1 and {}, got {}",
                MAX_RATING, rating
            )));
        }

        let id = place.identity();
        self.reviews.entry(id.clone()).or_default().push(Review {
            rating,
            comment: comment.to_string(),
        });
        log::info!("Review ({} stars) added for {}", rating, id);

        self.persist(REVIEWS_KEY, &self.reviews)?;
        Ok(true)
    }

    pub fn reviews(&self, place: &Place) -> &[Review] {
        self.reviews
            .get(&place.identity())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mean rating and review count, `(0.0, 0)` without reviews
    pub fn average_rating(&self, place: &Place) -> (f64, usize) {
        let reviews = self.reviews(place);
        if reviews.is_empty() {
            return (0.0, 0);
        }
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        (f64::from(total) / reviews.len() as f64, reviews.len())
    }

    pub fn reviewed_place_count(&self) -> usize {
        self.reviews.len()
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PlacesError> {
        let json = serde_json::to_string(value).map_err(|e| {
            log::error!("Failed to serialize {}: {}", key, e);
            PlacesError::StorageError(e.to_string())
        })?;

        self.backend.set(key, &json).map_err(|e| {
            log::error!("Failed to write {}: {}", key, e);
            PlacesError::StorageError(e.to_string())
        })
    }
}

/// Stored reviews must carry a rating in 1..=MAX_RATING; anything else is dropped
fn drop_invalid_reviews(reviews: &mut BTreeMap<String, Vec<Review>>) {
    let mut dropped = 0;
    for entries in reviews.values_mut() {
        let before = entries.len();
        entries.retain(|r| (1..=MAX_RATING).contains(&r.rating));
        dropped += before - entries.len();
    }
    reviews.retain(|_, entries| !entries.is_empty());

    if dropped > 0 {
        log::warn!("Dropped {} stored reviews with out-of-range ratings", dropped);
    }
}

fn load_entry<T: DeserializeOwned + Default>(backend: &dyn KeyValueStore, key: &str) -> T {
    match backend.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::error!("Failed to parse stored {}: {} - starting empty", key, e);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            log::error!("Failed to read stored {}: {} - starting empty", key, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FileStore, MemoryStore};
    use std::io;

    fn place(name: &str, address: &str) -> Place {
        Place::new(name, address)
    }

    fn empty_store() -> (Arc<MemoryStore>, UserDataStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = UserDataStore::load(backend.clone());
        (backend, store)
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn set(&self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_toggle_favorite_is_its_own_inverse() {
        let (backend, mut store) = empty_store();
        let existing = place("A", "X");
        store.toggle_favorite(&existing).unwrap();
        let original = store.favorites().to_vec();
        let original_blob = backend.get(FAVORITES_KEY).unwrap();

        let target = place("B", "Y");
        assert!(store.toggle_favorite(&target).unwrap());
        assert!(store.is_favorite(&target));
        assert!(!store.toggle_favorite(&target).unwrap());

        assert_eq!(store.favorites(), original.as_slice());
        assert_eq!(backend.get(FAVORITES_KEY).unwrap(), original_blob);
    }

    #[test]
    fn test_toggle_matches_by_identity_only() {
        let (_, mut store) = empty_store();
        let mut first = place("A", "X");
        first.google_rating = Some(4.0);
        store.toggle_favorite(&first).unwrap();

        let mut other = place("A", "X");
        other.description = "different".to_string();
        assert!(store.is_favorite(&other));
        assert!(!store.toggle_favorite(&other).unwrap());
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_favorite_snapshot_has_no_distance() {
        let (backend, mut store) = empty_store();
        let mut p = place("A", "X");
        p.distance = Some(3.2);
        store.toggle_favorite(&p).unwrap();

        let blob = backend.get(FAVORITES_KEY).unwrap().unwrap();
        assert!(!blob.contains("distance"));
        assert_eq!(store.favorites()[0].distance, None);
    }

    #[test]
    fn test_add_review_with_unset_rating_is_noop() {
        let (backend, mut store) = empty_store();
        let p = place("A", "X");

        assert!(!store.add_review(&p, 0, "nice").unwrap());
        assert!(store.reviews(&p).is_empty());
        assert_eq!(backend.get(REVIEWS_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_review_rejects_out_of_range() {
        let (_, mut store) = empty_store();
        let p = place("A", "X");
        assert!(matches!(
            store.add_review(&p, 6, ""),
            Err(PlacesError::ValidationError(_))
        ));
        assert!(store.reviews(&p).is_empty());
    }

    #[test]
    fn test_reviews_append_in_order_and_average() {
        let (backend, mut store) = empty_store();
        let p = place("A", "X");
        assert_eq!(store.average_rating(&p), (0.0, 0));

        store.add_review(&p, 5, "great").unwrap();
        store.add_review(&p, 3, "").unwrap();
        store.add_review(&p, 4, "ok").unwrap();

        let ratings: Vec<u8> = store.reviews(&p).iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5, 3, 4]);
        assert_eq!(store.average_rating(&p), (4.0, 3));

        let blob = backend.get(REVIEWS_KEY).unwrap().unwrap();
        let stored: BTreeMap<String, Vec<Review>> = serde_json::from_str(&blob).unwrap();
        assert_eq!(stored["A-X"].len(), 3);
    }

    #[test]
    fn test_corrupt_entries_load_empty() {
        let backend = Arc::new(MemoryStore::with_entry(FAVORITES_KEY, "{not json"));
        backend.set(REVIEWS_KEY, r#"{"A-X":[{"rating":4,"comment":"ok"}]}"#).unwrap();

        let store = UserDataStore::load(backend);
        assert!(store.favorites().is_empty());
        assert_eq!(store.average_rating(&place("A", "X")), (4.0, 1));
    }

    #[test]
    fn test_out_of_range_stored_ratings_are_dropped() {
        let backend = Arc::new(MemoryStore::with_entry(
            REVIEWS_KEY,
            r#"{"A-X":[{"rating":0,"comment":"unset"},{"rating":5},{"rating":9}],
                "B-Y":[{"rating":7,"comment":"bad"}]}"#,
        ));

        let store = UserDataStore::load(backend);
        assert_eq!(store.average_rating(&place("A", "X")), (5.0, 1));
        assert!(store.reviews(&place("B", "Y")).is_empty());
        assert_eq!(store.reviewed_place_count(), 1);
    }

    #[test]
    fn test_unreadable_backend_loads_empty_and_surfaces_write_errors() {
        let mut store = UserDataStore::load(Arc::new(FailingStore));
        assert!(store.favorites().is_empty());

        let p = place("A", "X");
        let result = store.toggle_favorite(&p);
        assert!(matches!(result, Err(PlacesError::StorageError(_))));
        // In-memory state keeps the mutation
        assert!(store.is_favorite(&p));
    }

    #[test]
    fn test_state_survives_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(FileStore::open(dir.path()).unwrap());

        let mut store = UserDataStore::load(backend.clone());
        let p = place("毛孩公園", "高雄市左營區");
        store.toggle_favorite(&p).unwrap();
        store.add_review(&p, 2, "太熱").unwrap();

        let reloaded = UserDataStore::load(backend);
        assert!(reloaded.is_favorite(&p));
        assert_eq!(reloaded.reviews(&p)[0].comment, "太熱");
        assert_eq!(reloaded.favorites().len(), 1);
    }
}
