// src/services/place_service.rs
// DOCUMENTATION: Business logic for places
// PURPOSE: Intermediary between handlers, the query service, the result processor and the user store

use crate::db::UserDataStore;
use crate::errors::PlacesError;
use crate::models::{
    catalog, results_map_url, GeoPoint, Place, PlaceResponse, ReviewSummaryResponse,
    SearchRequest, SearchResponse,
};
use crate::services::{
    Page, PlaceQueryService, ResultProcessor, SearchRateLimiter, RESULTS_PER_PAGE,
};
use std::sync::{Mutex, MutexGuard};

/// Process-wide user location, resolved once at startup
#[derive(Debug, Clone, Copy, Default)]
pub struct UserLocation(pub Option<GeoPoint>);

pub struct PlaceService;

impl PlaceService {
    /// Search places and shape them for the client
    /// DOCUMENTATION: criteria → model → distances/sort → page → favorite/review merge
    pub async fn search_places(
        query_service: &PlaceQueryService,
        limiter: &SearchRateLimiter,
        store: &Mutex<UserDataStore>,
        process_location: UserLocation,
        req: SearchRequest,
    ) -> Result<SearchResponse, PlacesError> {
        let criteria = req.criteria();
        catalog::check_criteria(&criteria.city, &criteria.district, &criteria.place_type)
            .map_err(PlacesError::ValidationError)?;

        let client_location = req.client_location().map_err(PlacesError::ValidationError)?;
        let user_location = client_location.or(process_location.0);

        limiter.check()?;
        let places = query_service.search(&criteria).await?;
        let places = ResultProcessor::process(places, user_location, req.sort);
        let map_url = results_map_url(&criteria.city, &places);

        let page = Page::of(
            places,
            req.page.unwrap_or(1),
            req.per_page.unwrap_or(RESULTS_PER_PAGE),
        );

        let store = lock_store(store)?;
        let places = page
            .items
            .into_iter()
            .map(|place| Self::to_response(place, &store))
            .collect();

        Ok(SearchResponse {
            places,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
            has_more: page.has_more,
            location_enabled: user_location.is_some(),
            map_url,
        })
    }

    /// Merge favorite and review state into a place
    fn to_response(place: Place, store: &UserDataStore) -> PlaceResponse {
        let (review_average, review_count) = store.average_rating(&place);

        PlaceResponse {
            id: place.identity(),
            is_favorite: store.is_favorite(&place),
            review_average,
            review_count,
            maps_url: place.maps_search_url(),
            map_url: place.map_embed_url(),
            place,
        }
    }

    /// Favorite snapshots, each with its current review summary
    pub fn list_favorites(store: &Mutex<UserDataStore>) -> Result<Vec<PlaceResponse>, PlacesError> {
        let store = lock_store(store)?;
        Ok(store
            .favorites()
            .iter()
            .cloned()
            .map(|place| Self::to_response(place, &store))
            .collect())
    }

    /// Toggle a favorite, returning the new state
    pub fn toggle_favorite(store: &Mutex<UserDataStore>, place: &Place) -> Result<bool, PlacesError> {
        let mut store = lock_store(store)?;
        store.toggle_favorite(place)
    }

    /// Add a review (rating 0 is ignored) and return the place's summary
    pub fn add_review(
        store: &Mutex<UserDataStore>,
        place: &Place,
        rating: u8,
        comment: &str,
    ) -> Result<ReviewSummaryResponse, PlacesError> {
        let mut store = lock_store(store)?;
        store.add_review(place, rating, comment)?;
        Ok(Self::review_summary(&store, place))
    }

    pub fn get_reviews(
        store: &Mutex<UserDataStore>,
        place: &Place,
    ) -> Result<ReviewSummaryResponse, PlacesError> {
        let store = lock_store(store)?;
        Ok(Self::review_summary(&store, place))
    }

    fn review_summary(store: &UserDataStore, place: &Place) -> ReviewSummaryResponse {
        let (average, count) = store.average_rating(place);
        ReviewSummaryResponse {
            id: place.identity(),
            reviews: store.reviews(place).to_vec(),
            average,
            count,
        }
    }
}

fn lock_store(store: &Mutex<UserDataStore>) -> Result<MutexGuard<'_, UserDataStore>, PlacesError> {
    store.lock().map_err(|_| {
        log::error!("User data store mutex poisoned");
        PlacesError::StorageError("user data store unavailable".to_string())
    })
}
