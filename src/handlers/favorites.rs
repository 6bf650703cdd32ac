// src/handlers/favorites.rs
// DOCUMENTATION: HTTP handlers for the favorites list
// PURPOSE: List and toggle locally persisted favorites

use crate::db::UserDataStore;
use crate::errors::PlacesError;
use crate::models::Place;
use crate::services::PlaceService;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Mutex;

/// GET /favorites
pub async fn list_favorites(
    store: web::Data<Mutex<UserDataStore>>,
) -> Result<impl Responder, PlacesError> {
    let favorites = PlaceService::list_favorites(store.get_ref())?;
    Ok(HttpResponse::Ok().json(favorites))
}

/// POST /favorites/toggle
/// Adds the place when absent, removes it when present
pub async fn toggle_favorite(
    store: web::Data<Mutex<UserDataStore>>,
    req: web::Json<Place>,
) -> Result<impl Responder, PlacesError> {
    let place = req.into_inner();
    if place.name.trim().is_empty() {
        return Err(PlacesError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }

    let id = place.identity();
    // Toggling rewrites the favorites file
    let is_favorite = web::block(move || PlaceService::toggle_favorite(&store, &place)).await??;

    Ok(HttpResponse::Ok().json(json!({
        "id": id,
        "is_favorite": is_favorite
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("/toggle", web::post().to(toggle_favorite)),
    );
}
