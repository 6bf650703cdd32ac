// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for local reviews
// PURPOSE: Read and append per-place reviews

use crate::db::UserDataStore;
use crate::errors::PlacesError;
use crate::models::{CreateReviewRequest, ReviewQuery};
use crate::services::PlaceService;
use actix_web::{web, HttpResponse, Responder};
use std::sync::Mutex;
use validator::Validate;

/// GET /reviews?name=..&address=..
pub async fn get_reviews(
    store: web::Data<Mutex<UserDataStore>>,
    query: web::Query<ReviewQuery>,
) -> Result<impl Responder, PlacesError> {
    if query.name.trim().is_empty() {
        return Err(PlacesError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }

    let summary = PlaceService::get_reviews(store.get_ref(), &query.place())?;
    Ok(HttpResponse::Ok().json(summary))
}

/// POST /reviews
/// A rating of 0 stores nothing and returns the current summary
pub async fn create_review(
    store: web::Data<Mutex<UserDataStore>>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, PlacesError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(PlacesError::ValidationError(e.to_string()));
    }

    let req = req.into_inner();
    // Adding a review rewrites the reviews file
    let summary = web::block(move || {
        PlaceService::add_review(&store, &req.place(), req.rating, &req.comment)
    })
    .await??;

    Ok(HttpResponse::Ok().json(summary))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::get().to(get_reviews))
            .route("", web::post().to(create_review)),
    );
}
