// src/handlers/catalog.rs
// DOCUMENTATION: Static filter catalog
// PURPOSE: Expose cities, districts and place types the search accepts

use crate::models::catalog;
use actix_web::{web, HttpResponse, Responder};

/// GET /catalog
pub async fn get_catalog() -> impl Responder {
    HttpResponse::Ok().json(catalog::catalog())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/catalog", web::get().to(get_catalog));
}
