// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Simple endpoint to verify service status

use crate::config::Config;
use crate::services::{ReplyCache, SearchRateLimiter, UserLocation};
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

pub async fn health_check(
    config: web::Data<Config>,
    limiter: web::Data<SearchRateLimiter>,
    location: web::Data<UserLocation>,
    cache: Option<web::Data<Arc<ReplyCache>>>,
) -> impl Responder {
    let cache_stats = match cache {
        Some(cache) => Some(cache.stats().await),
        None => None,
    };

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "pet-places",
        "version": env!("CARGO_PKG_VERSION"),
        "search_enabled": !config.gemini_api_key.is_empty(),
        "model": config.gemini_model,
        "location_enabled": location.0.is_some(),
        "rate_limited": limiter.is_enabled(),
        "cache": cache_stats
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
