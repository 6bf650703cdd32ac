// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, user data store, model client and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use config::Config;
use dotenv::dotenv;
use services::{
    spawn_eviction_task, GeminiClient, PlaceQueryService, ReplyCache, SearchRateLimiter,
    UserLocation,
};
use std::sync::{Arc, Mutex};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Initialize logging before configuration so parse warnings are visible
    if std::env::var("RUST_LOG").is_err() {
        let log_level = std::env::var("LOG_LEVEL")
            .ok()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| "info,actix_web=info".to_string());
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    // 3. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        anyhow::bail!("invalid configuration: {}", e);
    }

    log::info!("Starting pet-places service...");
    log::info!("Environment: {} (log level {})", config.environment, config.log_level);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Load favorites and reviews
    let store = config::init_user_store(&config)
        .with_context(|| format!("failed to open data directory {}", config.data_dir))?;
    let store = web::Data::new(Mutex::new(store));

    // 5. Resolve the process-wide location once
    let location = UserLocation(config.user_location());
    match location.0 {
        Some(point) => log::info!(
            "User location: {}, {}",
            point.latitude,
            point.longitude
        ),
        None => log::info!("User location unavailable, distance sorting disabled"),
    }

    // 6. Model client, optional reply cache and rate limiter
    let gemini = GeminiClient::from_config(&config);
    log::info!("Using Gemini model {}", gemini.model());
    let mut query_service = PlaceQueryService::new(Arc::new(gemini));

    let cache = if config.search_cache_ttl_seconds > 0 {
        let cache = Arc::new(ReplyCache::new(config.search_cache_ttl_seconds));
        log::info!(
            "Initialized model reply cache (TTL: {}s)",
            config.search_cache_ttl_seconds
        );

        // Evict stale replies every 5 minutes
        spawn_eviction_task(cache.clone(), 300);
        query_service = query_service.with_cache(cache.clone());
        Some(cache)
    } else {
        None
    };
    let query_service = web::Data::new(query_service);

    let limiter = web::Data::new(SearchRateLimiter::per_minute(
        config.search_rate_limit_per_minute,
    ));
    if limiter.is_enabled() {
        log::info!(
            "Search rate limit: {} per minute",
            config.search_rate_limit_per_minute
        );
    }

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        let mut app = App::new()
            // Application state
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(location))
            .app_data(store.clone())
            .app_data(query_service.clone())
            .app_data(limiter.clone());

        if let Some(cache) = &cache {
            app = app.app_data(web::Data::new(cache.clone()));
        }

        app
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::catalog_config)
            .configure(handlers::places_config)
            .configure(handlers::favorites_config)
            .configure(handlers::reviews_config)
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
