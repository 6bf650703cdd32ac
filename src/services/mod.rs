// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod gemini_client;
pub mod place_query_service;
pub mod place_service;
pub mod rate_limiter;
pub mod result_processor;

pub use cache::{spawn_eviction_task, ReplyCache};
pub use gemini_client::{GeminiClient, TextModel};
pub use place_query_service::PlaceQueryService;
pub use place_service::{PlaceService, UserLocation};
pub use rate_limiter::SearchRateLimiter;
pub use result_processor::{Page, ResultProcessor, RESULTS_PER_PAGE};
