// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for place search
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::db::UserDataStore;
use crate::errors::PlacesError;
use crate::models::SearchRequest;
use crate::services::{PlaceQueryService, PlaceService, SearchRateLimiter, UserLocation};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Mutex;
use validator::Validate;

/// POST /places/search
/// Ask the model for pet-friendly places and merge local favorite/review state
pub async fn search_places(
    config: web::Data<Config>,
    query_service: web::Data<PlaceQueryService>,
    limiter: web::Data<SearchRateLimiter>,
    location: web::Data<UserLocation>,
    store: web::Data<Mutex<UserDataStore>>,
    req: web::Json<SearchRequest>,
) -> Result<impl Responder, PlacesError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(PlacesError::ValidationError(e.to_string()));
    }

    // The model cannot be called without a Gemini API key
    if config.gemini_api_key.is_empty() {
        log::error!("Search requested but GEMINI_API_KEY is not configured");
        return Err(PlacesError::AiServiceError(
            "GEMINI_API_KEY is not configured".to_string(),
        ));
    }

    let result = PlaceService::search_places(
        query_service.get_ref(),
        limiter.get_ref(),
        store.get_ref(),
        *location.get_ref(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Configuration for place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/places").route("/search", web::post().to(search_places)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FORMAT_ERROR_MESSAGE, SERVICE_ERROR_MESSAGE};
    use crate::handlers::test_support::user_store;
    use crate::services::place_query_service::tests::CannedModel;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn keyed_config() -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            ..Config::default()
        }
    }

    macro_rules! search_app {
        ($config:expr, $reply:expr, $per_minute:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($config))
                    .app_data(web::Data::new(PlaceQueryService::new(Arc::new(
                        CannedModel::replying($reply),
                    ))))
                    .app_data(web::Data::new(SearchRateLimiter::per_minute($per_minute)))
                    .app_data(web::Data::new(UserLocation::default()))
                    .app_data(user_store())
                    .configure(config),
            )
            .await
        };
    }

    fn search(body: Value) -> test::TestRequest {
        test::TestRequest::post().uri("/places/search").set_json(body)
    }

    #[actix_rt::test]
    async fn test_search_returns_places() {
        let app = search_app!(
            keyed_config(),
            r#"[{"name":"毛孩咖啡","address":"臺北市大安區","google_rating":4.6}]"#,
            0
        );

        let body: Value =
            test::call_and_read_body_json(&app, search(json!({"city": "臺北市"})).to_request()).await;

        assert_eq!(body["total"], 1);
        assert_eq!(body["places"][0]["name"], "毛孩咖啡");
        assert_eq!(body["places"][0]["id"], "毛孩咖啡-臺北市大安區");
        assert_eq!(body["places"][0]["is_favorite"], false);
        assert_eq!(body["location_enabled"], false);
    }

    #[actix_rt::test]
    async fn test_malformed_reply_maps_to_format_error() {
        let app = search_app!(keyed_config(), "[{\"name\": }]", 0);

        let resp = test::call_service(&app, search(json!({"city": "臺北市"})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "FORMAT_ERROR");
        assert_eq!(body["error"]["message"], FORMAT_ERROR_MESSAGE);
    }

    #[actix_rt::test]
    async fn test_missing_api_key_is_service_error() {
        let app = search_app!(Config::default(), "[]", 0);
        let resp = test::call_service(&app, search(json!({"city": "臺北市"})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "AI_SERVICE_ERROR");
        assert_eq!(body["error"]["message"], SERVICE_ERROR_MESSAGE);
    }

    #[actix_rt::test]
    async fn test_invalid_requests_are_rejected() {
        let app = search_app!(keyed_config(), "[]", 0);

        let resp = test::call_service(&app, search(json!({"city": ""})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(&app, search(json!({"city": "臺北市", "per_page": 0})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(&app, search(json!({"city": "臺北市", "latitude": 25.0})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_rate_limit_returns_429() {
        let app = search_app!(keyed_config(), "[]", 1);

        let resp = test::call_service(&app, search(json!({"city": "臺北市"})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(&app, search(json!({"city": "臺北市"})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
