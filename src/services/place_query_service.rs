// src/services/place_query_service.rs
// DOCUMENTATION: Natural-language place search backed by a text model
// PURPOSE: Build the search prompt, call the model once, extract places from the reply

use crate::errors::PlacesError;
use crate::models::{Place, SearchCriteria, ANY};
use crate::services::{ReplyCache, TextModel};
use std::sync::Arc;

/// Upper bound on results the prompt asks for
pub const MAX_RESULTS: usize = 50;

/// Phrase used when no place type filter is set
const ANY_TYPE_PHRASE: &str = "任何類型的寵物友善地點";

/// Result of reading places out of a model reply
#[derive(Debug, PartialEq)]
pub enum ReplyOutcome {
    /// Nothing usable: blank reply, `[]`, or prose without an array
    Empty,
    /// A JSON array was found and parsed
    Parsed(Vec<Place>),
    /// A bracketed span was found but is not valid JSON
    FormatError(String),
}

/// Build the search instruction for the given criteria
pub fn build_prompt(criteria: &SearchCriteria) -> String {
    let location = criteria.location_string();

    let type_phrase = if criteria.place_type == ANY {
        ANY_TYPE_PHRASE.to_string()
    } else {
        format!("寵物友善的「{}」", criteria.place_type)
    };

    let keyword = criteria.keyword.trim();
    let keyword_clause = if keyword.is_empty() {
        String::new()
    } else {
        format!("，其名稱或描述需與「{}」相關", keyword)
    };

    [
        format!(
            "請使用 Google 搜尋在台灣的 {} 尋找{}{}。",
            location, type_phrase, keyword_clause
        ),
        "請盡力找出所有相關的地點，目標是提供一份完整的列表。".to_string(),
        format!("請回傳最多{}個最相關的地點。", MAX_RESULTS),
        "請務必以 JSON 陣列格式回傳，其中每個物件需要包含地點名稱(name)、地址(address)、\
         簡短的特色描述(description)，地理座標(latitude and longitude)，\
         以及該地點在Google Maps上的平均評分(google_rating)。"
            .to_string(),
        "如果找不到任何地點，請回傳一個空的 JSON 陣列 []。".to_string(),
    ]
    .join("\n")
}

/// Two-stage extraction: bracket span, then strict JSON parse
pub fn extract_places(reply: &str) -> ReplyOutcome {
    let text = reply.trim();
    if text.is_empty() {
        return ReplyOutcome::Empty;
    }

    let span = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if end >= start => &text[start..=end],
        _ => {
            if text != "[]" {
                log::warn!("Could not find a JSON array in the model reply: {}", text);
            }
            return ReplyOutcome::Empty;
        }
    };

    match serde_json::from_str::<Vec<Place>>(span) {
        Ok(places) => ReplyOutcome::Parsed(places),
        Err(e) => {
            log::error!("Failed to parse JSON from model reply: {}", e);
            log::error!("Original text from model: {}", text);
            log::error!("Attempted to parse this string: {}", span);
            ReplyOutcome::FormatError(e.to_string())
        }
    }
}

/// Place search over a text model
/// DOCUMENTATION: One model call per search, no retries
pub struct PlaceQueryService {
    model: Arc<dyn TextModel>,
    cache: Option<Arc<ReplyCache>>,
}

impl PlaceQueryService {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model, cache: None }
    }

    /// Reuse raw replies for identical criteria
    pub fn with_cache(mut self, cache: Arc<ReplyCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Search for places matching `criteria`
    /// DOCUMENTATION: Resolves to a list (possibly empty), `MalformedResponse`
    /// or `AiServiceError`, never anything else
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Place>, PlacesError> {
        let cached = match &self.cache {
            Some(cache) => cache.lookup(criteria).await,
            None => None,
        };

        let reply = match cached {
            Some(reply) => reply,
            None => {
                let prompt = build_prompt(criteria);
                log::info!(
                    "Searching places: location={}, type={}, keyword={:?}",
                    criteria.location_string(),
                    criteria.place_type,
                    criteria.keyword
                );
                self.model.generate(&prompt).await.map_err(|e| match e {
                    PlacesError::MalformedResponse(_) | PlacesError::AiServiceError(_) => e,
                    other => PlacesError::AiServiceError(other.to_string()),
                })?
            }
        };

        match extract_places(&reply) {
            ReplyOutcome::Empty => {
                self.remember(criteria, &reply).await;
                Ok(Vec::new())
            }
            ReplyOutcome::Parsed(places) => {
                log::info!("Model returned {} places", places.len());
                self.remember(criteria, &reply).await;
                Ok(places)
            }
            ReplyOutcome::FormatError(detail) => Err(PlacesError::MalformedResponse(detail)),
        }
    }

    async fn remember(&self, criteria: &SearchCriteria, reply: &str) {
        if let Some(cache) = &self.cache {
            cache.store(criteria, reply).await;
        }
    }
}
