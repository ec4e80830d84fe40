//! Decoding store search responses back into events

use serde::Deserialize;
use tracing::warn;

use super::document::ResourceDocument;
use super::error::IndexResult;
use crate::models::Event;

/// Search response envelope as the document store returns it.
#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    found: u64,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// A single hit. A missing or malformed `document` is a structural contract
/// violation and fails the whole response, not just the hit.
#[derive(Debug, Deserialize)]
struct RawHit {
    document: ResourceDocument,
}

/// The decoded result of one search call: reconstructed events in store
/// order, plus how many hits were dropped because their embedded raw event
/// could not be reconstructed.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub events: Vec<Event>,
    pub skipped: usize,
    pub found: u64,
}

/// Parse a raw search response body into the original events.
///
/// Top-level malformed JSON is a hard `DecodeError`. A hit whose embedded
/// `eventRaw` is corrupt is skipped with a warning; partial results are
/// preferred over failing the whole call.
pub fn parse_search_response(body: &[u8]) -> IndexResult<SearchOutcome> {
    let response: RawSearchResponse = serde_json::from_slice(body)?;

    let mut events = Vec::with_capacity(response.hits.len());
    let mut skipped = 0usize;

    for hit in response.hits {
        let event_id = hit.document.event_id.clone();
        match hit.document.into_event() {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!(event_id = %event_id, error = %err, "skipping unreconstructible search hit");
                skipped += 1;
            }
        }
    }

    Ok(SearchOutcome {
        events,
        skipped,
        found: response.found,
    })
}
