//! Mapping between (resource, event) pairs and the flat indexed document

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::{IndexError, IndexResult};
use crate::models::{AmbResource, Event};

/// The flat document shape stored in the search engine: the AMB metadata
/// fields at the top level, the `d` slug, and the originating event's
/// envelope embedded under `event*` names.
///
/// `eventRaw` carries the full canonical serialization of the event so
/// search results can hand back the original losslessly; the index never
/// stores the origin wire format anywhere else. The envelope is immutable
/// and replaced wholesale when a resource is updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ResourceDocument {
    /// Stable author-chosen slug; with `eventPubKey` forms the natural key
    #[validate(length(min = 1))]
    pub d: String,

    #[serde(flatten)]
    #[validate(nested)]
    pub resource: AmbResource,

    #[serde(rename = "eventID")]
    #[validate(length(min = 1))]
    pub event_id: String,

    #[serde(rename = "eventKind")]
    pub event_kind: u32,

    #[serde(rename = "eventPubKey")]
    #[validate(length(min = 1))]
    pub event_pub_key: String,

    #[serde(rename = "eventSignature")]
    #[validate(length(min = 1))]
    pub event_signature: String,

    /// Creation timestamp in unix seconds; the collection's default sorting
    /// field, so the type must stay in sync with the schema definition.
    #[serde(rename = "eventCreatedAt")]
    pub event_created_at: i64,

    #[serde(rename = "eventContent")]
    pub event_content: String,

    #[serde(rename = "eventRaw")]
    #[validate(length(min = 1))]
    pub event_raw: String,
}

impl ResourceDocument {
    /// Build a document from already-parsed metadata plus its originating
    /// event. Fails if the event carries no `d` tag.
    pub fn new(resource: AmbResource, event: &Event) -> IndexResult<Self> {
        let d = event
            .d_tag()
            .ok_or_else(|| IndexError::SchemaViolation("event has no d tag".to_string()))?
            .to_string();

        Ok(Self {
            d,
            resource,
            event_id: event.id.clone(),
            event_kind: event.kind,
            event_pub_key: event.pubkey.clone(),
            event_signature: event.sig.clone(),
            event_created_at: event.created_at,
            event_content: event.content.clone(),
            event_raw: event.to_raw()?,
        })
    }

    /// Build a document straight from an event, parsing its content as AMB
    /// metadata.
    pub fn from_event(event: &Event) -> IndexResult<Self> {
        let resource: AmbResource = serde_json::from_str(&event.content).map_err(|err| {
            IndexError::SchemaViolation(format!("event content is not AMB metadata: {}", err))
        })?;
        Self::new(resource, event)
    }

    /// Reconstruct the original event from the embedded raw serialization.
    pub fn into_event(self) -> IndexResult<Event> {
        Event::from_raw(&self.event_raw)
            .map_err(|err| IndexError::Decode(format!("embedded eventRaw is corrupt: {}", err)))
    }

    /// Split the document back into the metadata and the original event.
    pub fn into_parts(self) -> IndexResult<(AmbResource, Event)> {
        let event = Event::from_raw(&self.event_raw)
            .map_err(|err| IndexError::Decode(format!("embedded eventRaw is corrupt: {}", err)))?;
        Ok((self.resource, event))
    }

    /// Check the fields the collection schema marks required, before any
    /// write is attempted.
    pub fn check_required_fields(&self) -> IndexResult<()> {
        self.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LEARNING_RESOURCE_KIND;

    fn sample_event(content: &str) -> Event {
        Event {
            id: "e1".to_string(),
            pubkey: "pk1".to_string(),
            created_at: 1_700_000_000,
            kind: LEARNING_RESOURCE_KIND,
            tags: vec![vec!["d".to_string(), "lesson-1".to_string()]],
            content: content.to_string(),
            sig: "sig1".to_string(),
        }
    }

    fn sample_resource() -> AmbResource {
        let mut resource = AmbResource::new("LearningResource", "Intro");
        resource.description = Some("An introduction".to_string());
        resource.in_language = Some(vec!["en".to_string()]);
        resource
    }

    #[test]
    fn round_trip_restores_resource_and_event() {
        let resource = sample_resource();
        let event = sample_event(&serde_json::to_string(&resource).unwrap());

        let doc = ResourceDocument::new(resource.clone(), &event).unwrap();
        let (resource_back, event_back) = doc.into_parts().unwrap();

        assert_eq!(resource_back, resource);
        assert_eq!(event_back, event);
    }

    #[test]
    fn document_serializes_flat() {
        let resource = sample_resource();
        let event = sample_event(&serde_json::to_string(&resource).unwrap());
        let doc = ResourceDocument::new(resource, &event).unwrap();

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["d"], "lesson-1");
        assert_eq!(json["name"], "Intro");
        assert_eq!(json["eventPubKey"], "pk1");
        assert_eq!(json["eventCreatedAt"], 1_700_000_000_i64);
        assert!(json["eventRaw"].is_string());
        // optional AMB fields absent from the source stay absent
        assert!(json.get("license").is_none());
    }

    #[test]
    fn missing_d_tag_is_a_schema_violation() {
        let mut event = sample_event("{\"type\":\"LearningResource\",\"name\":\"x\"}");
        event.tags.clear();

        let err = ResourceDocument::from_event(&event).unwrap_err();
        assert!(matches!(err, IndexError::SchemaViolation(_)));
    }

    #[test]
    fn malformed_content_is_a_schema_violation() {
        let event = sample_event("not json at all");
        let err = ResourceDocument::from_event(&event).unwrap_err();
        assert!(matches!(err, IndexError::SchemaViolation(_)));
    }

    #[test]
    fn empty_required_field_fails_validation() {
        let resource = AmbResource::new("LearningResource", "");
        let event = sample_event("{}");
        let doc = ResourceDocument::new(resource, &event).unwrap();

        let err = doc.check_required_fields().unwrap_err();
        assert!(matches!(err, IndexError::SchemaViolation(_)));
    }

    #[test]
    fn corrupt_event_raw_is_a_decode_error() {
        let resource = sample_resource();
        let event = sample_event(&serde_json::to_string(&resource).unwrap());
        let mut doc = ResourceDocument::new(resource, &event).unwrap();
        doc.event_raw = "{broken".to_string();

        assert!(matches!(doc.into_event(), Err(IndexError::Decode(_))));
    }
}
