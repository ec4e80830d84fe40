use serde::{Deserialize, Serialize};

/// Event kind carrying AMB learning-resource metadata. Replaceable: the
/// latest event per (pubkey, d) supersedes all earlier ones.
pub const LEARNING_RESOURCE_KIND: u32 = 30142;

/// A signed event as it arrives from the relay transport.
///
/// Events are immutable; a resource update is a brand-new event with the same
/// `d` tag and author. The wire form is preserved losslessly via
/// [`Event::to_raw`] so indexed documents can hand back the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event id (hex hash over the serialized event)
    pub id: String,

    /// Author public key (hex)
    pub pubkey: String,

    /// Creation timestamp, unix seconds
    pub created_at: i64,

    /// Declared event kind
    pub kind: u32,

    /// Tag list; each tag is a list of strings, first element is the name
    pub tags: Vec<Vec<String>>,

    /// Event content (JSON-serialized AMB metadata for kind 30142)
    pub content: String,

    /// Signature over the event id (hex)
    pub sig: String,
}

impl Event {
    /// Value of the first tag with the given name, if any.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.first().map(String::as_str) == Some(name))
            .and_then(|tag| tag.get(1))
            .map(String::as_str)
    }

    /// The stable slug distinguishing resources by the same author.
    pub fn d_tag(&self) -> Option<&str> {
        self.tag_value("d")
    }

    /// Parse an event from its raw JSON serialization.
    pub fn from_raw(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Canonical JSON serialization, as embedded in indexed documents.
    pub fn to_raw(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: "e1".to_string(),
            pubkey: "pk1".to_string(),
            created_at: 1_700_000_000,
            kind: LEARNING_RESOURCE_KIND,
            tags: vec![
                vec!["d".to_string(), "lesson-1".to_string()],
                vec!["t".to_string(), "math".to_string()],
            ],
            content: "{}".to_string(),
            sig: "sig1".to_string(),
        }
    }

    #[test]
    fn d_tag_returns_first_d() {
        let mut event = sample_event();
        assert_eq!(event.d_tag(), Some("lesson-1"));

        event.tags.push(vec!["d".to_string(), "lesson-2".to_string()]);
        assert_eq!(event.d_tag(), Some("lesson-1"));
    }

    #[test]
    fn d_tag_missing() {
        let mut event = sample_event();
        event.tags.clear();
        assert_eq!(event.d_tag(), None);
    }

    #[test]
    fn raw_round_trip() {
        let event = sample_event();
        let raw = event.to_raw().unwrap();
        let back = Event::from_raw(&raw).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn from_raw_rejects_garbage() {
        assert!(Event::from_raw("not json").is_err());
        assert!(Event::from_raw("{\"id\":\"x\"}").is_err());
    }
}
