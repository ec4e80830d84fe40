use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// AMB ("Allgemeines Metadatenprofil für Bildungsressourcen") metadata for
/// one learning resource, parsed from the content of a kind-30142 event.
///
/// Field names follow the AMB wire form (camelCase). Optional fields are
/// omitted from serialized documents when absent, never null-padded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AmbResource {
    /// Canonical resource URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Resource type, e.g. "LearningResource"
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub resource_type: String,

    /// Human-readable title
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Subject classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<Vec<Concept>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_language: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<Vec<MediaObject>>,

    // Provenance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Vec<Agent>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<Vec<Agent>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Vec<Agent>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funder: Option<Vec<Agent>>,

    // Costs and rights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_accessible_for_free: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions_of_access: Option<Concept>,

    // Educational metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_resource_type: Option<Vec<Concept>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Vec<Concept>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaches: Option<Vec<Concept>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assesses: Option<Vec<Concept>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competency_required: Option<Vec<Concept>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_level: Option<Vec<Concept>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactivity_type: Option<Concept>,

    // Relations to other resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_based_on: Option<Vec<RelatedResource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<Vec<RelatedResource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_part: Option<Vec<RelatedResource>>,

    // Technical
    /// ISO 8601 duration, e.g. "PT2H30M"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl AmbResource {
    /// Minimal resource with only the required fields set.
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            resource_type: resource_type.into(),
            name: name.into(),
            description: None,
            about: None,
            keywords: None,
            in_language: None,
            image: None,
            trailer: None,
            creator: None,
            contributor: None,
            date_created: None,
            date_published: None,
            date_modified: None,
            publisher: None,
            funder: None,
            is_accessible_for_free: None,
            license: None,
            conditions_of_access: None,
            learning_resource_type: None,
            audience: None,
            teaches: None,
            assesses: None,
            competency_required: None,
            educational_level: None,
            interactivity_type: None,
            is_based_on: None,
            is_part_of: None,
            has_part: None,
            duration: None,
        }
    }
}

/// A person or organization (creator, contributor, publisher, funder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A controlled-vocabulary concept (about, audience, educational level, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub concept_type: Option<String>,

    /// Language-tagged labels, e.g. {"de": "Mathematik", "en": "Mathematics"}
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<BTreeMap<String, String>>,
}

/// A license reference; AMB licenses are identified by URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: String,
}

/// An embedded media object (trailer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
}

/// A link to another resource (isBasedOn, isPartOf, hasPart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
