//! Collection schema definitions

use serde::{Deserialize, Serialize};

/// Body of a collection-creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<Field>,
    pub default_sorting_field: String,
    pub enable_nested_fields: bool,
}

/// One field declaration in a collection schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub facet: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl Field {
    fn required(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            facet: false,
            optional: false,
        }
    }

    fn optional(name: &str, field_type: &str) -> Self {
        Self {
            optional: true,
            ..Self::required(name, field_type)
        }
    }
}

/// The learning-resource collection schema: the AMB field set, the `d` slug,
/// and the embedded event envelope. `eventCreatedAt` orders results by
/// resource version; nested fields are enabled for the object-typed AMB
/// attributes.
pub fn learning_resource_schema(name: &str) -> CollectionSchema {
    CollectionSchema {
        name: name.to_string(),
        fields: vec![
            // Base information ("id" is the store's reserved document-id
            // field and must not be declared)
            Field::required("d", "string"),
            Field::required("type", "string"),
            Field::required("name", "string"),
            Field::optional("description", "string"),
            Field::optional("about", "object[]"),
            Field::optional("keywords", "string[]"),
            Field::optional("inLanguage", "string[]"),
            Field::optional("image", "string"),
            Field::optional("trailer", "object[]"),
            // Provenance
            Field::optional("creator", "object[]"),
            Field::optional("contributor", "object[]"),
            Field::optional("dateCreated", "string"),
            Field::optional("datePublished", "string"),
            Field::optional("dateModified", "string"),
            Field::optional("publisher", "object[]"),
            Field::optional("funder", "object[]"),
            // Costs and rights
            Field::optional("isAccessibleForFree", "bool"),
            Field::optional("license", "object"),
            Field::optional("conditionsOfAccess", "object"),
            // Educational metadata
            Field::optional("learningResourceType", "object[]"),
            Field::optional("audience", "object[]"),
            Field::optional("teaches", "object[]"),
            Field::optional("assesses", "object[]"),
            Field::optional("competencyRequired", "object[]"),
            Field::optional("educationalLevel", "object[]"),
            Field::optional("interactivityType", "object"),
            // Relations
            Field::optional("isBasedOn", "object[]"),
            Field::optional("isPartOf", "object[]"),
            Field::optional("hasPart", "object[]"),
            // Technical
            Field::optional("duration", "string"),
            // Event envelope
            Field::required("eventID", "string"),
            Field::required("eventKind", "int32"),
            Field::required("eventPubKey", "string"),
            Field::required("eventSignature", "string"),
            Field::required("eventCreatedAt", "int64"),
            Field::required("eventContent", "string"),
            Field::required("eventRaw", "string"),
        ],
        default_sorting_field: "eventCreatedAt".to_string(),
        enable_nested_fields: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_natural_key_and_sort_field() {
        let schema = learning_resource_schema("test");
        assert_eq!(schema.default_sorting_field, "eventCreatedAt");
        assert!(schema.enable_nested_fields);

        let field = |name: &str| schema.fields.iter().find(|f| f.name == name).unwrap();
        assert!(!field("d").optional);
        assert!(!field("eventPubKey").optional);
        assert_eq!(field("eventCreatedAt").field_type, "int64");
        assert!(field("license").optional);
    }

    #[test]
    fn optional_and_facet_flags_are_omitted_when_false() {
        let json = serde_json::to_value(Field::required("d", "string")).unwrap();
        assert!(json.get("optional").is_none());
        assert!(json.get("facet").is_none());

        let json = serde_json::to_value(Field::optional("license", "object")).unwrap();
        assert_eq!(json["optional"], true);
    }
}
