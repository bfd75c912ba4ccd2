use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node of the context graph: a short piece of text with tags.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Provenance attached to a link by whoever created it.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct LinkMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Origin of the link, e.g. "user" or "tool".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A directed, optionally bidirectional relationship between two contexts.
///
/// `strength` and `metadata.confidence` are optional; a missing value means
/// "no information" and is never read as zero by the navigation score.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation: String,
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LinkMetadata>,
}

impl Context {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

impl Link {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation: relation.into(),
            bidirectional: false,
            strength: None,
            metadata: None,
        }
    }

    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.metadata.get_or_insert_with(LinkMetadata::default).confidence = Some(confidence);
        self
    }

    pub fn with_provenance(mut self, source: impl Into<String>) -> Self {
        self.metadata.get_or_insert_with(LinkMetadata::default).source = Some(source.into());
        self
    }

    pub fn confidence(&self) -> Option<f32> {
        self.metadata.as_ref().and_then(|meta| meta.confidence)
    }

    pub fn provenance(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|meta| meta.source.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_deserializes_store_json_shape() {
        let raw = r#"{
            "id": "link1",
            "sourceId": "ctx1",
            "targetId": "ctx2",
            "relation": "related",
            "bidirectional": true,
            "strength": 0.8,
            "metadata": {"confidence": 0.9, "source": "test", "timestamp": "2024-01-01"}
        }"#;

        let link: Link = serde_json::from_str(raw).unwrap();
        assert_eq!(link.source_id, "ctx1");
        assert!(link.bidirectional);
        assert_eq!(link.strength, Some(0.8));
        assert_eq!(link.confidence(), Some(0.9));
        assert_eq!(link.provenance(), Some("test"));
    }

    #[test]
    fn missing_strength_and_metadata_stay_absent() {
        let link: Link = serde_json::from_str(
            r#"{"id":"l","sourceId":"a","targetId":"b","relation":"r"}"#,
        )
        .unwrap();
        assert!(!link.bidirectional);
        assert_eq!(link.strength, None);
        assert_eq!(link.confidence(), None);

        let encoded = serde_json::to_string(&link).unwrap();
        assert!(!encoded.contains("strength"));
        assert!(!encoded.contains("metadata"));
    }
}
