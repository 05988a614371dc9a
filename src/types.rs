//! Core data types used throughout genmedia.
//!
//! This module defines the tool definition handed to the orchestrator and
//! the normalized results every adapter returns, whatever the provider's
//! own response looked like.

use serde::{Deserialize, Serialize};

// --- Tool Definition ---

/// Describes a tool's interface to the orchestrating model via JSON Schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool's identifier (must match what the tool reports)
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON Schema describing the tool's input parameters
    pub input_schema: serde_json::Value,
}

// --- Normalized Results ---

/// The provider-agnostic result of one tool invocation.
///
/// Serialized with a `kind` tag and camelCase fields, which is the form
/// the UI renders. Optional metadata is omitted when the provider did
/// not report it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedResult {
    Image(ImageResult),
    ImageSet(ImageSetResult),
    Video(VideoResult),
    Audio(AudioResult),
    Placeholder(PlaceholderResult),
}

impl NormalizedResult {
    /// The provider route that produced this result.
    pub fn source(&self) -> &str {
        match self {
            NormalizedResult::Image(r) => &r.source,
            NormalizedResult::ImageSet(r) => &r.source,
            NormalizedResult::Video(r) => &r.source,
            NormalizedResult::Audio(r) => &r.source,
            NormalizedResult::Placeholder(r) => &r.source,
        }
    }

    /// Every resource locator in the result, in order.
    pub fn urls(&self) -> Vec<&str> {
        match self {
            NormalizedResult::Image(r) => vec![r.url.as_str()],
            NormalizedResult::ImageSet(r) => r.images.iter().map(|i| i.url.as_str()).collect(),
            NormalizedResult::Video(r) => vec![r.url.as_str()],
            NormalizedResult::Audio(r) => vec![r.url.as_str()],
            NormalizedResult::Placeholder(r) => vec![r.url.as_str()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub url: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Prompt the image was generated from, when applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub source: String,
}

impl ImageResult {
    pub fn new(url: impl Into<String>, content_type: impl Into<String>, source: &str) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.into(),
            width: None,
            height: None,
            file_size: None,
            file_name: None,
            prompt: None,
            seed: None,
            source: source.to_string(),
        }
    }
}

/// One entry of an image set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSetResult {
    pub images: Vec<ImageEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of provider entries dropped for lacking a URL
    #[serde(default, skip_serializing_if = "is_zero")]
    pub dropped: usize,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub url: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioResult {
    pub url: String,
    pub content_type: String,
    /// Length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderResult {
    pub url: String,
    pub alt: String,
    pub source: String,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_result_serialization() {
        let result = NormalizedResult::Image(ImageResult::new(
            "https://y/out.png",
            "image/png",
            "fal-ai/bria/background/remove",
        ));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "kind": "image",
                "url": "https://y/out.png",
                "contentType": "image/png",
                "source": "fal-ai/bria/background/remove"
            })
        );
    }

    #[test]
    fn test_image_set_hides_zero_dropped() {
        let mut set = ImageSetResult {
            images: vec![ImageEntry {
                url: "https://y/1.png".into(),
                content_type: None,
                file_name: None,
            }],
            description: None,
            dropped: 0,
            source: "fal-ai/recraft/v3/text-to-image".into(),
        };
        let value = serde_json::to_value(NormalizedResult::ImageSet(set.clone())).unwrap();
        assert_eq!(value["kind"], "image_set");
        assert!(value.get("dropped").is_none());
        assert_eq!(value["images"][0], json!({ "url": "https://y/1.png" }));

        set.dropped = 2;
        let value = serde_json::to_value(NormalizedResult::ImageSet(set)).unwrap();
        assert_eq!(value["dropped"], 2);
    }

    #[test]
    fn test_source_and_urls() {
        let result = NormalizedResult::Audio(AudioResult {
            url: "https://y/a.mp3".into(),
            content_type: "audio/mpeg".into(),
            duration: Some(12.5),
            file_name: None,
            file_size: None,
            source: "fal-ai/playai/tts/dialog".into(),
        });
        assert_eq!(result.source(), "fal-ai/playai/tts/dialog");
        assert_eq!(result.urls(), vec!["https://y/a.mp3"]);
    }
}
