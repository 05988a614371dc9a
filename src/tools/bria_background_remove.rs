//! Background removal (Bria RMBG 2.0).
//!
//! Takes one image URL and returns a single PNG with a transparent
//! background.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{str_field, u64_field, Tool};
use crate::error::ToolError;
use crate::invoker::{Payload, ProviderInvoker};
use crate::schema::{Field, Schema, Shape};
use crate::types::{ImageResult, NormalizedResult};

const ROUTE: &str = "fal-ai/bria/background/remove";
const DEFAULT_CONTENT_TYPE: &str = "image/png";

static SCHEMA: Schema = Schema {
    fields: &[
        Field::required("image_url", Shape::String, "URL of the image to cut out"),
        Field::optional(
            "sync_mode",
            Shape::Boolean,
            "Wait for the upload and return the image directly",
        ),
    ],
};

#[derive(Debug, Deserialize)]
struct Input {
    image_url: String,
    sync_mode: Option<bool>,
}

fn build_payload(input: &Input) -> Payload {
    let mut payload = Payload::new();
    payload.insert("image_url".into(), json!(input.image_url));
    if let Some(sync_mode) = input.sync_mode {
        payload.insert("sync_mode".into(), json!(sync_mode));
    }
    payload
}

fn normalize(body: &Value) -> Result<NormalizedResult, ToolError> {
    let image = body.get("image").unwrap_or(&Value::Null);
    let url = str_field(image, "url").ok_or(ToolError::ResponseShape {
        expected: "an image URL",
    })?;

    let mut result = ImageResult::new(
        url,
        str_field(image, "content_type").unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        ROUTE,
    );
    result.file_name = str_field(image, "file_name");
    result.width = u64_field(image, "width");
    result.height = u64_field(image, "height");
    result.file_size = u64_field(image, "file_size");
    Ok(NormalizedResult::Image(result))
}

pub struct BriaBackgroundRemoveTool;

#[async_trait]
impl Tool for BriaBackgroundRemoveTool {
    fn name(&self) -> &str {
        "briaBackgroundRemove"
    }

    fn description(&self) -> &str {
        "Remove background from an image using Bria RMBG 2.0. \
         Returns a PNG with transparent background."
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    async fn invoke(
        &self,
        invoker: &ProviderInvoker,
        args: Value,
    ) -> Result<NormalizedResult, ToolError> {
        let input: Input = SCHEMA.parse(self.name(), &args)?;
        let body = invoker.call(ROUTE, &build_payload(&input)).await?;
        normalize(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::invoker::testing::*;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    #[test]
    fn test_end_to_end() {
        rt().block_on(async {
            let transport = RecordingTransport::replying(json!({
                "image": { "url": "https://y/out.png" }
            }));
            let result = BriaBackgroundRemoveTool
                .invoke(
                    &invoker_with(keyed_config(), &transport),
                    json!({ "image_url": "https://x/a.png" }),
                )
                .await
                .unwrap();

            assert_eq!(
                result,
                NormalizedResult::Image(ImageResult::new(
                    "https://y/out.png",
                    "image/png",
                    "fal-ai/bria/background/remove"
                ))
            );
            let calls = transport.calls();
            assert_eq!(calls[0].url, "https://fal.run/fal-ai/bria/background/remove");
            assert_eq!(
                Value::Object(calls[0].payload.clone()),
                json!({ "image_url": "https://x/a.png" })
            );
        });
    }

    #[test]
    fn test_provider_error() {
        rt().block_on(async {
            let transport = RecordingTransport::failing(TransportError::Status {
                status: 500,
                message: "rate limited".to_string(),
            });
            let err = BriaBackgroundRemoveTool
                .invoke(
                    &invoker_with(keyed_config(), &transport),
                    json!({ "image_url": "https://x/a.png" }),
                )
                .await
                .unwrap_err();
            match err {
                ToolError::Transport(TransportError::Status { status, message }) => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "rate limited");
                }
                other => panic!("unexpected error: {:?}", other),
            }
        });
    }

    #[test]
    fn test_missing_image_url_never_reaches_provider() {
        rt().block_on(async {
            let transport = RecordingTransport::replying(json!({}));
            let err = BriaBackgroundRemoveTool
                .invoke(&invoker_with(keyed_config(), &transport), json!({ "sync_mode": true }))
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::Validation(ref v) if v.mentions("image_url")));
            assert_eq!(transport.call_count(), 0);
        });
    }

    #[test]
    fn test_missing_credential_never_reaches_provider() {
        rt().block_on(async {
            let transport = RecordingTransport::replying(json!({}));
            let err = BriaBackgroundRemoveTool
                .invoke(
                    &invoker_with(keyless_config(), &transport),
                    json!({ "image_url": "https://x/a.png" }),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::Configuration(_)));
            assert_eq!(transport.call_count(), 0);
        });
    }

    #[test]
    fn test_optional_field_inclusion() {
        let without = build_payload(&Input {
            image_url: "u".into(),
            sync_mode: None,
        });
        assert!(!without.contains_key("sync_mode"));

        let with_false = build_payload(&Input {
            image_url: "u".into(),
            sync_mode: Some(false),
        });
        assert_eq!(with_false["sync_mode"], json!(false));
    }

    #[test]
    fn test_metadata_passes_through() {
        let result = normalize(&json!({
            "image": {
                "url": "https://y/out.png",
                "content_type": "image/webp",
                "file_name": "out.webp",
                "width": 1024,
                "height": 768,
                "file_size": 4096
            }
        }))
        .unwrap();
        let NormalizedResult::Image(image) = result else {
            panic!("expected an image");
        };
        assert_eq!(image.content_type, "image/webp");
        assert_eq!(image.file_name.as_deref(), Some("out.webp"));
        assert_eq!(image.width, Some(1024));
        assert_eq!(image.height, Some(768));
        assert_eq!(image.file_size, Some(4096));
    }

    #[test]
    fn test_missing_url_is_shape_error() {
        for body in [
            json!({}),
            json!({ "image": null }),
            json!({ "image": { "content_type": "image/png" } }),
            json!({ "image": { "url": "" } }),
        ] {
            let err = normalize(&body).unwrap_err();
            assert_eq!(err.to_string(), "FAL response did not include an image URL");
        }
    }
}
