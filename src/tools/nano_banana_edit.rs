//! Multi-image edit (Google Nano Banana).
//!
//! Several input images plus one prompt in, one or more edited images and
//! a descriptive text out. Entries without a URL are dropped; the call
//! only fails when nothing usable remains.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{str_field, Tool};
use crate::error::ToolError;
use crate::invoker::{Payload, ProviderInvoker};
use crate::schema::{Field, Schema, Shape};
use crate::types::{ImageEntry, ImageSetResult, NormalizedResult};

const ROUTE: &str = "fal-ai/nano-banana/edit";
const OUTPUT_FORMATS: &[&str] = &["jpeg", "png"];

static SCHEMA: Schema = Schema {
    fields: &[
        Field::required("prompt", Shape::String, "How the images should be edited"),
        Field::required(
            "image_urls",
            Shape::Array {
                item: &Shape::String,
                min: Some(1),
                max: None,
            },
            "URLs of the images to edit",
        ),
        Field::optional(
            "num_images",
            Shape::Integer {
                min: Some(1),
                max: Some(4),
            },
            "How many edited images to return",
        ),
        Field::optional(
            "output_format",
            Shape::Enum(OUTPUT_FORMATS),
            "Image format of the results",
        ),
        Field::optional(
            "sync_mode",
            Shape::Boolean,
            "Wait for the upload and return the images directly",
        ),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Input {
    prompt: String,
    image_urls: Vec<String>,
    num_images: Option<u8>,
    output_format: Option<OutputFormat>,
    sync_mode: Option<bool>,
}

fn build_payload(input: &Input) -> Payload {
    let mut payload = Payload::new();
    payload.insert("prompt".into(), json!(input.prompt));
    payload.insert("image_urls".into(), json!(input.image_urls));
    if let Some(num_images) = input.num_images {
        payload.insert("num_images".into(), json!(num_images));
    }
    if let Some(format) = input.output_format {
        payload.insert("output_format".into(), json!(format.as_str()));
    }
    if let Some(sync_mode) = input.sync_mode {
        payload.insert("sync_mode".into(), json!(sync_mode));
    }
    payload
}

fn normalize(body: &Value, input: &Input) -> Result<NormalizedResult, ToolError> {
    // Without an explicit png request the provider produces jpeg.
    let fallback_type = input
        .output_format
        .unwrap_or(OutputFormat::Jpeg)
        .content_type();

    let raw = body
        .get("images")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    let images: Vec<ImageEntry> = raw
        .iter()
        .filter_map(|img| {
            let url = str_field(img, "url")?;
            Some(ImageEntry {
                url,
                content_type: Some(
                    str_field(img, "content_type").unwrap_or_else(|| fallback_type.to_string()),
                ),
                file_name: str_field(img, "file_name"),
            })
        })
        .collect();

    if images.is_empty() {
        return Err(ToolError::ResponseShape {
            expected: "any image URLs",
        });
    }

    Ok(NormalizedResult::ImageSet(ImageSetResult {
        dropped: raw.len() - images.len(),
        images,
        description: str_field(body, "description"),
        source: ROUTE.to_string(),
    }))
}

pub struct NanoBananaEditTool;

#[async_trait]
impl Tool for NanoBananaEditTool {
    fn name(&self) -> &str {
        "nanoBananaEdit"
    }

    fn description(&self) -> &str {
        "Edit images with Google Nano Banana. Accepts multiple input image URLs and a \
         text prompt. Returns one or more edited image URLs plus a descriptive text. \
         Render resulting images using markdown."
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
        normalize(&body, &input)
    }
}
