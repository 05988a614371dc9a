//! Text-to-image with style and colors (Recraft V3).
//!
//! Returns bare image URLs; this provider reports no per-image metadata.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{str_field, Tool};
use crate::error::ToolError;
use crate::invoker::{Payload, ProviderInvoker};
use crate::schema::{Field, Schema, Shape};
use crate::types::{ImageEntry, ImageSetResult, NormalizedResult};

const ROUTE: &str = "fal-ai/recraft/v3/text-to-image";

/// One RGB triple.
const COLOR: Shape = Shape::Tuple(&[Shape::INTEGER, Shape::INTEGER, Shape::INTEGER]);

static SCHEMA: Schema = Schema {
    fields: &[
        Field::required("prompt", Shape::String, "Text description of the image"),
        Field::optional(
            "image_size",
            Shape::String,
            "Size preset such as square_hd or landscape_4_3",
        ),
        Field::optional("style", Shape::String, "Style such as realistic_image"),
        Field::optional(
            "colors",
            Shape::Array {
                item: &COLOR,
                min: None,
                max: None,
            },
            "Preferred colors as [r, g, b] triples",
        ),
        Field::optional("style_id", Shape::String, "Custom style reference"),
        Field::optional(
            "enable_safety_checker",
            Shape::Boolean,
            "Run the provider's safety checker",
        ),
    ],
};

#[derive(Debug, Default, Deserialize)]
struct Input {
    prompt: String,
    image_size: Option<String>,
    style: Option<String>,
    colors: Option<Vec<[i64; 3]>>,
    style_id: Option<String>,
    enable_safety_checker: Option<bool>,
}

fn build_payload(input: &Input) -> Payload {
    let mut payload = Payload::new();
    payload.insert("prompt".into(), json!(input.prompt));
    if let Some(image_size) = &input.image_size {
        payload.insert("image_size".into(), json!(image_size));
    }
    if let Some(style) = &input.style {
        payload.insert("style".into(), json!(style));
    }
    if let Some(colors) = &input.colors {
        payload.insert("colors".into(), json!(colors));
    }
    if let Some(style_id) = &input.style_id {
        payload.insert("style_id".into(), json!(style_id));
    }
    if let Some(enable) = input.enable_safety_checker {
        payload.insert("enable_safety_checker".into(), json!(enable));
    }
    payload
}

fn normalize(body: &Value) -> Result<NormalizedResult, ToolError> {
    let raw = body
        .get("images")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    let images: Vec<ImageEntry> = raw
        .iter()
        .filter_map(|img| str_field(img, "url"))
        .map(|url| ImageEntry {
            url,
            content_type: None,
            file_name: None,
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
        description: None,
        source: ROUTE.to_string(),
    }))
}

pub struct RecraftV3TextToImageTool;

#[async_trait]
impl Tool for RecraftV3TextToImageTool {
    fn name(&self) -> &str {
        "recraftV3TextToImage"
    }

    fn description(&self) -> &str {
        "Generate images from text using Recraft V3. \
         Optionally control size, style, colors, and safety checker."
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
