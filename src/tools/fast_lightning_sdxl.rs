//! Fast image generation (Fast Lightning SDXL).
//!
//! The provider is always asked for one square-HD JPEG in four inference
//! steps with the safety checker on. Only the first returned image is used.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{str_field, u64_field, Tool};
use crate::error::ToolError;
use crate::invoker::{Payload, ProviderInvoker};
use crate::schema::{Field, Schema, Shape};
use crate::types::{ImageResult, NormalizedResult};

const ROUTE: &str = "fal-ai/fast-lightning-sdxl";
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

const IMAGE_SIZE: &str = "square_hd";
const INFERENCE_STEPS: u32 = 4;
const OUTPUT_FORMAT: &str = "jpeg";

static SCHEMA: Schema = Schema {
    fields: &[
        Field::required("prompt", Shape::String, "Text description of the image"),
        Field::optional(
            "seed",
            Shape::INTEGER,
            "Seed for reproducible generations",
        ),
        Field::optional(
            "sync_mode",
            Shape::Boolean,
            "Wait for the upload and return the image directly",
        ),
    ],
};

#[derive(Debug, Deserialize)]
struct Input {
    prompt: String,
    seed: Option<i64>,
    sync_mode: Option<bool>,
}

fn build_payload(input: &Input) -> Payload {
    let mut payload = Payload::new();
    payload.insert("prompt".into(), json!(input.prompt));
    payload.insert("image_size".into(), json!(IMAGE_SIZE));
    payload.insert("num_inference_steps".into(), json!(INFERENCE_STEPS));
    payload.insert("enable_safety_checker".into(), json!(true));
    payload.insert("format".into(), json!(OUTPUT_FORMAT));
    if let Some(seed) = input.seed {
        payload.insert("seed".into(), json!(seed));
    }
    if let Some(sync_mode) = input.sync_mode {
        payload.insert("sync_mode".into(), json!(sync_mode));
    }
    payload
}

fn normalize(body: &Value, input: &Input) -> Result<NormalizedResult, ToolError> {
    let first = body
        .get("images")
        .and_then(|v| v.as_array())
        .and_then(|images| images.first())
        .unwrap_or(&Value::Null);
    let url = str_field(first, "url").ok_or(ToolError::ResponseShape {
        expected: "an image URL",
    })?;

    let mut result = ImageResult::new(
        url,
        str_field(first, "content_type").unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        ROUTE,
    );
    result.width = u64_field(first, "width");
    result.height = u64_field(first, "height");
    result.prompt = Some(str_field(body, "prompt").unwrap_or_else(|| input.prompt.clone()));
    result.seed = u64_field(body, "seed");
    Ok(NormalizedResult::Image(result))
}

pub struct FastLightningSdxlTool;

#[async_trait]
impl Tool for FastLightningSdxlTool {
    fn name(&self) -> &str {
        "fastLightningSDXL"
    }

    fn description(&self) -> &str {
        "Generate an image from a text prompt with Fast Lightning SDXL. \
         Returns one square JPEG. Render the resulting image URL using markdown."
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
