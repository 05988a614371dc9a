//! Tool Adapter module.
//!
//! This module defines the `Tool` trait that every provider adapter
//! implements. An adapter is a fixed pipeline:
//!
//! 1. validate the raw arguments against its static `Schema`
//! 2. build the provider payload (optional fields only when present)
//! 3. POST it through the shared `ProviderInvoker`
//! 4. normalize the provider's response into a `NormalizedResult`
//!
//! Steps 1 and 4 are per provider: providers disagree on response shape,
//! so each adapter owns its own extraction rules.

pub mod bria_background_remove;
pub mod fal_placeholder;
pub mod fast_lightning_sdxl;
pub mod fast_svd_lcm;
pub mod nano_banana_edit;
pub mod playai_tts_dialog;
pub mod recraft_v3_text_to_image;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolError;
use crate::invoker::ProviderInvoker;
use crate::schema::Schema;
use crate::types::{NormalizedResult, ToolDefinition};

/// Identifiers of every built-in adapter, in registration order.
pub const BUILTIN_TOOLS: &[&str] = &[
    "falAI",
    "fastLightningSDXL",
    "fastSvdLcm",
    "nanoBananaEdit",
    "briaBackgroundRemove",
    "playaiTtsDialog",
    "recraftV3TextToImage",
];

/// Trait that all provider adapters implement.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The registry identifier of this tool (e.g. "fastSvdLcm").
    fn name(&self) -> &str;

    /// Capability summary the orchestrating model reads to pick a tool.
    fn description(&self) -> &str;

    /// Declared argument shape, used for validation and for the definition.
    fn schema(&self) -> &'static Schema;

    /// JSON Schema describing the tool's input parameters.
    fn parameters_schema(&self) -> Value {
        self.schema().to_json_schema()
    }

    /// Run one invocation: validate, build, call, normalize.
    async fn invoke(
        &self,
        invoker: &ProviderInvoker,
        args: Value,
    ) -> Result<NormalizedResult, ToolError>;

    /// Convert this tool into a ToolDefinition for the orchestrator.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

/// Instantiate every built-in adapter.
pub fn builtin_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(fal_placeholder::FalPlaceholderTool),
        Box::new(fast_lightning_sdxl::FastLightningSdxlTool),
        Box::new(fast_svd_lcm::FastSvdLcmTool),
        Box::new(nano_banana_edit::NanoBananaEditTool),
        Box::new(bria_background_remove::BriaBackgroundRemoveTool),
        Box::new(playai_tts_dialog::PlayaiTtsDialogTool),
        Box::new(recraft_v3_text_to_image::RecraftV3TextToImageTool),
    ]
}

// --- Response field accessors ---
// Provider bodies are untrusted: a wrongly-typed optional field is treated
// as absent rather than failing the whole result.

fn str_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn u64_field(obj: &Value, key: &str) -> Option<u64> {
    obj.get(key).and_then(|v| v.as_u64())
}

fn f64_field(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(|v| v.as_f64())
}
