//! Placeholder generator.
//!
//! Stands in for a generic media tool while wiring up the orchestrator:
//! validates the prompt and returns a fixed demo thumbnail. No credential
//! and no network call.

use async_trait::async_trait;
use serde_json::Value;

use super::Tool;
use crate::error::ToolError;
use crate::invoker::ProviderInvoker;
use crate::schema::{Field, Schema, Shape};
use crate::types::{NormalizedResult, PlaceholderResult};

const PLACEHOLDER_URL: &str = "/images/demo-thumbnail.png";
const PLACEHOLDER_ALT: &str = "Placeholder image";
const SOURCE: &str = "hardcoded";

static SCHEMA: Schema = Schema {
    fields: &[Field::required("prompt", Shape::String, "What to generate")],
};

pub struct FalPlaceholderTool;

#[async_trait]
impl Tool for FalPlaceholderTool {
    fn name(&self) -> &str {
        "falAI"
    }

    fn description(&self) -> &str {
        "Use Fal AI to generate content. You would have to render it using markdown syntax."
    }

    fn schema(&self) -> &'static Schema {
        &SCHEMA
    }

    async fn invoke(
        &self,
        _invoker: &ProviderInvoker,
        args: Value,
    ) -> Result<NormalizedResult, ToolError> {
        SCHEMA.validate(self.name(), &args)?;
        Ok(NormalizedResult::Placeholder(PlaceholderResult {
            url: PLACEHOLDER_URL.to_string(),
            alt: PLACEHOLDER_ALT.to_string(),
            source: SOURCE.to_string(),
        }))
    }
}
