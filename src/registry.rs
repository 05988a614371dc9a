//! Tool Registry.
//!
//! Two lookups keyed by tool identifier:
//! - **adapters**: the registered `Tool` implementations the orchestrator
//!   dispatches to
//! - **display metadata**: name and emoji the chat UI shows as a badge on
//!   each message that used a tool
//!
//! Display lookups are total. Identifiers the table does not know (a tool
//! added to the orchestrator before it gets a badge) fall back to the
//! identifier itself and a generic emoji.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ToolError;
use crate::invoker::ProviderInvoker;
use crate::tools::{builtin_tools, Tool};
use crate::types::{NormalizedResult, ToolDefinition};

/// Emoji shown for identifiers missing from the display table.
pub const FALLBACK_EMOJI: &str = "🛠️";

/// Tag prefix of tool parts in a chat message (`tool-fastSvdLcm`).
const TOOL_PART_PREFIX: &str = "tool-";

static DISPLAY_TABLE: Lazy<HashMap<&'static str, (&'static str, &'static str)>> =
    Lazy::new(|| {
        HashMap::from([
            ("getWeather", ("Get Weather", "🌤️")),
            ("fastLightningSDXL", ("Fast Lightning SDXL", "⚡️🖼️")),
            ("fastSvdLcm", ("Fast SVD LCM", "⚙️🖼️")),
            ("nanoBananaEdit", ("Nano Banana Edit", "🍌✏️")),
            ("briaBackgroundRemove", ("Bria Background Remove", "🪄")),
            ("playaiTtsDialog", ("PlayAI TTS Dialog", "🔊")),
            ("recraftV3TextToImage", ("Recraft V3 Text to Image", "🎨")),
            ("createDocument", ("Create Document", "📝")),
            ("updateDocument", ("Update Document", "✏️")),
            ("requestSuggestions", ("Request Suggestions", "💡")),
        ])
    });

/// What the UI renders for one tool identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolBadge {
    pub id: String,
    pub display_name: String,
    pub emoji: String,
}

/// Resolve display metadata for any identifier. Never fails.
pub fn badge(id: &str) -> ToolBadge {
    match DISPLAY_TABLE.get(id) {
        Some((name, emoji)) => ToolBadge {
            id: id.to_string(),
            display_name: name.to_string(),
            emoji: emoji.to_string(),
        },
        None => ToolBadge {
            id: id.to_string(),
            display_name: id.to_string(),
            emoji: FALLBACK_EMOJI.to_string(),
        },
    }
}

/// Whether the display table has a dedicated entry for `id`.
pub fn is_known(id: &str) -> bool {
    DISPLAY_TABLE.contains_key(id)
}

/// Tool identifiers used by a chat message, deduplicated, first use first.
///
/// A `tool-call` / `tool-result` part names its tool in `toolName`; any
/// other part tagged `tool-<id>` names it in the tag.
pub fn extract_tool_names(parts: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    parts
        .iter()
        .filter_map(|part| {
            let kind = part.get("type")?.as_str()?;
            if kind == "tool-call" || kind == "tool-result" {
                return part.get("toolName")?.as_str().map(String::from);
            }
            kind.strip_prefix(TOOL_PART_PREFIX)
                .filter(|id| !id.is_empty())
                .map(String::from)
        })
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Badges for every tool a message used.
pub fn message_badges(parts: &[Value]) -> Vec<ToolBadge> {
    extract_tool_names(parts).iter().map(|id| badge(id)).collect()
}

/// Failure to dispatch a call, as seen by the orchestrator.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid JSON arguments for tool '{tool}': {reason}")]
    MalformedArguments { tool: String, reason: String },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// A registry lookup: the adapter, if registered, and its badge.
pub struct RegistryEntry<'a> {
    pub adapter: Option<&'a dyn Tool>,
    pub badge: ToolBadge,
}

/// Holds the registered adapters and dispatches calls by identifier.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    invoker: ProviderInvoker,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new(invoker: ProviderInvoker) -> Self {
        Self {
            tools: Vec::new(),
            invoker,
        }
    }

    /// Registry with every built-in adapter the configuration enables.
    pub fn with_builtin_tools(invoker: ProviderInvoker) -> Self {
        let mut registry = Self::new(invoker);
        for tool in builtin_tools() {
            if registry.invoker.config().is_enabled(tool.name()) {
                registry.register(tool);
            }
        }
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Tool definitions to hand to the orchestrating model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    pub fn entry(&self, name: &str) -> RegistryEntry<'_> {
        RegistryEntry {
            adapter: self.get(name),
            badge: badge(name),
        }
    }

    pub fn tools(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|t| t.as_ref())
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call whose arguments arrive as a JSON string.
    pub async fn execute(
        &self,
        name: &str,
        arguments: &str,
    ) -> Result<NormalizedResult, DispatchError> {
        let args: Value =
            serde_json::from_str(arguments).map_err(|e| DispatchError::MalformedArguments {
                tool: name.to_string(),
                reason: e.to_string(),
            })?;
        self.invoke(name, args).await
    }

    /// Invoke a registered tool. Each call runs in its own span.
    pub async fn invoke(&self, name: &str, args: Value) -> Result<NormalizedResult, DispatchError> {
        let tool = self
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        let span = info_span!("tool_call", tool = name, call_id = %Uuid::new_v4());
        async {
            match tool.invoke(&self.invoker, args).await {
                Ok(result) => {
                    info!(source = result.source(), urls = result.urls().len(), "tool call succeeded");
                    Ok(result)
                }
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "tool call failed");
                    Err(e.into())
                }
            }
        }
        .instrument(span)
        .await
    }
}
