//! genmedia - uniform tool adapters for generative-media providers.
//!
//! An orchestrator hands a tool identifier and raw JSON arguments to the
//! [`ToolRegistry`]; the matching adapter validates them, calls its
//! provider once, and returns a [`NormalizedResult`] the UI can render
//! without knowing anything about the provider.
//!
//! ```text
//! orchestrator --> ToolRegistry --> Tool adapter --> ProviderInvoker --> provider
//!                       |                |
//!                  badge lookup     NormalizedResult
//! ```

pub mod config;
pub mod error;
pub mod invoker;
pub mod registry;
pub mod schema;
pub mod tools;
pub mod types;

pub use config::{AppConfig, Credential};
pub use error::{FieldIssue, ToolError, TransportError, ValidationError};
pub use invoker::{HttpTransport, Payload, ProviderInvoker, Transport};
pub use registry::{badge, extract_tool_names, message_badges, DispatchError, ToolBadge, ToolRegistry};
pub use tools::Tool;
pub use types::{NormalizedResult, ToolDefinition};
