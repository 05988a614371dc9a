//! Dialogue speech synthesis (PlayAI TTS Dialog).
//!
//! Turns dialogue text with speaker turn prefixes into one audio file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{f64_field, str_field, u64_field, Tool};
use crate::error::ToolError;
use crate::invoker::{Payload, ProviderInvoker};
use crate::schema::{Field, Schema, Shape};
use crate::types::{AudioResult, NormalizedResult};

const ROUTE: &str = "fal-ai/playai/tts/dialog";
const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

const VOICE_FIELDS: &[Field] = &[
    Field::required("voice", Shape::String, "Voice identifier"),
    Field::required(
        "turn_prefix",
        Shape::String,
        "Prefix marking this speaker's turns, e.g. \"Speaker 1: \"",
    ),
];
const VOICE: Shape = Shape::Object(VOICE_FIELDS);

static SCHEMA: Schema = Schema {
    fields: &[
        Field::required(
            "input",
            Shape::String,
            "Dialogue text, each turn starting with a speaker prefix",
        ),
        Field::optional(
            "voices",
            Shape::Array {
                item: &VOICE,
                min: Some(1),
                max: Some(2),
            },
            "Voice for each speaker",
        ),
        Field::optional(
            "response_format",
            Shape::Enum(&["url", "bytes"]),
            "How the audio is delivered",
        ),
        Field::optional("seed", Shape::INTEGER, "Seed for reproducible generations"),
    ],
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Voice {
    voice: String,
    turn_prefix: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ResponseFormat {
    Url,
    Bytes,
}

impl ResponseFormat {
    fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Url => "url",
            ResponseFormat::Bytes => "bytes",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Input {
    input: String,
    voices: Option<Vec<Voice>>,
    response_format: Option<ResponseFormat>,
    seed: Option<i64>,
}

fn build_payload(input: &Input) -> Payload {
    let mut payload = Payload::new();
    payload.insert("input".into(), json!(input.input));
    if let Some(voices) = &input.voices {
        payload.insert("voices".into(), json!(voices));
    }
    if let Some(format) = input.response_format {
        payload.insert("response_format".into(), json!(format.as_str()));
    }
    if let Some(seed) = input.seed {
        payload.insert("seed".into(), json!(seed));
    }
    payload
}

fn normalize(body: &Value) -> Result<NormalizedResult, ToolError> {
    let audio = body.get("audio").unwrap_or(&Value::Null);
    let url = str_field(audio, "url").ok_or(ToolError::ResponseShape {
        expected: "an audio URL",
    })?;

    Ok(NormalizedResult::Audio(AudioResult {
        url,
        content_type: str_field(audio, "content_type")
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        duration: f64_field(audio, "duration"),
        file_name: str_field(audio, "file_name"),
        file_size: u64_field(audio, "file_size"),
        source: ROUTE.to_string(),
    }))
}

pub struct PlayaiTtsDialogTool;

#[async_trait]
impl Tool for PlayaiTtsDialogTool {
    fn name(&self) -> &str {
        "playaiTtsDialog"
    }

    fn description(&self) -> &str {
        "Generate a multi-speaker dialogue audio using PlayAI TTS Dialog. \
         Provide dialogue text with speaker turn prefixes."
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
