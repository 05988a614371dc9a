//! Structured input schemas.
//!
//! Each tool declares its arguments once, as a static `Schema`. The same
//! declaration is used twice:
//! - to validate raw JSON arguments before anything else happens
//! - to render the JSON Schema handed to the model in the tool definition
//!
//! Validation collects every offending field instead of stopping at the
//! first one, drops keys the schema does not declare, and rejects `null`
//! for optional fields (an optional field is either absent or well-typed).

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::{FieldIssue, ValidationError};

/// The shape a single value must have.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    String,
    Boolean,
    /// A JSON number without a fractional part.
    Integer { min: Option<i64>, max: Option<i64> },
    Number,
    /// One of a closed set of string literals.
    Enum(&'static [&'static str]),
    Array {
        item: &'static Shape,
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Fixed-length array, one shape per position.
    Tuple(&'static [Shape]),
    Object(&'static [Field]),
}

impl Shape {
    pub const INTEGER: Shape = Shape::Integer { min: None, max: None };

    fn describe(&self) -> String {
        match self {
            Shape::String => "string".to_string(),
            Shape::Boolean => "boolean".to_string(),
            Shape::Integer { min: None, max: None } => "integer".to_string(),
            Shape::Integer { min: Some(lo), max: Some(hi) } => {
                format!("integer between {} and {}", lo, hi)
            }
            Shape::Integer { min: Some(lo), max: None } => format!("integer >= {}", lo),
            Shape::Integer { min: None, max: Some(hi) } => format!("integer <= {}", hi),
            Shape::Number => "number".to_string(),
            Shape::Enum(options) => {
                let quoted: Vec<String> = options.iter().map(|o| format!("\"{}\"", o)).collect();
                format!("one of {}", quoted.join(", "))
            }
            Shape::Array { item, min, max } => {
                let bound = match (min, max) {
                    (Some(lo), Some(hi)) => format!(" ({} to {} items)", lo, hi),
                    (Some(lo), None) => format!(
                        " (at least {} item{})",
                        lo,
                        if *lo == 1 { "" } else { "s" }
                    ),
                    (None, Some(hi)) => format!(" (at most {} items)", hi),
                    (None, None) => String::new(),
                };
                format!("array of {}{}", item.describe(), bound)
            }
            Shape::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(|s| s.describe()).collect();
                format!("[{}]", parts.join(", "))
            }
            Shape::Object(_) => "object".to_string(),
        }
    }

    /// Render this shape as a JSON Schema fragment.
    fn to_json_schema(&self) -> Value {
        match self {
            Shape::String => json!({ "type": "string" }),
            Shape::Boolean => json!({ "type": "boolean" }),
            Shape::Integer { min, max } => {
                let mut schema = json!({ "type": "integer" });
                if let Some(lo) = min {
                    schema["minimum"] = json!(lo);
                }
                if let Some(hi) = max {
                    schema["maximum"] = json!(hi);
                }
                schema
            }
            Shape::Number => json!({ "type": "number" }),
            Shape::Enum(options) => json!({ "type": "string", "enum": options }),
            Shape::Array { item, min, max } => {
                let mut schema = json!({ "type": "array", "items": item.to_json_schema() });
                if let Some(lo) = min {
                    schema["minItems"] = json!(lo);
                }
                if let Some(hi) = max {
                    schema["maxItems"] = json!(hi);
                }
                schema
            }
            Shape::Tuple(items) => json!({
                "type": "array",
                "prefixItems": items.iter().map(|s| s.to_json_schema()).collect::<Vec<_>>(),
                "minItems": items.len(),
                "maxItems": items.len(),
            }),
            Shape::Object(fields) => object_schema(fields),
        }
    }

    /// Check `value` against this shape, pushing issues and returning the
    /// normalized value when it is acceptable.
    fn check(&self, value: &Value, path: &str, issues: &mut Vec<FieldIssue>) -> Option<Value> {
        let mut fail = |found: String| -> Option<Value> {
            issues.push(FieldIssue {
                path: path.to_string(),
                expected: self.describe(),
                found,
            });
            None
        };

        match self {
            Shape::String => match value {
                Value::String(_) => Some(value.clone()),
                other => fail(kind_of(other).to_string()),
            },
            Shape::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                other => fail(kind_of(other).to_string()),
            },
            Shape::Number => match value {
                Value::Number(_) => Some(value.clone()),
                other => fail(kind_of(other).to_string()),
            },
            Shape::Integer { min, max } => {
                let Some(n) = as_integer(value) else {
                    return fail(match value {
                        Value::Number(n) if is_integral(n) => format!("{} (out of range)", n),
                        Value::Number(n) => format!("non-integer {}", n),
                        other => kind_of(other).to_string(),
                    });
                };
                let below = min.is_some_and(|lo| n < lo);
                let above = max.is_some_and(|hi| n > hi);
                if below || above {
                    return fail(n.to_string());
                }
                Some(json!(n))
            }
            Shape::Enum(options) => match value {
                Value::String(s) if options.contains(&s.as_str()) => Some(value.clone()),
                Value::String(s) => fail(format!("\"{}\"", s)),
                other => fail(kind_of(other).to_string()),
            },
            Shape::Array { item, min, max } => {
                let Value::Array(items) = value else {
                    return fail(kind_of(value).to_string());
                };
                let too_few = min.is_some_and(|lo| items.len() < lo);
                let too_many = max.is_some_and(|hi| items.len() > hi);
                if too_few || too_many {
                    return fail(format!("{} items", items.len()));
                }
                let before = issues.len();
                let checked: Vec<Value> = items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| item.check(v, &format!("{}[{}]", path, i), issues))
                    .collect();
                (issues.len() == before).then_some(Value::Array(checked))
            }
            Shape::Tuple(shapes) => {
                let Value::Array(items) = value else {
                    return fail(kind_of(value).to_string());
                };
                if items.len() != shapes.len() {
                    return fail(format!("{} items", items.len()));
                }
                let before = issues.len();
                let checked: Vec<Value> = shapes
                    .iter()
                    .zip(items)
                    .enumerate()
                    .filter_map(|(i, (s, v))| s.check(v, &format!("{}[{}]", path, i), issues))
                    .collect();
                (issues.len() == before).then_some(Value::Array(checked))
            }
            Shape::Object(fields) => {
                let Value::Object(map) = value else {
                    return fail(kind_of(value).to_string());
                };
                let before = issues.len();
                let checked = check_fields(fields, map, Some(path), issues);
                (issues.len() == before).then_some(Value::Object(checked))
            }
        }
    }
}

/// One declared field of an object.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
    pub description: &'static str,
}

impl Field {
    pub const fn required(name: &'static str, shape: Shape, description: &'static str) -> Self {
        Self {
            name,
            shape,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, shape: Shape, description: &'static str) -> Self {
        Self {
            name,
            shape,
            required: false,
            description,
        }
    }
}

/// The argument schema of one tool.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [Field],
}

impl Schema {
    /// JSON Schema for the tool definition sent to the model.
    pub fn to_json_schema(&self) -> Value {
        object_schema(self.fields)
    }

    /// Validate raw arguments, returning only the declared fields.
    pub fn validate(&self, tool: &str, args: &Value) -> Result<Map<String, Value>, ValidationError> {
        let mut issues = Vec::new();
        let checked = match args {
            Value::Object(map) => check_fields(self.fields, map, None, &mut issues),
            other => {
                issues.push(FieldIssue {
                    path: "(arguments)".to_string(),
                    expected: "object".to_string(),
                    found: kind_of(other).to_string(),
                });
                Map::new()
            }
        };

        if issues.is_empty() {
            Ok(checked)
        } else {
            Err(ValidationError {
                tool: tool.to_string(),
                issues,
            })
        }
    }

    /// Validate and then deserialize into the tool's typed input.
    pub fn parse<T: DeserializeOwned>(&self, tool: &str, args: &Value) -> Result<T, ValidationError> {
        let checked = self.validate(tool, args)?;
        serde_json::from_value(Value::Object(checked)).map_err(|e| ValidationError {
            tool: tool.to_string(),
            issues: vec![FieldIssue {
                path: "(arguments)".to_string(),
                expected: "arguments matching the schema".to_string(),
                found: e.to_string(),
            }],
        })
    }
}

fn check_fields(
    fields: &[Field],
    map: &Map<String, Value>,
    parent: Option<&str>,
    issues: &mut Vec<FieldIssue>,
) -> Map<String, Value> {
    let mut checked = Map::new();
    for field in fields {
        let path = match parent {
            Some(p) => format!("{}.{}", p, field.name),
            None => field.name.to_string(),
        };
        match map.get(field.name) {
            None if field.required => issues.push(FieldIssue {
                path,
                expected: field.shape.describe(),
                found: "missing".to_string(),
            }),
            None => {}
            Some(value) => {
                if let Some(v) = field.shape.check(value, &path, issues) {
                    checked.insert(field.name.to_string(), v);
                }
            }
        }
    }
    checked
}

fn object_schema(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        let mut schema = field.shape.to_json_schema();
        if !field.description.is_empty() {
            schema["description"] = json!(field.description);
        }
        properties.insert(field.name.to_string(), schema);
    }
    let required: Vec<&str> = fields.iter().filter(|f| f.required).map(|f| f.name).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn as_integer(value: &Value) -> Option<i64> {
    let n = value.as_number()?;
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Whole-valued number, whatever its magnitude.
fn is_integral(n: &serde_json::Number) -> bool {
    n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const VOICE_FIELDS: &[Field] = &[
        Field::required("voice", Shape::String, ""),
        Field::required("turn_prefix", Shape::String, ""),
    ];
    const VOICE: Shape = Shape::Object(VOICE_FIELDS);
    const RGB: Shape = Shape::Tuple(&[Shape::INTEGER, Shape::INTEGER, Shape::INTEGER]);

    const SAMPLE: Schema = Schema {
        fields: &[
            Field::required("prompt", Shape::String, "What to draw"),
            Field::optional(
                "num_images",
                Shape::Integer {
                    min: Some(1),
                    max: Some(4),
                },
                "",
            ),
            Field::optional("output_format", Shape::Enum(&["jpeg", "png"]), ""),
            Field::optional(
                "voices",
                Shape::Array {
                    item: &VOICE,
                    min: Some(1),
                    max: Some(2),
                },
                "",
            ),
            Field::optional(
                "colors",
                Shape::Array {
                    item: &RGB,
                    min: None,
                    max: None,
                },
                "",
            ),
        ],
    };

    #[test]
    fn test_accepts_minimal_input() {
        let checked = SAMPLE.validate("sample", &json!({ "prompt": "a cat" })).unwrap();
        assert_eq!(checked.len(), 1);
        assert_eq!(checked["prompt"], "a cat");
    }

    #[test]
    fn test_missing_required_field() {
        let err = SAMPLE.validate("sample", &json!({})).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "prompt");
        assert_eq!(err.issues[0].found, "missing");
    }

    #[test]
    fn test_wrong_type_for_required_field() {
        let err = SAMPLE.validate("sample", &json!({ "prompt": 42 })).unwrap_err();
        assert_eq!(err.issues[0].expected, "string");
        assert_eq!(err.issues[0].found, "number");
    }

    #[test]
    fn test_null_optional_is_rejected() {
        let err = SAMPLE
            .validate("sample", &json!({ "prompt": "x", "output_format": null }))
            .unwrap_err();
        assert!(err.mentions("output_format"));
        assert_eq!(err.issues[0].found, "null");
    }

    #[test]
    fn test_enum_and_range() {
        let err = SAMPLE
            .validate(
                "sample",
                &json!({ "prompt": "x", "output_format": "gif", "num_images": 5 }),
            )
            .unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert!(err.mentions("num_images"));
        assert!(err.mentions("output_format"));
    }

    #[test]
    fn test_integer_rules() {
        assert!(SAMPLE
            .validate("sample", &json!({ "prompt": "x", "num_images": 2.5 }))
            .is_err());
        let checked = SAMPLE
            .validate("sample", &json!({ "prompt": "x", "num_images": 2.0 }))
            .unwrap();
        assert_eq!(checked["num_images"], json!(2));
    }

    #[test]
    fn test_huge_integer_is_out_of_range() {
        let err = SAMPLE
            .validate("sample", &json!({ "prompt": "x", "num_images": u64::MAX }))
            .unwrap_err();
        assert_eq!(err.issues[0].found, "18446744073709551615 (out of range)");

        let err = SAMPLE
            .validate("sample", &json!({ "prompt": "x", "num_images": 1e300 }))
            .unwrap_err();
        assert!(err.issues[0].found.ends_with("(out of range)"));

        let err = SAMPLE
            .validate("sample", &json!({ "prompt": "x", "num_images": 2.5 }))
            .unwrap_err();
        assert_eq!(err.issues[0].found, "non-integer 2.5");
    }

    #[test]
    fn test_array_cardinality_and_nested_objects() {
        let three = json!({ "voice": "a", "turn_prefix": "A: " });
        let err = SAMPLE
            .validate(
                "sample",
                &json!({ "prompt": "x", "voices": [three.clone(), three.clone(), three] }),
            )
            .unwrap_err();
        assert_eq!(err.issues[0].found, "3 items");

        let err = SAMPLE
            .validate(
                "sample",
                &json!({ "prompt": "x", "voices": [{ "voice": "a" }] }),
            )
            .unwrap_err();
        assert_eq!(err.issues[0].path, "voices[0].turn_prefix");
    }

    #[test]
    fn test_tuples() {
        assert!(SAMPLE
            .validate("sample", &json!({ "prompt": "x", "colors": [[255, 0, 0]] }))
            .is_ok());
        let err = SAMPLE
            .validate("sample", &json!({ "prompt": "x", "colors": [[255, 0]] }))
            .unwrap_err();
        assert_eq!(err.issues[0].path, "colors[0]");
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let checked = SAMPLE
            .validate("sample", &json!({ "prompt": "x", "extra": true }))
            .unwrap();
        assert!(!checked.contains_key("extra"));
    }

    #[test]
    fn test_non_object_arguments() {
        let err = SAMPLE.validate("sample", &json!("a cat")).unwrap_err();
        assert_eq!(err.issues[0].path, "(arguments)");
    }

    #[test]
    fn test_json_schema_rendering() {
        let schema = SAMPLE.to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["prompt"]));
        assert_eq!(schema["properties"]["prompt"]["description"], "What to draw");
        assert_eq!(schema["properties"]["num_images"]["maximum"], 4);
        assert_eq!(schema["properties"]["output_format"]["enum"], json!(["jpeg", "png"]));
        assert_eq!(schema["properties"]["voices"]["maxItems"], 2);
        assert_eq!(
            schema["properties"]["voices"]["items"]["required"],
            json!(["voice", "turn_prefix"])
        );
    }

    #[test]
    fn test_parse_into_typed_input() {
        #[derive(Deserialize)]
        struct Input {
            prompt: String,
            num_images: Option<u32>,
        }
        let input: Input = SAMPLE
            .parse("sample", &json!({ "prompt": "x", "num_images": 3.0 }))
            .unwrap();
        assert_eq!(input.prompt, "x");
        assert_eq!(input.num_images, Some(3));
    }
}
