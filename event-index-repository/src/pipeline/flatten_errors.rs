//! Error-chain flattening.
//!
//! Walks the `inner` chain of the event's error and joins the `type`,
//! `message` and `code` of every node into `error.type`, `error.message` and
//! `error.code`, ordered root to innermost. The same algorithm exists twice:
//! natively in [`flatten_errors`] and as a Painless script for the engine's
//! ingest pipeline ([`painless_source`]).

use serde_json::{json, Map, Value};

use event_index_shared::known_keys;

use super::IngestPipeline;
use crate::schema::event_schema::ERROR_FIELD;

/// Well-known name of the ingest pipeline.
pub const DEFAULT_PIPELINE_NAME: &str = "events-pipeline";

/// Separator used when joining each sequence.
const SEPARATOR: &str = " ";

/// Node keys read on every step of the walk.
const NODE_FIELDS: [&str; 3] = ["type", "message", "code"];

/// The three aggregated sequences collected from one chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedErrors {
    pub types: Vec<String>,
    pub messages: Vec<String>,
    pub codes: Vec<String>,
}

impl FlattenedErrors {
    /// Walk a chain starting at `root`.
    ///
    /// The cursor only ever borrows the current node, so chain length does not
    /// grow the stack. A non-object node ends the walk.
    pub fn from_chain(root: &Value) -> Self {
        let mut flattened = Self::default();
        let mut cursor = root.as_object();

        while let Some(node) = cursor {
            if let Some(type_name) = scalar_text(node.get("type")) {
                flattened.types.push(type_name);
            }
            if let Some(message) = scalar_text(node.get("message")) {
                flattened.messages.push(message);
            }
            if let Some(code) = scalar_text(node.get("code")) {
                flattened.codes.push(code);
            }
            cursor = node.get("inner").and_then(Value::as_object);
        }

        flattened
    }

    pub fn error_type(&self) -> String {
        self.types.join(SEPARATOR)
    }

    pub fn error_message(&self) -> String {
        self.messages.join(SEPARATOR)
    }

    pub fn error_code(&self) -> String {
        self.codes.join(SEPARATOR)
    }

    /// Assign the joined values under `error`, replacing previous values and
    /// creating `error` if it is missing or not an object.
    pub fn write_to(&self, document: &mut Value) {
        let Some(root) = document.as_object_mut() else {
            return;
        };

        let error = root
            .entry(ERROR_FIELD)
            .or_insert_with(|| Value::Object(Map::new()));
        if !error.is_object() {
            *error = Value::Object(Map::new());
        }

        if let Some(error) = error.as_object_mut() {
            error.insert("type".to_string(), json!(self.error_type()));
            error.insert("message".to_string(), json!(self.error_message()));
            error.insert("code".to_string(), json!(self.error_code()));
        }
    }
}

/// Select the chain root: `@error` when that key is present, otherwise
/// `@simple_error`. `None` means the document carries no error data at all.
pub fn error_root(document: &Value) -> Option<&Value> {
    let data = document.get("data")?.as_object()?;
    data.get(known_keys::data::ERROR)
        .or_else(|| data.get(known_keys::data::SIMPLE_ERROR))
}

/// Flatten the document's error chain in place.
///
/// Returns `false` and leaves the document untouched when it carries neither
/// error representation. Missing fields on individual nodes are skipped.
pub fn flatten_errors(document: &mut Value) -> bool {
    let Some(flattened) = error_root(document).map(FlattenedErrors::from_chain) else {
        return false;
    };
    flattened.write_to(document);
    true
}

// Strings verbatim, numbers and booleans as their JSON text; anything else is absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Painless source of the flattening script, collapsed onto a single line.
pub fn painless_source() -> String {
    let error_key = known_keys::data::ERROR;
    let simple_error_key = known_keys::data::SIMPLE_ERROR;

    let mut lines = vec![
        format!(
            "if (!ctx.containsKey('data') || !(ctx.data instanceof Map) || \
             !(ctx.data.containsKey('{error_key}') || ctx.data.containsKey('{simple_error_key}'))) {{ return; }}"
        ),
        "def types = []; def messages = []; def codes = [];".to_string(),
        format!(
            "def curr = ctx.data.containsKey('{error_key}') ? ctx.data['{error_key}'] : ctx.data['{simple_error_key}'];"
        ),
        "while (curr instanceof Map) {".to_string(),
    ];

    for (field, list) in NODE_FIELDS.iter().zip(["types", "messages", "codes"]) {
        lines.push(format!(
            "def {field}Value = curr.get('{field}'); \
             if ({field}Value instanceof String || {field}Value instanceof Number || {field}Value instanceof Boolean) \
             {{ {list}.add({field}Value.toString()); }}"
        ));
    }

    lines.push("curr = curr.get('inner'); }".to_string());
    lines.push(format!(
        "if (!(ctx.{ERROR_FIELD} instanceof Map)) {{ ctx.{ERROR_FIELD} = new HashMap(); }}"
    ));
    for (field, list) in NODE_FIELDS.iter().zip(["types", "messages", "codes"]) {
        lines.push(format!(
            "ctx.{ERROR_FIELD}['{field}'] = String.join('{SEPARATOR}', {list});"
        ));
    }

    lines.join(" ")
}

/// The ingest pipeline definition that runs the flattening script.
pub fn events_pipeline(name: impl Into<String>) -> IngestPipeline {
    IngestPipeline {
        name: name.into(),
        body: json!({
            "description": "Flattens the event error chain into error.type, error.message and error.code",
            "processors": [
                {
                    "script": {
                        "lang": "painless",
                        "source": painless_source()
                    }
                }
            ]
        }),
    }
}
