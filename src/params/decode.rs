//! Text parameter decoding
//!
//! Path segments and query strings arrive as text. Before validation they are
//! lifted into raw JSON values using the declared field kinds, the way a web
//! framework's extractor does: integer text becomes a JSON integer and
//! `true`/`false` become booleans. Anything that does not decode cleanly stays
//! a string, so strict validation still reports it as a `type_error`.

use serde_json::{Map, Value};

use crate::schema::{FieldKind, Schema};

/// Decodes textual name/value pairs against a schema. Repeated keys: the
/// last value wins. Undeclared keys are kept as strings.
pub fn decode_text_params<I, K, V>(schema: &Schema, pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    let mut decoded = Map::new();
    for (key, text) in pairs {
        let key = key.into();
        let value = match schema.field(&key).map(|f| f.kind()) {
            Some(kind) => decode_text(kind, text.as_ref()),
            None => Value::String(text.as_ref().to_string()),
        };
        decoded.insert(key, value);
    }
    decoded
}

fn decode_text(kind: &FieldKind, text: &str) -> Value {
    match kind {
        FieldKind::Integer { .. } => match text.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(text.to_string()),
        },
        FieldKind::Boolean => match text {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(text.to_string()),
        },
        FieldKind::String { .. } | FieldKind::Enum { .. } | FieldKind::Object { .. } => {
            Value::String(text.to_string())
        }
    }
}
