// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore document-created events as delivered by Eventarc.
//!
//! Eventarc posts the `DocumentEventData` message as JSON when the trigger
//! is created with `--event-data-content-type=application/json`. Field
//! values keep Firestore's typed encoding (`stringValue`, `arrayValue`, ...).

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Field on predefined routine documents holding the display name.
pub const ROUTINE_NAME_FIELD: &str = "nombreRutina";

/// Body of a Firestore `document.v1.created` event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEventData {
    pub value: Option<FirestoreDocument>,
    #[serde(default)]
    pub old_value: Option<FirestoreDocument>,
}

/// Firestore document as encoded in event payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    /// Full resource name: `projects/{p}/databases/{d}/documents/{path}`
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

/// Typed Firestore value.
#[derive(Debug, Clone, PartialEq)]
pub enum FirestoreValue {
    Null,
    Boolean(bool),
    /// int64 values are encoded as JSON strings
    Integer(String),
    Double(f64),
    Timestamp(String),
    String(String),
    Reference(String),
    Array(ArrayValue),
    Map(MapValue),
    /// Kinds this service never reads (bytes, geo points, ...)
    Unsupported,
}

impl<'de> Deserialize<'de> for FirestoreValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let Some((kind, value)) = raw.into_iter().next() else {
            return Ok(FirestoreValue::Unsupported);
        };

        fn typed<T: DeserializeOwned, E: de::Error>(value: serde_json::Value) -> Result<T, E> {
            serde_json::from_value(value).map_err(E::custom)
        }

        Ok(match kind.as_str() {
            "nullValue" => FirestoreValue::Null,
            "booleanValue" => FirestoreValue::Boolean(typed(value)?),
            "integerValue" => FirestoreValue::Integer(match value {
                serde_json::Value::Number(n) => n.to_string(),
                other => typed(other)?,
            }),
            "doubleValue" => FirestoreValue::Double(typed(value)?),
            "timestampValue" => FirestoreValue::Timestamp(typed(value)?),
            "stringValue" => FirestoreValue::String(typed(value)?),
            "referenceValue" => FirestoreValue::Reference(typed(value)?),
            "arrayValue" => FirestoreValue::Array(typed(value)?),
            "mapValue" => FirestoreValue::Map(typed(value)?),
            _ => FirestoreValue::Unsupported,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
}

impl FirestoreValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FirestoreValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A new document in the predefined-routines collection.
///
/// Consumed once by the trigger and then dropped.
#[derive(Debug, Clone)]
pub struct PredefinedRoutineCreatedEvent {
    pub document_id: String,
    pub fields: HashMap<String, FirestoreValue>,
}

impl PredefinedRoutineCreatedEvent {
    /// Build from the event body; `None` if it carries no document.
    pub fn from_event_data(data: DocumentEventData) -> Option<Self> {
        let document = data.value?;
        let document_id = document
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())?
            .to_string();

        Some(Self {
            document_id,
            fields: document.fields,
        })
    }

    /// The routine name exactly as stored, if present as a non-empty string.
    pub fn routine_name(&self) -> Option<&str> {
        self.fields
            .get(ROUTINE_NAME_FIELD)
            .and_then(FirestoreValue::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Number of exercises, when the field is a Firestore array.
    pub fn exercise_count(&self) -> Option<usize> {
        match self.fields.get("ejercicios") {
            Some(FirestoreValue::Array(array)) => Some(array.values.len()),
            _ => None,
        }
    }
}
