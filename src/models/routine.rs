// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout routine model for storage and API.

use crate::db::collections;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Routine document stored in Firestore.
///
/// Field names follow the documents the mobile app already writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    /// Document ID, from Firestore metadata rather than a stored field
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    #[serde(rename = "nombreRutina")]
    pub name: String,
    #[serde(rename = "ejercicios", default)]
    pub exercises: Vec<Exercise>,
    #[serde(rename = "nivel", default)]
    pub difficulty: Difficulty,
    /// Creation time (RFC3339 UTC)
    #[serde(rename = "fechaCreacion")]
    pub created_at: String,
    /// Owner uid; absent on predefined routines
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub owner_uid: Option<String>,
}

/// A routine as returned by the API: the stored fields plus its document ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutineView {
    pub id: String,
    #[serde(flatten)]
    pub routine: Routine,
}

impl From<Routine> for RoutineView {
    fn from(routine: Routine) -> Self {
        Self {
            id: routine.id.clone(),
            routine,
        }
    }
}

/// One exercise within a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Exercise {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "series", default)]
    #[validate(range(min = 1, max = 50))]
    pub sets: u32,
    #[serde(rename = "repeticiones", default)]
    #[validate(range(min = 1, max = 500))]
    pub reps: u32,
    #[serde(rename = "descansoSegundos", default)]
    #[validate(range(max = 900))]
    pub rest_seconds: u32,
}

/// Difficulty level shown in the routine list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Principiante,
    Intermedio,
    Avanzado,
}

/// Which collection a routine lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineTarget {
    /// A user's personal routine
    User,
    /// An admin-authored template visible to everyone
    Predefined,
}

impl RoutineTarget {
    pub fn collection(self) -> &'static str {
        match self {
            RoutineTarget::User => collections::ROUTINES,
            RoutineTarget::Predefined => collections::PREDEFINED_ROUTINES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoutineTarget::User => "user",
            RoutineTarget::Predefined => "predefined",
        }
    }
}

impl std::str::FromStr for RoutineTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(RoutineTarget::User),
            "predefined" => Ok(RoutineTarget::Predefined),
            other => Err(format!("unknown routine target: {other}")),
        }
    }
}

/// Create/update request body for a routine.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoutineInput {
    /// Trimmed on the way in, so validation sees the stored value
    #[serde(rename = "nombreRutina", deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "ejercicios", default)]
    #[validate(length(max = 50), nested)]
    pub exercises: Vec<Exercise>,
    #[serde(rename = "nivel", default)]
    pub difficulty: Difficulty,
}

impl RoutineInput {
    /// Build a new routine document with a fresh ID.
    pub fn into_routine(self, owner_uid: Option<String>, created_at: String) -> Routine {
        Routine {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name,
            exercises: self.exercises,
            difficulty: self.difficulty,
            created_at,
            owner_uid,
        }
    }

    /// Apply this input over an existing routine, keeping identity fields.
    pub fn apply_to(self, routine: &mut Routine) {
        routine.name = self.name;
        routine.exercises = self.exercises;
        routine.difficulty = self.difficulty;
    }
}

fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// Favorite join record (user ↔ routine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub uid: String,
    pub target: RoutineTarget,
    pub routine_id: String,
    pub added_at: String,
}

impl Favorite {
    /// Document ID: uid, target and routine combined for uniqueness.
    pub fn document_id(uid: &str, target: RoutineTarget, routine_id: &str) -> String {
        format!(
            "{}_{}_{}",
            urlencoding::encode(uid),
            target.as_str(),
            urlencoding::encode(routine_id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn routine_uses_app_field_names() {
        let routine = Routine {
            id: "r1".to_string(),
            name: "Leg Day".to_string(),
            exercises: vec![],
            difficulty: Difficulty::Intermedio,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            owner_uid: None,
        };

        let value = serde_json::to_value(&routine).unwrap();
        assert_eq!(value["nombreRutina"], "Leg Day");
        assert_eq!(value["nivel"], "intermedio");
        assert!(value.get("userId").is_none());
    }

    #[test]
    fn input_rejects_empty_name() {
        let input: RoutineInput = serde_json::from_value(json!({ "nombreRutina": "" })).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn input_rejects_whitespace_only_name() {
        let input: RoutineInput =
            serde_json::from_value(json!({ "nombreRutina": "   " })).unwrap();
        assert_eq!(input.name, "");
        assert!(input.validate().is_err());
    }

    #[test]
    fn input_name_is_trimmed_before_storage() {
        let input: RoutineInput =
            serde_json::from_value(json!({ "nombreRutina": "  Leg Day " })).unwrap();
        assert!(input.validate().is_ok());

        let routine = input.into_routine(None, "2026-01-01T00:00:00Z".to_string());
        assert_eq!(routine.name, "Leg Day");
    }

    #[test]
    fn stored_document_without_id_field_deserializes() {
        let routine: Routine = serde_json::from_value(json!({
            "nombreRutina": "Leg Day",
            "ejercicios": [{ "nombre": "Sentadilla", "series": 4, "repeticiones": 10 }],
            "nivel": "avanzado",
            "fechaCreacion": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(routine.id, "");
        assert_eq!(routine.name, "Leg Day");
        assert_eq!(routine.exercises[0].rest_seconds, 0);
    }

    #[test]
    fn document_id_comes_from_firestore_metadata() {
        let routine: Routine = serde_json::from_value(json!({
            "_firestore_id": "leg-day",
            "nombreRutina": "Leg Day",
            "fechaCreacion": "2026-01-01T00:00:00Z",
            "userId": "uid-1"
        }))
        .unwrap();

        assert_eq!(routine.id, "leg-day");
        assert_eq!(routine.owner_uid.as_deref(), Some("uid-1"));
    }

    #[test]
    fn api_view_carries_id_but_document_does_not() {
        let routine: Routine = serde_json::from_value(json!({
            "_firestore_id": "leg-day",
            "nombreRutina": "Leg Day",
            "fechaCreacion": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        let stored = serde_json::to_value(&routine).unwrap();
        assert!(stored.get("id").is_none());

        let view = serde_json::to_value(RoutineView::from(routine)).unwrap();
        assert_eq!(view["id"], "leg-day");
        assert_eq!(view["nombreRutina"], "Leg Day");
    }

    #[test]
    fn input_validates_nested_exercises() {
        let input: RoutineInput = serde_json::from_value(json!({
            "nombreRutina": "Push",
            "ejercicios": [{ "nombre": "Press banca", "series": 0, "repeticiones": 10 }]
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn target_round_trips_through_path_segment() {
        for target in [RoutineTarget::User, RoutineTarget::Predefined] {
            assert_eq!(target.as_str().parse::<RoutineTarget>(), Ok(target));
        }
        assert!("admin".parse::<RoutineTarget>().is_err());
    }

    #[test]
    fn favorite_document_id_encodes_segments() {
        let id = Favorite::document_id("a/b", RoutineTarget::Predefined, "r 1");
        assert_eq!(id, "a%2Fb_predefined_r%201");
    }
}
