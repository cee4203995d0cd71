// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use gymtrack_relay::config::Config;
use gymtrack_relay::db::FirestoreDb;
use gymtrack_relay::routes::create_router;
use gymtrack_relay::services::{FirebaseTokenVerifier, MockPushGateway, TriggerService};
use gymtrack_relay::AppState;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub const TEST_KID: &str = "test-kid";
const PRIVATE_PEM: &str = include_str!("../fixtures/test_rsa_private.pem");
const PUBLIC_PEM: &str = include_str!("../fixtures/test_rsa_public.pem");

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Everything a route test needs to poke at.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub push: MockPushGateway,
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let config = Config::test_default();
    let db = test_db_offline();

    let auth_verifier = FirebaseTokenVerifier::new_with_static_key(
        &config.gcp_project_id,
        TEST_KID,
        DecodingKey::from_rsa_pem(PUBLIC_PEM.as_bytes()).expect("test public key"),
    )
    .expect("test verifier");

    let push = MockPushGateway::new();
    let trigger_service = TriggerService::new(Arc::new(push.clone()));

    let state = Arc::new(AppState {
        config,
        db,
        auth_verifier: Arc::new(auth_verifier),
        trigger_service,
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        push,
    }
}

/// Create a Firebase-style ID token for `uid`, signed with the test key.
#[allow(dead_code)]
pub fn create_test_id_token(uid: &str) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        iss: String,
        aud: &'a str,
        sub: &'a str,
        email: String,
        iat: u64,
        exp: u64,
        auth_time: u64,
    }

    let project = Config::test_default().gcp_project_id;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let claims = Claims {
        iss: format!("https://securetoken.google.com/{}", project),
        aud: &project,
        sub: uid,
        email: format!("{}@example.com", uid),
        iat: now,
        exp: now + 3600,
        auth_time: now,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());

    encode(
        &header,
        &claims,
        &EncodingKey::from_rsa_pem(PRIVATE_PEM.as_bytes()).unwrap(),
    )
    .unwrap()
}

/// A Firestore `created` event body for a predefined routine.
#[allow(dead_code)]
pub fn routine_created_event(document_id: &str, name: Option<&str>) -> serde_json::Value {
    let mut fields = serde_json::json!({
        "nivel": { "stringValue": "intermedio" },
        "ejercicios": { "arrayValue": { "values": [
            { "mapValue": { "fields": {
                "nombre": { "stringValue": "Sentadilla" },
                "series": { "integerValue": "4" }
            } } }
        ] } }
    });
    if let Some(name) = name {
        fields["nombreRutina"] = serde_json::json!({ "stringValue": name });
    }

    serde_json::json!({
        "value": {
            "name": format!(
                "projects/test-project/databases/(default)/documents/rutinas_predefinidas/{}",
                document_id
            ),
            "fields": fields,
            "createTime": "2026-01-15T10:00:00Z",
            "updateTime": "2026-01-15T10:00:00Z"
        }
    })
}
