// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Routines (one repository for both personal and predefined routines)
//! - Favorites (join collection for per-user queries)
//! - Sent notifications (optional trigger idempotency ledger)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Favorite, Routine, RoutineTarget};
use crate::services::trigger::NotificationLedger;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Ledger entry written before a new-routine broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SentNotification {
    routine_id: String,
    sent_at: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // Emulator connections skip credential discovery entirely.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Routine Operations ──────────────────────────────────────

    /// Get a routine by ID from the target collection.
    pub async fn get_routine(
        &self,
        target: RoutineTarget,
        routine_id: &str,
    ) -> Result<Option<Routine>, AppError> {
        let routine: Option<Routine> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(target.collection())
            .obj()
            .one(routine_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(routine.map(|mut routine| {
            routine.id = routine_id.to_string();
            routine
        }))
    }

    /// List routines, newest first.
    ///
    /// `owner_uid` restricts the query to one user's documents; predefined
    /// routines are listed with `None`.
    pub async fn list_routines(
        &self,
        target: RoutineTarget,
        owner_uid: Option<&str>,
    ) -> Result<Vec<Routine>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(target.collection());

        let query = match owner_uid {
            Some(uid) => {
                let uid = uid.to_string();
                query.filter(move |q| q.for_all([q.field("userId").eq(uid.clone())]))
            }
            None => query,
        };

        query
            .order_by([(
                "fechaCreacion",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a routine. Fails if the ID is already taken.
    pub async fn create_routine(
        &self,
        target: RoutineTarget,
        routine: &Routine,
    ) -> Result<(), AppError> {
        let _: Routine = self
            .get_client()?
            .fluent()
            .insert()
            .into(target.collection())
            .document_id(&routine.id)
            .object(routine)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            routine_id = %routine.id,
            collection = target.collection(),
            "Routine created"
        );
        Ok(())
    }

    /// Overwrite an existing routine document.
    pub async fn update_routine(
        &self,
        target: RoutineTarget,
        routine: &Routine,
    ) -> Result<(), AppError> {
        let _: Routine = self
            .get_client()?
            .fluent()
            .update()
            .in_col(target.collection())
            .document_id(&routine.id)
            .object(routine)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a routine document.
    pub async fn delete_routine(
        &self,
        target: RoutineTarget,
        routine_id: &str,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(target.collection())
            .document_id(routine_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            routine_id,
            collection = target.collection(),
            "Routine deleted"
        );
        Ok(())
    }

    // ─── Favorite Operations ─────────────────────────────────────

    /// Mark a routine as a favorite for a user. Idempotent.
    pub async fn set_favorite(&self, favorite: &Favorite) -> Result<(), AppError> {
        let doc_id = Favorite::document_id(&favorite.uid, favorite.target, &favorite.routine_id);

        let _: Favorite = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FAVORITES)
            .document_id(&doc_id)
            .object(favorite)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove a favorite. Removing a missing favorite is not an error.
    pub async fn remove_favorite(
        &self,
        uid: &str,
        target: RoutineTarget,
        routine_id: &str,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::FAVORITES)
            .document_id(Favorite::document_id(uid, target, routine_id))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All favorites for a user, most recently added first.
    pub async fn list_favorites(&self, uid: &str) -> Result<Vec<Favorite>, AppError> {
        let uid = uid.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FAVORITES)
            .filter(move |q| q.for_all([q.field("uid").eq(uid.clone())]))
            .order_by([("added_at", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Sent Notification Ledger ────────────────────────────────

    /// Record that a routine's broadcast is about to be sent.
    ///
    /// Returns `false` if the routine was already recorded.
    pub async fn claim_routine_notification(&self, routine_id: &str) -> Result<bool, AppError> {
        let entry = SentNotification {
            routine_id: routine_id.to_string(),
            sent_at: crate::time_utils::now_rfc3339(),
        };

        let result: Result<SentNotification, _> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::SENT_NOTIFICATIONS)
            .document_id(routine_id)
            .object(&entry)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }
}

impl NotificationLedger for FirestoreDb {
    fn claim(&self, routine_id: &str) -> BoxFuture<'_, Result<bool, AppError>> {
        let routine_id = routine_id.to_string();
        Box::pin(async move { self.claim_routine_notification(&routine_id).await })
    }
}
