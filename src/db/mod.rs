//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Personal routines, one document per routine
    pub const ROUTINES: &str = "rutinas";
    pub const PREDEFINED_ROUTINES: &str = "rutinas_predefinidas";
    /// Favorite join records (keyed by uid, target and routine id)
    pub const FAVORITES: &str = "favoritos";
    /// Trigger idempotency ledger (keyed by predefined routine id)
    pub const SENT_NOTIFICATIONS: &str = "notificaciones_enviadas";
}
