// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The one check every notification display goes through.

use super::platform::{NotificationPlatform, PermissionState, POST_NOTIFICATIONS_MIN_SDK};
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Whether this platform version enforces the runtime notification
/// permission.
pub fn requires_runtime_permission(platform: &dyn NotificationPlatform) -> bool {
    platform.sdk_version() >= POST_NOTIFICATIONS_MIN_SDK
}

/// Whether this device may show a notification right now.
///
/// Older platform versions display unconditionally; newer ones need the
/// runtime permission.
pub fn can_display(platform: &dyn NotificationPlatform) -> bool {
    !requires_runtime_permission(platform)
        || platform.permission_state() == PermissionState::Granted
}

/// Time-based notification ids.
///
/// Ids are epoch milliseconds folded into a positive `i32`, bumped when two
/// notifications land in the same millisecond. The fold wraps roughly every
/// 24.8 days, so ids are distinct within that window only; a notification
/// still on screen from a full wrap earlier can be replaced.
#[derive(Debug, Default)]
pub struct NotificationIdGenerator {
    last: AtomicI64,
}

impl NotificationIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i32 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        let id = now.max(previous + 1);
        (id & i64::from(i32::MAX)) as i32
    }
}
