//! In-app notification record.

use super::RecordId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    System,
    Registration,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Option<RecordId>,
    /// Username of the receiving account.
    pub recipient: String,
    pub title: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub is_read: bool,
    pub kind: NotificationKind,
}
