//! Notification repository contracts and SQLite implementation.

use crate::model::notification::{Notification, NotificationKind};
use crate::model::RecordId;
use crate::repo::{
    bool_to_int, datetime_to_db, ensure_connection_ready, parse_datetime, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

/// Repository interface for notifications.
pub trait NotificationRepository {
    fn create_notification(&self, notification: &Notification) -> RepoResult<RecordId>;
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Notification>>;
    /// Notifications for `recipient`, newest first.
    fn list_for_recipient(&self, recipient: &str) -> RepoResult<Vec<Notification>>;
    /// Returns `false` when no row has `id`.
    fn mark_read(&self, id: RecordId) -> RepoResult<bool>;
}

/// SQLite-backed notification repository.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn create_notification(&self, notification: &Notification) -> RepoResult<RecordId> {
        self.conn.execute(
            "INSERT INTO notifications (recipient, title, message, timestamp, is_read, kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                notification.recipient.as_str(),
                notification.title.as_str(),
                notification.message.as_str(),
                datetime_to_db(notification.timestamp),
                bool_to_int(notification.is_read),
                notification_kind_to_db(notification.kind),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Notification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recipient, title, message, timestamp, is_read, kind
             FROM notifications
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_notification_row(row)?));
        }
        Ok(None)
    }

    fn list_for_recipient(&self, recipient: &str) -> RepoResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recipient, title, message, timestamp, is_read, kind
             FROM notifications
             WHERE recipient = ?1
             ORDER BY timestamp DESC, id DESC;",
        )?;
        let mut rows = stmt.query([recipient])?;
        let mut notifications = Vec::new();
        while let Some(row) = rows.next()? {
            notifications.push(parse_notification_row(row)?);
        }
        Ok(notifications)
    }

    fn mark_read(&self, id: RecordId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("UPDATE notifications SET is_read = 1 WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<Notification> {
    let kind_text: String = row.get("kind")?;
    let kind = parse_notification_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid notification kind `{kind_text}` in notifications.kind"
        ))
    })?;

    let is_read = match row.get::<_, i64>("is_read")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_read value `{other}` in notifications.is_read"
            )));
        }
    };

    let timestamp_text: String = row.get("timestamp")?;

    Ok(Notification {
        id: Some(row.get("id")?),
        recipient: row.get("recipient")?,
        title: row.get("title")?,
        message: row.get("message")?,
        timestamp: parse_datetime(&timestamp_text, "notifications.timestamp")?,
        is_read,
        kind,
    })
}

fn notification_kind_to_db(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::System => "SYSTEM",
        NotificationKind::Registration => "REGISTRATION",
        NotificationKind::Alert => "ALERT",
    }
}

fn parse_notification_kind(value: &str) -> Option<NotificationKind> {
    match value {
        "SYSTEM" => Some(NotificationKind::System),
        "REGISTRATION" => Some(NotificationKind::Registration),
        "ALERT" => Some(NotificationKind::Alert),
        _ => None,
    }
}
