//! Notification use-case service.
//!
//! Delivery is out of scope: notifications are stored and listed only.

use crate::model::notification::{Notification, NotificationKind};
use crate::model::RecordId;
use crate::repo::notification_repo::NotificationRepository;
use crate::service::{ServiceError, ServiceResult};
use chrono::Local;
use log::{debug, info};

pub struct NotificationService<N: NotificationRepository> {
    repo: N,
}

impl<N: NotificationRepository> NotificationService<N> {
    pub fn new(repo: N) -> Self {
        Self { repo }
    }

    /// Stores an unread notification stamped with the current local time.
    pub fn notify(
        &self,
        recipient: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> ServiceResult<Notification> {
        let notification = Notification {
            id: None,
            recipient: recipient.into(),
            title: title.into(),
            message: message.into(),
            timestamp: Local::now().naive_local(),
            is_read: false,
            kind,
        };
        let id = self.repo.create_notification(&notification)?;
        info!("event=notification_create module=service status=ok id={id}");
        self.repo
            .find_by_id(id)?
            .ok_or(ServiceError::InconsistentState(
                "created notification not found in read-back",
            ))
    }

    /// Notifications for `recipient`, newest first.
    pub fn list_for_recipient(&self, recipient: &str) -> ServiceResult<Vec<Notification>> {
        Ok(self.repo.list_for_recipient(recipient)?)
    }

    /// Marks one notification read; unknown ids are ignored.
    pub fn mark_as_read(&self, id: RecordId) -> ServiceResult<()> {
        if !self.repo.mark_read(id)? {
            debug!("event=notification_read module=service status=skipped id={id}");
        }
        Ok(())
    }
}
