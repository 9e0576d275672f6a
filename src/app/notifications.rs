//! Banner tray for alert push events.

use crate::models::notice::{Notice, Severity};
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoticeId(u64);

#[derive(Clone, Debug)]
pub struct Banner {
    pub id: NoticeId,
    pub notice: Notice,
    pub received_at: DateTime<Local>,
    expires_at: Instant,
}

impl Banner {
    pub fn severity(&self) -> Severity {
        self.notice.severity()
    }
}

/// Every presented notice gets its own banner; nothing is merged or
/// throttled.
#[derive(Debug)]
pub struct NotificationPresenter {
    lifetime: Duration,
    next_id: u64,
    banners: Vec<Banner>,
}

impl Default for NotificationPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME)
    }
}

impl NotificationPresenter {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            next_id: 0,
            banners: Vec::new(),
        }
    }

    pub fn set_lifetime(&mut self, lifetime: Duration) {
        self.lifetime = lifetime;
    }

    pub fn present(&mut self, notice: Notice, now: Instant) -> NoticeId {
        self.next_id += 1;
        let id = NoticeId(self.next_id);
        match notice.severity() {
            Severity::Danger => tracing::warn!("Emergency alert: {}", notice.title()),
            Severity::Info => tracing::info!("Notice: {}", notice.title()),
        }
        self.banners.push(Banner {
            id,
            notice,
            received_at: Local::now(),
            expires_at: now + self.lifetime,
        });
        id
    }

    /// Removes a banner early. Returns false when it is already gone, e.g.
    /// because it expired first.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let before = self.banners.len();
        self.banners.retain(|b| b.id != id);
        self.banners.len() != before
    }

    /// Drops every banner whose lifetime has elapsed by `now`.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.banners.len();
        self.banners.retain(|b| b.expires_at > now);
        before - self.banners.len()
    }

    pub fn visible(&self) -> &[Banner] {
        &self.banners
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.banners.iter().map(|b| b.expires_at).min()
    }
}
