use super::{
    chat_table::ChatTable, config::Config, notifications::NotificationPresenter,
    view_sync::ViewSyncController,
};
use crate::{
    core::asset_cache::TableLocale,
    events::app_event::ConnectionStatus,
    models::stats::{AdvancedStats, Analytics, Stats, StatsUpdate},
};
use chrono::{DateTime, Local};
use std::time::Duration;

/// A value fetched over the data channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Loadable::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct StatsPanel {
    pub stats: Loadable<Stats>,
    pub advanced: Loadable<AdvancedStats>,
    pub updated_at: Option<DateTime<Local>>,
}

impl Default for StatsPanel {
    fn default() -> Self {
        Self {
            stats: Loadable::Loading,
            advanced: Loadable::Loading,
            updated_at: None,
        }
    }
}

impl StatsPanel {
    /// Applies a pushed update. Figures absent from the payload keep their
    /// previous value.
    pub fn apply_update(&mut self, update: StatsUpdate) {
        let mut stats = self.stats.ready().cloned().unwrap_or_default();
        let mut touched = false;
        if let Some(users) = update.users {
            stats.users = users;
            touched = true;
        }
        if let Some(paid) = update.paid {
            stats.paid = paid;
            touched = true;
        }
        if let Some(active) = update.active {
            stats.active = active;
            touched = true;
        }
        if touched {
            self.stats = Loadable::Ready(stats);
        }

        let mut advanced = self.advanced.ready().cloned().unwrap_or_default();
        touched = false;
        if let Some(dau) = update.dau {
            advanced.dau = dau;
            touched = true;
        }
        if let Some(mau) = update.mau {
            advanced.mau = mau;
            touched = true;
        }
        if let Some(rate) = update.retention_rate {
            advanced.retention_rate = rate;
            touched = true;
        }
        if let Some(ltv) = update.ltv {
            advanced.ltv = ltv;
            touched = true;
        }
        if touched {
            self.advanced = Loadable::Ready(advanced);
        }
        self.updated_at = Some(Local::now());
    }
}

#[derive(Debug)]
pub struct ChartsPanel {
    pub analytics: Analytics,
    /// True until the analytics endpoint has answered.
    pub placeholder: bool,
}

impl Default for ChartsPanel {
    fn default() -> Self {
        Self {
            analytics: Analytics::placeholder(),
            placeholder: true,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    pub connection: ConnectionStatus,
    pub stats: StatsPanel,
    pub charts: ChartsPanel,
    pub chats: ChatTable,
    pub chat_view: ViewSyncController,
    pub notices: NotificationPresenter,
    /// Modal message shown until the operator acknowledges it.
    pub alert: Option<String>,
    pub locale: TableLocale,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        Self {
            connection: ConnectionStatus::default(),
            stats: StatsPanel::default(),
            charts: ChartsPanel::default(),
            chats: ChatTable::new(config.page_size),
            chat_view: ViewSyncController::default(),
            notices: NotificationPresenter::new(Duration::from_secs(config.notice_lifetime_secs)),
            alert: None,
            locale: TableLocale::default(),
        }
    }
}

/// Represents the various states of the application's lifecycle.
#[derive(Debug)]
pub enum AppState {
    LoadingConfig,
    Ready(Box<Dashboard>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_stats_update_keeps_advanced_figures() {
        let mut panel = StatsPanel::default();
        panel.advanced = Loadable::Ready(AdvancedStats {
            dau: 3,
            mau: 30,
            retention_rate: 50.0,
            ltv: 100.0,
        });

        panel.apply_update(StatsUpdate {
            users: Some(5),
            paid: Some(1),
            active: Some(1),
            dau: Some(4),
            ..StatsUpdate::default()
        });

        assert_eq!(panel.stats.ready().map(|s| s.users), Some(5));
        let advanced = panel.advanced.ready().unwrap();
        assert_eq!(advanced.dau, 4);
        assert_eq!(advanced.mau, 30);
        assert_eq!(advanced.ltv, 100.0);
        assert!(panel.updated_at.is_some());
    }

    #[test]
    fn counters_only_update_leaves_advanced_loading() {
        let mut panel = StatsPanel::default();
        panel.apply_update(StatsUpdate {
            users: Some(2),
            ..StatsUpdate::default()
        });
        assert_eq!(panel.advanced, Loadable::Loading);
    }

    #[test]
    fn absent_counters_keep_their_previous_value() {
        let mut panel = StatsPanel::default();
        panel.stats = Loadable::Ready(Stats {
            users: 10,
            paid: 4,
            active: 3,
        });

        let update: StatsUpdate = serde_json::from_str(r#"{"users": 1}"#).unwrap();
        panel.apply_update(update);

        assert_eq!(
            panel.stats,
            Loadable::Ready(Stats {
                users: 1,
                paid: 4,
                active: 3,
            })
        );
    }
}
