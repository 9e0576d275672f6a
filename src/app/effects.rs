use super::{
    command::Command,
    config::{self, Config},
};
use crate::{
    core::{
        api::ApiClient,
        asset_cache::{AssetCache, TableLocale},
        push::{PushClient, PushHandle},
    },
    events::app_event::AppEvent,
};
use eyre::WrapErr;
use std::time::Duration;
use tokio::{runtime::Handle, sync::mpsc};

/// Runs reducer commands on the tokio runtime. Results come back to the UI
/// thread as `AppEvent`s.
pub struct Effects {
    runtime: Handle,
    api: ApiClient,
    cache: Option<AssetCache>,
    push: PushHandle,
    /// Taken by the first `ConnectPush`.
    push_client: Option<PushClient>,
    stats_refresh: Duration,
    event_tx: mpsc::Sender<AppEvent>,
}

impl Effects {
    pub fn new(
        runtime: Handle,
        config: &Config,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, eyre::Report> {
        let api = ApiClient::new(&config.server_url)?;
        let cache = match AssetCache::open(&config.cache_name, config.cached_assets.clone()) {
            Ok(cache) => {
                tracing::debug!("Offline asset cache at {}", cache.dir().display());
                Some(cache)
            }
            Err(e) => {
                tracing::warn!("Offline asset cache unavailable: {}", e);
                None
            }
        };
        let (push_client, push) = PushClient::new(
            config.push_url.clone(),
            Duration::from_secs(config.reconnect_delay_secs),
            event_tx.clone(),
        );

        Ok(Self {
            runtime,
            api,
            cache,
            push,
            push_client: Some(push_client),
            stats_refresh: Duration::from_secs(config.stats_refresh_secs.max(1)),
            event_tx,
        })
    }

    pub fn run_all(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.run(command);
        }
    }

    /// Spawns `fetch` and posts its result as the event built by `wrap`.
    fn fetch<T, F, W>(&self, fetch: F, wrap: W)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, eyre::Report>> + Send + 'static,
        W: FnOnce(Result<T, String>) -> AppEvent + Send + 'static,
    {
        let tx = self.event_tx.clone();
        self.runtime.spawn(async move {
            let result = fetch.await.map_err(|e| format!("{:#}", e));
            if tx.send(wrap(result)).await.is_err() {
                tracing::error!("Failed to deliver fetch result: channel is closed.");
            }
        });
    }

    pub fn run(&mut self, command: Command) {
        tracing::trace!("Running {:?}", command);
        match command {
            Command::ConnectPush => self.connect_push(),
            Command::LoadLocale => self.load_locale(),
            Command::FetchStats => {
                let api = self.api.clone();
                self.fetch(async move { api.stats().await }, AppEvent::StatsLoaded);
            }
            Command::FetchAdvancedStats => {
                let api = self.api.clone();
                self.fetch(
                    async move { api.advanced_stats().await },
                    AppEvent::AdvancedStatsLoaded,
                );
            }
            Command::FetchAnalytics => {
                let api = self.api.clone();
                self.fetch(async move { api.analytics().await }, AppEvent::AnalyticsLoaded);
            }
            Command::FetchChats => {
                let api = self.api.clone();
                self.fetch(async move { api.chats().await }, AppEvent::ChatsLoaded);
            }
            Command::FetchTranscript { identity, ticket } => {
                let api = self.api.clone();
                let target = identity.clone();
                self.fetch(async move { api.chat(&target).await }, move |result| {
                    AppEvent::TranscriptLoaded {
                        identity,
                        ticket,
                        result,
                    }
                });
            }
            Command::FetchExport(identity) => {
                let api = self.api.clone();
                let target = identity.clone();
                self.fetch(async move { api.export(&target).await }, move |result| {
                    AppEvent::ExportLoaded { identity, result }
                });
            }
            Command::Send(signal) => self.push.send(signal),
            Command::SaveConfig(config) => {
                self.runtime.spawn(async move {
                    if let Err(e) = config::save(&config).await {
                        tracing::error!("Failed to save config: {:#}", e);
                    }
                });
            }
            Command::OpenUrl(location) => {
                if let Err(e) = self.open_url(&location) {
                    tracing::error!("{:#}", e);
                    if self
                        .event_tx
                        .try_send(AppEvent::DownloadFailed(format!("{:#}", e)))
                        .is_err()
                    {
                        tracing::error!("Failed to report download failure: channel is full or closed.");
                    }
                }
            }
        }
    }

    fn open_url(&self, location: &str) -> Result<(), eyre::Report> {
        let url = self.api.resolve(location)?;
        tracing::info!("Opening {}", url);
        webbrowser::open(url.as_str())
            .wrap_err_with(|| format!("Failed to open browser for {}", url))
    }

    fn connect_push(&mut self) {
        let Some(client) = self.push_client.take() else {
            tracing::warn!("Push client already started");
            return;
        };
        self.runtime.spawn(client.run());

        let tx = self.event_tx.clone();
        let period = self.stats_refresh;
        self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(AppEvent::StatsTick).await.is_err() {
                    return;
                }
            }
        });
    }

    fn load_locale(&self) {
        let api = self.api.clone();
        let cache = self.cache.clone();
        self.fetch(
            async move {
                let bytes = match &cache {
                    Some(cache) => {
                        cache.install(&api).await;
                        cache.fetch(&api, TableLocale::BUNDLE_PATH).await?
                    }
                    None => api.get_bytes(TableLocale::BUNDLE_PATH).await?,
                };
                TableLocale::parse(&bytes)
            },
            AppEvent::LocaleLoaded,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unresolvable_download_is_reported_back() {
        let (event_tx, mut event_rx) = mpsc::channel(4);
        let mut effects =
            Effects::new(Handle::current(), &Config::default(), event_tx).unwrap();

        effects.run(Command::OpenUrl("http://[".into()));

        assert!(matches!(
            event_rx.try_recv(),
            Ok(AppEvent::DownloadFailed(_))
        ));
    }
}
