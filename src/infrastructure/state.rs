//! Shared application state

use std::sync::Arc;

use crate::application::ports::outbound::{
    AuthPort, ClockPort, NotificationPort, RandomPort, RecordStorePort,
};
use crate::application::services::{AuthService, RollHistoryView, RollService};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::discord::DiscordNotifier;
use crate::infrastructure::memory_store::InMemoryRecordStore;
use crate::infrastructure::pocketbase::PocketBaseClient;
use crate::infrastructure::random::{SeededRandom, ThreadRngAdapter};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub roll_service: RollService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        // PocketBase when configured, otherwise a process-local store
        let (store, auth): (Arc<dyn RecordStorePort>, Arc<dyn AuthPort>) =
            match config.store_url.as_deref() {
                Some(url) => {
                    let client = Arc::new(PocketBaseClient::new(url));
                    (client.clone(), client)
                }
                None => {
                    tracing::warn!("ROLLER_STORE_URL not set, rolls are kept in memory only");
                    let store = Arc::new(InMemoryRecordStore::new());
                    (store.clone(), store)
                }
            };

        let notifier = Arc::new(DiscordNotifier::new(
            config.discord_webhook_url.clone(),
            config.discord_channel_id.clone(),
            config.roll_link_base_url.clone(),
        ));

        let rng: Arc<dyn RandomPort> = match config.rng_seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRngAdapter),
        };

        Self::from_parts(config, store, auth, notifier, rng, Arc::new(SystemClock))
    }

    /// Wire the services from explicit adapters
    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn RecordStorePort>,
        auth: Arc<dyn AuthPort>,
        notifier: Arc<dyn NotificationPort>,
        rng: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let history = Arc::new(RollHistoryView::new());

        let roll_service = RollService::new(
            store,
            notifier,
            rng,
            clock,
            history.clone(),
            config.history_per_page,
        );
        let auth_service = AuthService::new(auth, history);

        Self {
            config,
            roll_service,
            auth_service,
        }
    }
}
