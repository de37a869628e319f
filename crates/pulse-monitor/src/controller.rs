//! Check cycle controller — the periodic loop that drives probing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};
use uuid::Uuid;

use pulse_core::config::monitor::MonitorConfig;
use pulse_core::traits::SiteStore;
use pulse_entity::CheckUpdate;
use pulse_realtime::NotificationHub;

use crate::pool;
use crate::probe::SiteProber;

/// Runs one check cycle per configured interval.
///
/// Cycles never overlap: the next tick is not serviced until the current
/// cycle has fully completed, and a cycle that overruns its interval
/// delays the following one rather than stacking up. No failure inside a
/// cycle escapes the timer loop.
pub struct CycleController<S> {
    store: Arc<S>,
    prober: SiteProber,
    hub: Arc<NotificationHub>,
    config: MonitorConfig,
}

impl<S: SiteStore> CycleController<S> {
    pub fn new(
        store: Arc<S>,
        prober: SiteProber,
        hub: Arc<NotificationHub>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            store,
            prober,
            hub,
            config,
        }
    }

    /// Run cycles until the shutdown signal flips to `true`.
    ///
    /// The first cycle fires one full interval after startup.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_secs(self.config.cycle_interval_seconds);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_seconds = self.config.cycle_interval_seconds,
            workers = self.config.worker_count,
            "Check cycle controller started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Check cycle controller shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Execute one complete check cycle.
    ///
    /// Fetches the site snapshot, probes every site with bounded
    /// concurrency, persists each outcome, and routes an update to each
    /// owner's live session. A snapshot fetch failure skips the whole
    /// cycle; a per-result persistence failure skips only that result.
    pub async fn run_cycle(&self) {
        let sites = match self.store.list_all_sites().await {
            Ok(sites) => sites,
            Err(err) => {
                error!(error = %err, "Failed to fetch sites, skipping check cycle");
                return;
            }
        };
        if sites.is_empty() {
            debug!("No sites registered, nothing to check");
            return;
        }

        // Owner lookup comes from the same snapshot the probes run over.
        let owners: HashMap<Uuid, Uuid> =
            sites.iter().map(|site| (site.id, site.user_id)).collect();

        info!(site_count = sites.len(), "Check cycle started");

        let prober = &self.prober;
        let outcomes = pool::dispatch(sites, self.config.worker_count, |site| async move {
            prober.probe(&site).await
        })
        .await;

        let mut persisted = 0usize;
        for outcome in outcomes {
            let stored = match self.store.create_health_check(&outcome).await {
                Ok(row) => row,
                Err(err) => {
                    error!(
                        site_id = %outcome.site_id,
                        error = %err,
                        "Failed to persist check result"
                    );
                    continue;
                }
            };
            persisted += 1;

            // A site deleted mid-cycle is persisted but nobody is notified.
            let Some(&owner) = owners.get(&stored.site_id) else {
                debug!(site_id = %stored.site_id, "No owner in snapshot, dropping update");
                continue;
            };

            match serde_json::to_string(&CheckUpdate::from(&stored)) {
                Ok(payload) => self.hub.route(owner, payload),
                Err(err) => {
                    error!(site_id = %stored.site_id, error = %err, "Failed to encode update");
                }
            }
        }

        info!(persisted, "Check cycle completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use pulse_core::config::realtime::RealtimeConfig;
    use pulse_core::error::AppError;
    use pulse_core::result::AppResult;
    use pulse_entity::{HealthCheck, NewHealthCheck, Site};

    /// In-memory store with switchable failure modes.
    struct FakeStore {
        sites: Vec<Site>,
        fail_fetch: bool,
        fail_persist_for: Option<Uuid>,
        fetch_calls: AtomicUsize,
        recorded: Mutex<Vec<NewHealthCheck>>,
    }

    impl FakeStore {
        fn with_sites(sites: Vec<Site>) -> Self {
            Self {
                sites,
                fail_fetch: false,
                fail_persist_for: None,
                fetch_calls: AtomicUsize::new(0),
                recorded: Mutex::new(Vec::new()),
            }
        }

        fn recorded_site_ids(&self) -> Vec<Uuid> {
            self.recorded
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.site_id)
                .collect()
        }
    }

    #[async_trait]
    impl SiteStore for FakeStore {
        async fn list_all_sites(&self) -> AppResult<Vec<Site>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch {
                return Err(AppError::database("connection refused"));
            }
            Ok(self.sites.clone())
        }

        async fn create_health_check(&self, check: &NewHealthCheck) -> AppResult<HealthCheck> {
            if self.fail_persist_for == Some(check.site_id) {
                return Err(AppError::database("insert failed"));
            }
            self.recorded.lock().unwrap().push(check.clone());
            Ok(HealthCheck {
                id: Uuid::new_v4(),
                site_id: check.site_id,
                status_code: check.status_code,
                response_time_ms: check.response_time_ms,
                is_up: check.is_up,
                checked_at: Utc::now(),
            })
        }
    }

    fn site(user_id: Uuid, url: String) -> Site {
        Site {
            id: Uuid::new_v4(),
            user_id,
            url,
            created_at: Utc::now(),
        }
    }

    /// A refused-connection URL: bind, note the port, close the listener.
    async fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/")
    }

    async fn live_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await
                .unwrap();
        });
        format!("http://{addr}/")
    }

    fn controller(store: Arc<FakeStore>, hub: Arc<NotificationHub>) -> CycleController<FakeStore> {
        let config = MonitorConfig {
            probe_timeout_seconds: 2,
            ..MonitorConfig::default()
        };
        let prober = SiteProber::new(&config).unwrap();
        CycleController::new(store, prober, hub, config)
    }

    #[tokio::test]
    async fn cycle_persists_and_notifies_owner() {
        let owner = Uuid::new_v4();
        let target = site(owner, live_url().await);
        let store = Arc::new(FakeStore::with_sites(vec![target.clone()]));
        let hub = Arc::new(NotificationHub::new(&RealtimeConfig::default()));
        let (_handle, mut rx) = hub.register(owner);

        controller(Arc::clone(&store), Arc::clone(&hub))
            .run_cycle()
            .await;

        assert_eq!(store.recorded_site_ids(), vec![target.id]);
        let payload = rx.recv().await.unwrap();
        let update: CheckUpdate = serde_json::from_str(&payload).unwrap();
        assert_eq!(update.site_id, target.id);
        assert!(update.is_up);
        assert_eq!(update.status_code, Some(200));
    }

    #[tokio::test]
    async fn mixed_cycle_notifies_each_owner_once() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let reachable = site(alice, live_url().await);
        let unreachable = site(bob, dead_url().await);
        let store = Arc::new(FakeStore::with_sites(vec![
            reachable.clone(),
            unreachable.clone(),
        ]));
        let hub = Arc::new(NotificationHub::new(&RealtimeConfig::default()));
        let (_a, mut alice_rx) = hub.register(alice);
        let (_b, mut bob_rx) = hub.register(bob);

        controller(Arc::clone(&store), Arc::clone(&hub))
            .run_cycle()
            .await;

        let mut recorded = store.recorded_site_ids();
        recorded.sort();
        let mut expected = vec![reachable.id, unreachable.id];
        expected.sort();
        assert_eq!(recorded, expected);

        let alice_update: CheckUpdate =
            serde_json::from_str(&alice_rx.recv().await.unwrap()).unwrap();
        assert_eq!(alice_update.site_id, reachable.id);
        assert!(alice_update.is_up);
        assert_eq!(alice_update.status_code, Some(200));
        assert!(alice_rx.try_recv().is_err());

        let bob_update: CheckUpdate = serde_json::from_str(&bob_rx.recv().await.unwrap()).unwrap();
        assert_eq!(bob_update.site_id, unreachable.id);
        assert!(!bob_update.is_up);
        assert_eq!(bob_update.status_code, None);
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn fetch_failure_skips_whole_cycle() {
        let mut store = FakeStore::with_sites(vec![site(Uuid::new_v4(), "http://x/".into())]);
        store.fail_fetch = true;
        let store = Arc::new(store);
        let hub = Arc::new(NotificationHub::new(&RealtimeConfig::default()));

        controller(Arc::clone(&store), hub).run_cycle().await;

        assert!(store.recorded_site_ids().is_empty());
    }

    #[tokio::test]
    async fn persist_failure_skips_only_that_result() {
        let owner = Uuid::new_v4();
        let healthy = site(owner, dead_url().await);
        let doomed = site(owner, dead_url().await);
        let mut store = FakeStore::with_sites(vec![healthy.clone(), doomed.clone()]);
        store.fail_persist_for = Some(doomed.id);
        let store = Arc::new(store);
        let hub = Arc::new(NotificationHub::new(&RealtimeConfig::default()));
        let (_handle, mut rx) = hub.register(owner);

        controller(Arc::clone(&store), Arc::clone(&hub))
            .run_cycle()
            .await;

        assert_eq!(store.recorded_site_ids(), vec![healthy.id]);
        // Only the persisted check produced an update.
        let update: CheckUpdate = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(update.site_id, healthy.id);
        assert!(!update.is_up);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_site_list_is_a_complete_no_op() {
        let store = Arc::new(FakeStore::with_sites(Vec::new()));
        let hub = Arc::new(NotificationHub::new(&RealtimeConfig::default()));
        let bystander = Uuid::new_v4();
        let (_handle, mut rx) = hub.register(bystander);

        controller(Arc::clone(&store), Arc::clone(&hub))
            .run_cycle()
            .await;

        // Nothing persisted, nothing routed.
        assert!(store.recorded_site_ids().is_empty());
        assert!(rx.try_recv().is_err());
        assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_store_does_not_kill_the_timer_loop() {
        let mut store = FakeStore::with_sites(vec![site(Uuid::new_v4(), "http://x/".into())]);
        store.fail_fetch = true;
        let store = Arc::new(store);
        let hub = Arc::new(NotificationHub::new(&RealtimeConfig::default()));

        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        let looped = controller(Arc::clone(&store), hub);
        let runner = tokio::spawn(async move {
            looped.run(shutdown_rx).await;
        });

        // Two full intervals elapse; each tick fetches, fails, and the
        // loop survives to try again.
        tokio::time::sleep(Duration::from_secs(125)).await;

        assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 2);
        assert!(store.recorded_site_ids().is_empty());
        assert!(!runner.is_finished());

        shutdown_tx.send(true).unwrap();
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn offline_owner_still_gets_check_persisted() {
        let target = site(Uuid::new_v4(), dead_url().await);
        let store = Arc::new(FakeStore::with_sites(vec![target.clone()]));
        let hub = Arc::new(NotificationHub::new(&RealtimeConfig::default()));

        controller(Arc::clone(&store), hub).run_cycle().await;

        assert_eq!(store.recorded_site_ids(), vec![target.id]);
    }
}
