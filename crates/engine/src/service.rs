//! Gamification service: a single task that owns the controller and
//! serializes tracked events with the periodic accrual tick.

use std::time::Duration;

use common::models::{AchievementCategory, GamificationState, PendingToast, ToolbarAction};
use common::{Error, Result};
use serde::Serialize;
use store::KvStore;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::achievements::AchievementView;
use crate::clock::Clock;
use crate::controller::{Gamification, ProgressSummary, ACCRUAL_INTERVAL};
use crate::streaks::CalendarCell;

/// Configuration for the gamification service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Auto-dismiss delay for unlock toasts; `None` keeps them until dismissed
    pub toast_ttl: Option<Duration>,
    /// Bound on queued commands
    pub queue_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            toast_ttl: Some(Duration::from_secs(3)),
            queue_capacity: 64,
        }
    }
}

/// Result of one tracked event, captured before any other command runs
#[derive(Debug, Clone, Serialize)]
pub struct TrackOutcome {
    /// Toasts queued by this event
    pub unlocked: Vec<PendingToast>,
    pub progress: ProgressSummary,
}

enum Command {
    TrackWords(u64, oneshot::Sender<TrackOutcome>),
    TrackFormat(ToolbarAction, oneshot::Sender<TrackOutcome>),
    TrackSave(u64, oneshot::Sender<TrackOutcome>),
    ToggleEnabled(oneshot::Sender<bool>),
    DismissToast(Uuid, oneshot::Sender<bool>),
    ExpireToast(Uuid),
    State(oneshot::Sender<GamificationState>),
    PendingToasts(oneshot::Sender<Vec<PendingToast>>),
    Summary(oneshot::Sender<ProgressSummary>),
    Calendar(oneshot::Sender<Vec<CalendarCell>>),
    Board(Option<AchievementCategory>, oneshot::Sender<Vec<AchievementView>>),
}

/// Cloneable handle used by everything outside the service task
#[derive(Clone)]
pub struct GamificationHandle {
    tx: mpsc::Sender<Command>,
}

impl GamificationHandle {
    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| Error::ServiceUnavailable)?;
        rx.await.map_err(|_| Error::ServiceUnavailable)
    }

    pub async fn track_words(&self, current_word_count: u64) -> Result<TrackOutcome> {
        self.request(|r| Command::TrackWords(current_word_count, r))
            .await
    }

    pub async fn track_format(&self, action: ToolbarAction) -> Result<TrackOutcome> {
        self.request(|r| Command::TrackFormat(action, r)).await
    }

    pub async fn track_save(&self, word_count: u64) -> Result<TrackOutcome> {
        self.request(|r| Command::TrackSave(word_count, r)).await
    }

    /// Returns the new enabled flag
    pub async fn toggle_enabled(&self) -> Result<bool> {
        self.request(Command::ToggleEnabled).await
    }

    /// Returns false if the toast was already gone
    pub async fn dismiss_toast(&self, id: Uuid) -> Result<bool> {
        self.request(|r| Command::DismissToast(id, r)).await
    }

    pub async fn state(&self) -> Result<GamificationState> {
        self.request(Command::State).await
    }

    pub async fn pending_toasts(&self) -> Result<Vec<PendingToast>> {
        self.request(Command::PendingToasts).await
    }

    pub async fn summary(&self) -> Result<ProgressSummary> {
        self.request(Command::Summary).await
    }

    pub async fn calendar(&self) -> Result<Vec<CalendarCell>> {
        self.request(Command::Calendar).await
    }

    pub async fn board(
        &self,
        category: Option<AchievementCategory>,
    ) -> Result<Vec<AchievementView>> {
        self.request(|r| Command::Board(category, r)).await
    }
}

/// Owns the controller; runs until every handle is dropped
pub struct GamificationService<S, C> {
    controller: Gamification<S, C>,
    rx: mpsc::Receiver<Command>,
    // Weak so that pending toast timers do not keep the service alive
    expiry_tx: mpsc::WeakSender<Command>,
    config: ServiceConfig,
}

impl<S, C> GamificationService<S, C>
where
    S: KvStore + 'static,
    C: Clock + 'static,
{
    pub fn new(
        controller: Gamification<S, C>,
        config: ServiceConfig,
    ) -> (Self, GamificationHandle) {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let service = Self {
            controller,
            rx,
            expiry_tx: tx.downgrade(),
            config,
        };
        (service, GamificationHandle { tx })
    }

    /// Spawn the service on the current runtime
    pub fn spawn(controller: Gamification<S, C>, config: ServiceConfig) -> GamificationHandle {
        let (service, handle) = Self::new(controller, config);
        tokio::spawn(service.run());
        handle
    }

    /// Process commands and accrual ticks until all handles are dropped
    pub async fn run(mut self) {
        info!(
            "Starting gamification service (accrual every {:?})",
            ACCRUAL_INTERVAL
        );

        let mut ticker = interval_at(Instant::now() + ACCRUAL_INTERVAL, ACCRUAL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let enabled = self.controller.is_enabled();
            tokio::select! {
                command = self.rx.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command);
                    if !enabled && self.controller.is_enabled() {
                        // Resume with a full period rather than an immediate tick
                        ticker.reset();
                    }
                }
                _ = ticker.tick(), if enabled => {
                    debug!("Accrual tick");
                    let toasts = self.controller.tick();
                    self.schedule_expiry(&toasts);
                }
            }
        }

        info!("Gamification service stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::TrackWords(count, reply) => {
                let toasts = self.controller.track_words(count);
                let _ = reply.send(self.outcome(toasts));
            }
            Command::TrackFormat(action, reply) => {
                let toasts = self.controller.track_format(action);
                let _ = reply.send(self.outcome(toasts));
            }
            Command::TrackSave(count, reply) => {
                let toasts = self.controller.track_save(count);
                let _ = reply.send(self.outcome(toasts));
            }
            Command::ToggleEnabled(reply) => {
                let _ = reply.send(self.controller.toggle_enabled());
            }
            Command::DismissToast(id, reply) => {
                let _ = reply.send(self.controller.dismiss_toast(id));
            }
            Command::ExpireToast(id) => {
                if self.controller.dismiss_toast(id) {
                    debug!("Toast {} expired", id);
                }
            }
            Command::State(reply) => {
                let _ = reply.send(self.controller.state().clone());
            }
            Command::PendingToasts(reply) => {
                let _ = reply.send(self.controller.pending_toasts().to_vec());
            }
            Command::Summary(reply) => {
                let _ = reply.send(self.controller.summary());
            }
            Command::Calendar(reply) => {
                let _ = reply.send(self.controller.calendar());
            }
            Command::Board(category, reply) => {
                let _ = reply.send(self.controller.board(category));
            }
        }
    }

    fn outcome(&self, unlocked: Vec<PendingToast>) -> TrackOutcome {
        self.schedule_expiry(&unlocked);
        TrackOutcome {
            unlocked,
            progress: self.controller.summary(),
        }
    }

    fn schedule_expiry(&self, toasts: &[PendingToast]) {
        let Some(ttl) = self.config.toast_ttl else {
            return;
        };
        for toast in toasts {
            let id = toast.id;
            let weak = self.expiry_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(ttl).await;
                if let Some(tx) = weak.upgrade() {
                    let _ = tx.send(Command::ExpireToast(id)).await;
                }
            });
        }
    }
}
