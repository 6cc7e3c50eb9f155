//! Debounced advisory driver.
//!
//! One task owns the [`AdvisorMachine`] and multiplexes snapshot changes,
//! the debounce deadline and finished oracle calls. Oracle calls run in
//! their own tasks and report back over a channel, stamped with the
//! generation that issued them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use cs_domain::config::AdvisorConfig;
use cs_domain::error::{Error, Result};
use cs_domain::{AdvisoryResult, LoadSummary};
use cs_load::LoadSnapshot;
use cs_providers::AdvisoryOracle;

use super::machine::{AdvisorMachine, AdvisorPhase, AdvisorView, Observed};

#[derive(Debug, Clone, Copy)]
pub struct AdvisorSettings {
    pub debounce: Duration,
    /// Upper bound per oracle call; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl AdvisorSettings {
    pub fn from_config(cfg: &AdvisorConfig) -> Self {
        Self {
            debounce: Duration::from_millis(cfg.debounce_ms),
            timeout: (cfg.timeout_ms > 0).then(|| Duration::from_millis(cfg.timeout_ms)),
        }
    }
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self::from_config(&AdvisorConfig::default())
    }
}

type Completion = (u64, Result<AdvisoryResult>);

/// Handle to the running advisory task.
pub struct Advisor {
    view_rx: watch::Receiver<AdvisorView>,
    /// Latest published load, read to tell whether the driver has caught up.
    latest: watch::Receiver<LoadSnapshot>,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl Advisor {
    /// Start observing `snapshots`. The current snapshot is observed
    /// immediately, so a restored non-empty load gets an advisory too.
    pub fn spawn(
        oracle: Arc<dyn AdvisoryOracle>,
        mut snapshots: watch::Receiver<LoadSnapshot>,
        settings: AdvisorSettings,
    ) -> Self {
        let mut machine = AdvisorMachine::new();
        let mut deadline = None;
        let initial = snapshots.borrow_and_update().clone();
        apply_observation(machine.observe(&initial), &mut deadline, settings.debounce);

        let (view_tx, view_rx) = watch::channel(machine.view());
        let latest = snapshots.clone();
        let shutdown = Arc::new(Notify::new());

        tracing::info!(
            oracle = oracle.provider_id(),
            debounce_ms = settings.debounce.as_millis() as u64,
            "advisor started"
        );

        let task = tokio::spawn(run(
            machine,
            deadline,
            oracle,
            snapshots,
            view_tx,
            settings,
            shutdown.clone(),
        ));

        Self {
            view_rx,
            latest,
            shutdown,
            task,
        }
    }

    /// Current view.
    pub fn view(&self) -> AdvisorView {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdvisorView> {
        self.view_rx.clone()
    }

    /// Wait until the driver has observed the latest published load and no
    /// advisory is pending for it, and return the view at that point.
    pub async fn settled(&self) -> AdvisorView {
        let mut rx = self.view_rx.clone();
        let result = rx
            .wait_for(|v| !v.phase.is_pending() && v.revision >= self.latest.borrow().revision)
            .await;
        match result {
            Ok(view) => view.clone(),
            Err(_) => self.view(),
        }
    }

    /// Stop the driver. In-flight oracle calls finish on their own and are
    /// dropped.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "advisor task ended abnormally");
        }
    }
}

async fn run(
    mut machine: AdvisorMachine,
    mut deadline: Option<Instant>,
    oracle: Arc<dyn AdvisoryOracle>,
    mut snapshots: watch::Receiver<LoadSnapshot>,
    view_tx: watch::Sender<AdvisorView>,
    settings: AdvisorSettings,
    shutdown: Arc<Notify>,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    tracing::debug!("load session closed, advisor stopping");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                apply_observation(machine.observe(&snapshot), &mut deadline, settings.debounce);
            }
            () = async {
                if let Some(d) = deadline {
                    time::sleep_until(d).await;
                }
            }, if deadline.is_some() => {
                deadline = None;
                if let Some((generation, summary)) = machine.settle() {
                    spawn_request(oracle.clone(), generation, summary, settings.timeout, done_tx.clone());
                }
            }
            Some((generation, outcome)) = done_rx.recv() => {
                machine.resolve(generation, outcome);
            }
            () = shutdown.notified() => {
                tracing::debug!("advisor shutdown requested");
                break;
            }
        }
        publish(&view_tx, &machine);
    }
}

fn apply_observation(observed: Observed, deadline: &mut Option<Instant>, debounce: Duration) {
    match observed {
        Observed::Unchanged => {}
        Observed::Arm => *deadline = Some(Instant::now() + debounce),
        Observed::Disarm => *deadline = None,
    }
}

fn publish(view_tx: &watch::Sender<AdvisorView>, machine: &AdvisorMachine) {
    let next = machine.view();
    view_tx.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

fn spawn_request(
    oracle: Arc<dyn AdvisoryOracle>,
    generation: u64,
    summary: LoadSummary,
    timeout: Option<Duration>,
    done_tx: mpsc::UnboundedSender<Completion>,
) {
    tokio::spawn(async move {
        let call = oracle.request_judgment(&summary);
        let outcome = match timeout {
            Some(limit) => match time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::Timeout(format!(
                    "advisory request exceeded {}ms",
                    limit.as_millis()
                ))),
            },
            None => call.await,
        };
        // The driver may already be gone; nothing to deliver to then.
        let _ = done_tx.send((generation, outcome));
    });
}
