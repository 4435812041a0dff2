//! Status poller
//!
//! Polls one status source per task, forever, until its token is cancelled.
//! Each cycle marks the current status as loading, resolves the source,
//! replaces the status wholesale and sleeps for the refresh interval plus a
//! random jitter. Failures become error placeholders; they never stop the
//! loop.
//!
//! A failed poll of a container keeps its child watches running so the tree
//! comes back intact on the next container result. While the container shows
//! its error placeholder those children are not part of the snapshot.
//!
//! [`WatchHandle::cancel`] and the task's state updates are serialized on the
//! children lock: once `cancel` returns, no fetch result is applied anymore.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::Rng;
use statusci_core::domain::status::{Status, StatusBody};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::tree::ChildWatches;
use crate::service::StatusResolver;
use crate::source::StatusSource;

/// Polling cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Base delay between two polls of one source
    pub refresh_interval: Duration,
    /// Upper bound of the random delay added to every poll
    pub max_jitter: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(10),
            max_jitter: Duration::from_millis(500),
        }
    }
}

impl PollSettings {
    /// Delay before the next poll
    pub fn next_delay(&self) -> Duration {
        let max_jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter_ms = if max_jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=max_jitter_ms)
        };
        self.refresh_interval
            .saturating_add(Duration::from_millis(jitter_ms))
    }
}

/// Spawns and owns polling tasks
#[derive(Clone)]
pub struct StatusPoller {
    resolver: Arc<StatusResolver>,
    settings: PollSettings,
    /// Bumped on every status change anywhere in the tree
    revision: Arc<watch::Sender<u64>>,
}

impl StatusPoller {
    pub fn new(resolver: Arc<StatusResolver>, settings: PollSettings) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            resolver,
            settings,
            revision: Arc::new(revision),
        }
    }

    /// Receiver notified whenever any watched status changes
    pub fn revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision = revision.wrapping_add(1));
    }

    /// Starts polling `source` until `token` is cancelled
    pub fn watch(&self, source: StatusSource, token: CancellationToken) -> WatchHandle {
        let (status_tx, status_rx) = watch::channel(Status::pending(source.initial_name(), None));
        let children = Arc::new(Mutex::new(ChildWatches::default()));

        let task = PollTask {
            poller: self.clone(),
            source: source.clone(),
            status: status_tx,
            children: Arc::clone(&children),
            token: token.clone(),
        };
        tokio::spawn(task.run());

        WatchHandle {
            source,
            status: status_rx,
            children,
            token,
        }
    }

    /// Starts one watch per source, all cancelled together with `token`
    pub fn watch_all(
        &self,
        sources: impl IntoIterator<Item = StatusSource>,
        token: &CancellationToken,
    ) -> Vec<WatchHandle> {
        sources
            .into_iter()
            .map(|source| self.watch(source, token.child_token()))
            .collect()
    }
}

fn lock(children: &Mutex<ChildWatches>) -> MutexGuard<'_, ChildWatches> {
    children.lock().unwrap_or_else(|e| e.into_inner())
}

/// Handle to a polled status source
#[derive(Clone)]
pub struct WatchHandle {
    source: StatusSource,
    status: watch::Receiver<Status>,
    children: Arc<Mutex<ChildWatches>>,
    token: CancellationToken,
}

impl WatchHandle {
    pub fn source(&self) -> &StatusSource {
        &self.source
    }

    /// Status of this node alone; container children are placeholders
    pub fn current(&self) -> Status {
        self.status.borrow().clone()
    }

    /// Receiver notified whenever this node's status changes
    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.clone()
    }

    /// Watches of this node's children
    #[cfg(test)]
    pub fn children(&self) -> Vec<WatchHandle> {
        lock(&self.children).handles()
    }

    /// Status of the whole subtree
    ///
    /// Container placeholders are replaced by the live snapshot of the
    /// matching child watch.
    pub fn snapshot(&self) -> Status {
        let mut status = self.current();

        if let StatusBody::Container(children) = &mut status.body {
            for child in children.iter_mut() {
                let handle = lock(&self.children).find(&child.name).cloned();
                if let Some(handle) = handle {
                    *child = handle.snapshot();
                }
            }
        }

        status
    }

    /// Stops polling this source and its children
    pub fn cancel(&self) {
        let _children = lock(&self.children);
        self.token.cancel();
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// State of one polling loop
struct PollTask {
    poller: StatusPoller,
    source: StatusSource,
    status: watch::Sender<Status>,
    children: Arc<Mutex<ChildWatches>>,
    token: CancellationToken,
}

impl PollTask {
    async fn run(self) {
        debug!("Watching {}", self.source);

        loop {
            {
                let _children = lock(&self.children);
                if self.token.is_cancelled() {
                    break;
                }
                // Keep the displayed fields while the fetch is in flight
                self.status.send_modify(|status| status.loading = true);
            }
            self.poller.bump();

            let previous = self.status.borrow().clone();
            let next = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                status = self.poller.resolver.resolve_or_placeholder(&self.source, Some(&previous)) => status,
            };

            if !self.apply(next) {
                break;
            }

            let delay = self.poller.settings.next_delay();
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        lock(&self.children).clear();
        info!("Stopped watching {}", self.source);
    }

    /// Replaces the status and aligns child watches with it
    ///
    /// Returns `false` without touching anything once cancelled.
    fn apply(&self, next: Status) -> bool {
        {
            let mut children = lock(&self.children);
            if self.token.is_cancelled() {
                return false;
            }

            match &next.body {
                StatusBody::Container(refs) => children.reconcile(&self.source, refs, |child| {
                    self.poller.watch(child, self.token.child_token())
                }),
                // Keep children across a failed poll; the next container
                // result picks them up again
                StatusBody::Error { .. } => {}
                StatusBody::Leaf(_) | StatusBody::Pending => children.clear(),
            }

            self.status.send_replace(next);
        }

        self.poller.bump();
        true
    }
}
