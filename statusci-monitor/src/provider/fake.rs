//! Scriptable adapter for tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use statusci_core::domain::build::BuildOutcome;
use statusci_core::domain::job::{BuildDetails, ChildRef, Classified, MultiJob, SingleJob};
use tokio::sync::Semaphore;

use super::{FetchRequest, ProviderAdapter};
use crate::error::ResolveError;

type Handler = Box<dyn Fn(&str, usize) -> Result<Classified, ResolveError> + Send + Sync>;

/// Adapter answering from a closure of `(id, call number)`
pub struct FakeAdapter {
    handler: Handler,
    calls: AtomicUsize,
    requests: Mutex<Vec<FetchRequest>>,
    /// When set, every fetch waits for a permit
    gate: Option<Semaphore>,
}

impl FakeAdapter {
    pub fn new(
        handler: impl Fn(&str, usize) -> Result<Classified, ResolveError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Blocks every fetch until [`FakeAdapter::release`] is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_ids(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.id).collect()
    }
}

#[async_trait]
impl ProviderAdapter for FakeAdapter {
    fn target_url(&self, base_url: &str, id: &str) -> String {
        format!("{}/job/{}", base_url, id)
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Classified, ResolveError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        (self.handler)(&request.id, call)
    }
}

/// A finished single job
pub fn finished_job(name: &str, outcome: BuildOutcome, timestamp: i64) -> Classified {
    Classified::Single(SingleJob {
        display_name: Some(name.to_string()),
        url: Some(format!("http://ci/job/{}/", name)),
        outcome,
        computing: false,
        build_count: 1,
        last_build_ref: None,
        last_build: Some(BuildDetails {
            number: Some(1),
            building: false,
            timestamp: Some(timestamp),
            estimated_duration: Some(60_000),
            duration: Some(55_000),
        }),
        health: Some(100),
    })
}

/// A folder with the given children
pub fn folder(name: &str, children: &[&str]) -> Classified {
    Classified::Multi(MultiJob {
        display_name: Some(name.to_string()),
        url: Some(format!("http://ci/job/{}/", name)),
        children: children
            .iter()
            .map(|child| ChildRef {
                name: child.to_string(),
                url: None,
                color: None,
            })
            .collect(),
    })
}
