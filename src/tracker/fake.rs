use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, Semaphore};

use super::models::{Job, JobId, JobStatus};
use super::repository::{order_jobs, FetchError, JobRepository, UpdateError};

/// In-memory store for controller and handler tests
pub struct FakeRepository {
    pub jobs: Mutex<Vec<Job>>,
    pub fail_list: AtomicBool,
    pub fail_updates: AtomicBool,
    /// Skip the list ordering so callers see the raw insertion order
    pub unordered: bool,
    /// When set, each list call waits for one permit before reading
    pub list_gate: Option<Semaphore>,
    pub list_calls: AtomicU64,
    pub update_calls: AtomicU64,
}

impl FakeRepository {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
            fail_list: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            unordered: false,
            list_gate: None,
            list_calls: AtomicU64::new(0),
            update_calls: AtomicU64::new(0),
        }
    }

    pub fn unordered(mut self) -> Self {
        self.unordered = true;
        self
    }

    pub fn gated(mut self) -> Self {
        self.list_gate = Some(Semaphore::new(0));
        self
    }

    /// Let `count` held list calls proceed
    pub fn release_lists(&self, count: usize) {
        if let Some(gate) = &self.list_gate {
            gate.add_permits(count);
        }
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> u64 {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub async fn stored(&self, id: JobId) -> Option<Job> {
        self.jobs.lock().await.iter().find(|job| job.id == id).cloned()
    }

    async fn mutate(&self, id: JobId, apply: impl FnOnce(&mut Job)) -> Result<(), UpdateError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(UpdateError::Transport("connection reset".to_string()));
        }
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or(UpdateError::NotFound(id))?;
        apply(job);
        job.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait]
impl JobRepository for FakeRepository {
    async fn list(&self) -> Result<Vec<Job>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.list_gate {
            gate.acquire()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?
                .forget();
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(FetchError::Transport("store unavailable".to_string()));
        }
        let mut jobs = self.jobs.lock().await.clone();
        if !self.unordered {
            order_jobs(&mut jobs);
        }
        Ok(jobs)
    }

    async fn update_status(&self, id: JobId, status: JobStatus) -> Result<(), UpdateError> {
        self.mutate(id, |job| job.status = status).await
    }

    async fn update_memo(&self, id: JobId, memo: &str) -> Result<(), UpdateError> {
        self.mutate(id, |job| job.memo = memo.to_string()).await
    }
}
