use crate::error::{BrokerError, Result};
use crate::scheduler::job::{JobId, JobState};
use crate::scheduler::queue::PendingQueue;
use crate::scheduler::registry::JobRegistry;

/// Owns the job registry together with the pending queue.
///
/// These are the only operations allowed to touch either structure, so
/// an id is queued exactly while its job is `Waiting`, and popping it is
/// the same step as marking it `Running`.
#[derive(Debug, Default)]
pub struct JobAssigner {
    registry: JobRegistry,
    pending: PendingQueue,
}

impl JobAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job and queue it for the next worker.
    pub fn submit(&mut self, text: &str) -> Result<JobId> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BrokerError::EmptyJobText);
        }

        let id = self.registry.create(text.to_string());
        self.pending.push(id);
        tracing::info!(job_id = id, pending = self.pending.len(), "Job submitted");
        Ok(id)
    }

    /// Current state, or `None` for an id that was never issued.
    pub fn status(&self, id: JobId) -> Option<JobState> {
        self.registry.state(id)
    }

    /// Hand the oldest waiting job to a worker.
    /// Returns the job id and its text if one was waiting.
    pub fn fetch(&mut self) -> Option<(JobId, String)> {
        while let Some(id) = self.pending.pop() {
            let Some(job) = self.registry.get_mut(id) else {
                tracing::warn!(job_id = id, "Queued job missing from registry");
                continue;
            };
            if let Err(e) = job.start() {
                tracing::warn!(job_id = id, error = %e, "Queued job was not waiting");
                continue;
            }

            let waited_ms = job
                .started_at
                .map(|t| (t - job.submitted_at).num_milliseconds())
                .unwrap_or_default();
            tracing::info!(job_id = id, waited_ms, "Job assigned");
            return Some((id, job.text.clone()));
        }
        None
    }

    /// Mark a running job as completed.
    pub fn complete(&mut self, id: JobId) -> Result<()> {
        let job = self
            .registry
            .get_mut(id)
            .ok_or(BrokerError::JobNotFound(id))?;
        job.complete()?;

        let run_ms = job
            .completed_at
            .zip(job.started_at)
            .map(|(done, started)| (done - started).num_milliseconds())
            .unwrap_or_default();
        tracing::info!(job_id = id, run_ms, "Job completed");
        Ok(())
    }

    /// Total number of jobs ever submitted
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Number of jobs still waiting for a worker
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
