use std::collections::VecDeque;

use crate::scheduler::job::JobId;

/// FIFO of job ids still waiting for a worker.
#[derive(Debug, Default)]
pub struct PendingQueue {
    ids: VecDeque<JobId>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: JobId) {
        self.ids.push_back(id);
    }

    /// Oldest waiting id, if any
    pub fn pop(&mut self) -> Option<JobId> {
        self.ids.pop_front()
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
