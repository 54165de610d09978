use chrono::{DateTime, Utc};

use crate::error::{BrokerError, Result};

/// Identifier handed out by the broker, starting at 1.
pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Waiting,
    Running,
    Completed,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Waiting => write!(f, "waiting"),
            JobState::Running => write!(f, "running"),
            JobState::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub text: String,
    pub state: JobState,
    pub submitted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: JobId, text: String) -> Self {
        Self {
            id,
            text,
            state: JobState::Waiting,
            submitted_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Waiting -> Running. Any other starting state is rejected untouched.
    pub fn start(&mut self) -> Result<()> {
        self.advance(JobState::Waiting, JobState::Running)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Running -> Completed. Any other starting state is rejected untouched.
    pub fn complete(&mut self) -> Result<()> {
        self.advance(JobState::Running, JobState::Completed)?;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn advance(&mut self, from: JobState, to: JobState) -> Result<()> {
        if self.state != from {
            return Err(BrokerError::InvalidTransition {
                id: self.id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
