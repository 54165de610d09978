pub mod assigner;
pub mod job;
pub mod queue;
pub mod registry;

pub use assigner::JobAssigner;
pub use job::{Job, JobId, JobState};
pub use queue::PendingQueue;
pub use registry::JobRegistry;
