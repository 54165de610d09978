use workqueue::broker::dispatch;
use workqueue::protocol::{Response, Role};
use workqueue::scheduler::assigner::JobAssigner;
use workqueue::scheduler::job::{Job, JobState};
use workqueue::scheduler::queue::PendingQueue;
use workqueue::scheduler::registry::JobRegistry;

#[test]
fn test_job_creation() {
    let job = Job::new(1, "echo hello".to_string());
    assert_eq!(job.state, JobState::Waiting);
    assert_eq!(job.text, "echo hello");
    assert!(job.started_at.is_none());
}

#[test]
fn test_registry_operations() {
    let mut registry = JobRegistry::new();

    let id1 = registry.create("echo 1".to_string());
    let id2 = registry.create("echo 2".to_string());
    assert_eq!((id1, id2), (1, 2));
    assert_eq!(registry.len(), 2);

    let retrieved = registry.get(id1).unwrap();
    assert_eq!(retrieved.text, "echo 1");

    registry.get_mut(id1).unwrap().start().unwrap();
    assert_eq!(registry.state(id1), Some(JobState::Running));
    assert_eq!(registry.state(id2), Some(JobState::Waiting));
}

#[test]
fn test_pending_queue_order() {
    let mut queue = PendingQueue::new();
    queue.push(10);
    queue.push(11);
    assert_eq!(queue.len(), 2);
    assert!(queue.contains(11));
    assert_eq!(queue.pop(), Some(10));
    assert_eq!(queue.pop(), Some(11));
    assert_eq!(queue.pop(), None);
}

#[test]
fn test_job_assignment() {
    let mut assigner = JobAssigner::new();

    let id = assigner.submit("echo 1").unwrap();
    let assignment = assigner.fetch();
    assert_eq!(assignment, Some((id, "echo 1".to_string())));
    assert_eq!(assigner.status(id), Some(JobState::Running));
    assert_eq!(assigner.pending_len(), 0);
}

#[test]
fn test_no_jobs_available() {
    let mut assigner = JobAssigner::new();
    assert!(assigner.fetch().is_none());
}

#[test]
fn test_job_completion() {
    let mut assigner = JobAssigner::new();

    let id = assigner.submit("echo test").unwrap();
    let (assigned, _) = assigner.fetch().unwrap();
    assert_eq!(assigned, id);

    assigner.complete(id).unwrap();
    assert_eq!(assigner.status(id), Some(JobState::Completed));
}

#[test]
fn test_status_never_regresses() {
    let mut assigner = JobAssigner::new();
    let id = assigner.submit("work").unwrap();
    let order = |s: Option<JobState>| match s {
        None => 0,
        Some(JobState::Waiting) => 1,
        Some(JobState::Running) => 2,
        Some(JobState::Completed) => 3,
    };

    let mut last = order(assigner.status(id));
    for step in 0..6 {
        match step {
            1 | 2 => {
                assigner.fetch();
            }
            5 => {
                assigner.submit("other").ok();
            }
            _ => {
                assigner.complete(id).ok();
            }
        }
        let now = order(assigner.status(id));
        assert!(now >= last, "status went from {last} back to {now}");
        last = now;
    }
    assert_eq!(assigner.status(id), Some(JobState::Completed));
}

#[test]
fn test_many_jobs_fifo_under_interleaving() {
    let mut assigner = JobAssigner::new();
    let mut expected = Vec::new();
    let mut fetched = Vec::new();

    for round in 0..10 {
        for i in 0..3 {
            expected.push(assigner.submit(&format!("r{round} j{i}")).unwrap());
        }
        for _ in 0..2 {
            if let Some((id, _)) = assigner.fetch() {
                fetched.push(id);
            }
        }
    }
    while let Some((id, _)) = assigner.fetch() {
        fetched.push(id);
    }

    assert_eq!(fetched, expected);
}

#[test]
fn test_dispatch_scenario() {
    let mut assigner = JobAssigner::new();

    assert_eq!(
        dispatch(&mut assigner, Role::Client, "JOB hello world"),
        Some(Response::Id(1))
    );
    assert_eq!(
        dispatch(&mut assigner, Role::Worker, "FETCH"),
        Some(Response::Job {
            id: 1,
            text: "hello world".to_string()
        })
    );
    assert_eq!(
        dispatch(&mut assigner, Role::Worker, "DONE 1"),
        Some(Response::Ok)
    );
    assert_eq!(
        dispatch(&mut assigner, Role::Client, "STATUS 1"),
        Some(Response::Status(Some(JobState::Completed)))
    );
    assert_eq!(
        dispatch(&mut assigner, Role::Client, "STATUS 2"),
        Some(Response::Status(None))
    );
}
