use std::sync::Arc;
use std::time::Duration;

use stemforge::application::services::{
    JobOrchestrator, PollError, PollingPolicy, WaitError, poll_until_terminal,
};
use stemforge::domain::{Job, JobParameters, JobState};

use crate::support::{MockComputeProvider, MockStagingStore, Step, paths};

async fn setup(steps: Vec<Step>) -> (JobOrchestrator, Arc<MockComputeProvider>, Job) {
    let store = Arc::new(MockStagingStore::with_objects(&["in/a.wav", "in/b.wav"]));
    let provider = Arc::new(MockComputeProvider::new(steps));
    let orchestrator = JobOrchestrator::new(
        "melody",
        store,
        provider.clone(),
        Duration::from_secs(600),
    );
    let job = orchestrator
        .submit(paths(&["in/a.wav", "in/b.wav"]), JobParameters::new())
        .await
        .unwrap();
    (orchestrator, provider, job)
}

#[test]
fn given_default_policy_when_created_then_three_seconds_and_sixty_attempts() {
    let policy = PollingPolicy::default();

    assert_eq!(policy.interval, Duration::from_secs(3));
    assert_eq!(policy.max_attempts, 60);
    assert_eq!(policy.budget(), Duration::from_secs(177));
}

#[tokio::test(start_paused = true)]
async fn given_provider_always_running_when_waiting_then_times_out_after_budget() {
    let (orchestrator, provider, job) = setup(vec![Step::Running]).await;
    let orchestrator = &orchestrator;
    let policy = PollingPolicy::default();
    let started = tokio::time::Instant::now();

    let result = poll_until_terminal(job, &policy, move |job| async move {
        orchestrator.poll(&job).await
    })
    .await;

    match result {
        Err(WaitError::Timeout {
            attempts,
            last_state,
            job,
            ..
        }) => {
            assert_eq!(attempts, 60);
            assert_eq!(last_state, JobState::Running);
            assert_eq!(job.state(), JobState::Running);
        }
        other => panic!("expected timeout, got {:?}", other.map(|j| j.state())),
    }
    assert_eq!(provider.status_calls(), 60);
    assert_eq!(started.elapsed(), Duration::from_secs(3 * 59));
}

#[tokio::test(start_paused = true)]
async fn given_garbage_then_complete_when_waiting_then_recovers_and_completes() {
    let (orchestrator, provider, job) = setup(vec![
        Step::Garbage,
        Step::Complete(vec![("audio", "out.wav")]),
    ])
    .await;
    let orchestrator = &orchestrator;

    let job = poll_until_terminal(job, &PollingPolicy::default(), move |job| async move {
        orchestrator.poll(&job).await
    })
    .await
    .unwrap();

    assert_eq!(job.state(), JobState::Complete);
    assert_eq!(provider.status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn given_unreachable_provider_when_waiting_then_transient_errors_consume_attempts() {
    let (orchestrator, provider, job) = setup(vec![Step::Unreachable]).await;
    let orchestrator = &orchestrator;
    let policy = PollingPolicy::new(Duration::from_secs(1), 5);

    let result = poll_until_terminal(job, &policy, move |job| async move {
        orchestrator.poll(&job).await
    })
    .await;

    assert!(matches!(
        result,
        Err(WaitError::Timeout {
            last_state: JobState::Submitted,
            ..
        })
    ));
    assert_eq!(provider.status_calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn given_terminal_job_when_waiting_then_returns_without_polling() {
    let (orchestrator, provider, job) =
        setup(vec![Step::Complete(vec![("audio", "out.wav")])]).await;
    let done = orchestrator.poll(&job).await.unwrap();
    let orchestrator = &orchestrator;
    let started = tokio::time::Instant::now();

    let result = poll_until_terminal(done.clone(), &PollingPolicy::default(), move |job| async move {
        orchestrator.poll(&job).await
    })
    .await
    .unwrap();

    assert_eq!(result, done);
    assert_eq!(provider.status_calls(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn given_non_transient_error_when_waiting_then_stops_immediately() {
    let (orchestrator, _provider, _) = setup(vec![Step::Running]).await;
    let orchestrator = &orchestrator;
    let unsubmitted = Job::new("melody".to_string(), paths(&["x.wav"]), JobParameters::new());

    let result = poll_until_terminal(unsubmitted, &PollingPolicy::default(), move |job| async move {
        orchestrator.poll(&job).await
    })
    .await;

    assert!(matches!(
        result,
        Err(WaitError::Poll(PollError::NotSubmitted(_)))
    ));
}
