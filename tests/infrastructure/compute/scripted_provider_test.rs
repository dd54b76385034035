use reqwest::Url;
use stemforge::application::ports::{ComputeProvider, ComputeProviderError, ProviderStatus};
use stemforge::domain::{JobParameters, RemoteHandle, SignedUrl};
use stemforge::infrastructure::compute::ScriptedComputeProvider;

fn input() -> Vec<SignedUrl> {
    vec![SignedUrl::new(Url::parse("http://staging.local/a.wav").unwrap())]
}

#[tokio::test]
async fn given_two_polls_configured_when_checking_then_completes_on_third_check() {
    let provider = ScriptedComputeProvider::new(
        Url::parse("http://scaffold.local/").unwrap(),
        2,
        vec!["audio".to_string(), "midi".to_string()],
    );
    let handle = provider.create_job(&input(), &JobParameters::new()).await.unwrap();

    assert_eq!(provider.job_status(&handle).await.unwrap(), ProviderStatus::Running);
    assert_eq!(provider.job_status(&handle).await.unwrap(), ProviderStatus::Running);

    match provider.job_status(&handle).await.unwrap() {
        ProviderStatus::Complete(results) => {
            assert_eq!(results.len(), 2);
            assert_eq!(results[0].location, format!("outputs/{}/audio", handle));
        }
        other => panic!("unexpected status: {:?}", other),
    }
}

#[tokio::test]
async fn given_unknown_handle_when_checking_then_not_found_error() {
    let provider =
        ScriptedComputeProvider::new(Url::parse("http://scaffold.local/").unwrap(), 0, vec![]);

    let result = provider
        .job_status(&RemoteHandle::new("nope").unwrap())
        .await;

    assert!(matches!(
        result,
        Err(ComputeProviderError::HttpStatus { status: 404, .. })
    ));
}

#[tokio::test]
async fn given_no_inputs_when_creating_then_invalid_parameters() {
    let provider =
        ScriptedComputeProvider::new(Url::parse("http://scaffold.local/").unwrap(), 0, vec![]);

    let result = provider.create_job(&[], &JobParameters::new()).await;

    assert!(matches!(result, Err(ComputeProviderError::InvalidParameters(_))));
}

#[tokio::test]
async fn given_completed_job_when_checking_again_then_handle_forgotten() {
    let provider =
        ScriptedComputeProvider::new(Url::parse("http://scaffold.local/").unwrap(), 0, vec![]);
    let handle = provider.create_job(&input(), &JobParameters::new()).await.unwrap();

    assert!(matches!(
        provider.job_status(&handle).await.unwrap(),
        ProviderStatus::Complete(_)
    ));

    let again = provider.job_status(&handle).await;

    assert!(matches!(
        again,
        Err(ComputeProviderError::HttpStatus { status: 404, .. })
    ));
}
