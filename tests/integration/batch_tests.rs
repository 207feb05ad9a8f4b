use probe_batch::batch::{
    run_batch, BatchExecutor, ExecutorSettings, HttpProbe, Probe, RequestOutcome,
};
use probe_batch::challenge::StaticChallengeProvider;
use probe_batch::config::{load_config, ChallengeConfig, Config, ProbeConfig, UserAgentConfig};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "aws-waf-token";

/// Creates a test configuration pointing at the given endpoint
fn create_test_config(endpoint: &str) -> Config {
    Config {
        probe: ProbeConfig {
            endpoint: endpoint.to_string(),
            request_interval_ms: 10, // Very short for testing
            request_timeout_ms: 300,
            credential_header: HEADER.to_string(),
            max_batch_size: 1000,
        },
        user_agent: UserAgentConfig {
            name: "TestBot".to_string(),
            version: "1.0".to_string(),
        },
        challenge: ChallengeConfig {
            site_key: "test-site-key".to_string(),
            script_url: None,
        },
    }
}

fn create_executor(config: &Config) -> BatchExecutor<HttpProbe> {
    let probe = HttpProbe::from_config(config).expect("Failed to build probe");
    BatchExecutor::new(probe, ExecutorSettings::from(&config.probe))
}

fn outcomes(pairs: &[(u32, u16)]) -> Vec<RequestOutcome> {
    pairs
        .iter()
        .map(|&(i, s)| RequestOutcome::new(i, s))
        .collect()
}

#[tokio::test]
async fn test_probe_passes_status_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whoami"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/whoami", mock_server.uri()));
    let probe = HttpProbe::from_config(&config).unwrap();

    assert_eq!(probe.send("").await.unwrap(), 503);
}

#[tokio::test]
async fn test_full_batch_without_challenge() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whoami"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/whoami", mock_server.uri()));
    let executor = create_executor(&config);

    let state = executor.start(4).await.unwrap();

    assert_eq!(
        state.outcomes,
        outcomes(&[(1, 200), (2, 200), (3, 200), (4, 200)])
    );
    assert!(!state.challenge_pending);
}

#[tokio::test]
async fn test_challenge_pause_and_resume_with_credential() {
    let mock_server = MockServer::start().await;

    // Requests carrying the solved credential: 200, then a hang, then 200
    Mock::given(method("GET"))
        .and(header(HEADER, "tok-B"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(header(HEADER, "tok-B"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(header(HEADER, "tok-B"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Requests without a credential: one 200, then the challenge
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/whoami", mock_server.uri()));
    let executor = create_executor(&config);

    let state = executor.start(5).await.unwrap();
    assert_eq!(state.outcomes, outcomes(&[(1, 200), (2, 405)]));
    assert!(state.challenge_pending);

    let state = executor.resume("tok-B").await.unwrap();
    assert_eq!(
        state.outcomes,
        outcomes(&[(1, 200), (2, 405), (3, 200), (4, 500), (5, 200)])
    );
    assert!(!state.challenge_pending);
    assert_eq!(state.credential.as_deref(), Some("tok-B"));
}

#[tokio::test]
async fn test_unreachable_endpoint_records_failures_and_continues() {
    // Nothing listens on port 9 on localhost
    let config = create_test_config("http://127.0.0.1:9/whoami");
    let executor = create_executor(&config);

    let state = executor.start(3).await.unwrap();

    assert_eq!(state.outcomes, outcomes(&[(1, 500), (2, 500), (3, 500)]));
    assert!(!state.challenge_pending);
}

#[tokio::test]
async fn test_run_batch_with_static_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header(HEADER, "pre-solved"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/whoami", mock_server.uri()));
    let executor = create_executor(&config);
    let provider = StaticChallengeProvider::new("pre-solved");

    let state = run_batch(&executor, &provider, &config.challenge.site_key, 3)
        .await
        .unwrap();

    assert_eq!(state.outcomes, outcomes(&[(1, 405), (2, 200), (3, 200)]));
    assert!(state.is_complete());
}

#[tokio::test]
async fn test_batch_from_config_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/probe"))
        .and(header("x-challenge", "k"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/probe"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[probe]
endpoint = "{}/probe"
request-interval-ms = 5
credential-header = "x-challenge"

[challenge]
site-key = "file-site-key"
"#,
        mock_server.uri()
    )
    .unwrap();
    file.flush().unwrap();

    let config = load_config(file.path()).unwrap();
    let executor = create_executor(&config);
    let provider = StaticChallengeProvider::new("k");

    let state = run_batch(&executor, &provider, &config.challenge.site_key, 2)
        .await
        .unwrap();

    assert_eq!(state.outcomes, outcomes(&[(1, 405), (2, 204)]));
}
