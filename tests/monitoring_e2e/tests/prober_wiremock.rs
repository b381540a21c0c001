
use monitoring_e2e::probe::{EndpointProber, ProbeError, ProbePath};
use monitoring_e2e::targets::unhealthy_targets;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn prober(token: Option<&str>) -> EndpointProber {
    let cfg = common::config("unused");
    EndpointProber::new(&cfg.probe, token.map(str::to_string)).unwrap()
}

async fn serve(status: u16, at: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(status).insert_header("location", "/login"),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn ui_page_ok_on_200_and_redirect() {
    for status in [200, 302] {
        let server = serve(status, "/k8s/clusters/c-1/graph").await;
        let outcome = prober(None)
            .probe(
                &server.address().to_string(),
                &ProbePath::ui("k8s/clusters/c-1/graph"),
                false,
            )
            .await
            .unwrap();
        assert!(outcome.ok, "status {status}");
        assert_eq!(outcome.status_code, status);
    }
}

#[tokio::test]
async fn non_success_is_reported_not_raised() {
    let server = serve(404, "/missing").await;
    let outcome = prober(None)
        .probe(&server.address().to_string(), &ProbePath::ui("/missing"), false)
        .await
        .unwrap();
    assert!(!outcome.ok);
    assert_eq!(outcome.status_code, 404);
}

#[tokio::test]
async fn api_requires_exact_200() {
    let server = serve(204, "/api/v1/targets").await;
    let outcome = prober(None)
        .probe(
            &server.address().to_string(),
            &ProbePath::api("api/v1/targets"),
            false,
        )
        .await
        .unwrap();
    assert!(!outcome.ok);
    assert_eq!(outcome.status_code, 204);
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer token-xyz"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let outcome = prober(Some("token-xyz"))
        .probe(&server.address().to_string(), &ProbePath::ui("x"), false)
        .await
        .unwrap();
    assert!(outcome.ok);
}

#[tokio::test]
async fn connection_refused_is_an_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    let err = prober(None)
        .probe(&addr, &ProbePath::ui("graph"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn targets_check_lists_unhealthy_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/targets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"activeTargets": [
                {"scrapeUrl": "http://a/metrics", "health": "up", "labels": {"job": "a"}},
                {"scrapeUrl": "http://b/metrics", "health": "down", "labels": {"job": "b"}},
                {"scrapeUrl": "http://c/metrics", "health": "unknown", "labels": {"job": "c"}},
            ]},
        })))
        .mount(&server)
        .await;
    let bad = unhealthy_targets(
        &prober(None),
        &server.address().to_string(),
        "api/v1/targets",
        false,
    )
    .await
    .unwrap();
    let jobs: Vec<&str> = bad.iter().map(|t| t.job()).collect();
    assert_eq!(jobs, vec!["b", "c"]);
}

#[tokio::test]
async fn targets_check_rejects_non_200() {
    let server = serve(500, "/api/v1/targets").await;
    let err = unhealthy_targets(
        &prober(None),
        &server.address().to_string(),
        "api/v1/targets",
        false,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ProbeError::Status(500)));
}
