//! End-to-end metric scenarios against a mocked hosting API

use core::time::Duration;
use repo_score_lib::facts::RepoRef;
use repo_score_lib::facts::hosting::Client;
use repo_score_lib::metrics::{BusFactor, Correctness, Limits, Metric, NetScore, RampUp, Scorer, UNAVAILABLE};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo() -> RepoRef {
    RepoRef::parse("https://github.com/acme/widget").expect("valid repository URL")
}

fn assert_score(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

async fn mount_quota(server: &MockServer, remaining: u64) {
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rate": { "limit": 5000, "remaining": remaining, "reset": 1_900_000_000 }
        })))
        .mount(server)
        .await;
}

fn commit(login: &str) -> Value {
    json!({
        "author": { "login": login },
        "commit": { "author": { "name": login, "email": format!("{login}@example.com") } }
    })
}

fn entry(name: &str, parent: &str, kind: &str) -> Value {
    let path = if parent.is_empty() { name.to_string() } else { format!("{parent}/{name}") };
    json!({ "name": name, "path": path, "type": kind })
}

async fn mount_contents(server: &MockServer, dir: &str, entries: Value) {
    let route = if dir.is_empty() {
        "/repos/acme/widget/contents".to_string()
    } else {
        format!("/repos/acme/widget/contents/{dir}")
    };

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bus_factor_two_of_ten_contributors() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;

    // 17 commits: alice and bob together pass the halfway mark
    let mut commits: Vec<_> = (0..5).map(|_| commit("alice")).collect();
    commits.extend((0..4).map(|_| commit("bob")));
    commits.extend((0..8).map(|i| commit(&format!("dev{i}"))));

    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/commits"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(commits)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = BusFactor::new(client, 10).evaluate(&repo()).await;

    assert_score(result.score, 0.4);
}

#[tokio::test]
async fn test_bus_factor_without_commits_is_unavailable() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = BusFactor::new(client, 10).evaluate(&repo()).await;

    assert_score(result.score, UNAVAILABLE);
}

#[tokio::test]
async fn test_exhausted_quota_skips_remote_calls() {
    let server = MockServer::start().await;
    mount_quota(&server, 0).await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([commit("alice")])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let repo = repo();

    assert_score(BusFactor::new(client.clone(), 10).evaluate(&repo).await.score, UNAVAILABLE);
    assert_score(Correctness::new(client.clone()).evaluate(&repo).await.score, UNAVAILABLE);
    assert_score(RampUp::new(client, 3, 50).evaluate(&repo).await.score, UNAVAILABLE);
}

#[tokio::test]
async fn test_correctness_one_open_of_nine() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;

    let mut issues = vec![json!({ "state": "open" })];
    issues.extend((0..8).map(|_| json!({ "state": "closed" })));
    issues.push(json!({ "state": "open", "pull_request": {} }));

    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/issues"))
        .and(query_param("labels", "bug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(issues)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = Correctness::new(client).evaluate(&repo()).await;

    assert_score(result.score, 1.0 - 1.0 / 9.0);
}

#[tokio::test]
async fn test_correctness_without_bugs_is_perfect() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = Correctness::new(client).evaluate(&repo()).await;

    assert_score(result.score, 1.0);
}

#[tokio::test]
async fn test_ramp_up_three_of_five_terms() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;
    mount_contents(
        &server,
        "",
        json!([
            entry("README.md", "", "file"),
            entry("src", "", "dir"),
            entry("docs", "", "dir"),
            entry("tests", "", "dir"),
        ]),
    )
    .await;
    mount_contents(&server, "src", json!([entry("lib.rs", "src", "file")])).await;
    mount_contents(&server, "docs", json!([entry("guide.md", "docs", "file")])).await;
    mount_contents(&server, "tests", json!([entry("smoke.rs", "tests", "file")])).await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = RampUp::new(client, 3, 50).evaluate(&repo()).await;

    assert_score(result.score, 0.6);
}

#[tokio::test]
async fn test_ramp_up_finds_terms_in_subdirectories() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;
    mount_contents(&server, "", json!([entry("project", "", "dir")])).await;
    mount_contents(&server, "project", json!([entry("Makefile", "project", "file"), entry("examples", "project", "dir")])).await;
    mount_contents(&server, "project/examples", json!([])).await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = RampUp::new(client, 3, 50).evaluate(&repo()).await;

    assert_score(result.score, 0.4);
}

#[tokio::test]
async fn test_ramp_up_depth_bound() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;
    mount_contents(&server, "", json!([entry("a", "", "dir")])).await;
    mount_contents(&server, "a", json!([entry("b", "a", "dir")])).await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/contents/a/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([entry("README", "a/b", "file")])))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = RampUp::new(client, 1, 50).evaluate(&repo()).await;

    assert_score(result.score, 0.0);
}

#[tokio::test]
async fn test_ramp_up_listing_budget() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;
    mount_contents(
        &server,
        "",
        json!([entry("README.md", "", "file"), entry("docs", "", "dir"), entry("src", "", "dir")]),
    )
    .await;

    for dir in ["docs", "src"] {
        Mock::given(method("GET"))
            .and(path(format!("/repos/acme/widget/contents/{dir}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([entry("examples", dir, "dir")])))
            .expect(0)
            .mount(&server)
            .await;
    }

    let client = Client::new("token", server.uri()).unwrap();
    let result = RampUp::new(client, 3, 1).evaluate(&repo()).await;

    // only the root listing counts: readme and doc
    assert_score(result.score, 0.4);
}

#[tokio::test]
async fn test_ramp_up_skips_unlistable_subdirectory() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;
    mount_contents(&server, "", json!([entry("README", "", "file"), entry("broken", "", "dir")])).await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/contents/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = RampUp::new(client, 3, 50).evaluate(&repo()).await;

    assert_score(result.score, 0.2);
}

#[tokio::test]
async fn test_ramp_up_root_failure_is_unavailable() {
    let server = MockServer::start().await;
    mount_quota(&server, 100).await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/contents"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let result = RampUp::new(client, 3, 50).evaluate(&repo()).await;

    assert_score(result.score, UNAVAILABLE);
}

#[tokio::test]
async fn test_scorer_times_out_slow_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)).set_body_json(json!({
            "rate": { "limit": 5000, "remaining": 100, "reset": 1_900_000_000 }
        })))
        .mount(&server)
        .await;

    let client = Client::new("token", server.uri()).unwrap();
    let limits = Limits {
        metric_timeout: Duration::from_millis(200),
        ..Limits::default()
    };
    let scorer = Scorer::new(&client, NetScore::default(), limits);

    let result = scorer.score_url("https://github.com/acme/widget").await;

    assert_score(result.bus_factor.score, UNAVAILABLE);
    assert_score(result.correctness.score, UNAVAILABLE);
    assert_score(result.ramp_up.score, UNAVAILABLE);
    assert!(result.bus_factor.latency < Duration::from_secs(5));
    assert_score(result.net_score, UNAVAILABLE);
}
