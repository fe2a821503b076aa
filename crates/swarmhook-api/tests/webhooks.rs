use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use swarmhook_api::{AppState, routes};
use swarmhook_config::parse_daemon_config;
use swarmhook_core::{CommandRunner, DeploymentOutcome, Error, Result};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Stands in for `docker`: records every argv and exits with a fixed code.
struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
    exit_code: Option<i32>,
}

impl RecordingRunner {
    fn exiting(code: i32) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            exit_code: Some(code),
        })
    }

    /// Behaves like a binary that is not installed.
    fn unspawnable() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            exit_code: None,
        })
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn run(&self, command: &[String]) -> Result<DeploymentOutcome> {
        self.calls.lock().unwrap().push(command.to_vec());
        match self.exit_code {
            Some(code) => Ok(DeploymentOutcome::from_exit(
                Some(code),
                "stdout text",
                "stderr text",
                Utc::now(),
            )),
            None => Err(Error::Spawn {
                program: command[0].clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

const CONFIG: &str = r#"{
    "services": {
        "myrepo/worker:latest": {"service": "worker"}
    },
    "stacks": {
        "myrepo/app:v2": {"stack": "appstack", "filepath": "/cfg/app.yml"}
    }
}"#;

fn app(runner: Arc<RecordingRunner>) -> axum::Router {
    let config = parse_daemon_config(CONFIG).unwrap();
    routes::router(AppState::new(Arc::new(config.routes), runner))
}

fn push_body(repo: &str, tag: &str) -> String {
    serde_json::json!({
        "repository": {"repo_name": repo},
        "push_data": {"tag": tag},
    })
    .to_string()
}

/// Send a request via `oneshot` and return (status, content type, body text).
async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: String,
) -> (StatusCode, String, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post(app: axum::Router, uri: &str, body: String) -> (StatusCode, String) {
    let (status, _, body) = send(app, "POST", uri, body).await;
    (status, body)
}

// ---------------------------------------------------------------------------
// Stack targets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stack_push_deploys_stack() {
    let runner = RecordingRunner::exiting(0);
    let (status, content_type, body) =
        send(app(runner.clone()), "POST", "/", push_body("myrepo/app", "v2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK (stack)\n");
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(
        runner.calls(),
        [["docker", "stack", "deploy", "-c", "/cfg/app.yml", "appstack"]]
    );
}

#[tokio::test]
async fn failed_stack_deploy_is_500() {
    let runner = RecordingRunner::exiting(1);
    let (status, body) = post(app(runner.clone()), "/", push_body("myrepo/app", "v2")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error\n");
    assert_eq!(runner.calls().len(), 1, "failed deploys are not retried");
}

// ---------------------------------------------------------------------------
// Service targets
// ---------------------------------------------------------------------------

/// The pushed image is passed to `docker service update --image`, so the
/// service is moved to exactly the tag that was pushed.
#[tokio::test]
async fn service_push_updates_service_with_pushed_image() {
    let runner = RecordingRunner::exiting(0);
    let (status, body) = post(
        app(runner.clone()),
        "/",
        push_body("myrepo/worker", "latest"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK (service)\n");
    assert_eq!(
        runner.calls(),
        [[
            "docker",
            "service",
            "update",
            "--force",
            "--image",
            "myrepo/worker:latest",
            "worker"
        ]]
    );
}

#[tokio::test]
async fn failed_service_update_is_500() {
    let runner = RecordingRunner::exiting(125);
    let (status, body) = post(
        app(runner.clone()),
        "/",
        push_body("myrepo/worker", "latest"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error\n");
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn unspawnable_command_is_500() {
    let runner = RecordingRunner::unspawnable();
    let (status, body) = post(
        app(runner.clone()),
        "/",
        push_body("myrepo/worker", "latest"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error\n");
}

// ---------------------------------------------------------------------------
// Routing misses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_image_is_404_without_command() {
    let runner = RecordingRunner::exiting(0);
    for (repo, tag) in [("myrepo/app", "v3"), ("other/app", "v2"), ("myrepo/worker", "dev")] {
        let (status, body) = post(app(runner.clone()), "/", push_body(repo, tag)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found\n");
    }
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn partial_payloads_never_match() {
    let runner = RecordingRunner::exiting(0);
    let payloads = [
        r#"{"repository": {"repo_name": "myrepo/app"}}"#,
        r#"{"push_data": {"tag": "v2"}}"#,
        r#"{"repository": {}, "push_data": {"tag": "v2"}}"#,
        r#"{"repository": {"repo_name": "myrepo/app"}, "push_data": null}"#,
        "this is not json",
        "",
    ];

    for payload in payloads {
        let (status, body) = post(app(runner.clone()), "/", payload.to_string()).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "payload: {payload}");
        assert_eq!(body, "Not Found\n");
    }
    assert!(runner.calls().is_empty());
}

/// Even a table that routes the sentinel text itself never sees it matched.
#[tokio::test]
async fn sentinel_image_never_matches() {
    let config =
        parse_daemon_config(r#"{"services": {"Image not detected!": {"service": "oops"}}}"#)
            .unwrap();
    let runner = RecordingRunner::exiting(0);
    let app = routes::router(AppState::new(Arc::new(config.routes), runner.clone()));

    let (status, body) = post(app, "/", "{}".to_string()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found\n");
    assert!(runner.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Paths and probe
// ---------------------------------------------------------------------------

#[tokio::test]
async fn any_path_accepts_pushes() {
    let runner = RecordingRunner::exiting(0);
    let (status, body) = post(
        app(runner.clone()),
        "/hooks/registry/42",
        push_body("myrepo/app", "v2"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK (stack)\n");
}

#[tokio::test]
async fn get_is_liveness_probe() {
    let runner = RecordingRunner::exiting(1);
    for uri in ["/", "/health", "/some/deep/path"] {
        let (status, content_type, body) =
            send(app(runner.clone()), "GET", uri, String::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello world!");
        assert!(content_type.starts_with("text/plain"));
    }
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let runner = RecordingRunner::exiting(0);
    let (status, _, _) = send(app(runner.clone()), "DELETE", "/", String::new()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(runner.calls().is_empty());
}
