// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session construction
//!
//! Two terminal construction paths, chosen strictly by whether a remote grid
//! endpoint is configured. The local path provisions a driver binary, spawns
//! it, and negotiates a session against the spawned process. The remote path
//! negotiates directly against the grid with a per-browser capability
//! baseline. Browser-kind dispatch happens after that choice, separately in
//! each path; the two paths take different parameter shapes.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::process::Command;
use url::Url;

use super::provision::BinaryProvisioner;
use super::session::{NewSessionRequest, NewSessionResponse, Session};
use crate::browser::{defaults_for, BrowserKind, CapabilitySet, ResolvedOptions};
use crate::error::{Error, Result};

/// How long a freshly spawned driver gets to start answering `/status`.
/// Session negotiation itself is never retried.
const READY_POLL_ATTEMPTS: u32 = 50;
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Builds browser sessions, local or remote.
pub struct SessionBuilder<'a> {
    provisioner: &'a dyn BinaryProvisioner,
    http: reqwest::Client,
}

impl<'a> SessionBuilder<'a> {
    /// Create a builder. The provisioner is only consulted on the local path.
    pub fn new(provisioner: &'a dyn BinaryProvisioner) -> Self {
        Self {
            provisioner,
            http: reqwest::Client::new(),
        }
    }

    /// Construct a session by spawning a local driver process.
    ///
    /// Local sessions never merge capabilities; launch arguments are the
    /// only configurable surface.
    pub async fn local(&self, kind: BrowserKind, version: &str, args: &[String]) -> Result<Session> {
        match kind {
            BrowserKind::Chrome => self.launch_chrome(version, args).await,
            BrowserKind::Firefox => self.launch_firefox(version, args).await,
            BrowserKind::Ie => self.launch_ie(version, args).await,
            BrowserKind::Opera => self.launch_opera(version, args).await,
            BrowserKind::Edge => self.launch_edge(version, args).await,
        }
    }

    async fn launch_chrome(&self, version: &str, args: &[String]) -> Result<Session> {
        let binary = self.provisioner.install(BrowserKind::Chrome, version).await?;
        self.spawn_and_connect(binary, local_session_payload(BrowserKind::Chrome, args))
            .await
    }

    async fn launch_firefox(&self, version: &str, args: &[String]) -> Result<Session> {
        let binary = self
            .provisioner
            .install(BrowserKind::Firefox, version)
            .await?;
        self.spawn_and_connect(binary, local_session_payload(BrowserKind::Firefox, args))
            .await
    }

    async fn launch_ie(&self, version: &str, args: &[String]) -> Result<Session> {
        let binary = self.provisioner.install(BrowserKind::Ie, version).await?;
        self.spawn_and_connect(binary, local_session_payload(BrowserKind::Ie, args))
            .await
    }

    async fn launch_opera(&self, version: &str, args: &[String]) -> Result<Session> {
        let binary = self.provisioner.install(BrowserKind::Opera, version).await?;
        self.spawn_and_connect(binary, local_session_payload(BrowserKind::Opera, args))
            .await
    }

    async fn launch_edge(&self, version: &str, args: &[String]) -> Result<Session> {
        let binary = self.provisioner.install(BrowserKind::Edge, version).await?;
        self.spawn_and_connect(binary, local_session_payload(BrowserKind::Edge, args))
            .await
    }

    /// Construct a session against a remote grid endpoint.
    ///
    /// The browser name is taken as-is: a name that does not normalize to a
    /// known kind degrades to an empty capability baseline instead of
    /// failing. This is the only place an unrecognized browser is tolerated.
    pub async fn remote(
        &self,
        browser: &str,
        remote_url: &str,
        args: &[String],
        caps: Option<&CapabilitySet>,
    ) -> Result<Session> {
        let endpoint = Url::parse(remote_url)?;
        let kind = BrowserKind::normalize(browser).ok();
        let baseline = remote_capability_baseline(kind, caps);

        let always_match = match kind {
            Some(kind) => ResolvedOptions::resolve(kind, args, Some(&baseline)).to_capabilities(),
            // No known option shape to resolve into; send the baseline alone
            None => apply_in_order(&baseline),
        };

        tracing::info!(
            browser = %browser,
            url = %remote_url,
            "Negotiating remote session"
        );

        let (id, negotiated) = self
            .negotiate(&endpoint, always_match)
            .await
            .map_err(|reason| Error::remote_session(remote_url, reason))?;

        tracing::debug!(session = %id, "Remote session established");
        Ok(Session::remote(id, endpoint, negotiated))
    }

    /// Spawn the driver on an ephemeral port, wait for it to answer, then
    /// negotiate a session against it.
    async fn spawn_and_connect(
        &self,
        binary: PathBuf,
        always_match: Map<String, Value>,
    ) -> Result<Session> {
        let port = free_port()?;

        tracing::info!(driver = %binary.display(), port, "Spawning local driver");

        let mut child = Command::new(&binary)
            .arg(format!("--port={port}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::driver_process(&binary, e.to_string()))?;

        let endpoint = Url::parse(&format!("http://127.0.0.1:{port}"))?;

        // The driver must not outlive a failed construction; reap it before
        // surfacing the error.
        if let Err(err) = self.wait_until_ready(&endpoint, &binary).await {
            let _ = child.kill().await;
            return Err(err);
        }

        let (id, negotiated) = match self.negotiate(&endpoint, always_match).await {
            Ok(negotiated) => negotiated,
            Err(reason) => {
                let _ = child.kill().await;
                return Err(Error::session_start(endpoint.as_str(), reason));
            }
        };

        tracing::debug!(session = %id, "Local session established");
        Ok(Session::local(id, endpoint, negotiated, child))
    }

    /// Poll the driver's `/status` endpoint until it answers.
    async fn wait_until_ready(&self, endpoint: &Url, binary: &Path) -> Result<()> {
        let status_url = endpoint_route(endpoint, "status")?;

        for _ in 0..READY_POLL_ATTEMPTS {
            if let Ok(response) = self.http.get(status_url.clone()).send().await {
                if response.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        Err(Error::driver_process(
            binary,
            format!(
                "driver did not answer /status within {:?}",
                READY_POLL_INTERVAL * READY_POLL_ATTEMPTS
            ),
        ))
    }

    /// Single `POST /session` carrying the negotiated capabilities. Callers
    /// wrap the failure reason into the error kind of their path.
    async fn negotiate(
        &self,
        endpoint: &Url,
        always_match: Map<String, Value>,
    ) -> std::result::Result<(String, Map<String, Value>), String> {
        let url = endpoint_route(endpoint, "session").map_err(|e| e.to_string())?;
        let request = NewSessionRequest::with_always_match(always_match);

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body: NewSessionResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid new-session response: {e}"))?;

        // A session id only counts on a success status; a rejection body is
        // not trusted to be well-formed.
        if status.is_success() {
            if let Some(id) = body.value.session_id {
                return Ok((id, body.value.capabilities));
            }
        }

        let error = body
            .value
            .error
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(match body.value.message {
            Some(message) if !message.is_empty() => format!("{error}: {message}"),
            _ => error,
        })
    }
}

/// Capability payload a local driver's session request carries: options
/// resolved with no capability set, vendor-nested for every family except
/// Edge, whose driver takes the flat map.
fn local_session_payload(kind: BrowserKind, args: &[String]) -> Map<String, Value> {
    let options = ResolvedOptions::resolve(kind, args, None);
    match kind {
        BrowserKind::Edge => options.to_flattened_capabilities(),
        _ => options.to_capabilities(),
    }
}

/// Capability baseline for the remote path: caller capabilities win
/// wholesale, else the per-browser defaults, else empty for a browser name
/// that did not normalize.
fn remote_capability_baseline(
    kind: Option<BrowserKind>,
    caps: Option<&CapabilitySet>,
) -> CapabilitySet {
    match (caps, kind) {
        (Some(caps), _) => caps.clone(),
        (None, Some(kind)) => defaults_for(kind),
        (None, None) => Vec::new(),
    }
}

/// Apply a capability sequence in order, last write winning per name.
fn apply_in_order(caps: &CapabilitySet) -> Map<String, Value> {
    let mut map = Map::new();
    for cap in caps {
        map.insert(cap.name.clone(), cap.value.clone());
    }
    map
}

/// Join a wire-protocol route onto an endpoint that may or may not carry a
/// trailing slash or a base path such as `/wd/hub`.
fn endpoint_route(endpoint: &Url, route: &str) -> std::result::Result<Url, url::ParseError> {
    let base = endpoint.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{route}"))
}

/// Ask the OS for a free ephemeral port to run the driver on.
fn free_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Capability;
    use crate::session::provision::StaticProvisioner;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn session_created(id: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "value": {
                "sessionId": id,
                "capabilities": {"browserName": "chrome"},
            }
        }))
    }

    async fn grid_accepting_any(id: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(session_created(id))
            .mount(&server)
            .await;
        server
    }

    async fn recorded_always_match(server: &MockServer) -> Value {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        body["capabilities"]["alwaysMatch"].clone()
    }

    #[test]
    fn test_baseline_falls_back_to_defaults() {
        let baseline = remote_capability_baseline(Some(BrowserKind::Chrome), None);
        assert_eq!(baseline, defaults_for(BrowserKind::Chrome));
    }

    #[test]
    fn test_baseline_replacement_is_all_or_nothing() {
        let caps = vec![Capability::new("pageLoadStrategy", json!("eager"))];
        let baseline = remote_capability_baseline(Some(BrowserKind::Firefox), Some(&caps));

        // One explicit capability discards the whole default set
        assert_eq!(baseline, caps);
        assert!(baseline.iter().all(|cap| cap.name != "acceptInsecureCerts"));
    }

    #[test]
    fn test_baseline_empty_for_unrecognized_name() {
        assert!(remote_capability_baseline(None, None).is_empty());
    }

    #[tokio::test]
    async fn test_remote_session_negotiation() {
        let server = grid_accepting_any("9af2").await;
        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        let session = builder
            .remote("chrome", &server.uri(), &args(&["headless"]), None)
            .await
            .unwrap();

        assert_eq!(session.id(), "9af2");
        assert!(!session.is_local());

        let always_match = recorded_always_match(&server).await;
        assert_eq!(always_match["browserName"], json!("chrome"));
        assert_eq!(
            always_match["goog:chromeOptions"],
            json!({"args": ["--headless"]})
        );
    }

    #[tokio::test]
    async fn test_remote_defaults_sent_when_no_caps_given() {
        let server = grid_accepting_any("1").await;
        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        builder
            .remote("firefox", &server.uri(), &[], None)
            .await
            .unwrap();

        let always_match = recorded_always_match(&server).await;
        assert_eq!(always_match["browserName"], json!("firefox"));
        assert_eq!(always_match["acceptInsecureCerts"], json!(true));
    }

    #[tokio::test]
    async fn test_remote_explicit_caps_discard_defaults() {
        let server = grid_accepting_any("1").await;
        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        let caps = vec![Capability::new("pageLoadStrategy", json!("eager"))];
        builder
            .remote("firefox", &server.uri(), &[], Some(&caps))
            .await
            .unwrap();

        let always_match = recorded_always_match(&server).await;
        assert_eq!(always_match["pageLoadStrategy"], json!("eager"));
        // Default firefox baseline must not leak through
        assert!(always_match.get("acceptInsecureCerts").is_none());
    }

    #[tokio::test]
    async fn test_remote_tolerates_unrecognized_browser() {
        let server = grid_accepting_any("1").await;
        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        let session = builder
            .remote("qutebrowser", &server.uri(), &args(&["headless"]), None)
            .await
            .unwrap();
        assert_eq!(session.id(), "1");

        // Degrades to an empty baseline rather than UnsupportedBrowser
        let always_match = recorded_always_match(&server).await;
        assert_eq!(always_match, json!({}));
    }

    #[tokio::test]
    async fn test_remote_capability_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "value": {
                    "error": "session not created",
                    "message": "no such browser on this grid",
                }
            })))
            .mount(&server)
            .await;

        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        let err = builder
            .remote("chrome", &server.uri(), &[], None)
            .await
            .unwrap_err();

        assert!(err.is_remote_session());
        assert!(err.to_string().contains("no such browser"));
    }

    #[tokio::test]
    async fn test_remote_endpoint_unreachable() {
        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        let err = builder
            .remote("chrome", "http://127.0.0.1:1", &[], None)
            .await
            .unwrap_err();

        assert!(err.is_remote_session());
    }

    #[tokio::test]
    async fn test_remote_grid_with_base_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wd/hub/session"))
            .and(body_partial_json(json!({
                "capabilities": {"alwaysMatch": {"browserName": "chrome"}}
            })))
            .respond_with(session_created("hub1"))
            .mount(&server)
            .await;

        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        let session = builder
            .remote("chrome", &format!("{}/wd/hub", server.uri()), &[], None)
            .await
            .unwrap();
        assert_eq!(session.id(), "hub1");
    }

    #[tokio::test]
    async fn test_local_provisioning_failure_surfaces() {
        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        let err = builder
            .local(BrowserKind::Chrome, "latest", &[])
            .await
            .unwrap_err();

        assert!(err.is_provisioning());
    }

    #[test]
    fn test_local_payload_is_flat_for_edge_only() {
        let flags = args(&["headless"]);

        let edge = local_session_payload(BrowserKind::Edge, &flags);
        let resolved = ResolvedOptions::resolve(BrowserKind::Edge, &flags, None);
        assert_eq!(edge, resolved.to_flattened_capabilities());
        assert_eq!(edge["args"], json!(["--headless"]));
        assert!(!edge.contains_key("ms:edgeOptions"));

        for kind in [
            BrowserKind::Chrome,
            BrowserKind::Firefox,
            BrowserKind::Ie,
            BrowserKind::Opera,
        ] {
            let payload = local_session_payload(kind, &flags);
            let resolved = ResolvedOptions::resolve(kind, &flags, None);
            assert_eq!(payload, resolved.to_capabilities(), "{kind} payload");
            assert!(!payload.contains_key("args"), "{kind} must nest args");
        }
    }

    #[tokio::test]
    async fn test_remote_rejection_despite_session_id_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "value": {"sessionId": "ghost", "capabilities": {}}
            })))
            .mount(&server)
            .await;

        let provisioner = StaticProvisioner::new();
        let builder = SessionBuilder::new(&provisioner);

        let err = builder
            .remote("chrome", &server.uri(), &[], None)
            .await
            .unwrap_err();

        assert!(err.is_remote_session());
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_local_launch_reaps_driver_process() {
        use std::os::unix::fs::PermissionsExt;

        // A driver stand-in that records its pid and then hangs without
        // ever answering /status.
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("driver.pid");
        let script = dir.path().join("fakedriver");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho $$ > {}\nexec sleep 600\n", pid_file.display()),
        )
        .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let provisioner = StaticProvisioner::new().with_driver(BrowserKind::Chrome, &script);
        let builder = SessionBuilder::new(&provisioner);

        let err = builder
            .local(BrowserKind::Chrome, "latest", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DriverProcess { .. }));

        let pid = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
        let alive = std::process::Command::new("kill")
            .args(["-0", &pid])
            .status()
            .unwrap()
            .success();
        assert!(!alive, "driver process {pid} left running after failure");
    }

    #[tokio::test]
    async fn test_local_spawn_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("chromedriver");

        let provisioner = StaticProvisioner::new().with_driver(BrowserKind::Chrome, &missing);
        let builder = SessionBuilder::new(&provisioner);

        let err = builder
            .local(BrowserKind::Chrome, "latest", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DriverProcess { .. }));
    }

    #[test]
    fn test_endpoint_route_handles_trailing_slash() {
        let bare = Url::parse("http://grid:4444").unwrap();
        let slashed = Url::parse("http://grid:4444/").unwrap();
        let hub = Url::parse("http://grid:4444/wd/hub").unwrap();

        assert_eq!(
            endpoint_route(&bare, "session").unwrap().as_str(),
            "http://grid:4444/session"
        );
        assert_eq!(
            endpoint_route(&slashed, "session").unwrap().as_str(),
            "http://grid:4444/session"
        );
        assert_eq!(
            endpoint_route(&hub, "session").unwrap().as_str(),
            "http://grid:4444/wd/hub/session"
        );
    }
}
