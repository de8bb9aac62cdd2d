//! Shared fakes for integration tests.
//!
//! Probes, tokens and the driver are scripted per endpoint so that tests can
//! run under paused tokio time and assert on exact call sequences.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::pending;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use dsql_router::auth::{AuthError, TokenProvider};
use dsql_router::config::{EndpointConfig, RouterConfig};
use dsql_router::driver::{ConnectError, ConnectParams, Driver};
use dsql_router::health::{HealthState, RemoteHealthProvider};
use dsql_router::net::{ConnectProbe, ProbeError};
use dsql_router::registry::Endpoint;

/// Health probes use this timeout, latency probes use [`LATENCY_TIMEOUT`].
/// Keeping them distinct lets [`ScriptedProbe`] tell the two apart.
pub const HEALTH_TIMEOUT: Duration = Duration::from_millis(1000);
pub const LATENCY_TIMEOUT: Duration = Duration::from_millis(2000);

pub fn endpoint(cluster_id: &str, priority: Option<u32>) -> EndpointConfig {
    let mut config = EndpointConfig::new(cluster_id, "us-east-1", &host(cluster_id));
    config.priority = priority;
    config
}

pub fn endpoints(cluster_ids: &[&str]) -> Vec<EndpointConfig> {
    cluster_ids.iter().map(|id| endpoint(id, None)).collect()
}

pub fn host(cluster_id: &str) -> String {
    format!("{cluster_id}.dsql.example")
}

pub fn router_config(endpoints: Vec<EndpointConfig>) -> RouterConfig {
    let mut config = RouterConfig {
        endpoints,
        ..RouterConfig::default()
    };
    config.health.probe_timeout_ms = HEALTH_TIMEOUT.as_millis() as u64;
    config.latency.timeout_ms = LATENCY_TIMEOUT.as_millis() as u64;
    config.latency.retries = 1;
    config
}

#[derive(Debug, Clone, Copy)]
struct Script {
    delay: Duration,
    reachable: bool,
}

/// Reachability probe whose answer and delay are scripted per cluster id.
#[derive(Default)]
pub struct ScriptedProbe {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<(String, Duration)>>,
}

impl ScriptedProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reachable(&self, cluster_id: &str, delay_ms: u64) {
        self.set(cluster_id, delay_ms, true);
    }

    pub fn unreachable(&self, cluster_id: &str) {
        self.set(cluster_id, 0, false);
    }

    fn set(&self, cluster_id: &str, delay_ms: u64, reachable: bool) {
        self.scripts.lock().unwrap().insert(
            cluster_id.to_string(),
            Script {
                delay: Duration::from_millis(delay_ms),
                reachable,
            },
        );
    }

    /// Number of health probes sent to `cluster_id`.
    pub fn health_probes(&self, cluster_id: &str) -> usize {
        self.count(cluster_id, HEALTH_TIMEOUT)
    }

    pub fn latency_probes(&self, cluster_id: &str) -> usize {
        self.count(cluster_id, LATENCY_TIMEOUT)
    }

    fn count(&self, cluster_id: &str, timeout: Duration) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, t)| id == cluster_id && *t == timeout)
            .count()
    }
}

#[async_trait]
impl ConnectProbe for ScriptedProbe {
    async fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<(), ProbeError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.cluster_id.clone(), timeout));

        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(&endpoint.cluster_id)
            .copied()
            .unwrap_or(Script {
                delay: Duration::ZERO,
                reachable: true,
            });

        tokio::time::sleep(script.delay).await;
        if script.reachable {
            Ok(())
        } else {
            Err(ProbeError::Refused)
        }
    }
}

/// Issues a distinct token on every call and can refuse chosen clusters.
#[derive(Default)]
pub struct FakeTokens {
    issued: AtomicUsize,
    refuse: Mutex<HashSet<String>>,
    hang: Mutex<HashSet<String>>,
    tokens: Mutex<Vec<String>>,
}

impl FakeTokens {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refuse(&self, cluster_id: &str) {
        self.refuse.lock().unwrap().insert(cluster_id.to_string());
    }

    /// Never answer for `cluster_id`.
    pub fn hang(&self, cluster_id: &str) {
        self.hang.lock().unwrap().insert(cluster_id.to_string());
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenProvider for FakeTokens {
    async fn auth_token(&self, endpoint: &Endpoint, user: &str) -> Result<String, AuthError> {
        let hangs = self.hang.lock().unwrap().contains(&endpoint.cluster_id);
        if hangs {
            pending::<()>().await;
        }
        let refused = self.refuse.lock().unwrap().contains(&endpoint.cluster_id);
        if refused {
            return Err(AuthError::Provider("access denied".into()));
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        let token = format!("token-{n}-{user}-{}", endpoint.cluster_id);
        self.tokens.lock().unwrap().push(token.clone());
        Ok(token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeConnection {
    pub host: String,
    pub port: u16,
    pub token: String,
}

#[derive(Default)]
struct DriverState {
    failing: HashSet<String>,
    hanging: HashSet<String>,
    attempts: Vec<String>,
}

/// Driver that records every open attempt. Cloning shares the state.
#[derive(Clone, Default)]
pub struct FakeDriver {
    state: Arc<Mutex<DriverState>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, host: &str) {
        self.state.lock().unwrap().failing.insert(host.to_string());
    }

    /// Never return from `open` for `host`.
    pub fn hang(&self, host: &str) {
        self.state.lock().unwrap().hanging.insert(host.to_string());
    }

    /// Hosts in the order they were tried.
    pub fn attempts(&self) -> Vec<String> {
        self.state.lock().unwrap().attempts.clone()
    }
}

#[async_trait]
impl Driver for FakeDriver {
    type Connection = FakeConnection;

    async fn open(&self, params: ConnectParams<'_>) -> Result<FakeConnection, ConnectError> {
        let (fails, hangs) = {
            let mut state = self.state.lock().unwrap();
            state.attempts.push(params.host.to_string());
            (
                state.failing.contains(params.host),
                state.hanging.contains(params.host),
            )
        };
        if hangs {
            pending::<()>().await;
        }
        if fails {
            return Err(ConnectError::Network(format!(
                "{} is unreachable",
                params.host
            )));
        }
        Ok(FakeConnection {
            host: params.host.to_string(),
            port: params.port,
            token: params.token.to_string(),
        })
    }
}

/// Remote health provider answering from a fixed table, or always erroring.
#[derive(Default)]
pub struct FakeRemote {
    verdicts: Mutex<HashMap<String, HealthState>>,
    down: bool,
    queries: AtomicUsize,
}

impl FakeRemote {
    pub fn with(verdicts: &[(&str, HealthState)]) -> Arc<Self> {
        Arc::new(Self {
            verdicts: Mutex::new(
                verdicts
                    .iter()
                    .map(|(id, state)| (id.to_string(), *state))
                    .collect(),
            ),
            ..Self::default()
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            down: true,
            ..Self::default()
        })
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteHealthProvider for FakeRemote {
    async fn query_health(&self, health_check_id: &str) -> Result<HealthState, ProbeError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(ProbeError::Provider("service unavailable".into()));
        }
        Ok(self
            .verdicts
            .lock()
            .unwrap()
            .get(health_check_id)
            .copied()
            .unwrap_or(HealthState::Unknown))
    }
}

/// Bind a local listener that accepts and drops connections.
pub async fn start_listener() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });
    port
}

/// A port on which nothing is listening.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Tracing layer that keeps the level and message of every event.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl LogCapture {
    /// Events at `level` whose message is exactly `message`.
    pub fn count(&self, level: Level, message: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, m)| *l == level && m == message)
            .count()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}
