//! Test helpers for integration tests
//!
//! Spawns the API on an ephemeral port over a fresh in-memory store and
//! issues requests as seeded users.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use curator_api::extractors::{CSRF_COOKIE, CSRF_HEADER};
use curator_api::server::serve;
use curator_api::{create_app, AppState};
use curator_common::{AppConfig, JwtService};
use curator_core::{Actor, Role, Snowflake};
use curator_db::InMemoryStore;
use curator_service::ServiceContextBuilder;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::ErrorEnvelope;

const JWT_SECRET: &str = "integration-test-secret-that-is-long-enough";
const CSRF_TOKEN: &str = "integration-csrf-token";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<InMemoryStore>,
    jwt: JwtService,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        let store = Arc::new(InMemoryStore::new());

        let service_context = ServiceContextBuilder::new()
            .in_memory(store.clone())
            .thresholds(config.moderation.thresholds())
            .store_timeout(config.moderation.store_timeout())
            .build()?;
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);
        let state = AppState::new(service_context, jwt.clone(), config);
        let app = create_app(state)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store,
            jwt,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url(), path)
    }

    /// Bearer token for the given caller
    pub fn token(&self, actor: &Actor) -> Result<String> {
        Ok(self.jwt.issue_access_token(actor)?)
    }

    /// Seed a user record and return the matching caller
    pub async fn user(&self, id: i64, name: &str, role: Role) -> Actor {
        let user = curator_core::UserAggregate::new(Snowflake::new(id), name, chrono::Utc::now())
            .with_role(role);
        self.store.seed_user(user).await;
        Actor::new(Snowflake::new(id), name, role)
    }

    /// GET outside the API prefix, without credentials
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// GET under `/api/v1` without credentials
    pub async fn get_api(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.api_url(path)).send().await?)
    }

    /// GET under `/api/v1` as `actor`
    pub async fn get_auth(&self, path: &str, actor: &Actor) -> Result<Response> {
        let request = self.client.get(self.api_url(path));
        Ok(self.authorized(request, actor)?.send().await?)
    }

    /// POST JSON under `/api/v1` as `actor`, with a valid CSRF pair
    pub async fn post_auth(&self, path: &str, actor: &Actor, body: &Value) -> Result<Response> {
        let request = self
            .client
            .post(self.api_url(path))
            .header(CSRF_HEADER, CSRF_TOKEN)
            .header("Cookie", format!("{CSRF_COOKIE}={CSRF_TOKEN}"))
            .json(body);
        Ok(self.authorized(request, actor)?.send().await?)
    }

    /// POST JSON under `/api/v1` as `actor` with no CSRF token
    pub async fn post_auth_without_csrf(
        &self,
        path: &str,
        actor: &Actor,
        body: &Value,
    ) -> Result<Response> {
        let request = self.client.post(self.api_url(path)).json(body);
        Ok(self.authorized(request, actor)?.send().await?)
    }

    fn authorized(&self, request: RequestBuilder, actor: &Actor) -> Result<RequestBuilder> {
        Ok(request.bearer_auth(self.token(actor)?))
    }
}

/// Configuration for an in-process server; nothing is read from the environment
pub fn test_config() -> Result<AppConfig> {
    let pairs = [
        ("API_PORT", "0"),
        ("DATABASE_URL", "postgres://unused"),
        ("JWT_SECRET", JWT_SECRET),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "1000"),
    ];
    AppConfig::from_lookup(|key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error status and return the error body
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<ErrorEnvelope> {
    assert_json(response, expected_status).await
}
