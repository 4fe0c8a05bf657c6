//! Test helpers for integration tests
//!
//! Spawns the real application on an ephemeral port and drives it over HTTP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use forum_api::{create_app, create_app_state};
use forum_common::AppConfig;
use reqwest::{header, redirect, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// API prefix all versioned routes live under
pub const API: &str = "/api/v1";

/// How a request presents its session
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    Cookie(&'a str),
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub config: AppConfig,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with_config(memory_config(&[])?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config.clone()).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Redirects are asserted on, never followed
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            addr,
            client,
            config,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn with_auth(&self, request: RequestBuilder, auth: Auth<'_>) -> RequestBuilder {
        match auth {
            Auth::None => request,
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::Cookie(token) => request.header(
                header::COOKIE,
                format!("{}={token}", self.config.session.cookie_name),
            ),
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, auth: Auth<'_>) -> Result<Response> {
        let request = self.client.get(self.url(path));
        Ok(self.with_auth(request, auth).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        auth: Auth<'_>,
        body: &T,
    ) -> Result<Response> {
        let request = self.client.post(self.url(path)).json(body);
        Ok(self.with_auth(request, auth).send().await?)
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        auth: Auth<'_>,
        body: &T,
    ) -> Result<Response> {
        let request = self.client.put(self.url(path)).json(body);
        Ok(self.with_auth(request, auth).send().await?)
    }
}

/// Configuration for the in-memory store, with extra variables layered on top
pub fn memory_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("API_HOST".to_string(), "127.0.0.1".to_string()),
        ("API_PORT".to_string(), "0".to_string()),
        ("RATE_LIMIT_REQUESTS_PER_SECOND".to_string(), "1000".to_string()),
        ("RATE_LIMIT_BURST".to_string(), "1000".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Configuration for PostgreSQL, or `None` when `DATABASE_URL` is unset
pub fn postgres_config() -> Result<Option<AppConfig>> {
    dotenvy::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return Ok(None);
    };
    memory_config(&[("DATABASE_URL", &url)]).map(Some)
}

/// Session token set by a login response
pub fn session_cookie_value(response: &Response, cookie_name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let (pair, _) = cookie.split_once(';').unwrap_or((cookie, ""));
            let (name, value) = pair.split_once('=')?;
            (name == cookie_name).then(|| value.to_string())
        })
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
