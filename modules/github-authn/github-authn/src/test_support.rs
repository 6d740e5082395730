#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use github_authn_sdk::Credentials;
use http::{StatusCode, Uri};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::config::{GithubAuthNConfig, ResolvedConfig};
use crate::domain::transport::{GithubTransport, TransportError, TransportResponse};

pub const API_URL: &str = "http://github.example.com/api/v3";
pub const LOGIN: &str = "demo-user";
pub const TOKEN: &str = "DUMMY";

#[must_use]
pub fn config(allowed_orgs: Option<&str>, ttl: Duration) -> ResolvedConfig {
    GithubAuthNConfig {
        api_url: API_URL.to_owned(),
        allowed_orgs: allowed_orgs.map(str::to_owned),
        principal_cache_ttl: ttl,
        ..GithubAuthNConfig::default()
    }
    .resolve()
    .unwrap()
}

#[must_use]
pub fn creds(login: &str, token: &str) -> Credentials {
    Credentials::new(login, SecretString::from(token.to_owned()))
}

#[must_use]
pub fn teams_json(org: &str, names: &[&str]) -> Value {
    Value::Array(
        names
            .iter()
            .map(|name| json!({ "name": name, "organization": { "login": org } }))
            .collect(),
    )
}

#[derive(Clone)]
enum Scripted {
    Response(StatusCode, Bytes),
    ConnectFailure,
}

/// In-memory transport answering per URI and recording every call.
///
/// Unscripted URIs answer `404`. Each call also records the token it carried
/// so tests can check what was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<Uri, Scripted>>,
    calls: Mutex<Vec<(Uri, String)>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the happy path: user, a single org and one team in that org.
    #[must_use]
    pub fn demo(cfg: &ResolvedConfig) -> Self {
        let transport = Self::new();
        transport.respond_json(
            &cfg.endpoints.user,
            StatusCode::OK,
            &json!({ "login": LOGIN, "name": "Hans Wurst" }),
        );
        transport.respond_json(
            &cfg.endpoints.user_orgs,
            StatusCode::OK,
            &json!([{ "login": "TEST-ORG" }]),
        );
        transport.respond_json(
            &cfg.endpoints.user_teams,
            StatusCode::OK,
            &teams_json("TEST-ORG", &["admin"]),
        );
        transport
    }

    pub fn respond_json(&self, uri: &Uri, status: StatusCode, body: &Value) {
        self.respond_raw(uri, status, &body.to_string());
    }

    pub fn respond_raw(&self, uri: &Uri, status: StatusCode, body: &str) {
        self.responses.lock().unwrap().insert(
            uri.clone(),
            Scripted::Response(status, Bytes::copy_from_slice(body.as_bytes())),
        );
    }

    pub fn fail(&self, uri: &Uri) {
        self.responses
            .lock()
            .unwrap()
            .insert(uri.clone(), Scripted::ConnectFailure);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Uri> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(uri, _)| uri.clone())
            .collect()
    }

    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GithubTransport for ScriptedTransport {
    async fn get(
        &self,
        uri: &Uri,
        token: &SecretString,
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((uri.clone(), token.expose_secret().to_owned()));

        let scripted = self.responses.lock().unwrap().get(uri).cloned();
        match scripted {
            Some(Scripted::Response(status, body)) => Ok(TransportResponse { status, body }),
            Some(Scripted::ConnectFailure) => Err(TransportError::Connect {
                uri: uri.clone(),
                source: "connection refused".into(),
            }),
            None => Ok(TransportResponse {
                status: StatusCode::NOT_FOUND,
                body: Bytes::from_static(br#"{"message":"Not Found"}"#),
            }),
        }
    }
}
