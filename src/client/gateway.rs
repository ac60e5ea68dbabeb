use reqwest::StatusCode;
use serde::Deserialize;

use crate::{
    models::{Account, CycleUpdate},
    routes::auth::{AuthRequest, Credentials, ProfileUpdate},
};

use super::ClientError;

pub const SERVER_ENV: &str = "LUNAFLOW_SERVER";
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3050";

#[derive(Deserialize)]
struct SuccessBody {
    user: Account,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to `POST /api/auth` on a running server.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(server: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/auth", server.trim_end_matches('/')),
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Account, ClientError> {
        self.send(AuthRequest::Register(credentials(email, password))).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Account, ClientError> {
        self.send(AuthRequest::Login(credentials(email, password))).await
    }

    pub async fn update(&self, email: &str, cycle_data: CycleUpdate) -> Result<Account, ClientError> {
        self.send(AuthRequest::Update(ProfileUpdate { email: email.to_string(), cycle_data }))
            .await
    }

    async fn send(&self, request: AuthRequest) -> Result<Account, ClientError> {
        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();

        if status.is_success() {
            let body: SuccessBody = response.json().await?;
            return Ok(body.user);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

        Err(match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::UNAUTHORIZED => ClientError::InvalidCredentials(message),
            _ => ClientError::Rejected { status: status.as_u16(), message },
        })
    }
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials { email: email.to_string(), password: password.to_string() }
}
