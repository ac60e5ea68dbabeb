use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    accounts::AccountService,
    cycle::{project_profile, CycleProjection},
    error::AppError,
    models::{Account, CycleUpdate},
};

/// Closed set of gateway requests, tagged by `action`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AuthRequest {
    Register(Credentials),
    Login(Credentials),
    Update(ProfileUpdate),
}

const ACTIONS: [&str; 3] = ["register", "login", "update"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credentials {
    #[serde(alias = "identifier")]
    pub email: String,
    #[serde(alias = "secret")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileUpdate {
    #[serde(alias = "identifier")]
    pub email: String,
    #[serde(rename = "cycleData", alias = "profile")]
    pub cycle_data: CycleUpdate,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<CycleProjection>,
}

impl AuthResponse {
    fn ok(user: Account) -> Self {
        let projection = project_profile(&user.cycle_data, Local::now().date_naive());
        Self { success: true, user, projection }
    }
}

impl AuthRequest {
    /// Parses a raw request body. The content type is not checked; browsers
    /// posting a string body send `text/plain`.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| AppError::MalformedPayload(e.to_string()))?;
        Self::parse(value)
    }

    /// Rejects unknown actions first, then anything that does not fit the action's shape.
    pub fn parse(body: Value) -> Result<Self, AppError> {
        let known = body
            .get("action")
            .and_then(Value::as_str)
            .is_some_and(|action| ACTIONS.contains(&action));
        if !known {
            return Err(AppError::InvalidAction);
        }

        let request: AuthRequest =
            serde_json::from_value(body).map_err(|e| AppError::MalformedPayload(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), AppError> {
        let email = match self {
            AuthRequest::Register(c) | AuthRequest::Login(c) => {
                if c.password.is_empty() {
                    return Err(AppError::MalformedPayload("password is required".into()));
                }
                &c.email
            }
            AuthRequest::Update(u) => {
                if u.cycle_data.cycle_length <= 0 {
                    return Err(AppError::MalformedPayload("cycleLength must be positive".into()));
                }
                if u.cycle_data.period_duration <= 0 {
                    return Err(AppError::MalformedPayload("periodDuration must be positive".into()));
                }
                &u.email
            }
        };

        if email.trim().is_empty() {
            return Err(AppError::MalformedPayload("email is required".into()));
        }
        Ok(())
    }
}

pub fn routes(service: AccountService) -> Router {
    Router::new()
        .route("/api/auth", post(auth))
        .with_state(service)
}

async fn auth(
    State(service): State<AccountService>,
    body: Bytes,
) -> Result<Json<AuthResponse>, AppError> {
    let request = AuthRequest::from_body(&body).map_err(|e| {
        tracing::warn!("⚠️ Rejected auth request: {}", e);
        e
    })?;

    let user = match request {
        AuthRequest::Register(c) => service.register(&c.email, &c.password).await?,
        AuthRequest::Login(c) => service.login(&c.email, &c.password).await?,
        AuthRequest::Update(u) => service.update(&u.email, u.cycle_data).await?,
    };

    Ok(Json(AuthResponse::ok(user)))
}
