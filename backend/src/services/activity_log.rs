//! Best-effort activity recorder.
//!
//! Every mutating back-office operation records one row. A failed insert is
//! logged and dropped: the operation that triggered it carries on as if the
//! write had succeeded. There is no retry and no queue.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::USER_AGENT, request::Parts, HeaderMap},
};
use sqlx::PgPool;
use std::convert::Infallible;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    middleware::request_id::{RequestId, REQUEST_ID_HEADER},
    models::activity_log::{
        ActivityAction, ActivityMetadata, ActivityTarget, ActorRole, NewActivityLog,
    },
    repositories::activity_log,
};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize activity payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to insert activity log: {0}")]
    Database(#[from] sqlx::Error),
}

/// Client details captured from the HTTP request that triggered an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip_address: extract_ip(headers),
            user_agent: extract_user_agent(headers),
            request_id: header_value(headers, REQUEST_ID_HEADER),
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut context = RequestContext::from_headers(&parts.headers);
        if let Some(request_id) = parts.extensions.get::<RequestId>() {
            context.request_id = Some(request_id.0.clone());
        }
        Ok(context)
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// First hop of `x-forwarded-for`, else `x-real-ip`.
fn extract_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|value| {
            value
                .split(',')
                .next()
                .map(str::trim)
                .filter(|first| !first.is_empty())
                .map(str::to_string)
        })
        .or_else(|| header_value(headers, "x-real-ip"))
}

fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// One event as handed to the recorder.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    pub actor_id: String,
    pub actor_role: ActorRole,
    pub action: ActivityAction,
    pub target: Option<ActivityTarget>,
    pub metadata: Option<ActivityMetadata>,
    pub context: Option<RequestContext>,
}

impl ActivityEvent {
    pub fn new(actor_id: impl Into<String>, actor_role: ActorRole, action: ActivityAction) -> Self {
        Self {
            actor_id: actor_id.into(),
            actor_role,
            action,
            target: None,
            metadata: None,
            context: None,
        }
    }

    pub fn with_target(mut self, target: ActivityTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_metadata(mut self, metadata: ActivityMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_context(mut self, context: Option<&RequestContext>) -> Self {
        self.context = context.cloned();
        self
    }

    fn to_new_log(&self) -> Result<NewActivityLog, PersistError> {
        let target = self.target.as_ref().map(serde_json::to_value).transpose()?;
        let metadata = self
            .metadata
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        let context = self.context.clone().unwrap_or_default();

        Ok(NewActivityLog {
            id: Uuid::new_v4().to_string(),
            actor_id: self.actor_id.clone(),
            actor_role: self.actor_role,
            action: self.action,
            target,
            metadata,
            ip_address: context.ip_address,
            user_agent: context.user_agent,
            request_id: context.request_id,
        })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    async fn insert(&self, log: &NewActivityLog) -> Result<(), PersistError>;
}

#[derive(Debug, Clone)]
pub struct PgActivityLogStore {
    pool: PgPool,
}

impl PgActivityLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogStore for PgActivityLogStore {
    async fn insert(&self, log: &NewActivityLog) -> Result<(), PersistError> {
        activity_log::insert_activity_log(&self.pool, log)
            .await
            .map_err(PersistError::from)
    }
}

#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn ActivityLogStore>,
}

impl ActivityRecorder {
    pub fn new(store: Arc<dyn ActivityLogStore>) -> Self {
        Self { store }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PgActivityLogStore::new(pool)))
    }

    /// Persists the event and reports the outcome.
    pub async fn try_record(&self, event: &ActivityEvent) -> Result<(), PersistError> {
        let log = event.to_new_log()?;
        self.store.insert(&log).await
    }

    /// Persists the event; failures are logged and never reach the caller.
    pub async fn record(&self, event: ActivityEvent) {
        let result = self.try_record(&event).await;
        log_and_ignore(&event, result);
    }
}

/// Swallows an audit write failure after logging what was being recorded.
pub fn log_and_ignore(event: &ActivityEvent, result: Result<(), PersistError>) {
    if let Err(err) = result {
        tracing::error!(
            error = %err,
            actor_id = %event.actor_id,
            actor_role = %event.actor_role,
            action = %event.action,
            target = ?event.target,
            "Failed to record activity log"
        );
    }
}
