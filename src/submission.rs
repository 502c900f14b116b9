//! Shared submit pipeline for the newsletter, modal and contact forms.
//!
//! One attempt runs: validate, then post, then render a terminal state. The
//! browser only appears behind [`Transport`] and [`FormView`], so the whole
//! sequence can be driven with fakes.

use futures::future::{FutureExt, LocalBoxFuture};
use gloo_net::http::Request;
use log::{debug, error, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::dom::DomError;
use crate::forms::{FormFields, FormKind};
use crate::validation::{self, live_email_error, ValidationError};

pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success(String),
    Error(String),
}

impl SubmissionState {
    pub fn submit_disabled(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn success_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Success(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Live validation for an email field: the error shows while the value
    /// is invalid and hides once it is valid. An in-flight attempt is left alone.
    pub fn after_email_input(&self, value: &str) -> SubmissionState {
        match (self, live_email_error(value)) {
            (SubmissionState::Submitting, _) => self.clone(),
            (_, Some(msg)) => SubmissionState::Error(msg.to_string()),
            (SubmissionState::Error(_), None) => SubmissionState::Idle,
            (_, None) => self.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPost {
    pub url: String,
    pub body: String,
    pub csrf_token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ReplyBody {
    #[serde(default = "implicit_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn implicit_success() -> bool {
    true
}

impl ReplyBody {
    /// Empty or non-JSON bodies count as `{"success": true}`.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or(ReplyBody {
            success: true,
            message: None,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitFailure {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("form is misconfigured: {0}")]
    Config(#[from] DomError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub trait Transport {
    fn post_form(&self, post: FormPost) -> LocalBoxFuture<'_, Result<HttpReply, TransportError>>;
}

/// `fetch`-backed transport.
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn post_form(&self, post: FormPost) -> LocalBoxFuture<'_, Result<HttpReply, TransportError>> {
        async move {
            let response = Request::post(&post.url)
                .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
                .header(CSRF_HEADER, &post.csrf_token)
                .header("Content-Type", FORM_CONTENT_TYPE)
                .body(post.body)
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Ok(HttpReply { status, body })
        }
        .boxed_local()
    }
}

/// Where a submission renders. Yew components back this with state handles.
pub trait FormView {
    fn render(&mut self, state: SubmissionState);
    fn clear_fields(&mut self);
}

pub struct SubmissionFlow<T> {
    kind: FormKind,
    transport: T,
}

impl<T: Transport> SubmissionFlow<T> {
    pub fn new(kind: FormKind, transport: T) -> Self {
        Self { kind, transport }
    }

    pub fn validate(&self, fields: &FormFields) -> Result<(), ValidationError> {
        validation::validate(&self.kind.rules(), fields)
    }

    pub async fn submit<V: FormView>(
        &self,
        fields: &FormFields,
        csrf_token: Result<String, DomError>,
        view: &mut V,
    ) -> Result<ReplyBody, SubmitFailure> {
        if let Err(e) = self.validate(fields) {
            debug!("{:?} form rejected locally on `{}`", self.kind, e.field);
            view.render(SubmissionState::Error(e.message.clone()));
            return Err(e.into());
        }

        let csrf_token = match csrf_token {
            Ok(token) => token,
            Err(e) => {
                error!("Cannot submit {:?} form: {}", self.kind, e);
                view.render(SubmissionState::Error(self.kind.error_message().to_string()));
                return Err(e.into());
            }
        };

        view.render(SubmissionState::Submitting);
        let post = FormPost {
            url: self.kind.endpoint(),
            body: fields.to_urlencoded(&csrf_token),
            csrf_token,
        };

        let result = match self.transport.post_form(post).await {
            Ok(reply) if reply.is_success() => Ok(ReplyBody::parse(&reply.body)),
            Ok(reply) => Err(TransportError::Status(reply.status)),
            Err(e) => Err(e),
        };

        match result {
            Ok(body) => {
                info!("{:?} form submitted", self.kind);
                if !body.success {
                    warn!(
                        "{:?} endpoint replied 2xx with success=false: {}",
                        self.kind,
                        body.message.as_deref().unwrap_or("no message")
                    );
                }
                view.render(SubmissionState::Success(self.kind.success_message().to_string()));
                if self.kind.clears_on_success() {
                    view.clear_fields();
                }
                Ok(body)
            }
            Err(e) => {
                warn!("{:?} form submission failed: {}", self.kind, e);
                view.render(SubmissionState::Error(self.kind.error_message().to_string()));
                Err(e.into())
            }
        }
    }
}
