use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::forms::FormFields;

pub const INVALID_EMAIL: &str = "Please enter a valid email address.";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Keystroke-time feedback for email inputs.
pub fn live_email_error(value: &str) -> Option<&'static str> {
    if is_valid_email(value) {
        None
    } else {
        Some(INVALID_EMAIL)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    Text { name: &'static str, message: String },
    Email { name: &'static str },
}

impl FieldRule {
    pub fn text(name: &'static str) -> Self {
        FieldRule::Text {
            name,
            message: format!("Please enter your {}.", name),
        }
    }

    pub fn text_with_message(name: &'static str, message: &str) -> Self {
        FieldRule::Text {
            name,
            message: message.to_string(),
        }
    }

    pub fn email(name: &'static str) -> Self {
        FieldRule::Email { name }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldRule::Text { name, .. } | FieldRule::Email { name } => *name,
        }
    }

    fn check(&self, fields: &FormFields) -> Result<(), ValidationError> {
        let value = fields.get(self.name());
        match self {
            FieldRule::Text { name, message } if value.trim().is_empty() => Err(ValidationError {
                field: *name,
                message: message.clone(),
            }),
            FieldRule::Email { name } if !is_valid_email(value) => Err(ValidationError {
                field: *name,
                message: INVALID_EMAIL.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

/// Stops at the first failing rule, in declaration order.
pub fn validate(rules: &[FieldRule], fields: &FormFields) -> Result<(), ValidationError> {
    rules.iter().try_for_each(|rule| rule.check(fields))
}
