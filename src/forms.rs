//! The three landing-page forms and the field set they submit.

use url::form_urlencoded;

use crate::config;
use crate::validation::FieldRule;

pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Ordered name/value pairs, serialized in the order the form declares them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    entries: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(names: &[&str]) -> Self {
        Self {
            entries: names
                .iter()
                .map(|name| (name.to_string(), String::new()))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    /// Missing fields read as empty.
    pub fn get(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Same fields, every value emptied.
    pub fn cleared(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(name, _)| (name.clone(), String::new()))
                .collect(),
        }
    }

    pub fn to_urlencoded(&self, csrf_token: &str) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair(CSRF_FIELD, csrf_token);
        for (name, value) in &self.entries {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Newsletter,
    Modal,
    Contact,
}

impl FormKind {
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            FormKind::Newsletter | FormKind::Modal => &["email"],
            FormKind::Contact => &["name", "email", "message"],
        }
    }

    pub fn empty_fields(self) -> FormFields {
        FormFields::new(self.field_names())
    }

    pub fn rules(self) -> Vec<FieldRule> {
        match self {
            FormKind::Newsletter | FormKind::Modal => vec![FieldRule::email("email")],
            FormKind::Contact => vec![
                FieldRule::text("name"),
                FieldRule::email("email"),
                FieldRule::text_with_message("message", "Please enter a message."),
            ],
        }
    }

    pub fn is_email_field(self, name: &str) -> bool {
        self.rules()
            .iter()
            .any(|rule| matches!(rule, FieldRule::Email { name: n } if *n == name))
    }

    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::Newsletter => "Subscribed! Check your inbox.",
            FormKind::Modal => "Thanks! Check your inbox.",
            FormKind::Contact => "Thanks! We will get back to you soon.",
        }
    }

    pub fn error_message(self) -> &'static str {
        match self {
            FormKind::Newsletter => "Something went wrong. Please try again.",
            FormKind::Modal => "Please try again later.",
            FormKind::Contact => "Something went wrong. Please try again later.",
        }
    }

    /// The modal closes itself instead of resetting.
    pub fn clears_on_success(self) -> bool {
        !matches!(self, FormKind::Modal)
    }

    pub fn path(self) -> &'static str {
        match self {
            FormKind::Newsletter => "/newsletter/subscribe/",
            FormKind::Modal => "/lead/capture/",
            FormKind::Contact => "/contact/submit/",
        }
    }

    pub fn endpoint(self) -> String {
        config::endpoint(self.path())
    }

    /// Prefix for element ids rendered by the form's component.
    pub fn id_prefix(self) -> &'static str {
        match self {
            FormKind::Newsletter => "newsletter",
            FormKind::Modal => "email-modal",
            FormKind::Contact => "contact",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_overwrites_in_place_and_keeps_order() {
        let fields = FormKind::Contact
            .empty_fields()
            .with("message", "hi")
            .with("name", "Ada")
            .with("name", "Grace");
        assert_eq!(fields.get("name"), "Grace");
        assert_eq!(
            fields.to_urlencoded("tok"),
            "csrfmiddlewaretoken=tok&name=Grace&email=&message=hi"
        );
    }

    #[test]
    fn payload_is_form_encoded() {
        let fields = FormKind::Contact
            .empty_fields()
            .with("name", "Ada Lovelace")
            .with("email", "ada+news@example.com")
            .with("message", "a&b=c");
        assert_eq!(
            fields.to_urlencoded("x/y"),
            "csrfmiddlewaretoken=x%2Fy&name=Ada+Lovelace&email=ada%2Bnews%40example.com&message=a%26b%3Dc"
        );
    }

    #[test]
    fn cleared_keeps_names() {
        let fields = FormKind::Newsletter.empty_fields().with("email", "a@b.co");
        assert_eq!(fields.cleared(), FormKind::Newsletter.empty_fields());
    }

    #[test]
    fn only_modal_keeps_values_on_success() {
        assert!(FormKind::Newsletter.clears_on_success());
        assert!(FormKind::Contact.clears_on_success());
        assert!(!FormKind::Modal.clears_on_success());
    }

    #[test]
    fn email_fields_are_detected_from_rules() {
        assert!(FormKind::Contact.is_email_field("email"));
        assert!(!FormKind::Contact.is_email_field("name"));
    }
}
