//! Contact form: field checks, bot trap and submission to the form service.

use crate::i18n::Language;
use crate::view::{FormStatus, View};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};

const MIN_MESSAGE_CHARS: usize = 10;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Form service rejected the submission ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to reach the form service: {0}")]
    Network(#[from] reqwest::Error),
}

/// Fields that carry shape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    /// Name of the form control.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        }
    }
}

/// Values entered in the contact form.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
    /// Hidden bot-trap field, posted as `_gotcha`. People never see it.
    pub website: String,
}

impl ContactForm {
    /// Fields failing their shape checks, in form order.
    pub fn validate(&self) -> Vec<Field> {
        let email_regex =
            EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

        let mut invalid = Vec::new();
        if self.name.trim().is_empty() {
            invalid.push(Field::Name);
        }
        if !email_regex.is_match(self.email.trim()) {
            invalid.push(Field::Email);
        }
        if self.message.trim().chars().count() < MIN_MESSAGE_CHARS {
            invalid.push(Field::Message);
        }
        invalid
    }

    pub fn is_trapped(&self) -> bool {
        !self.website.trim().is_empty()
    }

    /// Field data as posted to the form service.
    fn fields(&self, language: Language) -> [(&'static str, &str); 6] {
        [
            ("name", self.name.trim()),
            ("email", self.email.trim()),
            ("company", self.company.trim()),
            ("message", self.message.trim()),
            ("_gotcha", self.website.as_str()),
            ("language", language.code()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Delivered to the form service.
    Delivered,
    /// Bot trap was filled in; reported as success, nothing sent.
    Trapped,
}

/// Client for the third-party form-processing endpoint.
#[derive(Debug, Clone)]
pub struct ContactClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ContactClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    /// Post the form. A filled bot trap short-circuits to a fake success.
    pub async fn submit(
        &self,
        form: &ContactForm,
        language: Language,
    ) -> Result<SubmitOutcome, ContactError> {
        if form.is_trapped() {
            info!("Bot trap filled in, dropping submission");
            return Ok(SubmitOutcome::Trapped);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .form(&form.fields(language))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ContactError::Rejected { status, body });
        }

        info!("Contact form delivered");
        Ok(SubmitOutcome::Delivered)
    }
}

/// Validate, mark fields and submit, reflecting each step on the view.
///
/// A filled bot trap shows success straight away, without validating or
/// sending anything. Invalid forms are never sent. After a failed submission the form keeps its
/// values so the visitor can retry.
pub async fn submit_contact(
    view: &mut dyn View,
    client: &ContactClient,
    form: &ContactForm,
    language: Language,
) -> FormStatus {
    if form.is_trapped() {
        info!("Bot trap filled in, reporting success without sending");
        view.show_form_status(FormStatus::Sent);
        return FormStatus::Sent;
    }

    let invalid = form.validate();
    for field in Field::ALL {
        view.mark_field_invalid(field.as_str(), invalid.contains(&field));
    }
    if !invalid.is_empty() {
        view.show_form_status(FormStatus::Invalid);
        return FormStatus::Invalid;
    }

    view.show_form_status(FormStatus::Sending);
    let status = match client.submit(form, language).await {
        Ok(_) => FormStatus::Sent,
        Err(e) => {
            warn!("Contact form submission failed: {}", e);
            FormStatus::Failed
        }
    };
    view.show_form_status(status);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::MemoryView;
    use wiremock::{
        matchers::{body_string_contains, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: "Analytical Engines".to_string(),
            message: "We would like to discuss a project.".to_string(),
            website: String::new(),
        }
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_empty());
    }

    #[test]
    fn test_invalid_email_and_short_message() {
        let form = ContactForm {
            email: "ada@example".to_string(),
            message: "Hello".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), vec![Field::Email, Field::Message]);
    }

    #[test]
    fn test_blank_name() {
        let form = ContactForm {
            name: "   ".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(), vec![Field::Name]);
    }

    #[test]
    fn test_email_shapes() {
        for (email, ok) in [
            ("a@b.co", true),
            ("first.last@sub.example.org", true),
            ("no-at-sign.com", false),
            ("two@@example.com", false),
            ("spaces in@example.com", false),
            ("", false),
        ] {
            let form = ContactForm {
                email: email.to_string(),
                ..valid_form()
            };
            assert_eq!(form.validate().is_empty(), ok, "email: {}", email);
        }
    }

    #[test]
    fn test_message_length_counts_characters() {
        let form = ContactForm {
            message: "ÄÖÜäöüßÄÖÜ".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_empty());
    }

    // ==================== Submission Tests ====================

    #[tokio::test]
    async fn test_submit_posts_form_fields() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/f/abc"))
            .and(header("Accept", "application/json"))
            .and(body_string_contains("email=ada%40example.com"))
            .and(body_string_contains("language=de"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ContactClient::new(&format!("{}/f/abc", mock_server.uri()));
        let outcome = client.submit(&valid_form(), Language::GERMAN).await;
        assert_eq!(outcome.unwrap(), SubmitOutcome::Delivered);
    }

    #[tokio::test]
    async fn test_bot_trap_skips_network() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = ContactClient::new(&format!("{}/f/abc", mock_server.uri()));
        let form = ContactForm {
            website: "http://spam.example".to_string(),
            ..valid_form()
        };
        let mut view = MemoryView::new("");

        let status = submit_contact(&mut view, &client, &form, Language::ENGLISH).await;

        assert_eq!(status, FormStatus::Sent);
        assert_eq!(view.form_status(), Some(FormStatus::Sent));
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = ContactClient::new(&format!("{}/f/abc", mock_server.uri()));
        let form = ContactForm {
            email: "not-an-email".to_string(),
            message: "Hi!!!".to_string(),
            ..valid_form()
        };
        let mut view = MemoryView::new("");

        let status = submit_contact(&mut view, &client, &form, Language::ENGLISH).await;

        assert_eq!(status, FormStatus::Invalid);
        assert!(view.is_invalid("email"));
        assert!(view.is_invalid("message"));
        assert!(!view.is_invalid("name"));
    }

    #[tokio::test]
    async fn test_server_error_reports_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ContactClient::new(&format!("{}/f/abc", mock_server.uri()));
        let mut view = MemoryView::new("");

        let status = submit_contact(&mut view, &client, &valid_form(), Language::ENGLISH).await;
        assert_eq!(status, FormStatus::Failed);
        assert_eq!(view.form_status(), Some(FormStatus::Failed));
    }

    #[tokio::test]
    async fn test_server_error_is_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ContactClient::new(&format!("{}/f/abc", mock_server.uri()));
        let err = client
            .submit(&valid_form(), Language::ENGLISH)
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::Rejected { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_bot_trap_with_invalid_fields_still_reports_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = ContactClient::new(&format!("{}/f/abc", mock_server.uri()));
        let form = ContactForm {
            name: String::new(),
            email: "spam".to_string(),
            message: "buy".to_string(),
            website: "http://spam.example".to_string(),
            ..valid_form()
        };
        let mut view = MemoryView::new("");

        let status = submit_contact(&mut view, &client, &form, Language::ENGLISH).await;

        assert_eq!(status, FormStatus::Sent);
        assert_eq!(view.form_status(), Some(FormStatus::Sent));
        for field in Field::ALL {
            assert!(!view.is_invalid(field.as_str()));
        }
    }

    #[tokio::test]
    async fn test_fixing_fields_clears_marks() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = ContactClient::new(&format!("{}/f/abc", mock_server.uri()));
        let mut view = MemoryView::new("");
        let bad = ContactForm {
            name: String::new(),
            ..valid_form()
        };

        submit_contact(&mut view, &client, &bad, Language::ENGLISH).await;
        assert!(view.is_invalid("name"));

        submit_contact(&mut view, &client, &valid_form(), Language::ENGLISH).await;
        assert!(!view.is_invalid("name"));
        assert_eq!(view.form_status(), Some(FormStatus::Sent));
    }
}
