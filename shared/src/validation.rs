//! Create-instance form state and validation
//!
//! Validation runs at the form boundary before anything is submitted; the
//! control plane reuses [`validate_request`] on incoming payloads.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{CreateInstanceRequest, HttpsMode, UserCredential};

/// Minimum admin password length
pub const MIN_PASSWORD_LEN: usize = 6;

static TEAM_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Per-field validation messages; `None` means the field is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_valid(&self) -> bool {
        self.name.is_none()
            && self.team.is_none()
            && self.url.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Team => self.team.as_deref(),
            Field::Url => self.url.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Password => self.password.as_deref(),
        }
    }

    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Name => self.name = None,
            Field::Team => self.team = None,
            Field::Url => self.url = None,
            Field::Email => self.email = None,
            Field::Password => self.password = None,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::all()
            .iter()
            .filter_map(move |field| self.get(*field).map(|msg| (*field, msg)))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {}", field.as_str(), msg))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Validated text fields of the create form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Team,
    Url,
    Email,
    Password,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[Field::Name, Field::Team, Field::Url, Field::Email, Field::Password]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Team => "team",
            Field::Url => "url",
            Field::Email => "email",
            Field::Password => "password",
        }
    }
}

/// Which half of an additional-user row is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Email,
    Password,
}

/// Editable state of the create-instance form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateInstanceForm {
    pub name: String,
    pub team: String,
    pub url: String,
    pub email: String,
    pub password: String,
    pub https: HttpsMode,
    pub trusted_proxy_ips: String,
    pub additional_users: Vec<UserCredential>,
}

impl CreateInstanceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Team => self.team = value,
            Field::Url => self.url = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Team => &self.team,
            Field::Url => &self.url,
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    /// Whether the trusted proxy input should be shown
    pub fn shows_trusted_proxies(&self) -> bool {
        self.https.uses_trusted_proxies()
    }

    pub fn add_user(&mut self) {
        self.additional_users.push(UserCredential::default());
    }

    pub fn remove_user(&mut self, index: usize) {
        if index < self.additional_users.len() {
            self.additional_users.remove(index);
        }
    }

    pub fn update_user(&mut self, index: usize, field: CredentialField, value: String) {
        if let Some(user) = self.additional_users.get_mut(index) {
            match field {
                CredentialField::Email => user.email = value,
                CredentialField::Password => user.password = value,
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the submission payload without validating it
    ///
    /// Only complete additional-user rows are included; the trusted proxy
    /// list is sent only in external HTTPS mode.
    pub fn to_request(&self) -> CreateInstanceRequest {
        let trusted_proxy_ips = if self.shows_trusted_proxies() {
            let ips = self.trusted_proxy_ips.trim();
            (!ips.is_empty()).then(|| ips.to_string())
        } else {
            None
        };

        CreateInstanceRequest {
            name: self.name.clone(),
            team: self.team.clone(),
            url: self.url.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            https: self.https,
            trusted_proxy_ips,
            additional_users: self
                .additional_users
                .iter()
                .filter(|user| user.is_complete())
                .cloned()
                .collect(),
        }
    }

    /// Validate every field and return the payload to submit
    pub fn validate(&self) -> Result<CreateInstanceRequest, FieldErrors> {
        let request = self.to_request();
        validate_request(&request)?;
        Ok(request)
    }
}

/// Check a create payload field by field
pub fn validate_request(request: &CreateInstanceRequest) -> Result<(), FieldErrors> {
    let errors = FieldErrors {
        name: check_name(&request.name),
        team: check_team(&request.team),
        url: check_url(&request.url),
        email: check_email(&request.email),
        password: check_password(&request.password),
    };

    if errors.is_valid() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_name(name: &str) -> Option<String> {
    name.trim()
        .is_empty()
        .then(|| "Name is required".to_string())
}

fn check_team(team: &str) -> Option<String> {
    if team.is_empty() {
        Some("Team is required".to_string())
    } else if !is_valid_team_slug(team) {
        Some("Team must contain only lowercase letters, numbers, and hyphens".to_string())
    } else {
        None
    }
}

fn check_url(url: &str) -> Option<String> {
    url::Url::parse(url)
        .is_err()
        .then(|| "Must be a valid URL".to_string())
}

fn check_email(email: &str) -> Option<String> {
    (!EMAIL.is_match(email)).then(|| "Must be a valid email".to_string())
}

fn check_password(password: &str) -> Option<String> {
    (password.chars().count() < MIN_PASSWORD_LEN)
        .then(|| format!("Password must be at least {} characters", MIN_PASSWORD_LEN))
}

pub fn is_valid_team_slug(team: &str) -> bool {
    TEAM_SLUG.is_match(team)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CreateInstanceForm {
        CreateInstanceForm {
            name: "X".to_string(),
            team: "x".to_string(),
            url: "https://x".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_produces_request() {
        let request = valid_form().validate().unwrap();
        assert_eq!(request.name, "X");
        assert_eq!(request.https, HttpsMode::Auto);
        assert!(request.additional_users.is_empty());
        assert!(request.trusted_proxy_ips.is_none());
    }

    #[test]
    fn test_invalid_team_slug_is_rejected() {
        let mut form = valid_form();
        form.team = "Team_1".to_string();

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.team.as_deref(),
            Some("Team must contain only lowercase letters, numbers, and hyphens")
        );
        assert!(errors.name.is_none());
        assert!(errors.password.is_none());
    }

    #[test]
    fn test_every_field_reports() {
        let errors = CreateInstanceForm::new().validate().unwrap_err();
        assert_eq!(errors.name.as_deref(), Some("Name is required"));
        assert_eq!(errors.team.as_deref(), Some("Team is required"));
        assert_eq!(errors.url.as_deref(), Some("Must be a valid URL"));
        assert_eq!(errors.email.as_deref(), Some("Must be a valid email"));
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_url_and_email_shapes() {
        assert!(check_url("http://localhost:9999").is_none());
        assert!(check_url("grist.example.com").is_some());
        assert!(check_email("admin@acme-corp.com").is_none());
        assert!(check_email("admin@localhost").is_some());
        assert!(check_email("not an@email.com").is_some());
    }

    #[test]
    fn test_password_boundary() {
        assert!(check_password("12345").is_some());
        assert!(check_password("123456").is_none());
    }

    #[test]
    fn test_only_complete_users_are_submitted() {
        let mut form = valid_form();
        form.add_user();
        form.add_user();
        form.add_user();
        form.update_user(0, CredentialField::Email, "one@example.com".into());
        form.update_user(0, CredentialField::Password, "pw-one".into());
        form.update_user(1, CredentialField::Email, "two@example.com".into());
        form.update_user(2, CredentialField::Password, "orphan".into());

        let request = form.validate().unwrap();
        assert_eq!(request.additional_users.len(), 1);
        assert_eq!(request.additional_users[0].email, "one@example.com");
    }

    #[test]
    fn test_remove_user_out_of_range_is_ignored() {
        let mut form = valid_form();
        form.add_user();
        form.remove_user(5);
        assert_eq!(form.additional_users.len(), 1);
        form.remove_user(0);
        assert!(form.additional_users.is_empty());
    }

    #[test]
    fn test_trusted_proxies_only_in_external_mode() {
        let mut form = valid_form();
        form.trusted_proxy_ips = "10.0.0.0/8".to_string();
        assert!(form.to_request().trusted_proxy_ips.is_none());

        form.https = HttpsMode::External;
        assert!(form.shows_trusted_proxies());
        assert_eq!(form.to_request().trusted_proxy_ips.as_deref(), Some("10.0.0.0/8"));

        form.trusted_proxy_ips = "   ".to_string();
        assert!(form.to_request().trusted_proxy_ips.is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = valid_form();
        form.add_user();
        form.https = HttpsMode::Manual;
        form.reset();
        assert_eq!(form, CreateInstanceForm::default());
    }

    #[test]
    fn test_field_errors_display() {
        let errors = FieldErrors {
            team: Some("bad".to_string()),
            password: Some("short".to_string()),
            ..Default::default()
        };
        assert_eq!(errors.to_string(), "team: bad; password: short");
    }
}
