use std::fmt;

use serde::Serialize;

/// Longest URL accepted for media links.
const MAX_URL_LENGTH: usize = 2083;
const MAX_EMAIL_LOCAL_LENGTH: usize = 64;
const MAX_EMAIL_DOMAIN_LENGTH: usize = 255;

/// A single failing field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field that failed validation for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field error, used when the body itself could not be decoded.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Explicit validation step for a record shape.
///
/// Implementations collect every failing field instead of stopping at the
/// first one.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Check that `value` looks like a deliverable email address.
pub fn check_email(value: &str) -> Result<(), String> {
    let (local, domain) = value
        .split_once('@')
        .ok_or_else(|| "value is not a valid email address: missing '@'".to_string())?;

    if domain.contains('@') {
        return Err("value is not a valid email address: more than one '@'".into());
    }
    if local.is_empty() {
        return Err("value is not a valid email address: empty local part".into());
    }
    if local.len() > MAX_EMAIL_LOCAL_LENGTH {
        return Err("value is not a valid email address: local part is too long".into());
    }
    if local.chars().any(char::is_whitespace) {
        return Err("value is not a valid email address: whitespace in local part".into());
    }
    if domain.len() > MAX_EMAIL_DOMAIN_LENGTH {
        return Err("value is not a valid email address: domain is too long".into());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err("value is not a valid email address: domain must contain a '.'".into());
    }
    for label in labels {
        let well_formed = !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !well_formed {
            return Err(format!(
                "value is not a valid email address: invalid domain label '{label}'"
            ));
        }
    }

    Ok(())
}

/// Parse `value` as an absolute http(s) URL with a host.
pub fn parse_http_url(value: &str) -> Result<url::Url, String> {
    if value.len() > MAX_URL_LENGTH {
        return Err(format!("URL should have at most {MAX_URL_LENGTH} characters"));
    }

    let parsed = url::Url::parse(value).map_err(|e| format!("Input should be a valid URL, {e}"))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("URL scheme should be 'http' or 'https', got '{other}'")),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err("URL must have a host".into());
    }

    Ok(parsed)
}
