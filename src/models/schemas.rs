use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::validation::{check_email, parse_http_url, Validate, ValidationErrors};

const MAX_AGE: i64 = 120;

/// A user account.
///
/// Stored in the `user` collection. No endpoint reads or writes users yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    /// Age in years.
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(msg) = check_email(&self.email) {
            errors.add("email", msg);
        }
        if let Some(age) = self.age {
            if !(0..=MAX_AGE).contains(&age) {
                errors.add("age", format!("Input should be between 0 and {MAX_AGE}"));
            }
        }
        errors.into_result()
    }
}

/// A catalogue product. Stored in the `product` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in dollars.
    pub price: f64,
    pub category: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

impl Validate for Product {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !self.price.is_finite() || self.price < 0.0 {
            errors.add("price", "Input should be greater than or equal to 0");
        }
        errors.into_result()
    }
}

/// A published podcast episode, as persisted in `podcastepisode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastEpisode {
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub cover_image_url: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PodcastEpisode {
    /// Rewrite the media links in their canonical form. Links that do not
    /// parse are left untouched; validation reports them.
    pub fn normalize_urls(&mut self) {
        self.audio_url = normalize_url(&self.audio_url);
        if let Some(cover) = self.cover_image_url.as_mut() {
            *cover = normalize_url(cover);
        }
    }
}

fn normalize_url(value: &str) -> String {
    parse_http_url(value)
        .map(String::from)
        .unwrap_or_else(|_| value.to_string())
}

impl Validate for PodcastEpisode {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(msg) = parse_http_url(&self.audio_url) {
            errors.add("audio_url", msg);
        }
        if let Some(cover) = &self.cover_image_url {
            if let Err(msg) = parse_http_url(cover) {
                errors.add("cover_image_url", msg);
            }
        }
        errors.into_result()
    }
}

/// A contact inquiry, as persisted in `inquiry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    /// Conventionally `online` or `f2f`; not enforced.
    pub preferred_mode: Option<String>,
}

impl Validate for Inquiry {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(msg) = check_email(&self.email) {
            errors.add("email", msg);
        }
        errors.into_result()
    }
}

fn default_true() -> bool {
    true
}
