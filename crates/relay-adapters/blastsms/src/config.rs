//! Configuration types for the BlastSMS adapter.
//!
//! Loaded from the `adapters.blastsms` section of the global configuration.
//!
//! # Example Configuration
//!
//! ```toml
//! [adapters.blastsms]
//! base_url = "https://ussd.example.com"
//! web_port = 8080
//! web_path = "/api/v1/blastsms/ussd"
//! request_timeout = "4s"
//! encoding = "xml"
//! variant = "session"
//! default_appid = "quiz"
//! appid_fallback = "empty"
//!
//! [adapters.blastsms.provider_mappings]
//! "MTN-NG" = "mtn"
//! ```

use std::collections::HashMap;
use std::time::Duration;

use relay_core::{AdapterError, AdapterResult, HttpServerConfig, humantime_serde};
use serde::{Deserialize, Serialize};

use crate::schema::{FieldSchema, VariantProfile};

/// Request body encoding used by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// URL-encoded fields in the query string or a POST form body.
    #[default]
    Form,
    /// Flat XML document in the request body.
    Xml,
}

/// Dialect revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// `msisdn`, `shortcode`, `type`; placeholder session id.
    Shortcode,
    /// `msisdn`, `shortcode`, `sessionid`, `type`.
    #[default]
    Session,
    /// `msisdn`, `provider`, `type`; `request` overloaded with `to_addr`.
    Provider,
}

impl Variant {
    /// Returns the preset profile for this revision.
    pub fn profile(self) -> VariantProfile {
        match self {
            Self::Shortcode => VariantProfile::shortcode(),
            Self::Session => VariantProfile::session(),
            Self::Provider => VariantProfile::provider(),
        }
    }
}

/// Last step of application id resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppIdFallback {
    /// Use the `in_reply_to` token.
    #[default]
    InReplyTo,
    /// Render an empty `<appid/>` element.
    Empty,
}

/// BlastSMS adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastSmsConfig {
    /// Public base URL the aggregator calls back on.
    pub base_url: String,

    /// Bind address (default: "0.0.0.0").
    pub web_host: String,

    /// Listen port (default: 8080).
    pub web_port: u16,

    /// Request path (default: "/").
    pub web_path: String,

    /// How long a request waits for the application's reply.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Status sent when the reply does not arrive in time.
    pub timeout_status: u16,

    /// Request body encoding.
    pub encoding: Encoding,

    /// Dialect revision.
    pub variant: Variant,

    /// Replaces the variant's expected field names.
    pub expected_fields: Option<Vec<String>>,

    /// Replaces the variant's optional field names.
    pub optional_fields: Option<Vec<String>>,

    /// Raw provider name to canonical provider name.
    pub provider_mappings: HashMap<String, String>,

    /// Application id used when a reply does not carry one.
    pub default_appid: Option<String>,

    /// What to render when no application id is known.
    pub appid_fallback: AppIdFallback,
}

impl Default for BlastSmsConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            web_host: "0.0.0.0".to_string(),
            web_port: 8080,
            web_path: "/".to_string(),
            request_timeout: Duration::from_secs(4),
            timeout_status: 504,
            encoding: Encoding::default(),
            variant: Variant::default(),
            expected_fields: None,
            optional_fields: None,
            provider_mappings: HashMap::new(),
            default_appid: None,
            appid_fallback: AppIdFallback::default(),
        }
    }
}

impl BlastSmsConfig {
    /// Creates a configuration with the given callback base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Returns the variant profile with any field overrides applied.
    pub fn profile(&self) -> VariantProfile {
        let mut profile = self.variant.profile();
        if self.expected_fields.is_some() || self.optional_fields.is_some() {
            let expected = self
                .expected_fields
                .clone()
                .unwrap_or_else(|| profile.schema.expected().iter().cloned().collect());
            let optional = self
                .optional_fields
                .clone()
                .unwrap_or_else(|| profile.schema.optional().iter().cloned().collect());
            profile.schema = FieldSchema::new(expected, optional);
        }
        profile
    }

    /// Returns the listener configuration.
    pub fn http_config(&self) -> HttpServerConfig {
        let mut config = HttpServerConfig::new(&self.web_host, self.web_port)
            .with_path(&self.web_path)
            .with_request_timeout(self.request_timeout);
        config.timeout_status = self.timeout_status;
        config
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AdapterResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AdapterError::config("base_url is required"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AdapterError::config(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if !self.web_path.starts_with('/') {
            return Err(AdapterError::config(format!(
                "web_path '{}' must start with '/'",
                self.web_path
            )));
        }
        if !(100..=599).contains(&self.timeout_status) {
            return Err(AdapterError::config(format!(
                "timeout_status {} is not an HTTP status",
                self.timeout_status
            )));
        }

        self.profile().check().map_err(AdapterError::config)
    }
}
