//! Field schemas and the per-variant wire profile.
//!
//! A [`VariantProfile`] bundles everything that differs between the
//! aggregator's dialect revisions: which fields are accepted, where the
//! destination and text live, and where the session id comes from.

use std::collections::BTreeSet;

/// Placeholder session id for dialects that do not carry one.
pub const PLACEHOLDER_SESSION_ID: &str = "var_sessionid";

/// Field names every profile relies on.
pub const MSISDN_FIELD: &str = "msisdn";
/// Session type field.
pub const TYPE_FIELD: &str = "type";
/// Application id field.
pub const APPID_FIELD: &str = "appid";

/// Expected and optional field names.
///
/// Everything outside the two sets is unexpected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSchema {
    expected: BTreeSet<String>,
    optional: BTreeSet<String>,
}

impl FieldSchema {
    /// Creates a schema from expected and optional names.
    pub fn new<E, O>(expected: E, optional: O) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            expected: expected.into_iter().map(Into::into).collect(),
            optional: optional.into_iter().map(Into::into).collect(),
        }
    }

    /// Names that must be present.
    pub fn expected(&self) -> &BTreeSet<String> {
        &self.expected
    }

    /// Names that may be absent.
    pub fn optional(&self) -> &BTreeSet<String> {
        &self.optional
    }

    /// Returns true if `name` is expected or optional.
    pub fn accepts(&self, name: &str) -> bool {
        self.expected.contains(name) || self.optional.contains(name)
    }

    /// Names listed as both expected and optional, sorted.
    pub fn overlap(&self) -> Vec<String> {
        self.expected.intersection(&self.optional).cloned().collect()
    }
}

/// Where the destination address and the message text come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressMode {
    /// Destination and text travel in separate fields.
    Shortcode {
        /// Destination field, e.g. `shortcode`.
        destination: String,
        /// Text field, e.g. `msg`.
        content: String,
    },
    /// One field carries the destination on session start and the text
    /// afterwards. The presence of `destination` tells them apart.
    Overloaded {
        /// Dual-use field, e.g. `request`.
        overloaded: String,
        /// Secondary destination field, e.g. `to_addr`.
        destination: String,
    },
}

impl AddressMode {
    fn fields(&self) -> [&str; 2] {
        match self {
            Self::Shortcode {
                destination,
                content,
            } => [destination.as_str(), content.as_str()],
            Self::Overloaded {
                overloaded,
                destination,
            } => [overloaded.as_str(), destination.as_str()],
        }
    }
}

/// Source of the `sessionid` correlation value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdSource {
    /// Copied verbatim from the named field.
    Field(String),
    /// The dialect omits it; a fixed value is used instead.
    Placeholder(String),
}

/// Complete description of one dialect revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantProfile {
    /// Accepted fields.
    pub schema: FieldSchema,
    /// Destination/text resolution.
    pub address_mode: AddressMode,
    /// Session id resolution.
    pub session_id: SessionIdSource,
    /// Field carrying the provider, if the dialect has one.
    pub provider_field: Option<String>,
}

impl VariantProfile {
    /// Destination in `shortcode`, text in `msg`, no session id on the wire.
    pub fn shortcode() -> Self {
        Self {
            schema: FieldSchema::new(["msisdn", "shortcode", "type"], ["msg", "appid"]),
            address_mode: AddressMode::Shortcode {
                destination: "shortcode".to_string(),
                content: "msg".to_string(),
            },
            session_id: SessionIdSource::Placeholder(PLACEHOLDER_SESSION_ID.to_string()),
            provider_field: None,
        }
    }

    /// Like [`shortcode`](Self::shortcode) but with a real `sessionid`.
    pub fn session() -> Self {
        Self {
            schema: FieldSchema::new(
                ["msisdn", "shortcode", "sessionid", "type"],
                ["msg", "appid"],
            ),
            session_id: SessionIdSource::Field("sessionid".to_string()),
            ..Self::shortcode()
        }
    }

    /// Provider-tagged requests where `request` is overloaded.
    pub fn provider() -> Self {
        Self {
            schema: FieldSchema::new(
                ["msisdn", "provider", "type"],
                ["request", "appid", "to_addr"],
            ),
            address_mode: AddressMode::Overloaded {
                overloaded: "request".to_string(),
                destination: "to_addr".to_string(),
            },
            session_id: SessionIdSource::Placeholder(PLACEHOLDER_SESSION_ID.to_string()),
            provider_field: Some("provider".to_string()),
        }
    }

    /// Checks that the schema is consistent with the fields the profile reads.
    pub fn check(&self) -> Result<(), String> {
        let overlap = self.schema.overlap();
        if !overlap.is_empty() {
            return Err(format!(
                "fields listed as both expected and optional: {}",
                overlap.join(", ")
            ));
        }

        for name in [MSISDN_FIELD, TYPE_FIELD] {
            if !self.schema.expected().contains(name) {
                return Err(format!("field '{name}' must be expected"));
            }
        }

        let mut referenced: Vec<&str> = self.address_mode.fields().to_vec();
        if let SessionIdSource::Field(name) = &self.session_id {
            referenced.push(name);
        }
        if let Some(name) = &self.provider_field {
            referenced.push(name);
        }
        for name in referenced {
            if !self.schema.accepts(name) {
                return Err(format!("field '{name}' is not part of the schema"));
            }
        }

        Ok(())
    }
}
