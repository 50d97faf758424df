//! Action description for captured requests
//!
//! Every logged request is summarized as one human-readable line:
//!
//! ```text
//! Viewed /items
//! Created new /users with data: {"name":"Alice","email":"a@x.io"}
//! Deleted /claims/5
//! ```
//!
//! Read requests never carry data. Mutating requests carry the request
//! fields minus the credential fields in [`REDACTED_FIELDS`], and only when
//! something is left after redaction.

use std::fmt;

use http::Method;

use super::models::FieldMap;

/// Top-level field names that never appear in an action, matched exactly.
pub const REDACTED_FIELDS: [&str; 3] = ["password", "token", "_token"];

const DATA_SEPARATOR: &str = " with data: ";

/// What a request did, derived from its HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionVerb<'a> {
    View,
    Create,
    Update,
    Delete,
    /// Any method without a dedicated verb, kept as sent
    Other(&'a str),
}

impl<'a> ActionVerb<'a> {
    pub fn from_method(method: &'a Method) -> Self {
        match *method {
            Method::GET => Self::View,
            Method::POST => Self::Create,
            Method::PUT | Method::PATCH => Self::Update,
            Method::DELETE => Self::Delete,
            _ => Self::Other(method.as_str()),
        }
    }

    /// Whether actions with this verb may carry request data
    pub fn captures_data(&self) -> bool {
        !matches!(self, Self::View)
    }

    /// The base phrase for `path`, without any data suffix
    pub fn describe(&self, path: &str) -> String {
        match self {
            Self::View => format!("Viewed {path}"),
            Self::Create => format!("Created new {path}"),
            Self::Update => format!("Updated {path}"),
            Self::Delete => format!("Deleted {path}"),
            Self::Other(method) => format!("{method} {path}"),
        }
    }
}

/// A described request action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    summary: String,
    data: Option<String>,
}

impl Action {
    /// Describe a request from its method, path and fields.
    ///
    /// Fails only if the redacted fields cannot be serialized.
    pub fn describe(method: &Method, path: &str, fields: &FieldMap) -> Result<Self, serde_json::Error> {
        let verb = ActionVerb::from_method(method);
        let summary = verb.describe(path);

        let data = if verb.captures_data() {
            let retained = redact(fields);
            if retained.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&retained)?)
            }
        } else {
            None
        };

        Ok(Self { summary, data })
    }

    /// Base phrase without the data suffix
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Compact JSON of the retained fields, if any were retained
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)?;
        if let Some(data) = &self.data {
            write!(f, "{DATA_SEPARATOR}{data}")?;
        }
        Ok(())
    }
}

/// Copy of `fields` without the redacted names, order preserved
pub fn redact(fields: &FieldMap) -> FieldMap {
    fields
        .iter()
        .filter(|(name, _)| !REDACTED_FIELDS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
