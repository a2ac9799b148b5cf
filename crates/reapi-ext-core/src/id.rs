//! Function identifiers.

use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a registered function.
///
/// The id is the only addressing key the host uses; it must be unique across
/// every registry of a library and must not change between versions.
///
/// # Example
///
/// ```
/// use reapi_ext_core::FunctionId;
///
/// let a = FunctionId::new("reapi-is-int");
/// let b = FunctionId::from("reapi-is-int".to_string());
///
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionId(Cow<'static, str>);

impl FunctionId {
    /// Create a new function id.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Create an id from a static string in const context.
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the id is usable as a registry key.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for FunctionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FunctionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for FunctionId {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FunctionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
