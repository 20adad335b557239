//! # Identifier Newtypes
//!
//! Newtype wrappers for the three identifier namespaces the engine works
//! with. You cannot pass an `ObligationId` where a `ControlId` is
//! expected, and every constructor validates the identifier's shape.
//!
//! All identifiers serialize as plain strings and are validated again on
//! deserialization (`#[serde(try_from = "String")]`), so catalogue files
//! and profiles cannot smuggle malformed identifiers past the type system.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MizanError;

const MAX_ID_LEN: usize = 128;

fn check_plain(kind: &'static str, value: &str) -> Result<(), MizanError> {
    let reject = |reason| MizanError::InvalidIdentifier {
        kind,
        value: value.to_string(),
        reason,
    };
    if value.is_empty() {
        return Err(reject("must not be empty"));
    }
    if value.len() > MAX_ID_LEN {
        return Err(reject("longer than 128 bytes"));
    }
    if value.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(reject("must not contain whitespace or '/'"));
    }
    Ok(())
}

/// Identifier of a framework (e.g. `KSA_NCA_ECC`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FrameworkId(String);

/// Identifier of an obligation, unique within its framework (e.g. `ECC-GOV-01`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObligationId(String);

/// Identifier of a unified control in the closed taxonomy (e.g. `GOV.01`).
///
/// Shape: two or more dot-separated segments of uppercase ASCII letters
/// and digits, the first segment starting with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ControlId(String);

impl FrameworkId {
    /// Create a validated framework identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, MizanError> {
        let value = value.into();
        check_plain("framework", &value)?;
        Ok(Self(value))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ObligationId {
    /// Create a validated obligation identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, MizanError> {
        let value = value.into();
        check_plain("obligation", &value)?;
        Ok(Self(value))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ControlId {
    /// Create a validated control identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, MizanError> {
        let value = value.into();
        let reject = |reason| MizanError::InvalidIdentifier {
            kind: "control",
            value: value.clone(),
            reason,
        };
        if value.len() > MAX_ID_LEN {
            return Err(reject("longer than 128 bytes"));
        }
        let segments: Vec<&str> = value.split('.').collect();
        if segments.len() < 2 {
            return Err(reject("expected FAMILY.NN"));
        }
        let well_formed = segments.iter().all(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        });
        if !well_formed {
            return Err(reject("segments must be uppercase letters or digits"));
        }
        if !segments[0].starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(reject("family must start with a letter"));
        }
        Ok(Self(value))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The control family, i.e. the first segment (`GOV` for `GOV.01`).
    pub fn family(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }
}

macro_rules! string_newtype_impls {
    ($($ty:ident),*) => {$(
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $ty {
            type Err = MizanError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = MizanError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> String {
                id.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    )*};
}

string_newtype_impls!(FrameworkId, ObligationId, ControlId);

/// Fully qualified reference to one obligation: `framework/obligation`.
///
/// Serializes as a single string so it can key maps in profile files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObligationRef {
    /// Owning framework.
    pub framework: FrameworkId,
    /// Obligation within that framework.
    pub obligation: ObligationId,
}

impl ObligationRef {
    /// Pair a framework and one of its obligations.
    pub fn new(framework: FrameworkId, obligation: ObligationId) -> Self {
        Self {
            framework,
            obligation,
        }
    }
}

impl std::fmt::Display for ObligationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.framework, self.obligation)
    }
}

impl FromStr for ObligationRef {
    type Err = MizanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (framework, obligation) =
            s.split_once('/')
                .ok_or_else(|| MizanError::InvalidIdentifier {
                    kind: "obligation reference",
                    value: s.to_string(),
                    reason: "expected framework/obligation",
                })?;
        Ok(Self::new(
            FrameworkId::new(framework)?,
            ObligationId::new(obligation)?,
        ))
    }
}

impl TryFrom<String> for ObligationRef {
    type Error = MizanError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObligationRef> for String {
    fn from(r: ObligationRef) -> String {
        r.to_string()
    }
}
