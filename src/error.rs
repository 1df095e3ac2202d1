/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

use std::fmt;

/// Value conversion failures raised by the document layer.
#[derive(Debug)]
pub enum ConversionError {
    TypeMismatch {
        expected: String,
        found: String,
    },
    NotSupported(String, String),
    NullValue {
        target_type: String,
    },
    ParseError {
        message: String,
    },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            ConversionError::NullValue { target_type } => {
                write!(f, "Cannot convert null value to {}", target_type)
            }
            ConversionError::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            ConversionError::NotSupported(k, v) => {
                write!(f, "NotSupported  `{}` :`{}`", k, v)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        ConversionError::NotSupported(err.to_string(), "SerdeJson".to_string())
    }
}

impl ConversionError {
    pub fn parse_error<T: Into<String>>(err: T) -> Self {
        let err = err.into();
        Self::ParseError { message: err }
    }

    pub fn type_mismatch_error<T: Into<String>, E: Into<String>>(expected: T, found: E) -> Self {
        let expected = expected.into();
        let found = found.into();
        Self::TypeMismatch { expected, found }
    }

    pub fn not_supported_error<T: Into<String>, E: Into<String>>(field: T, expected: E) -> Self {
        let expected = expected.into();
        let field = field.into();
        Self::NotSupported(field, expected)
    }

    pub fn null_value_error<T: Into<String>>(target_type: T) -> Self {
        let target_type = target_type.into();
        Self::NullValue { target_type }
    }
}

/// Engine errors.
///
/// `Conflict` and `NotFound` are recoverable at the boundary; the caller is
/// expected to map them to a client-input failure. `InvariantViolation` marks
/// broken metadata and is not expected to be caught by ordinary request flow.
#[derive(Debug)]
pub enum RelmapError {
    /// An alias collides with an existing field or alias name, or is not a
    /// legal identifier. Raised at alias-registration time.
    Conflict(String),
    /// A requested field has no resolvable column anywhere in the join graph.
    NotFound(String),
    /// Internal metadata inconsistency. A defect, not a runtime condition.
    InvariantViolation(String),
    Conversion(ConversionError),
}

impl RelmapError {
    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invariant<T: Into<String>>(msg: T) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Whether the error should surface as bad client input.
    pub fn is_client_input(&self) -> bool {
        matches!(self, RelmapError::Conflict(_) | RelmapError::NotFound(_))
    }
}

impl fmt::Display for RelmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelmapError::Conflict(e) => write!(f, "Conflict Error: {e}"),
            RelmapError::NotFound(e) => write!(f, "Not Found Error: {e}"),
            RelmapError::InvariantViolation(e) => write!(f, "Invariant Violation: {e}"),
            RelmapError::Conversion(e) => write!(f, "Conversion Data Error: {e}"),
        }
    }
}

impl std::error::Error for RelmapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelmapError::Conversion(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConversionError> for RelmapError {
    fn from(err: ConversionError) -> Self {
        RelmapError::Conversion(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(RelmapError::conflict("alias `name`").is_client_input());
        assert!(RelmapError::not_found("field `x`").is_client_input());
        assert!(!RelmapError::invariant("broken pair").is_client_input());
    }

    #[test]
    fn test_display() {
        let err = RelmapError::conflict("alias `name` already declared");
        assert_eq!(
            err.to_string(),
            "Conflict Error: alias `name` already declared"
        );
    }
}
