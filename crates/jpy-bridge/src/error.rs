//! Error Types for the Marshalling Engine
//!
//! Every failure is detected and reported before the conversion call
//! returns; recovery is the caller's responsibility. On a real boundary
//! these surface as a pending Java exception or a CPython error
//! indicator, so each variant keeps enough context to build that message.
//!
//! ## Error Categories
//!
//! - Configuration errors (unknown well-known class, missing numpy):
//!   fatal at first use, never silently ignored
//! - Type-mismatch errors: the foreign object fits no recognized shape
//! - Conversion-domain errors: malformed decimal text, bad encodings
//!
//! Narrowing a numeric value is *not* an error: the destination's
//! wraparound rule applies (see [`crate::scalars`]).

use thiserror::Error;

use jpy_jvm::JvmError;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A well-known class name is missing from the foreign runtime.
    /// The class table is fixed and internally consistent, so this is a
    /// programming/configuration error, not a runtime condition.
    #[error("unknown well-known class: {name}")]
    UnknownClass {
        /// Fully-qualified JNI class name
        name: String,
    },

    /// The bulk numeric-array support library failed to initialize
    #[error("numpy support unavailable: {reason}")]
    NumpyUnavailable {
        /// Reason reported by the initialization probe
        reason: String,
    },

    /// Type mismatch during conversion
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type
        expected: String,
        /// Actual type received
        actual: String,
    },

    /// Conversion failed for a reason other than a simple shape mismatch
    #[error("cannot convert {from_type} to {to_type}: {reason}")]
    ConversionFailed {
        /// Source type name
        from_type: String,
        /// Target type name
        to_type: String,
        /// Reason for failure
        reason: String,
    },

    /// Decimal text did not parse as a canonical decimal literal
    #[error("malformed decimal literal: {text:?}")]
    DecimalParse {
        /// The offending text
        text: String,
    },

    /// String encoding error
    #[error("string encoding error: {message}")]
    EncodingError {
        /// Error message
        message: String,
    },

    /// Null reference where a value was required
    #[error("null object: {context}")]
    NullObject {
        /// Context where null was encountered
        context: String,
    },

    /// A handle-level failure reported by the foreign runtime
    #[error("foreign runtime error: {0}")]
    Jvm(#[from] JvmError),
}

impl BridgeError {
    /// Create an unknown class error
    pub fn unknown_class(name: impl Into<String>) -> Self {
        BridgeError::UnknownClass { name: name.into() }
    }

    /// Create a numpy unavailable error
    pub fn numpy_unavailable(reason: impl Into<String>) -> Self {
        BridgeError::NumpyUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        BridgeError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a conversion failed error
    pub fn conversion_failed(
        from_type: impl Into<String>,
        to_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BridgeError::ConversionFailed {
            from_type: from_type.into(),
            to_type: to_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a decimal parse error
    pub fn decimal_parse(text: impl Into<String>) -> Self {
        BridgeError::DecimalParse { text: text.into() }
    }

    /// Create an encoding error
    pub fn encoding_error(message: impl Into<String>) -> Self {
        BridgeError::EncodingError {
            message: message.into(),
        }
    }

    /// Create a null object error
    pub fn null_object(context: impl Into<String>) -> Self {
        BridgeError::NullObject {
            context: context.into(),
        }
    }

    /// Check if this is a type-related error
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            BridgeError::TypeMismatch { .. } | BridgeError::ConversionFailed { .. }
        )
    }

    /// Check if this is a fatal configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BridgeError::UnknownClass { .. } | BridgeError::NumpyUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_predicates() {
        assert!(BridgeError::type_mismatch("int", "str").is_type_error());
        assert!(BridgeError::conversion_failed("str", "char", "length 2").is_type_error());
        assert!(BridgeError::unknown_class("java/lang/Bogus").is_config_error());
        assert!(BridgeError::numpy_unavailable("not importable").is_config_error());
        assert!(!BridgeError::decimal_parse("abc").is_type_error());
    }

    #[test]
    fn messages_carry_context() {
        let err = BridgeError::type_mismatch("dict key str", "int");
        assert!(err.to_string().contains("dict key str"));

        let err = BridgeError::from(JvmError::class_not_found("java/lang/Bogus"));
        assert!(err.to_string().contains("java/lang/Bogus"));
    }
}
