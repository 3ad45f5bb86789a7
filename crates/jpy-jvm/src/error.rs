//! Error Types for JVM Access
//!
//! Failures crossing the handle interface. In real JNI these would be a
//! pending exception on the calling env; here they are explicit results
//! checked after each call.

use thiserror::Error;

/// Result type for JVM handle operations
pub type JvmResult<T> = Result<T, JvmError>;

/// JVM handle error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JvmError {
    /// Class name not present in the registry
    #[error("class not found: {name}")]
    ClassNotFound {
        /// Fully-qualified JNI class name
        name: String,
    },

    /// Method not found on the class or any of its supertypes
    #[error("no method {name}{signature} on {class_name}")]
    NoSuchMethod {
        /// Declaring class name
        class_name: String,
        /// Method name
        name: String,
        /// JNI method signature
        signature: String,
    },

    /// Receiver object does not support the invoked protocol
    #[error("wrong receiver: expected {expected}, got {actual}")]
    WrongReceiver {
        /// Expected shape (e.g. "java/util/Iterator")
        expected: String,
        /// Actual class name of the receiver
        actual: String,
    },

    /// Null reference where an object was required
    #[error("null reference: {context}")]
    NullReference {
        /// Context where null was encountered
        context: String,
    },

    /// Wrong argument shape for a protocol call
    #[error("bad call arguments: {message}")]
    BadArguments {
        /// Error message
        message: String,
    },
}

impl JvmError {
    /// Create a class not found error
    pub fn class_not_found(name: impl Into<String>) -> Self {
        JvmError::ClassNotFound { name: name.into() }
    }

    /// Create a no such method error
    pub fn no_such_method(
        class_name: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        JvmError::NoSuchMethod {
            class_name: class_name.into(),
            name: name.into(),
            signature: signature.into(),
        }
    }

    /// Create a wrong receiver error
    pub fn wrong_receiver(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        JvmError::WrongReceiver {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a null reference error
    pub fn null_reference(context: impl Into<String>) -> Self {
        JvmError::NullReference {
            context: context.into(),
        }
    }

    /// Create a bad arguments error
    pub fn bad_arguments(message: impl Into<String>) -> Self {
        JvmError::BadArguments {
            message: message.into(),
        }
    }
}
