//! # jpy-jvm
//!
//! In-process model of the JVM object heap behind a JNI-like handle
//! interface.
//!
//! The marshalling engine in `jpy-bridge` never touches Java objects
//! directly; it goes through the handle types defined here, which carry
//! the same ownership contracts JNI imposes:
//!
//! - [`JRef`]: a caller-owned reference to a heap value; bridges borrow it
//!   for the duration of one call. Java `null` is `Option<JRef>::None`.
//! - [`JClass`] / [`JMethodId`]: opaque descriptors resolved by name and
//!   signature, cheap to copy, valid for the process lifetime.
//! - [`GlobalRef`]: a promoted class reference with explicit
//!   acquire/release discipline.
//! - [`Utf8Chars`]: a scoped borrow of a Java string's UTF-8 text,
//!   released on drop.
//!
//! ## Module Structure
//!
//! - [`object`]: the `JValue` heap object model
//! - [`class`]: class descriptors, the registry, method identifiers
//! - [`env`]: the `Jvm` entry point (lookup, allocation, protocol calls)
//! - [`error`]: error types for foreign-runtime access

pub mod class;
pub mod env;
pub mod error;
pub mod object;

// Re-export main types for convenience
pub use class::{JClass, JMethodId};
pub use env::{GlobalRef, Jvm, Utf8Chars};
pub use error::{JvmError, JvmResult};
pub use object::{same_object, unwrap_adapter, JRef, JValue, PyPayload};
