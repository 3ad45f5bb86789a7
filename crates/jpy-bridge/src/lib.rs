//! # jpy-bridge
//!
//! Bidirectional type-marshalling engine between the JVM object model
//! (behind the `jpy-jvm` handle interface) and the CPython object model
//! ([`PyValue`]).
//!
//! A call entering from either runtime carries one foreign object
//! reference; [`dispatch`] identifies its runtime type against the
//! [`class_cache`] and routes to the matching specific converter, which
//! may recurse into the container bridge for compound values. Conversions
//! are synchronous, per-call, and stateless; the class cache is the only
//! process-wide state.
//!
//! ## Module Structure
//!
//! - [`py_types`]: the Python value model (`PyValue`, `PyList`, `PyDict`)
//! - [`limits`]: numeric range descriptors per boxed Java width
//! - [`class_cache`]: the fixed well-known class table and method handles
//! - [`strings`]: Java string ↔ Python str/char
//! - [`scalars`]: boxed scalar conversions with wraparound narrowing
//! - [`containers`]: arrays, lists, maps, and generic iterables
//! - [`ndarray`]: bulk primitive-array fast path (numpy-backed)
//! - [`temporal`]: date, time, and composed date-time values
//! - [`decimal`]: arbitrary-precision decimals via canonical text
//! - [`dispatch`]: the top-level type-identity routing, both directions
//! - [`error`]: error types for conversion failures

pub mod class_cache;
pub mod containers;
pub mod decimal;
pub mod dispatch;
pub mod error;
pub mod limits;
pub mod ndarray;
pub mod py_types;
pub mod scalars;
pub mod strings;
pub mod temporal;

// Re-export main types for convenience
pub use class_cache::{ClassCache, WellKnownClass};
pub use dispatch::{jwrap_py_value, py_as_jobject, py_from_jobject, ConvertHint};
pub use error::{BridgeError, BridgeResult};
pub use ndarray::{DType, NdArray};
pub use py_types::{PyDate, PyDateTime, PyDecimal, PyDict, PyList, PyTime, PyValue};
