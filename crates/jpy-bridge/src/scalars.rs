//! Scalar Bridge
//!
//! Boxed Java scalars ↔ Python `bool`/`int`/`float`.
//!
//! Every Java integral width converts to Python `int`; both float
//! widths convert to Python `float`. Going the other way, a Python
//! `int` that does not fit the destination width is narrowed by
//! two's-complement wraparound, exactly as a Java cast would do it:
//! `300` stored into a `Byte` becomes `44`, never `127`. Ranges are
//! never clamped and narrowing is never an error (see
//! [`crate::limits`] for the width descriptors).
//!
//! A Python `float` destined for `java.lang.Float` takes the standard
//! `double`-to-`float` rounding, with out-of-range magnitudes going to
//! the infinities.

use jpy_jvm::{JRef, Jvm};

use crate::error::BridgeResult;
use crate::limits::IntWidth;
use crate::py_types::PyValue;

// ============================================================================
// Java -> Python
// ============================================================================

/// `java.lang.Boolean` → `bool`
pub fn py_from_jboolean(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    Ok(PyValue::Bool(jvm.unbox_boolean(obj)?))
}

/// `java.lang.Byte` → `int`
pub fn py_from_jbyte(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    Ok(PyValue::Int(i64::from(jvm.unbox_byte(obj)?)))
}

/// `java.lang.Short` → `int`
pub fn py_from_jshort(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    Ok(PyValue::Int(i64::from(jvm.unbox_short(obj)?)))
}

/// `java.lang.Integer` → `int`
pub fn py_from_jint(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    Ok(PyValue::Int(i64::from(jvm.unbox_int(obj)?)))
}

/// `java.lang.Long` → `int`
pub fn py_from_jlong(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    Ok(PyValue::Int(jvm.unbox_long(obj)?))
}

/// `java.lang.Float` → `float` (widened exactly)
pub fn py_from_jfloat(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    Ok(PyValue::Float(f64::from(jvm.unbox_float(obj)?)))
}

/// `java.lang.Double` → `float`
pub fn py_from_jdouble(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    Ok(PyValue::Float(jvm.unbox_double(obj)?))
}

// ============================================================================
// Python -> Java (wraparound narrowing)
// ============================================================================

/// Narrow to `byte` by wraparound
pub fn jbyte_from_py_int(value: i64) -> i8 {
    value as i8
}

/// Narrow to `short` by wraparound
pub fn jshort_from_py_int(value: i64) -> i16 {
    value as i16
}

/// Narrow to `int` by wraparound
pub fn jint_from_py_int(value: i64) -> i32 {
    value as i32
}

/// Narrow to `float` by rounding; out-of-range goes to the infinities
pub fn jfloat_from_py_float(value: f64) -> f32 {
    value as f32
}

/// Box a Python `bool` as `java.lang.Boolean`
pub fn jobject_from_py_bool(jvm: &Jvm, value: bool) -> JRef {
    jvm.new_boolean(value)
}

/// Box a Python `int` at the requested width, narrowing by wraparound
pub fn jobject_from_py_int(jvm: &Jvm, value: i64, width: IntWidth) -> JRef {
    match width {
        IntWidth::Byte => jvm.new_byte(jbyte_from_py_int(value)),
        IntWidth::Short => jvm.new_short(jshort_from_py_int(value)),
        IntWidth::Int => jvm.new_integer(jint_from_py_int(value)),
        IntWidth::Long => jvm.new_long(value),
    }
}
