//! Object Dispatch
//!
//! The top-level entry points for one conversion in each direction.
//!
//! [`py_from_jobject`] identifies the object's runtime class against
//! the [`ClassCache`] by exact identity first, so a boxed `Integer` or
//! a `String` never pays an `instanceof` walk. Objects outside the
//! table are probed against the container interfaces in a fixed
//! precedence: `List`, then `Map`, then `Iterable`. An object
//! implementing several converts by the first match, which keeps the
//! outcome deterministic for types like a map that is also iterable.
//! Anything that matches nothing crosses as an opaque
//! [`PyValue::JavaRef`], usable from Python as a handle and unwrapped
//! back to the identical reference on return.
//!
//! [`py_as_jobject`] routes on the Python value's type, with a
//! [`ConvertHint`] naming the Java destination so an `int` argument can
//! land in whichever numeric width the target signature declares
//! (narrowing by wraparound, see [`crate::scalars`]).

use std::rc::Rc;

use jpy_jvm::{unwrap_adapter, JRef, JValue, Jvm};

use crate::class_cache::{ClassCache, WellKnownClass};
use crate::containers::{
    jlist_from_py_seq, jmap_from_py_dict, jobject_array_from_py_seq, py_bytes_from_jbyte_array,
    py_dict_from_jmap, py_list_from_jcollection, py_list_from_jobject_array,
    py_str_from_jchar_array,
};
use crate::decimal::{jbigdecimal_from_py_decimal, py_decimal_from_jbigdecimal};
use crate::error::{BridgeError, BridgeResult};
use crate::limits::IntWidth;
use crate::ndarray::{jarray_from_py_ndarray, py_ndarray_from_jarray};
use crate::py_types::PyValue;
use crate::scalars::{
    jfloat_from_py_float, jobject_from_py_bool, jobject_from_py_int, py_from_jboolean,
    py_from_jbyte, py_from_jdouble, py_from_jfloat, py_from_jint, py_from_jlong, py_from_jshort,
};
use crate::strings::{
    jchar_from_py_str, jstring_from_py_str, py_str_from_jchar, py_str_from_jstring,
};
use crate::temporal::{
    jdate_from_py_date, jdatetime_from_py_datetime, jtime_from_py_time, py_date_from_jdate,
    py_datetime_from_jdatetime, py_time_from_jtime,
};

/// The Java destination type of a Python-to-Java conversion, taken from
/// the target signature. `Object` means no narrower type is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvertHint {
    /// `java.lang.Object` or an unknown destination
    #[default]
    Object,
    /// `byte` / `java.lang.Byte`
    Byte,
    /// `short` / `java.lang.Short`
    Short,
    /// `int` / `java.lang.Integer`
    Int,
    /// `long` / `java.lang.Long`
    Long,
    /// `float` / `java.lang.Float`
    Float,
    /// `double` / `java.lang.Double`
    Double,
    /// `char` / `java.lang.Character`
    Char,
    /// `Object[]` (sequences become arrays instead of `ArrayList`s)
    ObjectArray,
}

// ============================================================================
// Java -> Python
// ============================================================================

/// Convert one Java reference to a Python value. `None` is Java `null`.
pub fn py_from_jobject(jvm: &Jvm, cache: &ClassCache, obj: Option<&JRef>) -> BridgeResult<PyValue> {
    let Some(obj) = obj else {
        return Ok(PyValue::None);
    };
    let class = jvm.get_object_class(obj)?;
    use WellKnownClass as W;
    let is = |entry: W| -> BridgeResult<bool> { Ok(jvm.same_class(class, cache.class(entry)?)) };

    // Exact class identity first.
    if is(W::Boolean)? {
        return py_from_jboolean(jvm, obj);
    }
    if is(W::Byte)? {
        return py_from_jbyte(jvm, obj);
    }
    if is(W::Short)? {
        return py_from_jshort(jvm, obj);
    }
    if is(W::Integer)? {
        return py_from_jint(jvm, obj);
    }
    if is(W::Long)? {
        return py_from_jlong(jvm, obj);
    }
    if is(W::Float)? {
        return py_from_jfloat(jvm, obj);
    }
    if is(W::Double)? {
        return py_from_jdouble(jvm, obj);
    }
    if is(W::Character)? {
        return py_str_from_jchar(jvm.unbox_char(obj)?);
    }
    if is(W::String)? {
        return py_str_from_jstring(jvm, obj);
    }
    if is(W::BigDecimal)? {
        return py_decimal_from_jbigdecimal(jvm, cache, obj);
    }
    if is(W::ByteArray)? {
        return py_bytes_from_jbyte_array(jvm, obj);
    }
    for entry in [
        W::BooleanArray,
        W::ShortArray,
        W::IntArray,
        W::LongArray,
        W::FloatArray,
        W::DoubleArray,
    ] {
        if is(entry)? {
            return Ok(PyValue::Array(py_ndarray_from_jarray(jvm, obj)?));
        }
    }
    if is(W::CharArray)? {
        return py_str_from_jchar_array(jvm, obj);
    }
    if is(W::StringArray)? || is(W::ObjectArray)? || jvm.class_name(class).starts_with("[L") {
        return py_list_from_jobject_array(jvm, cache, obj);
    }
    if is(W::LocalDate)? {
        return py_date_from_jdate(jvm, obj);
    }
    if is(W::LocalTime)? {
        return py_time_from_jtime(jvm, obj);
    }
    if is(W::LocalDateTime)? {
        return py_datetime_from_jdatetime(jvm, cache, obj);
    }
    if is(W::PyObject)? {
        return unwrap_py_payload(obj);
    }

    // Interface probes, fixed precedence.
    if jvm.is_instance_of(obj, cache.class(W::List)?) {
        return py_list_from_jcollection(jvm, cache, obj);
    }
    if jvm.is_instance_of(obj, cache.class(W::Map)?) {
        return py_dict_from_jmap(jvm, cache, obj);
    }
    if jvm.is_instance_of(obj, cache.class(W::Iterable)?) {
        return py_list_from_jcollection(jvm, cache, obj);
    }
    if jvm.is_instance_of(obj, cache.class(W::Member)?) {
        return member_name(jvm, cache, obj);
    }

    // No recognized shape: cross as an opaque handle.
    Ok(PyValue::JavaRef(Rc::clone(obj)))
}

fn member_name(jvm: &Jvm, cache: &ClassCache, obj: &JRef) -> BridgeResult<PyValue> {
    let name = jvm
        .call_object_method(obj, cache.get_name_mid()?)?
        .ok_or_else(|| BridgeError::null_object("Member.getName()"))?;
    py_str_from_jstring(jvm, &name)
}

fn unwrap_py_payload(obj: &JRef) -> BridgeResult<PyValue> {
    match &*unwrap_adapter(obj) {
        JValue::PyObject(payload) => Rc::clone(&payload.0)
            .downcast::<PyValue>()
            .map(|value| (*value).clone())
            .map_err(|_| {
                BridgeError::conversion_failed(
                    "jpybridge.core.PyObject",
                    "python object",
                    "payload is not a bridge value",
                )
            }),
        _ => Err(BridgeError::type_mismatch(
            "jpybridge/core/PyObject",
            "other",
        )),
    }
}

/// Wrap a Python value for the Java side as an opaque
/// `jpybridge.core.PyObject`; [`py_from_jobject`] unwraps it intact.
pub fn jwrap_py_value(jvm: &Jvm, value: &PyValue) -> JRef {
    jvm.new_py_object(Rc::new(value.clone()))
}

// ============================================================================
// Python -> Java
// ============================================================================

/// The integral width a hint names, if it names one.
fn hint_int_width(hint: ConvertHint) -> Option<IntWidth> {
    match hint {
        ConvertHint::Byte => Some(IntWidth::Byte),
        ConvertHint::Short => Some(IntWidth::Short),
        ConvertHint::Int => Some(IntWidth::Int),
        ConvertHint::Long => Some(IntWidth::Long),
        _ => None,
    }
}

/// Convert one Python value to a Java reference. `PyValue::None` is
/// Java `null`; the hint selects the numeric width or container shape
/// the target signature declares. Python numeric coercion applies
/// toward the hinted destination: `bool` counts as an `int` for an
/// integral hint, and an `int` counts as a `float` for a float hint.
pub fn py_as_jobject(
    jvm: &Jvm,
    cache: &ClassCache,
    value: &PyValue,
    hint: ConvertHint,
) -> BridgeResult<Option<JRef>> {
    let obj = match value {
        PyValue::None => return Ok(None),
        PyValue::Bool(b) => match hint_int_width(hint) {
            Some(width) => jobject_from_py_int(jvm, i64::from(*b), width),
            None => jobject_from_py_bool(jvm, *b),
        },
        PyValue::Int(n) => match hint {
            ConvertHint::Float => jvm.new_float(jfloat_from_py_float(*n as f64)),
            ConvertHint::Double => jvm.new_double(*n as f64),
            _ => jobject_from_py_int(jvm, *n, hint_int_width(hint).unwrap_or(IntWidth::Long)),
        },
        PyValue::Float(v) => match hint {
            ConvertHint::Float => jvm.new_float(jfloat_from_py_float(*v)),
            _ => jvm.new_double(*v),
        },
        PyValue::Str(s) => match hint {
            ConvertHint::Char => jvm.new_character(jchar_from_py_str(s)?),
            _ => jstring_from_py_str(jvm, s),
        },
        PyValue::Bytes(bytes) => {
            jvm.new_byte_array(bytes.iter().map(|&b| b as i8).collect())
        }
        PyValue::List(list) => {
            let items = list.to_vec();
            match hint {
                ConvertHint::ObjectArray => jobject_array_from_py_seq(jvm, cache, &items)?,
                _ => jlist_from_py_seq(jvm, cache, &items)?,
            }
        }
        // tuples are fixed-size, so they cross as Object[]
        PyValue::Tuple(items) => jobject_array_from_py_seq(jvm, cache, items)?,
        PyValue::Dict(dict) => jmap_from_py_dict(jvm, cache, dict)?,
        PyValue::Date(date) => jdate_from_py_date(jvm, date),
        PyValue::Time(time) => jtime_from_py_time(jvm, time),
        PyValue::DateTime(dt) => jdatetime_from_py_datetime(jvm, cache, dt)?,
        PyValue::Decimal(dec) => jbigdecimal_from_py_decimal(jvm, dec),
        PyValue::Array(array) => jarray_from_py_ndarray(jvm, array)?,
        // the original reference crosses back, identity preserved
        PyValue::JavaRef(obj) => Rc::clone(obj),
    };
    Ok(Some(obj))
}
