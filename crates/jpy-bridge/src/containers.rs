//! Container Bridge
//!
//! Compound values: object arrays, `java.util.List`, `java.util.Map`,
//! and generic `java.lang.Iterable`s on one side; `list`, `tuple`, and
//! `dict` on the other. Elements recurse through the top-level dispatch
//! in [`crate::dispatch`], so nesting converts to any depth and a Java
//! `null` element becomes `None` (and back) at every level.
//!
//! Collections are walked through the iterator protocol with the method
//! handles cached in [`ClassCache`], never by index, so any conforming
//! implementation converts. Maps are walked entry-by-entry in whatever
//! order the source map yields; dict keys must convert to `str`.
//!
//! A `char[]` is text, not numbers: it converts to a Python `str` the
//! way `new String(char[])` would read it, and takes no part in the
//! numeric fast path.

use jpy_jvm::{JRef, Jvm};

use crate::class_cache::ClassCache;
use crate::dispatch::{py_as_jobject, py_from_jobject, ConvertHint};
use crate::error::{BridgeError, BridgeResult};
use crate::py_types::{PyDict, PyList, PyValue};

// ============================================================================
// Java -> Python
// ============================================================================

/// Walk any `Iterable` (lists included) into a Python `list` through
/// the iterator protocol.
pub fn py_list_from_jcollection(jvm: &Jvm, cache: &ClassCache, obj: &JRef) -> BridgeResult<PyValue> {
    let iterator = jvm
        .call_object_method(obj, cache.iterator_mid()?)?
        .ok_or_else(|| BridgeError::null_object("Iterable.iterator()"))?;
    let has_next = cache.has_next_mid()?;
    let next = cache.next_mid()?;

    let list = PyList::new();
    while jvm.call_boolean_method(&iterator, has_next)? {
        let element = jvm.call_object_method(&iterator, next)?;
        list.append(py_element(jvm, cache, element.as_ref())?);
    }
    Ok(PyValue::List(list))
}

/// Convert a `Map` into a `dict`, entry order preserved.
pub fn py_dict_from_jmap(jvm: &Jvm, cache: &ClassCache, obj: &JRef) -> BridgeResult<PyValue> {
    let dict = PyDict::new();
    for (key, value) in jvm.map_entries(obj)? {
        let key = key.ok_or_else(|| BridgeError::null_object("map key"))?;
        let key = match py_from_jobject(jvm, cache, Some(&key))? {
            PyValue::Str(s) => s,
            other => {
                return Err(BridgeError::type_mismatch("dict key str", other.type_name()))
            }
        };
        dict.set(key, py_element(jvm, cache, value.as_ref())?);
    }
    Ok(PyValue::Dict(dict))
}

/// Convert an object array (`Object[]`, `String[]`, ...) into a `list`.
pub fn py_list_from_jobject_array(
    jvm: &Jvm,
    cache: &ClassCache,
    obj: &JRef,
) -> BridgeResult<PyValue> {
    let elems = jvm.object_array_elements(obj)?;
    let list = PyList::new();
    for elem in &elems {
        list.append(py_element(jvm, cache, elem.as_ref())?);
    }
    Ok(PyValue::List(list))
}

/// Copy a `byte[]` into Python `bytes`. Raw octets are payload, not
/// numbers, so they never take the ndarray path.
pub fn py_bytes_from_jbyte_array(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    let bytes = jvm.byte_array_region(obj)?;
    Ok(PyValue::Bytes(bytes.iter().map(|&b| b as u8).collect()))
}

/// Read a `char[]` as text, the way `new String(char[])` would.
pub fn py_str_from_jchar_array(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    let units = jvm.char_array_region(obj)?;
    let text = String::from_utf16(&units).map_err(|_| {
        BridgeError::encoding_error("char[] contains an unpaired surrogate")
    })?;
    Ok(PyValue::Str(text.into()))
}

fn py_element(jvm: &Jvm, cache: &ClassCache, elem: Option<&JRef>) -> BridgeResult<PyValue> {
    py_from_jobject(jvm, cache, elem)
}

// ============================================================================
// Python -> Java
// ============================================================================

/// Build a `java.util.ArrayList` from a Python sequence's items.
pub fn jlist_from_py_seq(jvm: &Jvm, cache: &ClassCache, items: &[PyValue]) -> BridgeResult<JRef> {
    let mut elems = Vec::with_capacity(items.len());
    for item in items {
        elems.push(j_element(jvm, cache, item)?);
    }
    Ok(jvm.new_list(elems))
}

/// Build a `java.util.LinkedHashMap` from a `dict`, insertion order
/// preserved.
pub fn jmap_from_py_dict(jvm: &Jvm, cache: &ClassCache, dict: &PyDict) -> BridgeResult<JRef> {
    let mut entries = Vec::with_capacity(dict.len());
    for (key, value) in dict.iter() {
        let key = Some(jvm.new_string(&key));
        entries.push((key, j_element(jvm, cache, &value)?));
    }
    Ok(jvm.new_map(entries))
}

/// Build an `Object[]` from a Python sequence's items.
pub fn jobject_array_from_py_seq(
    jvm: &Jvm,
    cache: &ClassCache,
    items: &[PyValue],
) -> BridgeResult<JRef> {
    let mut elems = Vec::with_capacity(items.len());
    for item in items {
        elems.push(j_element(jvm, cache, item)?);
    }
    Ok(jvm.new_object_array("java/lang/Object", elems))
}

fn j_element(jvm: &Jvm, cache: &ClassCache, item: &PyValue) -> BridgeResult<Option<JRef>> {
    py_as_jobject(jvm, cache, item, ConvertHint::Object)
}
