//! End-to-end conversion tests driving the bridge the way an embedding
//! would: populate the class cache once, convert values in both
//! directions through the top-level dispatch, tear down, and assert
//! that no pinned references leak.

use jpy_bridge::{
    jwrap_py_value, py_as_jobject, py_from_jobject, ClassCache, ConvertHint, NdArray, PyDate,
    PyDateTime, PyDecimal, PyDict, PyList, PyTime, PyValue, WellKnownClass,
};
use jpy_jvm::{same_object, Jvm};
use pretty_assertions::assert_eq;

fn populated() -> (Jvm, ClassCache) {
    let jvm = Jvm::new();
    let cache = ClassCache::new();
    cache.populate(&jvm).unwrap();
    (jvm, cache)
}

#[test]
fn cache_lifecycle_is_idempotent_and_leak_free() {
    let jvm = Jvm::new();
    let cache = ClassCache::new();

    cache.populate(&jvm).unwrap();
    cache.populate(&jvm).unwrap();
    assert_eq!(jvm.live_global_refs(), WellKnownClass::ALL.len());

    cache.teardown(&jvm);
    cache.teardown(&jvm);
    assert_eq!(jvm.live_global_refs(), 0);

    // usable again after teardown
    cache.populate(&jvm).unwrap();
    cache.teardown(&jvm);
    assert_eq!(jvm.live_global_refs(), 0);
}

#[test]
fn integral_extremes_round_trip_at_every_width() {
    let (jvm, cache) = populated();
    let cases = [
        (i64::from(i8::MIN), ConvertHint::Byte),
        (i64::from(i8::MAX), ConvertHint::Byte),
        (i64::from(i16::MIN), ConvertHint::Short),
        (i64::from(i16::MAX), ConvertHint::Short),
        (i64::from(i32::MIN), ConvertHint::Int),
        (i64::from(i32::MAX), ConvertHint::Int),
        (i64::MIN, ConvertHint::Long),
        (i64::MAX, ConvertHint::Long),
    ];
    for (value, hint) in cases {
        let boxed = py_as_jobject(&jvm, &cache, &PyValue::Int(value), hint)
            .unwrap()
            .unwrap();
        let back = py_from_jobject(&jvm, &cache, Some(&boxed)).unwrap();
        assert_eq!(back, PyValue::Int(value), "width hint {hint:?}");
    }
    cache.teardown(&jvm);
}

#[test]
fn out_of_range_int_wraps_like_a_java_cast() {
    let (jvm, cache) = populated();
    let boxed = py_as_jobject(&jvm, &cache, &PyValue::Int(300), ConvertHint::Byte)
        .unwrap()
        .unwrap();
    // 300 -> 0x2C -> 44, never clamped to 127
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&boxed)).unwrap(),
        PyValue::Int(44)
    );
    cache.teardown(&jvm);
}

#[test]
fn null_survives_every_container_path() {
    let (jvm, cache) = populated();

    // list element
    let jlist = jvm.new_list(vec![None]);
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&jlist)).unwrap(),
        PyValue::List(PyList::from_vec(vec![PyValue::None]))
    );

    // map value
    let jmap = jvm.new_map(vec![(Some(jvm.new_string("k")), None)]);
    let expected = PyDict::new();
    expected.set("k", PyValue::None);
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&jmap)).unwrap(),
        PyValue::Dict(expected)
    );

    // object-array slot
    let jarr = jvm.new_object_array("java/lang/Object", vec![None]);
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&jarr)).unwrap(),
        PyValue::List(PyList::from_vec(vec![PyValue::None]))
    );

    // iterable element
    let jdeque = jvm.new_iterable(vec![None]);
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&jdeque)).unwrap(),
        PyValue::List(PyList::from_vec(vec![PyValue::None]))
    );

    // and back: None in a list becomes a null element
    let items = PyValue::List(PyList::from_vec(vec![PyValue::None]));
    let back = py_as_jobject(&jvm, &cache, &items, ConvertHint::Object)
        .unwrap()
        .unwrap();
    let roundtrip = py_from_jobject(&jvm, &cache, Some(&back)).unwrap();
    assert_eq!(roundtrip, items);

    cache.teardown(&jvm);
}

#[test]
fn high_precision_decimal_round_trip() {
    let (jvm, cache) = populated();
    let value = PyValue::Decimal(PyDecimal::new("12345678901234567890.5").unwrap());
    let jdec = py_as_jobject(&jvm, &cache, &value, ConvertHint::Object)
        .unwrap()
        .unwrap();
    assert_eq!(py_from_jobject(&jvm, &cache, Some(&jdec)).unwrap(), value);
    cache.teardown(&jvm);
}

#[test]
fn iterable_and_map_convert_through_their_protocols() {
    let (jvm, cache) = populated();

    let jdeque = jvm.new_iterable(vec![
        Some(jvm.new_integer(1)),
        Some(jvm.new_integer(2)),
        Some(jvm.new_integer(3)),
    ]);
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&jdeque)).unwrap(),
        PyValue::List(PyList::from_vec(vec![
            PyValue::Int(1),
            PyValue::Int(2),
            PyValue::Int(3),
        ]))
    );

    let jmap = jvm.new_map(vec![
        (Some(jvm.new_string("a")), Some(jvm.new_integer(1))),
        (Some(jvm.new_string("b")), Some(jvm.new_integer(2))),
    ]);
    let expected = PyDict::new();
    expected.set("a", PyValue::Int(1));
    expected.set("b", PyValue::Int(2));
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&jmap)).unwrap(),
        PyValue::Dict(expected)
    );
    cache.teardown(&jvm);
}

#[test]
fn type_that_is_both_map_and_iterable_converts_as_dict() {
    let (jvm, cache) = populated();
    jvm.register_class("acme/Config", &["java/util/Map", "java/lang/Iterable"])
        .unwrap();
    let cls = jvm.find_class("acme/Config").unwrap();
    let inner = jvm.new_map(vec![(Some(jvm.new_string("k")), Some(jvm.new_integer(1)))]);
    let config = jvm.new_adapter(cls, inner);

    let expected = PyDict::new();
    expected.set("k", PyValue::Int(1));
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&config)).unwrap(),
        PyValue::Dict(expected)
    );
    cache.teardown(&jvm);
}

#[test]
fn opaque_handles_preserve_identity_both_ways() {
    let (jvm, cache) = populated();

    // Java object with no Python shape crosses as a handle and returns
    // as the identical reference.
    jvm.register_class("acme/Session", &["java/lang/Object"]).unwrap();
    let cls = jvm.find_class("acme/Session").unwrap();
    let session = jvm.new_adapter(cls, jvm.new_string("state"));
    let handle = py_from_jobject(&jvm, &cache, Some(&session)).unwrap();
    let back = py_as_jobject(&jvm, &cache, &handle, ConvertHint::Object)
        .unwrap()
        .unwrap();
    assert!(same_object(&back, &session));

    // Python value wrapped for Java unwraps intact.
    let original = PyValue::Tuple(vec![PyValue::Str("cb".into()), PyValue::Int(7)]);
    let wrapped = jwrap_py_value(&jvm, &original);
    assert_eq!(
        py_from_jobject(&jvm, &cache, Some(&wrapped)).unwrap(),
        original
    );
    cache.teardown(&jvm);
}

#[test]
fn temporal_values_round_trip_with_microsecond_precision() {
    let (jvm, cache) = populated();
    let value = PyValue::DateTime(PyDateTime {
        date: PyDate {
            year: 2024,
            month: 6,
            day: 1,
        },
        time: PyTime {
            hour: 8,
            minute: 15,
            second: 30,
            microsecond: 250_000,
        },
    });
    let jdt = py_as_jobject(&jvm, &cache, &value, ConvertHint::Object)
        .unwrap()
        .unwrap();
    assert_eq!(py_from_jobject(&jvm, &cache, Some(&jdt)).unwrap(), value);
    cache.teardown(&jvm);
}

#[test]
fn numeric_arrays_take_the_bulk_path() {
    let (jvm, cache) = populated();
    let jarr = jvm.new_long_array(vec![i64::MIN, 0, i64::MAX]);
    let got = py_from_jobject(&jvm, &cache, Some(&jarr)).unwrap();
    assert_eq!(got, PyValue::Array(NdArray::from_i64(&[i64::MIN, 0, i64::MAX])));

    let back = py_as_jobject(&jvm, &cache, &got, ConvertHint::Object)
        .unwrap()
        .unwrap();
    assert_eq!(
        jvm.long_array_region(&back).unwrap(),
        vec![i64::MIN, 0, i64::MAX]
    );
    cache.teardown(&jvm);
}

#[test]
fn nested_structures_convert_to_any_depth() {
    let (jvm, cache) = populated();
    let dict = PyDict::new();
    dict.set(
        "rows",
        PyValue::List(PyList::from_vec(vec![
            PyValue::List(PyList::from_vec(vec![PyValue::Int(1), PyValue::None])),
            PyValue::Str("end".into()),
        ])),
    );
    let value = PyValue::Dict(dict);

    let jobj = py_as_jobject(&jvm, &cache, &value, ConvertHint::Object)
        .unwrap()
        .unwrap();
    assert_eq!(py_from_jobject(&jvm, &cache, Some(&jobj)).unwrap(), value);
    cache.teardown(&jvm);
}
