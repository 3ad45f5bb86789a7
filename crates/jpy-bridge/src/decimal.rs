//! Decimal Bridge
//!
//! `java.math.BigDecimal` ↔ `decimal.Decimal` through canonical text.
//! Routing through a `double` would lose precision for values outside
//! its 53-bit mantissa, so the value crosses the boundary as the string
//! `BigDecimal.toString()` produces and `new BigDecimal(String)` /
//! `decimal.Decimal(str)` accept on the far side.

use jpy_jvm::{JRef, Jvm};

use crate::class_cache::ClassCache;
use crate::error::{BridgeError, BridgeResult};
use crate::py_types::{PyDecimal, PyValue};

/// `BigDecimal` → `decimal.Decimal`
pub fn py_decimal_from_jbigdecimal(
    jvm: &Jvm,
    cache: &ClassCache,
    obj: &JRef,
) -> BridgeResult<PyValue> {
    let text = jvm
        .call_object_method(obj, cache.decimal_to_string_mid()?)?
        .ok_or_else(|| BridgeError::null_object("BigDecimal.toString()"))?;
    let chars = jvm.string_chars(&text)?;
    Ok(PyValue::Decimal(PyDecimal::new(chars.as_str())?))
}

/// `decimal.Decimal` → `BigDecimal`
pub fn jbigdecimal_from_py_decimal(jvm: &Jvm, value: &PyDecimal) -> JRef {
    jvm.new_big_decimal(value.as_str())
}

/// Whether a Python value is a `decimal.Decimal`. `int`, `float`, and
/// `bool` are numeric too but take the scalar bridge; this check keeps
/// them off the decimal path.
pub fn py_decimal_check(value: &PyValue) -> bool {
    matches!(value, PyValue::Decimal(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn populated() -> (Jvm, ClassCache) {
        let jvm = Jvm::new();
        let cache = ClassCache::new();
        cache.populate(&jvm).unwrap();
        (jvm, cache)
    }

    #[test]
    fn high_precision_round_trip() {
        let (jvm, cache) = populated();
        // more digits than a double's mantissa can hold
        let value = PyDecimal::new("12345678901234567890.5").unwrap();
        let jdec = jbigdecimal_from_py_decimal(&jvm, &value);
        assert_eq!(
            py_decimal_from_jbigdecimal(&jvm, &cache, &jdec).unwrap(),
            PyValue::Decimal(value)
        );
        cache.teardown(&jvm);
    }

    #[test]
    fn negative_and_exponent_forms() {
        let (jvm, cache) = populated();
        for text in ["-0.125", "1E+10", "0"] {
            let value = PyDecimal::new(text).unwrap();
            let jdec = jbigdecimal_from_py_decimal(&jvm, &value);
            let back = py_decimal_from_jbigdecimal(&jvm, &cache, &jdec).unwrap();
            assert_eq!(back, PyValue::Decimal(value));
        }
        cache.teardown(&jvm);
    }

    #[test]
    fn check_rejects_other_numerics() {
        assert!(py_decimal_check(&PyValue::Decimal(
            PyDecimal::new("1.5").unwrap()
        )));
        assert!(!py_decimal_check(&PyValue::Int(1)));
        assert!(!py_decimal_check(&PyValue::Float(1.5)));
        assert!(!py_decimal_check(&PyValue::Bool(true)));
    }

    #[test]
    fn wrong_receiver_is_an_error() {
        let (jvm, cache) = populated();
        let not_a_decimal = jvm.new_string("1.5");
        assert!(py_decimal_from_jbigdecimal(&jvm, &cache, &not_a_decimal).is_err());
        cache.teardown(&jvm);
    }
}
