//! String Bridge
//!
//! `java.lang.String` ↔ Python `str`, plus the single-character
//! `java.lang.Character` ↔ one-character `str` pair.
//!
//! String text crosses the boundary through a scoped [`Utf8Chars`]
//! borrow so the release half always runs, including on error paths.
//! A Java `char` is one UTF-16 code unit; only BMP scalars convert, and
//! a Python string converts to `char` only when it is exactly one
//! BMP character.
//!
//! [`Utf8Chars`]: jpy_jvm::Utf8Chars

use jpy_jvm::{JRef, Jvm};

use crate::error::{BridgeError, BridgeResult};
use crate::py_types::PyValue;

/// Convert a `java.lang.String` to a Python `str`.
pub fn py_str_from_jstring(jvm: &Jvm, obj: &JRef) -> BridgeResult<PyValue> {
    let chars = jvm.string_chars(obj)?;
    Ok(PyValue::Str(chars.as_str().into()))
}

/// Convert a Python `str` to a `java.lang.String`.
pub fn jstring_from_py_str(jvm: &Jvm, text: &str) -> JRef {
    jvm.new_string(text)
}

/// Convert a `java.lang.Character` to a one-character Python `str`.
/// Unpaired surrogates have no scalar value and are rejected.
pub fn py_str_from_jchar(code_unit: u16) -> BridgeResult<PyValue> {
    match char::from_u32(u32::from(code_unit)) {
        Some(c) => {
            let mut buf = [0u8; 4];
            let text: &str = c.encode_utf8(&mut buf);
            Ok(PyValue::Str(text.into()))
        }
        None => Err(BridgeError::encoding_error(format!(
            "unpaired surrogate code unit U+{code_unit:04X}"
        ))),
    }
}

/// Convert a Python `str` to a Java `char`. The string must be exactly
/// one character and that character must fit in one UTF-16 code unit.
pub fn jchar_from_py_str(text: &str) -> BridgeResult<u16> {
    let mut chars = text.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(BridgeError::conversion_failed(
                "str",
                "char",
                format!("expected exactly one character, got {}", text.chars().count()),
            ))
        }
    };
    let mut units = [0u16; 2];
    match c.encode_utf16(&mut units) {
        [unit] => Ok(*unit),
        _ => Err(BridgeError::conversion_failed(
            "str",
            "char",
            format!("{c:?} is outside the basic multilingual plane"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_round_trip() {
        let jvm = Jvm::new();
        let s = jstring_from_py_str(&jvm, "héllo wörld");
        assert_eq!(
            py_str_from_jstring(&jvm, &s).unwrap(),
            PyValue::Str("héllo wörld".into())
        );
        assert_eq!(jvm.live_utf8_borrows(), 0);
    }

    #[test]
    fn empty_string() {
        let jvm = Jvm::new();
        let s = jstring_from_py_str(&jvm, "");
        assert_eq!(py_str_from_jstring(&jvm, &s).unwrap(), PyValue::Str("".into()));
    }

    #[test]
    fn borrow_released_on_error_path() {
        let jvm = Jvm::new();
        let not_a_string = jvm.new_integer(7);
        assert!(py_str_from_jstring(&jvm, &not_a_string).is_err());
        assert_eq!(jvm.live_utf8_borrows(), 0);
    }

    #[test]
    fn char_round_trip() {
        let unit = jchar_from_py_str("A").unwrap();
        assert_eq!(unit, 65);
        assert_eq!(py_str_from_jchar(unit).unwrap(), PyValue::Str("A".into()));

        let unit = jchar_from_py_str("é").unwrap();
        assert_eq!(py_str_from_jchar(unit).unwrap(), PyValue::Str("é".into()));
    }

    #[test]
    fn char_rejects_wrong_length() {
        assert!(jchar_from_py_str("").is_err());
        assert!(jchar_from_py_str("ab").is_err());
    }

    #[test]
    fn char_rejects_non_bmp() {
        // U+1F600 needs a surrogate pair
        assert!(jchar_from_py_str("\u{1F600}").is_err());
    }

    #[test]
    fn surrogate_code_unit_rejected() {
        assert!(py_str_from_jchar(0xD800).is_err());
    }
}
