//! Python Value Model
//!
//! The bridge's representation of CPython values. In a real embedding
//! these would be `PyObject*` handles manipulated through the C API; the
//! model keeps the same reference semantics (shared, mutable containers)
//! with `Rc<RefCell<..>>` interiors so a converted value behaves like an
//! object on the interpreter heap.
//!
//! ## Type Hierarchy
//!
//! - [`PyValue`]: enum covering every Python shape the bridge produces
//! - [`PyList`] / [`PyDict`]: mutable container types
//! - [`PyDate`] / [`PyTime`] / [`PyDateTime`]: `datetime` module values
//! - [`PyDecimal`]: `decimal.Decimal`, held as canonical text
//!
//! Dict keys are strings; a Java map key that does not convert to `str`
//! is rejected at conversion time rather than silently coerced.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use jpy_jvm::{same_object, JRef};

use crate::error::{BridgeError, BridgeResult};
use crate::ndarray::NdArray;

// ============================================================================
// PyValue
// ============================================================================

/// Any Python value the bridge can produce or consume.
#[derive(Debug, Clone)]
pub enum PyValue {
    /// Python `None`
    None,
    /// Python `bool`
    Bool(bool),
    /// Python `int` (arbitrary precision in Python, `i64` at the bridge)
    Int(i64),
    /// Python `float`
    Float(f64),
    /// Python `str`
    Str(SmolStr),
    /// Python `bytes`
    Bytes(Vec<u8>),
    /// Python `list`
    List(PyList),
    /// Python `tuple`
    Tuple(Vec<PyValue>),
    /// Python `dict` (string keys)
    Dict(PyDict),
    /// `datetime.date`
    Date(PyDate),
    /// `datetime.time`
    Time(PyTime),
    /// `datetime.datetime`
    DateTime(PyDateTime),
    /// `decimal.Decimal`
    Decimal(PyDecimal),
    /// `numpy.ndarray` (one-dimensional)
    Array(NdArray),
    /// Opaque wrapper carrying an unconverted Java reference
    JavaRef(JRef),
}

impl PyValue {
    /// The Python type name for this value
    pub fn type_name(&self) -> &'static str {
        match self {
            PyValue::None => "NoneType",
            PyValue::Bool(_) => "bool",
            PyValue::Int(_) => "int",
            PyValue::Float(_) => "float",
            PyValue::Str(_) => "str",
            PyValue::Bytes(_) => "bytes",
            PyValue::List(_) => "list",
            PyValue::Tuple(_) => "tuple",
            PyValue::Dict(_) => "dict",
            PyValue::Date(_) => "datetime.date",
            PyValue::Time(_) => "datetime.time",
            PyValue::DateTime(_) => "datetime.datetime",
            PyValue::Decimal(_) => "decimal.Decimal",
            PyValue::Array(_) => "numpy.ndarray",
            PyValue::JavaRef(_) => "jpybridge.JavaObject",
        }
    }

    /// Check if this value is `None`
    pub fn is_none(&self) -> bool {
        matches!(self, PyValue::None)
    }

    /// Try to extract as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to extract as i64 (Python `int` coercion rules: bool is an int)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PyValue::Int(n) => Some(*n),
            PyValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Try to extract as f64 (ints coerce)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PyValue::Float(f) => Some(*f),
            PyValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Try to extract as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PyValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl Default for PyValue {
    fn default() -> Self {
        PyValue::None
    }
}

impl PartialEq for PyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PyValue::None, PyValue::None) => true,
            (PyValue::Bool(a), PyValue::Bool(b)) => a == b,
            (PyValue::Int(a), PyValue::Int(b)) => a == b,
            (PyValue::Float(a), PyValue::Float(b)) => a == b,
            (PyValue::Str(a), PyValue::Str(b)) => a == b,
            (PyValue::Bytes(a), PyValue::Bytes(b)) => a == b,
            (PyValue::List(a), PyValue::List(b)) => a.to_vec() == b.to_vec(),
            (PyValue::Tuple(a), PyValue::Tuple(b)) => a == b,
            (PyValue::Dict(a), PyValue::Dict(b)) => a.to_pairs() == b.to_pairs(),
            (PyValue::Date(a), PyValue::Date(b)) => a == b,
            (PyValue::Time(a), PyValue::Time(b)) => a == b,
            (PyValue::DateTime(a), PyValue::DateTime(b)) => a == b,
            (PyValue::Decimal(a), PyValue::Decimal(b)) => a == b,
            (PyValue::Array(a), PyValue::Array(b)) => a == b,
            // wrapped Java references compare by object identity
            (PyValue::JavaRef(a), PyValue::JavaRef(b)) => same_object(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for PyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PyValue::None => write!(f, "None"),
            PyValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            PyValue::Int(n) => write!(f, "{n}"),
            PyValue::Float(v) => write!(f, "{v}"),
            PyValue::Str(s) => write!(f, "'{s}'"),
            PyValue::Bytes(b) => {
                write!(f, "b'")?;
                for byte in b {
                    write!(f, "\\x{byte:02x}")?;
                }
                write!(f, "'")
            }
            PyValue::List(list) => write!(f, "{list}"),
            PyValue::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            PyValue::Dict(dict) => write!(f, "{dict}"),
            PyValue::Date(d) => write!(f, "{d}"),
            PyValue::Time(t) => write!(f, "{t}"),
            PyValue::DateTime(dt) => write!(f, "{dt}"),
            PyValue::Decimal(d) => write!(f, "Decimal('{}')", d.as_str()),
            PyValue::Array(arr) => write!(f, "<ndarray dtype={} len={}>", arr.dtype(), arr.len()),
            PyValue::JavaRef(_) => write!(f, "<JavaObject>"),
        }
    }
}

// ============================================================================
// PyList
// ============================================================================

/// Python list: mutable, ordered, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct PyList {
    items: Rc<RefCell<Vec<PyValue>>>,
}

impl PyList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from a vector
    pub fn from_vec(items: Vec<PyValue>) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Get an item by index
    pub fn get(&self, index: usize) -> Option<PyValue> {
        self.items.borrow().get(index).cloned()
    }

    /// Append an item to the end
    pub fn append(&self, value: PyValue) {
        self.items.borrow_mut().push(value);
    }

    /// Iterate over a snapshot of the items
    pub fn iter(&self) -> impl Iterator<Item = PyValue> {
        self.items.borrow().clone().into_iter()
    }

    /// Convert to a Vec
    pub fn to_vec(&self) -> Vec<PyValue> {
        self.items.borrow().clone()
    }
}

impl FromIterator<PyValue> for PyList {
    fn from_iter<I: IntoIterator<Item = PyValue>>(iter: I) -> Self {
        PyList::from_vec(iter.into_iter().collect())
    }
}

impl fmt::Display for PyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let items = self.items.borrow();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// PyDict
// ============================================================================

/// Python dict: string keys, insertion order preserved.
#[derive(Debug, Clone, Default)]
pub struct PyDict {
    items: Rc<RefCell<IndexMap<SmolStr, PyValue>>>,
}

impl PyDict {
    /// Create an empty dict
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Check if the dict is empty
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<PyValue> {
        self.items.borrow().get(key).cloned()
    }

    /// Set a key-value pair
    pub fn set(&self, key: impl Into<SmolStr>, value: PyValue) {
        self.items.borrow_mut().insert(key.into(), value);
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    /// Iterate over a snapshot of the entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (SmolStr, PyValue)> {
        self.items.borrow().clone().into_iter()
    }

    /// Entries as a vector of pairs, in insertion order
    pub fn to_pairs(&self) -> Vec<(SmolStr, PyValue)> {
        self.items.borrow().clone().into_iter().collect()
    }
}

impl fmt::Display for PyDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let items = self.items.borrow();
        for (i, (k, v)) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{k}': {v}")?;
        }
        write!(f, "}}")
    }
}

// ============================================================================
// Temporal values
// ============================================================================

/// `datetime.date`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyDate {
    /// Proleptic year
    pub year: i32,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
}

impl fmt::Display for PyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "datetime.date({}, {}, {})",
            self.year, self.month, self.day
        )
    }
}

/// `datetime.time`; CPython's finest granularity is the microsecond
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
    /// 0-999_999
    pub microsecond: u32,
}

impl fmt::Display for PyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "datetime.time({}, {}, {}, {})",
            self.hour, self.minute, self.second, self.microsecond
        )
    }
}

/// `datetime.datetime`, composed of a date part and a time part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyDateTime {
    /// The date part
    pub date: PyDate,
    /// The time part
    pub time: PyTime,
}

impl fmt::Display for PyDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "datetime.datetime({}, {}, {}, {}, {}, {}, {})",
            self.date.year,
            self.date.month,
            self.date.day,
            self.time.hour,
            self.time.minute,
            self.time.second,
            self.time.microsecond
        )
    }
}

// ============================================================================
// PyDecimal
// ============================================================================

/// `decimal.Decimal`, held as the canonical text the value was built
/// from. Round-tripping through text avoids binary floating-point
/// precision loss for values a `double` cannot represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyDecimal {
    text: SmolStr,
}

impl PyDecimal {
    /// Validate and wrap a decimal literal. Accepts an optional sign,
    /// digits with at most one decimal point, and an optional exponent.
    pub fn new(text: &str) -> BridgeResult<Self> {
        if !is_decimal_literal(text) {
            return Err(BridgeError::decimal_parse(text));
        }
        Ok(Self {
            text: SmolStr::new(text),
        })
    }

    /// The canonical text form
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for PyDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn is_decimal_literal(text: &str) -> bool {
    let rest = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (rest, None),
    };
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    if digits == 0 || dots > 1 {
        return false;
    }
    match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && e.chars().all(|c| c.is_ascii_digit())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn type_names() {
        assert_eq!(PyValue::None.type_name(), "NoneType");
        assert_eq!(PyValue::Bool(true).type_name(), "bool");
        assert_eq!(PyValue::Int(42).type_name(), "int");
        assert_eq!(PyValue::Str("x".into()).type_name(), "str");
        assert_eq!(
            PyValue::Decimal(PyDecimal::new("1.5").unwrap()).type_name(),
            "decimal.Decimal"
        );
    }

    #[test]
    fn accessors_follow_python_coercion() {
        assert_eq!(PyValue::Int(42).as_int(), Some(42));
        assert_eq!(PyValue::Bool(true).as_int(), Some(1));
        assert_eq!(PyValue::Int(42).as_float(), Some(42.0));
        assert_eq!(PyValue::Str("x".into()).as_int(), None);
    }

    #[test]
    fn list_is_shared_between_clones() {
        let list = PyList::new();
        let alias = list.clone();
        list.append(PyValue::Int(1));
        assert_eq!(alias.len(), 1);
        assert_eq!(alias.get(0), Some(PyValue::Int(1)));
    }

    #[test]
    fn dict_preserves_insertion_order() {
        let dict = PyDict::new();
        dict.set("b", PyValue::Int(2));
        dict.set("a", PyValue::Int(1));
        let keys: Vec<_> = dict.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![SmolStr::new("b"), SmolStr::new("a")]);
    }

    #[test]
    fn decimal_literals() {
        assert!(PyDecimal::new("12345678901234567890.5").is_ok());
        assert!(PyDecimal::new("-0.25").is_ok());
        assert!(PyDecimal::new("+1e10").is_ok());
        assert!(PyDecimal::new("3.14E-2").is_ok());

        assert!(PyDecimal::new("").is_err());
        assert!(PyDecimal::new(".").is_err());
        assert!(PyDecimal::new("1.2.3").is_err());
        assert!(PyDecimal::new("12a").is_err());
        assert!(PyDecimal::new("1e").is_err());
    }

    #[test]
    fn display_python_literals() {
        assert_eq!(PyValue::None.to_string(), "None");
        assert_eq!(PyValue::Bool(true).to_string(), "True");
        let list = PyList::from_vec(vec![PyValue::Int(1), PyValue::Int(2)]);
        assert_eq!(PyValue::List(list).to_string(), "[1, 2]");
        let dict = PyDict::new();
        dict.set("x", PyValue::Int(1));
        assert_eq!(PyValue::Dict(dict).to_string(), "{'x': 1}");
        assert_eq!(
            PyValue::Tuple(vec![PyValue::Int(1)]).to_string(),
            "(1,)"
        );
    }
}
