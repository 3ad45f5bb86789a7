//! Java Heap Object Model
//!
//! `JValue` covers every Java shape the bridge recognizes: the boxed
//! scalars, strings, `BigDecimal`, primitive and object arrays, the
//! container shapes, the `java.time` trio, reflective members, and the
//! opaque wrapper the bridge uses to carry an unconverted Python value on
//! the Java side.
//!
//! Mutable containers use `Rc<RefCell<..>>` interiors so that a `JRef`
//! clone observes the same underlying object, matching reference
//! semantics on a real heap. Object identity is `Rc` pointer identity.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::class::JClass;

/// A caller-owned reference to a Java heap value.
///
/// Java `null` is represented as `Option<JRef>::None` at every boundary,
/// never as a dedicated variant.
pub type JRef = Rc<JValue>;

/// Check two references for Java object identity (`==` on references).
pub fn same_object(a: &JRef, b: &JRef) -> bool {
    Rc::ptr_eq(a, b)
}

/// A value on the modelled Java heap.
#[derive(Debug)]
pub enum JValue {
    /// `java.lang.Boolean`
    Boolean(bool),
    /// `java.lang.Byte`
    Byte(i8),
    /// `java.lang.Short`
    Short(i16),
    /// `java.lang.Integer`
    Integer(i32),
    /// `java.lang.Long`
    Long(i64),
    /// `java.lang.Float`
    Float(f32),
    /// `java.lang.Double`
    Double(f64),
    /// `java.lang.Character` (one UTF-16 unit)
    Character(u16),
    /// `java.lang.String`
    String(SmolStr),
    /// `java.math.BigDecimal`, held as its canonical text form
    BigDecimal(SmolStr),

    /// `boolean[]`
    BooleanArray(RefCell<Vec<bool>>),
    /// `byte[]`
    ByteArray(RefCell<Vec<i8>>),
    /// `char[]`
    CharArray(RefCell<Vec<u16>>),
    /// `short[]`
    ShortArray(RefCell<Vec<i16>>),
    /// `int[]`
    IntArray(RefCell<Vec<i32>>),
    /// `long[]`
    LongArray(RefCell<Vec<i64>>),
    /// `float[]`
    FloatArray(RefCell<Vec<f32>>),
    /// `double[]`
    DoubleArray(RefCell<Vec<f64>>),

    /// An object array (`String[]`, `Object[]`, ...). The component is the
    /// JNI name of the element class.
    ObjectArray {
        /// JNI name of the component class, e.g. `java/lang/Object`
        component: SmolStr,
        /// Elements; `None` is a null slot
        elems: RefCell<Vec<Option<JRef>>>,
    },

    /// `java.util.ArrayList`
    List(RefCell<Vec<Option<JRef>>>),
    /// `java.util.LinkedHashMap`; entry order is insertion order
    Map(RefCell<Vec<(Option<JRef>, Option<JRef>)>>),
    /// A `Collection` that is not a `List` (modelled as `java.util.ArrayDeque`);
    /// only reachable through the iterator protocol
    Iterable(RefCell<Vec<Option<JRef>>>),
    /// A live `java.util.Iterator` cursor
    Iter {
        /// Snapshot of the underlying elements
        items: Vec<Option<JRef>>,
        /// Cursor position, advanced by `next()`
        pos: Cell<usize>,
    },

    /// `java.time.LocalDate`
    LocalDate {
        /// Proleptic year
        year: i32,
        /// 1-12
        month: u8,
        /// 1-31
        day: u8,
    },
    /// `java.time.LocalTime`
    LocalTime {
        /// 0-23
        hour: u8,
        /// 0-59
        minute: u8,
        /// 0-59
        second: u8,
        /// 0-999_999_999
        nano: u32,
    },
    /// `java.time.LocalDateTime`, composed of a date part and a time part
    LocalDateTime {
        /// The `LocalDate` part
        date: JRef,
        /// The `LocalTime` part
        time: JRef,
    },

    /// `java.lang.reflect.Member` (method/field metadata)
    Member {
        /// The member name reported by `getName()`
        name: SmolStr,
    },

    /// The bridge's Java-side opaque wrapper around an unconverted Python
    /// value. The payload is type-erased here; the bridge downcasts it.
    PyObject(PyPayload),

    /// An object of an arbitrary registered class that delegates its
    /// container protocols to an inner object. Used to model user types
    /// implementing several container interfaces at once.
    Adapter {
        /// The registered runtime class of this object
        class: JClass,
        /// The object the protocols are delegated to
        inner: JRef,
    },
}

/// Type-erased Python payload carried by the Java-side opaque wrapper.
/// The bridge crate owns the concrete type and downcasts on unwrap.
#[derive(Clone)]
pub struct PyPayload(pub Rc<dyn Any>);

impl fmt::Debug for PyPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PyPayload(..)")
    }
}

impl JValue {
    /// The JNI name of this value's runtime class. `Adapter` values are
    /// resolved by the registry instead (their class is explicit).
    pub fn builtin_class_name(&self) -> Option<SmolStr> {
        let name = match self {
            JValue::Boolean(_) => "java/lang/Boolean",
            JValue::Byte(_) => "java/lang/Byte",
            JValue::Short(_) => "java/lang/Short",
            JValue::Integer(_) => "java/lang/Integer",
            JValue::Long(_) => "java/lang/Long",
            JValue::Float(_) => "java/lang/Float",
            JValue::Double(_) => "java/lang/Double",
            JValue::Character(_) => "java/lang/Character",
            JValue::String(_) => "java/lang/String",
            JValue::BigDecimal(_) => "java/math/BigDecimal",
            JValue::BooleanArray(_) => "[Z",
            JValue::ByteArray(_) => "[B",
            JValue::CharArray(_) => "[C",
            JValue::ShortArray(_) => "[S",
            JValue::IntArray(_) => "[I",
            JValue::LongArray(_) => "[J",
            JValue::FloatArray(_) => "[F",
            JValue::DoubleArray(_) => "[D",
            JValue::ObjectArray { component, .. } => {
                return Some(SmolStr::new(format!("[L{component};")));
            }
            JValue::List(_) => "java/util/ArrayList",
            JValue::Map(_) => "java/util/LinkedHashMap",
            JValue::Iterable(_) => "java/util/ArrayDeque",
            JValue::Iter { .. } => "java/util/Iterator",
            JValue::LocalDate { .. } => "java/time/LocalDate",
            JValue::LocalTime { .. } => "java/time/LocalTime",
            JValue::LocalDateTime { .. } => "java/time/LocalDateTime",
            JValue::Member { .. } => "java/lang/reflect/Member",
            JValue::PyObject(_) => "jpybridge/core/PyObject",
            JValue::Adapter { .. } => return None,
        };
        Some(SmolStr::new_static(name))
    }

    /// Try to view this value as a Java string
    pub fn as_string(&self) -> Option<&SmolStr> {
        match self {
            JValue::String(s) => Some(s),
            _ => None,
        }
    }

}

/// Strip `Adapter` wrappers down to the delegated object.
pub fn unwrap_adapter(obj: &JRef) -> JRef {
    let mut cur = Rc::clone(obj);
    while let JValue::Adapter { inner, .. } = &*cur {
        let next = Rc::clone(inner);
        cur = next;
    }
    cur
}

impl fmt::Display for JValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JValue::Boolean(b) => write!(f, "{b}"),
            JValue::Byte(v) => write!(f, "{v}"),
            JValue::Short(v) => write!(f, "{v}"),
            JValue::Integer(v) => write!(f, "{v}"),
            JValue::Long(v) => write!(f, "{v}"),
            JValue::Float(v) => write!(f, "{v}"),
            JValue::Double(v) => write!(f, "{v}"),
            JValue::Character(c) => write!(f, "{}", char::from_u32(*c as u32).unwrap_or('?')),
            JValue::String(s) => write!(f, "\"{s}\""),
            JValue::BigDecimal(s) => write!(f, "{s}"),
            other => match other.builtin_class_name() {
                Some(name) => write!(f, "<{name}>"),
                None => write!(f, "<adapter>"),
            },
        }
    }
}
