//! The `Jvm` Entry Point
//!
//! One `Jvm` value stands in for the `JNIEnv*` a native call would
//! receive: class lookup, reference promotion, allocation of new objects
//! in the Java heap, and the handful of protocol calls the bridge drives
//! (boxed-value accessors, the iterator protocol, map-entry iteration,
//! temporal accessors, reflective member name lookup).
//!
//! ## Reference discipline
//!
//! - Plain `JRef`s are caller-owned; the env never retains them.
//! - [`GlobalRef`] promotes a class handle for long-lived caching and must
//!   be released with [`Jvm::delete_global_ref`]. The env counts live
//!   global refs so teardown can be asserted in tests.
//! - [`Utf8Chars`] borrows a Java string's text for one scope and releases
//!   on drop, modelling `GetStringUTFChars`/`ReleaseStringUTFChars`.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smol_str::SmolStr;

use crate::class::{JClass, JMethodId, Registry};
use crate::error::{JvmError, JvmResult};
use crate::object::{unwrap_adapter, JRef, JValue, PyPayload};

// ============================================================================
// Jvm
// ============================================================================

/// The modelled JVM: class registry plus reference bookkeeping.
#[derive(Debug)]
pub struct Jvm {
    registry: RefCell<Registry>,
    live_globals: Cell<usize>,
    live_utf8_borrows: Cell<usize>,
}

impl Jvm {
    /// Create a JVM with the builtin class set registered.
    pub fn new() -> Self {
        let jvm = Self {
            registry: RefCell::new(Registry::default()),
            live_globals: Cell::new(0),
            live_utf8_borrows: Cell::new(0),
        };
        jvm.register_builtins();
        jvm
    }

    fn register_builtins(&self) {
        let mut reg = self.registry.borrow_mut();
        // Roots and interfaces first so supertype closures resolve.
        let register = |reg: &mut Registry, name: &str, supers: &[&str]| {
            // Builtins reference only already-registered supers.
            reg.register(name, supers)
                .unwrap_or_else(|_| unreachable!("builtin supertype registered out of order"))
        };
        register(&mut reg, "java/lang/Object", &[]);
        let iterable = register(&mut reg, "java/lang/Iterable", &["java/lang/Object"]);
        let iterator = register(&mut reg, "java/util/Iterator", &["java/lang/Object"]);
        register(&mut reg, "java/util/Collection", &["java/lang/Iterable"]);
        register(&mut reg, "java/util/List", &["java/util/Collection"]);
        register(&mut reg, "java/util/Map", &["java/lang/Object"]);
        register(&mut reg, "java/util/Map$Entry", &["java/lang/Object"]);
        register(&mut reg, "java/lang/Number", &["java/lang/Object"]);

        register(&mut reg, "java/lang/Boolean", &["java/lang/Object"]);
        register(&mut reg, "java/lang/Byte", &["java/lang/Number"]);
        register(&mut reg, "java/lang/Short", &["java/lang/Number"]);
        register(&mut reg, "java/lang/Integer", &["java/lang/Number"]);
        register(&mut reg, "java/lang/Long", &["java/lang/Number"]);
        register(&mut reg, "java/lang/Float", &["java/lang/Number"]);
        register(&mut reg, "java/lang/Double", &["java/lang/Number"]);
        register(&mut reg, "java/lang/Character", &["java/lang/Object"]);
        register(&mut reg, "java/lang/String", &["java/lang/Object"]);
        let big_decimal = register(&mut reg, "java/math/BigDecimal", &["java/lang/Number"]);

        for array in ["[Z", "[B", "[C", "[S", "[I", "[J", "[F", "[D"] {
            register(&mut reg, array, &["java/lang/Object"]);
        }
        register(&mut reg, "[Ljava/lang/String;", &["java/lang/Object"]);
        register(&mut reg, "[Ljava/lang/Object;", &["java/lang/Object"]);

        register(&mut reg, "java/util/ArrayList", &["java/util/List"]);
        register(&mut reg, "java/util/LinkedHashMap", &["java/util/Map"]);
        register(&mut reg, "java/util/ArrayDeque", &["java/util/Collection"]);

        register(&mut reg, "java/time/LocalDate", &["java/lang/Object"]);
        register(&mut reg, "java/time/LocalTime", &["java/lang/Object"]);
        let local_date_time =
            register(&mut reg, "java/time/LocalDateTime", &["java/lang/Object"]);
        let member = register(&mut reg, "java/lang/reflect/Member", &["java/lang/Object"]);
        register(&mut reg, "jpybridge/core/PyObject", &["java/lang/Object"]);

        // Method tables for the protocols the bridge resolves by id.
        reg.declare_method(member, "getName", "()Ljava/lang/String;");
        reg.declare_method(iterator, "hasNext", "()Z");
        reg.declare_method(iterator, "next", "()Ljava/lang/Object;");
        reg.declare_method(iterable, "iterator", "()Ljava/util/Iterator;");
        reg.declare_method(big_decimal, "toString", "()Ljava/lang/String;");
        reg.declare_method(local_date_time, "toLocalDate", "()Ljava/time/LocalDate;");
        reg.declare_method(local_date_time, "toLocalTime", "()Ljava/time/LocalTime;");
        reg.declare_method(
            local_date_time,
            "of",
            "(Ljava/time/LocalDate;Ljava/time/LocalTime;)Ljava/time/LocalDateTime;",
        );
    }

    // ------------------------------------------------------------------
    // Class lookup and identity
    // ------------------------------------------------------------------

    /// `FindClass`: resolve a fully-qualified JNI name.
    pub fn find_class(&self, name: &str) -> JvmResult<JClass> {
        self.registry
            .borrow()
            .lookup(name)
            .ok_or_else(|| JvmError::class_not_found(name))
    }

    /// Register an additional class (tests and adapters). Supertypes must
    /// already exist.
    pub fn register_class(&self, name: &str, supers: &[&str]) -> JvmResult<JClass> {
        self.registry.borrow_mut().register(name, supers)
    }

    /// The JNI name of a class handle.
    pub fn class_name(&self, class: JClass) -> SmolStr {
        self.registry.borrow().name_of(class)
    }

    /// `GetObjectClass`: the runtime class of a heap value.
    pub fn get_object_class(&self, obj: &JRef) -> JvmResult<JClass> {
        if let JValue::Adapter { class, .. } = &**obj {
            return Ok(*class);
        }
        let name = obj
            .builtin_class_name()
            .ok_or_else(|| JvmError::null_reference("object has no class"))?;
        if let Some(class) = self.registry.borrow().lookup(&name) {
            return Ok(class);
        }
        // Array classes for uncommon components resolve lazily.
        self.registry
            .borrow_mut()
            .register(&name, &["java/lang/Object"])
    }

    /// `IsInstanceOf` over the registered supertype closure.
    pub fn is_instance_of(&self, obj: &JRef, of: JClass) -> bool {
        match self.get_object_class(obj) {
            Ok(class) => self.registry.borrow().is_assignable(class, of),
            Err(_) => false,
        }
    }

    /// `IsSameObject` on class handles.
    pub fn same_class(&self, a: JClass, b: JClass) -> bool {
        a == b
    }

    /// `GetMethodID`: resolve a method on the class or its supertypes.
    pub fn get_method_id(&self, class: JClass, name: &str, signature: &str) -> JvmResult<JMethodId> {
        self.registry.borrow().method_id(class, name, signature)
    }

    // ------------------------------------------------------------------
    // Reference promotion
    // ------------------------------------------------------------------

    /// `NewGlobalRef` on a class handle.
    pub fn new_global_ref(&self, class: JClass) -> GlobalRef {
        self.live_globals.set(self.live_globals.get() + 1);
        GlobalRef { class }
    }

    /// `DeleteGlobalRef`; consumes the ref so it cannot be reused.
    pub fn delete_global_ref(&self, global: GlobalRef) {
        let _ = global.class;
        self.live_globals.set(self.live_globals.get().saturating_sub(1));
    }

    /// Number of global refs currently alive (teardown assertion hook).
    pub fn live_global_refs(&self) -> usize {
        self.live_globals.get()
    }

    /// Number of outstanding UTF-8 string borrows.
    pub fn live_utf8_borrows(&self) -> usize {
        self.live_utf8_borrows.get()
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    /// Box a `boolean` as `java.lang.Boolean`
    pub fn new_boolean(&self, v: bool) -> JRef {
        Rc::new(JValue::Boolean(v))
    }

    /// Box a `byte` as `java.lang.Byte`
    pub fn new_byte(&self, v: i8) -> JRef {
        Rc::new(JValue::Byte(v))
    }

    /// Box a `short` as `java.lang.Short`
    pub fn new_short(&self, v: i16) -> JRef {
        Rc::new(JValue::Short(v))
    }

    /// Box an `int` as `java.lang.Integer`
    pub fn new_integer(&self, v: i32) -> JRef {
        Rc::new(JValue::Integer(v))
    }

    /// Box a `long` as `java.lang.Long`
    pub fn new_long(&self, v: i64) -> JRef {
        Rc::new(JValue::Long(v))
    }

    /// Box a `float` as `java.lang.Float`
    pub fn new_float(&self, v: f32) -> JRef {
        Rc::new(JValue::Float(v))
    }

    /// Box a `double` as `java.lang.Double`
    pub fn new_double(&self, v: f64) -> JRef {
        Rc::new(JValue::Double(v))
    }

    /// Box a `char` as `java.lang.Character`
    pub fn new_character(&self, v: u16) -> JRef {
        Rc::new(JValue::Character(v))
    }

    /// `NewStringUTF`
    pub fn new_string(&self, s: &str) -> JRef {
        Rc::new(JValue::String(SmolStr::new(s)))
    }

    /// `new BigDecimal(String)`
    pub fn new_big_decimal(&self, text: &str) -> JRef {
        Rc::new(JValue::BigDecimal(SmolStr::new(text)))
    }

    /// A `java.util.ArrayList` holding the given elements
    pub fn new_list(&self, elems: Vec<Option<JRef>>) -> JRef {
        Rc::new(JValue::List(RefCell::new(elems)))
    }

    /// A `java.util.LinkedHashMap` holding the given entries in order
    pub fn new_map(&self, entries: Vec<(Option<JRef>, Option<JRef>)>) -> JRef {
        Rc::new(JValue::Map(RefCell::new(entries)))
    }

    /// A non-`List` collection, reachable only through its iterator
    pub fn new_iterable(&self, elems: Vec<Option<JRef>>) -> JRef {
        Rc::new(JValue::Iterable(RefCell::new(elems)))
    }

    /// An object array with the given component class name
    pub fn new_object_array(&self, component: &str, elems: Vec<Option<JRef>>) -> JRef {
        Rc::new(JValue::ObjectArray {
            component: SmolStr::new(component),
            elems: RefCell::new(elems),
        })
    }

    /// `boolean[]`
    pub fn new_boolean_array(&self, v: Vec<bool>) -> JRef {
        Rc::new(JValue::BooleanArray(RefCell::new(v)))
    }

    /// `byte[]`
    pub fn new_byte_array(&self, v: Vec<i8>) -> JRef {
        Rc::new(JValue::ByteArray(RefCell::new(v)))
    }

    /// `char[]`
    pub fn new_char_array(&self, v: Vec<u16>) -> JRef {
        Rc::new(JValue::CharArray(RefCell::new(v)))
    }

    /// `short[]`
    pub fn new_short_array(&self, v: Vec<i16>) -> JRef {
        Rc::new(JValue::ShortArray(RefCell::new(v)))
    }

    /// `int[]`
    pub fn new_int_array(&self, v: Vec<i32>) -> JRef {
        Rc::new(JValue::IntArray(RefCell::new(v)))
    }

    /// `long[]`
    pub fn new_long_array(&self, v: Vec<i64>) -> JRef {
        Rc::new(JValue::LongArray(RefCell::new(v)))
    }

    /// `float[]`
    pub fn new_float_array(&self, v: Vec<f32>) -> JRef {
        Rc::new(JValue::FloatArray(RefCell::new(v)))
    }

    /// `double[]`
    pub fn new_double_array(&self, v: Vec<f64>) -> JRef {
        Rc::new(JValue::DoubleArray(RefCell::new(v)))
    }

    /// `LocalDate.of(year, month, day)`
    pub fn new_local_date(&self, year: i32, month: u8, day: u8) -> JRef {
        Rc::new(JValue::LocalDate { year, month, day })
    }

    /// `LocalTime.of(hour, minute, second, nano)`
    pub fn new_local_time(&self, hour: u8, minute: u8, second: u8, nano: u32) -> JRef {
        Rc::new(JValue::LocalTime {
            hour,
            minute,
            second,
            nano,
        })
    }

    /// A reflective member with the given name
    pub fn new_member(&self, name: &str) -> JRef {
        Rc::new(JValue::Member {
            name: SmolStr::new(name),
        })
    }

    /// The Java-side opaque wrapper around an unconverted Python payload
    pub fn new_py_object(&self, payload: Rc<dyn Any>) -> JRef {
        Rc::new(JValue::PyObject(PyPayload(payload)))
    }

    /// An object of an arbitrary registered class delegating its container
    /// protocols to `inner`
    pub fn new_adapter(&self, class: JClass, inner: JRef) -> JRef {
        Rc::new(JValue::Adapter { class, inner })
    }

    // ------------------------------------------------------------------
    // Unboxing accessors (xxxValue() calls on the boxed types)
    // ------------------------------------------------------------------

    /// `booleanValue()`
    pub fn unbox_boolean(&self, obj: &JRef) -> JvmResult<bool> {
        match &*unwrap_adapter(obj) {
            JValue::Boolean(v) => Ok(*v),
            other => Err(self.receiver_error("java/lang/Boolean", other)),
        }
    }

    /// `byteValue()`
    pub fn unbox_byte(&self, obj: &JRef) -> JvmResult<i8> {
        match &*unwrap_adapter(obj) {
            JValue::Byte(v) => Ok(*v),
            other => Err(self.receiver_error("java/lang/Byte", other)),
        }
    }

    /// `shortValue()`
    pub fn unbox_short(&self, obj: &JRef) -> JvmResult<i16> {
        match &*unwrap_adapter(obj) {
            JValue::Short(v) => Ok(*v),
            other => Err(self.receiver_error("java/lang/Short", other)),
        }
    }

    /// `intValue()`
    pub fn unbox_int(&self, obj: &JRef) -> JvmResult<i32> {
        match &*unwrap_adapter(obj) {
            JValue::Integer(v) => Ok(*v),
            other => Err(self.receiver_error("java/lang/Integer", other)),
        }
    }

    /// `longValue()`
    pub fn unbox_long(&self, obj: &JRef) -> JvmResult<i64> {
        match &*unwrap_adapter(obj) {
            JValue::Long(v) => Ok(*v),
            other => Err(self.receiver_error("java/lang/Long", other)),
        }
    }

    /// `floatValue()`
    pub fn unbox_float(&self, obj: &JRef) -> JvmResult<f32> {
        match &*unwrap_adapter(obj) {
            JValue::Float(v) => Ok(*v),
            other => Err(self.receiver_error("java/lang/Float", other)),
        }
    }

    /// `doubleValue()`
    pub fn unbox_double(&self, obj: &JRef) -> JvmResult<f64> {
        match &*unwrap_adapter(obj) {
            JValue::Double(v) => Ok(*v),
            other => Err(self.receiver_error("java/lang/Double", other)),
        }
    }

    /// `charValue()`
    pub fn unbox_char(&self, obj: &JRef) -> JvmResult<u16> {
        match &*unwrap_adapter(obj) {
            JValue::Character(v) => Ok(*v),
            other => Err(self.receiver_error("java/lang/Character", other)),
        }
    }

    /// `GetStringUTFChars`: scoped borrow of a Java string's text.
    pub fn string_chars(&self, obj: &JRef) -> JvmResult<Utf8Chars<'_>> {
        match &*unwrap_adapter(obj) {
            JValue::String(s) => {
                self.live_utf8_borrows.set(self.live_utf8_borrows.get() + 1);
                Ok(Utf8Chars {
                    jvm: self,
                    text: s.clone(),
                })
            }
            other => Err(self.receiver_error("java/lang/String", other)),
        }
    }

    // ------------------------------------------------------------------
    // Array regions (GetXxxArrayRegion copies)
    // ------------------------------------------------------------------

    /// `GetArrayLength` for any array shape
    pub fn array_length(&self, obj: &JRef) -> JvmResult<usize> {
        match &*unwrap_adapter(obj) {
            JValue::BooleanArray(v) => Ok(v.borrow().len()),
            JValue::ByteArray(v) => Ok(v.borrow().len()),
            JValue::CharArray(v) => Ok(v.borrow().len()),
            JValue::ShortArray(v) => Ok(v.borrow().len()),
            JValue::IntArray(v) => Ok(v.borrow().len()),
            JValue::LongArray(v) => Ok(v.borrow().len()),
            JValue::FloatArray(v) => Ok(v.borrow().len()),
            JValue::DoubleArray(v) => Ok(v.borrow().len()),
            JValue::ObjectArray { elems, .. } => Ok(elems.borrow().len()),
            other => Err(self.receiver_error("array", other)),
        }
    }

    /// `GetBooleanArrayRegion` over the whole array
    pub fn boolean_array_region(&self, obj: &JRef) -> JvmResult<Vec<bool>> {
        match &*unwrap_adapter(obj) {
            JValue::BooleanArray(v) => Ok(v.borrow().clone()),
            other => Err(self.receiver_error("[Z", other)),
        }
    }

    /// `GetByteArrayRegion` over the whole array
    pub fn byte_array_region(&self, obj: &JRef) -> JvmResult<Vec<i8>> {
        match &*unwrap_adapter(obj) {
            JValue::ByteArray(v) => Ok(v.borrow().clone()),
            other => Err(self.receiver_error("[B", other)),
        }
    }

    /// `GetCharArrayRegion` over the whole array
    pub fn char_array_region(&self, obj: &JRef) -> JvmResult<Vec<u16>> {
        match &*unwrap_adapter(obj) {
            JValue::CharArray(v) => Ok(v.borrow().clone()),
            other => Err(self.receiver_error("[C", other)),
        }
    }

    /// `GetShortArrayRegion` over the whole array
    pub fn short_array_region(&self, obj: &JRef) -> JvmResult<Vec<i16>> {
        match &*unwrap_adapter(obj) {
            JValue::ShortArray(v) => Ok(v.borrow().clone()),
            other => Err(self.receiver_error("[S", other)),
        }
    }

    /// `GetIntArrayRegion` over the whole array
    pub fn int_array_region(&self, obj: &JRef) -> JvmResult<Vec<i32>> {
        match &*unwrap_adapter(obj) {
            JValue::IntArray(v) => Ok(v.borrow().clone()),
            other => Err(self.receiver_error("[I", other)),
        }
    }

    /// `GetLongArrayRegion` over the whole array
    pub fn long_array_region(&self, obj: &JRef) -> JvmResult<Vec<i64>> {
        match &*unwrap_adapter(obj) {
            JValue::LongArray(v) => Ok(v.borrow().clone()),
            other => Err(self.receiver_error("[J", other)),
        }
    }

    /// `GetFloatArrayRegion` over the whole array
    pub fn float_array_region(&self, obj: &JRef) -> JvmResult<Vec<f32>> {
        match &*unwrap_adapter(obj) {
            JValue::FloatArray(v) => Ok(v.borrow().clone()),
            other => Err(self.receiver_error("[F", other)),
        }
    }

    /// `GetDoubleArrayRegion` over the whole array
    pub fn double_array_region(&self, obj: &JRef) -> JvmResult<Vec<f64>> {
        match &*unwrap_adapter(obj) {
            JValue::DoubleArray(v) => Ok(v.borrow().clone()),
            other => Err(self.receiver_error("[D", other)),
        }
    }

    /// `GetObjectArrayElement` over the whole array
    pub fn object_array_elements(&self, obj: &JRef) -> JvmResult<Vec<Option<JRef>>> {
        match &*unwrap_adapter(obj) {
            JValue::ObjectArray { elems, .. } => Ok(elems.borrow().clone()),
            other => Err(self.receiver_error("[Ljava/lang/Object;", other)),
        }
    }

    // ------------------------------------------------------------------
    // Protocol calls by method id
    // ------------------------------------------------------------------

    /// `CallBooleanMethod` for the protocols the bridge drives
    /// (`Iterator.hasNext`).
    pub fn call_boolean_method(&self, recv: &JRef, mid: JMethodId) -> JvmResult<bool> {
        let name = self.registry.borrow().method_name(mid);
        let recv = unwrap_adapter(recv);
        match (name.as_str(), &*recv) {
            ("hasNext", JValue::Iter { items, pos }) => Ok(pos.get() < items.len()),
            (_, other) => Err(self.receiver_error(&self.class_name(mid.declaring_class()), other)),
        }
    }

    /// `CallObjectMethod` for the protocols the bridge drives
    /// (`Member.getName`, `Iterator.next`, `Iterable.iterator`,
    /// `BigDecimal.toString`, `LocalDateTime.toLocalDate`/`toLocalTime`).
    pub fn call_object_method(&self, recv: &JRef, mid: JMethodId) -> JvmResult<Option<JRef>> {
        let name = self.registry.borrow().method_name(mid);
        let recv = unwrap_adapter(recv);
        match (name.as_str(), &*recv) {
            ("getName", JValue::Member { name }) => Ok(Some(self.new_string(name))),
            ("next", JValue::Iter { items, pos }) => {
                let i = pos.get();
                if i >= items.len() {
                    return Err(JvmError::bad_arguments("java.util.NoSuchElementException"));
                }
                pos.set(i + 1);
                Ok(items[i].clone())
            }
            ("iterator", JValue::List(items))
            | ("iterator", JValue::Iterable(items)) => Ok(Some(Rc::new(JValue::Iter {
                items: items.borrow().clone(),
                pos: Cell::new(0),
            }))),
            ("toString", JValue::BigDecimal(text)) => Ok(Some(self.new_string(text))),
            ("toLocalDate", JValue::LocalDateTime { date, .. }) => Ok(Some(Rc::clone(date))),
            ("toLocalTime", JValue::LocalDateTime { time, .. }) => Ok(Some(Rc::clone(time))),
            (_, other) => Err(self.receiver_error(&self.class_name(mid.declaring_class()), other)),
        }
    }

    /// `CallStaticObjectMethod` (`LocalDateTime.of(date, time)`).
    pub fn call_static_object_method(
        &self,
        class: JClass,
        mid: JMethodId,
        args: &[Option<JRef>],
    ) -> JvmResult<Option<JRef>> {
        let name = self.registry.borrow().method_name(mid);
        if self.class_name(class) == "java/time/LocalDateTime" && name == "of" {
            let (date, time) = match args {
                [Some(date), Some(time)] => (date, time),
                _ => return Err(JvmError::bad_arguments("LocalDateTime.of takes (date, time)")),
            };
            if !matches!(&**date, JValue::LocalDate { .. }) {
                return Err(self.receiver_error("java/time/LocalDate", date));
            }
            if !matches!(&**time, JValue::LocalTime { .. }) {
                return Err(self.receiver_error("java/time/LocalTime", time));
            }
            return Ok(Some(Rc::new(JValue::LocalDateTime {
                date: Rc::clone(date),
                time: Rc::clone(time),
            })));
        }
        Err(JvmError::no_such_method(
            self.class_name(class),
            name,
            "<static>",
        ))
    }

    /// Entry iteration over a `Map` (`entrySet().iterator()` walk),
    /// preserving whatever order the source map guarantees.
    pub fn map_entries(&self, obj: &JRef) -> JvmResult<Vec<(Option<JRef>, Option<JRef>)>> {
        match &*unwrap_adapter(obj) {
            JValue::Map(entries) => Ok(entries.borrow().clone()),
            other => Err(self.receiver_error("java/util/Map", other)),
        }
    }

    // ------------------------------------------------------------------
    // Temporal field accessors (getYear()/getHour()/... bundles)
    // ------------------------------------------------------------------

    /// `(getYear, getMonthValue, getDayOfMonth)` on a `LocalDate`
    pub fn local_date_fields(&self, obj: &JRef) -> JvmResult<(i32, u8, u8)> {
        match &*unwrap_adapter(obj) {
            JValue::LocalDate { year, month, day } => Ok((*year, *month, *day)),
            other => Err(self.receiver_error("java/time/LocalDate", other)),
        }
    }

    /// `(getHour, getMinute, getSecond, getNano)` on a `LocalTime`
    pub fn local_time_fields(&self, obj: &JRef) -> JvmResult<(u8, u8, u8, u32)> {
        match &*unwrap_adapter(obj) {
            JValue::LocalTime {
                hour,
                minute,
                second,
                nano,
            } => Ok((*hour, *minute, *second, *nano)),
            other => Err(self.receiver_error("java/time/LocalTime", other)),
        }
    }

    fn receiver_error(&self, expected: &str, actual: &JValue) -> JvmError {
        let actual_name = actual
            .builtin_class_name()
            .unwrap_or_else(|| SmolStr::new_static("<adapter>"));
        JvmError::wrong_receiver(expected, actual_name)
    }
}

impl Default for Jvm {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GlobalRef
// ============================================================================

/// A promoted class reference. Not `Clone`: exactly one release per
/// acquisition, through [`Jvm::delete_global_ref`].
#[derive(Debug)]
pub struct GlobalRef {
    class: JClass,
}

impl GlobalRef {
    /// The class this global ref pins
    pub fn class(&self) -> JClass {
        self.class
    }
}

// ============================================================================
// Utf8Chars
// ============================================================================

/// Scoped borrow of a Java string's UTF-8 text; the release half of
/// `GetStringUTFChars`/`ReleaseStringUTFChars` runs on drop, so every
/// early-return path still releases.
#[derive(Debug)]
pub struct Utf8Chars<'a> {
    jvm: &'a Jvm,
    text: SmolStr,
}

impl Utf8Chars<'_> {
    /// The borrowed text
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Drop for Utf8Chars<'_> {
    fn drop(&mut self) {
        self.jvm
            .live_utf8_borrows
            .set(self.jvm.live_utf8_borrows.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn find_class_builtin_and_missing() {
        let jvm = Jvm::new();
        assert!(jvm.find_class("java/lang/Integer").is_ok());
        let err = jvm.find_class("java/lang/Bogus").unwrap_err();
        assert!(matches!(err, JvmError::ClassNotFound { .. }));
    }

    #[test]
    fn instance_of_walks_interfaces() {
        let jvm = Jvm::new();
        let list = jvm.new_list(vec![]);
        let list_cls = jvm.find_class("java/util/List").unwrap();
        let collection_cls = jvm.find_class("java/util/Collection").unwrap();
        let iterable_cls = jvm.find_class("java/lang/Iterable").unwrap();
        let map_cls = jvm.find_class("java/util/Map").unwrap();

        assert!(jvm.is_instance_of(&list, list_cls));
        assert!(jvm.is_instance_of(&list, collection_cls));
        assert!(jvm.is_instance_of(&list, iterable_cls));
        assert!(!jvm.is_instance_of(&list, map_cls));

        let deque = jvm.new_iterable(vec![]);
        assert!(jvm.is_instance_of(&deque, iterable_cls));
        assert!(!jvm.is_instance_of(&deque, list_cls));
    }

    #[test]
    fn global_ref_counting() {
        let jvm = Jvm::new();
        let cls = jvm.find_class("java/lang/Integer").unwrap();
        let a = jvm.new_global_ref(cls);
        let b = jvm.new_global_ref(cls);
        assert_eq!(jvm.live_global_refs(), 2);
        jvm.delete_global_ref(a);
        jvm.delete_global_ref(b);
        assert_eq!(jvm.live_global_refs(), 0);
    }

    #[test]
    fn string_chars_release_on_drop() {
        let jvm = Jvm::new();
        let s = jvm.new_string("hello");
        {
            let chars = jvm.string_chars(&s).unwrap();
            assert_eq!(chars.as_str(), "hello");
            assert_eq!(jvm.live_utf8_borrows(), 1);
        }
        assert_eq!(jvm.live_utf8_borrows(), 0);
    }

    #[test]
    fn array_length_covers_every_array_shape() {
        let jvm = Jvm::new();
        assert_eq!(jvm.array_length(&jvm.new_boolean_array(vec![true])).unwrap(), 1);
        assert_eq!(jvm.array_length(&jvm.new_byte_array(vec![1, 2])).unwrap(), 2);
        assert_eq!(jvm.array_length(&jvm.new_char_array(vec![65])).unwrap(), 1);
        assert_eq!(jvm.array_length(&jvm.new_int_array(vec![1, 2, 3])).unwrap(), 3);
        assert_eq!(jvm.array_length(&jvm.new_double_array(vec![])).unwrap(), 0);
        assert_eq!(
            jvm.array_length(&jvm.new_object_array("java/lang/Object", vec![None]))
                .unwrap(),
            1
        );
        assert!(jvm.array_length(&jvm.new_integer(1)).is_err());
    }

    #[test]
    fn iterator_protocol_on_list() {
        let jvm = Jvm::new();
        let list = jvm.new_list(vec![
            Some(jvm.new_integer(1)),
            None,
            Some(jvm.new_integer(3)),
        ]);
        let iterable_cls = jvm.find_class("java/lang/Iterable").unwrap();
        let iterator_cls = jvm.find_class("java/util/Iterator").unwrap();
        let iterator_mid = jvm
            .get_method_id(iterable_cls, "iterator", "()Ljava/util/Iterator;")
            .unwrap();
        let has_next = jvm.get_method_id(iterator_cls, "hasNext", "()Z").unwrap();
        let next = jvm
            .get_method_id(iterator_cls, "next", "()Ljava/lang/Object;")
            .unwrap();

        let it = jvm.call_object_method(&list, iterator_mid).unwrap().unwrap();
        let mut seen = Vec::new();
        while jvm.call_boolean_method(&it, has_next).unwrap() {
            seen.push(jvm.call_object_method(&it, next).unwrap());
        }
        assert_eq!(seen.len(), 3);
        assert!(seen[1].is_none());
        // exhausted cursor refuses to advance
        assert!(jvm.call_object_method(&it, next).is_err());
    }

    #[test]
    fn local_date_time_compose_decompose() {
        let jvm = Jvm::new();
        let date = jvm.new_local_date(2024, 3, 9);
        let time = jvm.new_local_time(12, 30, 15, 500);
        let ldt_cls = jvm.find_class("java/time/LocalDateTime").unwrap();
        let of = jvm
            .get_method_id(
                ldt_cls,
                "of",
                "(Ljava/time/LocalDate;Ljava/time/LocalTime;)Ljava/time/LocalDateTime;",
            )
            .unwrap();
        let to_date = jvm
            .get_method_id(ldt_cls, "toLocalDate", "()Ljava/time/LocalDate;")
            .unwrap();
        let to_time = jvm
            .get_method_id(ldt_cls, "toLocalTime", "()Ljava/time/LocalTime;")
            .unwrap();

        let ldt = jvm
            .call_static_object_method(ldt_cls, of, &[Some(date), Some(time)])
            .unwrap()
            .unwrap();
        let d = jvm.call_object_method(&ldt, to_date).unwrap().unwrap();
        let t = jvm.call_object_method(&ldt, to_time).unwrap().unwrap();
        assert_eq!(jvm.local_date_fields(&d).unwrap(), (2024, 3, 9));
        assert_eq!(jvm.local_time_fields(&t).unwrap(), (12, 30, 15, 500));
    }

    #[test]
    fn member_get_name_by_method_id() {
        let jvm = Jvm::new();
        let member_cls = jvm.find_class("java/lang/reflect/Member").unwrap();
        let mid = jvm
            .get_method_id(member_cls, "getName", "()Ljava/lang/String;")
            .unwrap();
        let member = jvm.new_member("toString");
        let name = jvm.call_object_method(&member, mid).unwrap().unwrap();
        assert_eq!(name.as_string().unwrap(), "toString");
    }

    #[test]
    fn adapter_delegates_protocols() {
        let jvm = Jvm::new();
        jvm.register_class(
            "demo/MapIterable",
            &["java/util/Map", "java/lang/Iterable"],
        )
        .unwrap();
        let cls = jvm.find_class("demo/MapIterable").unwrap();
        let inner = jvm.new_map(vec![(
            Some(jvm.new_string("k")),
            Some(jvm.new_integer(1)),
        )]);
        let adapter = jvm.new_adapter(cls, inner);

        let map_cls = jvm.find_class("java/util/Map").unwrap();
        let iterable_cls = jvm.find_class("java/lang/Iterable").unwrap();
        assert!(jvm.is_instance_of(&adapter, map_cls));
        assert!(jvm.is_instance_of(&adapter, iterable_cls));
        assert_eq!(jvm.map_entries(&adapter).unwrap().len(), 1);
    }
}
