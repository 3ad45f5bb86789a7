//! Well-Known Class Cache
//!
//! The bridge identifies foreign objects by comparing their runtime
//! class against a fixed table of well-known Java classes. Each entry is
//! resolved once, promoted to a global reference, and reused for every
//! conversion until teardown; the method handles the converters drive
//! (iterator protocol, boxed accessors resolved by id) are cached
//! alongside.
//!
//! [`ClassCache::populate`] and [`ClassCache::teardown`] are both
//! idempotent: populate on a populated cache is a no-op, teardown on an
//! empty cache is a no-op, and teardown releases exactly the references
//! populate acquired. The check-and-populate sequence runs under a
//! mutex, so first use from several threads resolves the table exactly
//! once; idempotent content alone would not give that visibility.

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;

use jpy_jvm::{GlobalRef, JClass, JMethodId, Jvm};

use crate::error::{BridgeError, BridgeResult};

// ============================================================================
// WellKnownClass
// ============================================================================

/// The fixed set of Java classes the bridge recognizes by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownClass {
    /// `java.lang.Object`
    Object,
    /// `java.lang.Number`
    Number,
    /// `java.lang.Boolean`
    Boolean,
    /// `java.lang.Byte`
    Byte,
    /// `java.lang.Short`
    Short,
    /// `java.lang.Integer`
    Integer,
    /// `java.lang.Long`
    Long,
    /// `java.lang.Float`
    Float,
    /// `java.lang.Double`
    Double,
    /// `java.lang.Character`
    Character,
    /// `java.lang.String`
    String,
    /// `java.math.BigDecimal`
    BigDecimal,
    /// `java.util.List`
    List,
    /// `java.util.Map`
    Map,
    /// `java.util.Map$Entry`
    MapEntry,
    /// `java.lang.Iterable`
    Iterable,
    /// `java.util.Iterator`
    Iterator,
    /// `java.util.Collection`
    Collection,
    /// `java.util.ArrayList`
    ArrayList,
    /// `java.util.LinkedHashMap`
    LinkedHashMap,
    /// `boolean[]`
    BooleanArray,
    /// `byte[]`
    ByteArray,
    /// `char[]`
    CharArray,
    /// `short[]`
    ShortArray,
    /// `int[]`
    IntArray,
    /// `long[]`
    LongArray,
    /// `float[]`
    FloatArray,
    /// `double[]`
    DoubleArray,
    /// `java.lang.String[]`
    StringArray,
    /// `java.lang.Object[]`
    ObjectArray,
    /// `java.time.LocalDate`
    LocalDate,
    /// `java.time.LocalTime`
    LocalTime,
    /// `java.time.LocalDateTime`
    LocalDateTime,
    /// `java.lang.reflect.Member`
    Member,
    /// The Java-side opaque wrapper for unconverted Python objects
    PyObject,
}

impl WellKnownClass {
    /// Every entry, in table order. Populate resolves them in this order
    /// and teardown releases them in reverse.
    pub const ALL: &'static [WellKnownClass] = &[
        WellKnownClass::Object,
        WellKnownClass::Number,
        WellKnownClass::Boolean,
        WellKnownClass::Byte,
        WellKnownClass::Short,
        WellKnownClass::Integer,
        WellKnownClass::Long,
        WellKnownClass::Float,
        WellKnownClass::Double,
        WellKnownClass::Character,
        WellKnownClass::String,
        WellKnownClass::BigDecimal,
        WellKnownClass::List,
        WellKnownClass::Map,
        WellKnownClass::MapEntry,
        WellKnownClass::Iterable,
        WellKnownClass::Iterator,
        WellKnownClass::Collection,
        WellKnownClass::ArrayList,
        WellKnownClass::LinkedHashMap,
        WellKnownClass::BooleanArray,
        WellKnownClass::ByteArray,
        WellKnownClass::CharArray,
        WellKnownClass::ShortArray,
        WellKnownClass::IntArray,
        WellKnownClass::LongArray,
        WellKnownClass::FloatArray,
        WellKnownClass::DoubleArray,
        WellKnownClass::StringArray,
        WellKnownClass::ObjectArray,
        WellKnownClass::LocalDate,
        WellKnownClass::LocalTime,
        WellKnownClass::LocalDateTime,
        WellKnownClass::Member,
        WellKnownClass::PyObject,
    ];

    /// The fully-qualified JNI name this entry resolves
    pub fn jni_name(self) -> &'static str {
        match self {
            WellKnownClass::Object => "java/lang/Object",
            WellKnownClass::Number => "java/lang/Number",
            WellKnownClass::Boolean => "java/lang/Boolean",
            WellKnownClass::Byte => "java/lang/Byte",
            WellKnownClass::Short => "java/lang/Short",
            WellKnownClass::Integer => "java/lang/Integer",
            WellKnownClass::Long => "java/lang/Long",
            WellKnownClass::Float => "java/lang/Float",
            WellKnownClass::Double => "java/lang/Double",
            WellKnownClass::Character => "java/lang/Character",
            WellKnownClass::String => "java/lang/String",
            WellKnownClass::BigDecimal => "java/math/BigDecimal",
            WellKnownClass::List => "java/util/List",
            WellKnownClass::Map => "java/util/Map",
            WellKnownClass::MapEntry => "java/util/Map$Entry",
            WellKnownClass::Iterable => "java/lang/Iterable",
            WellKnownClass::Iterator => "java/util/Iterator",
            WellKnownClass::Collection => "java/util/Collection",
            WellKnownClass::ArrayList => "java/util/ArrayList",
            WellKnownClass::LinkedHashMap => "java/util/LinkedHashMap",
            WellKnownClass::BooleanArray => "[Z",
            WellKnownClass::ByteArray => "[B",
            WellKnownClass::CharArray => "[C",
            WellKnownClass::ShortArray => "[S",
            WellKnownClass::IntArray => "[I",
            WellKnownClass::LongArray => "[J",
            WellKnownClass::FloatArray => "[F",
            WellKnownClass::DoubleArray => "[D",
            WellKnownClass::StringArray => "[Ljava/lang/String;",
            WellKnownClass::ObjectArray => "[Ljava/lang/Object;",
            WellKnownClass::LocalDate => "java/time/LocalDate",
            WellKnownClass::LocalTime => "java/time/LocalTime",
            WellKnownClass::LocalDateTime => "java/time/LocalDateTime",
            WellKnownClass::Member => "java/lang/reflect/Member",
            WellKnownClass::PyObject => "jpybridge/core/PyObject",
        }
    }
}

// ============================================================================
// ClassCache
// ============================================================================

/// Cached method handles, resolved once at populate time.
#[derive(Debug, Clone, Copy)]
struct MethodTable {
    iterator: JMethodId,
    has_next: JMethodId,
    next: JMethodId,
    get_name: JMethodId,
    decimal_to_string: JMethodId,
    to_local_date: JMethodId,
    to_local_time: JMethodId,
    ldt_of: JMethodId,
}

#[derive(Debug)]
struct CacheInner {
    classes: FxHashMap<WellKnownClass, GlobalRef>,
    methods: MethodTable,
}

/// The process-wide class and method cache.
#[derive(Debug, Default)]
pub struct ClassCache {
    inner: Mutex<Option<CacheInner>>,
}

impl ClassCache {
    /// Create an empty, unpopulated cache
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, Option<CacheInner>> {
        // a poisoned cache is still structurally valid
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve and pin every well-known class and method handle.
    /// A second call on a populated cache is a no-op. Partial failure
    /// releases everything acquired so far before returning the error.
    pub fn populate(&self, jvm: &Jvm) -> BridgeResult<()> {
        let mut inner = self.locked();
        if inner.is_some() {
            return Ok(());
        }

        let mut classes = FxHashMap::default();
        for &entry in WellKnownClass::ALL {
            match jvm.find_class(entry.jni_name()) {
                Ok(class) => {
                    classes.insert(entry, jvm.new_global_ref(class));
                }
                Err(_) => {
                    self.release(jvm, classes);
                    return Err(BridgeError::unknown_class(entry.jni_name()));
                }
            }
        }

        let methods = match self.resolve_methods(jvm, &classes) {
            Ok(methods) => methods,
            Err(err) => {
                self.release(jvm, classes);
                return Err(err);
            }
        };

        *inner = Some(CacheInner { classes, methods });
        Ok(())
    }

    fn resolve_methods(
        &self,
        jvm: &Jvm,
        classes: &FxHashMap<WellKnownClass, GlobalRef>,
    ) -> BridgeResult<MethodTable> {
        let class = |entry: WellKnownClass| -> BridgeResult<JClass> {
            classes
                .get(&entry)
                .map(GlobalRef::class)
                .ok_or_else(|| BridgeError::unknown_class(entry.jni_name()))
        };
        let iterable = class(WellKnownClass::Iterable)?;
        let iterator = class(WellKnownClass::Iterator)?;
        let member = class(WellKnownClass::Member)?;
        let big_decimal = class(WellKnownClass::BigDecimal)?;
        let ldt = class(WellKnownClass::LocalDateTime)?;

        Ok(MethodTable {
            iterator: jvm.get_method_id(iterable, "iterator", "()Ljava/util/Iterator;")?,
            has_next: jvm.get_method_id(iterator, "hasNext", "()Z")?,
            next: jvm.get_method_id(iterator, "next", "()Ljava/lang/Object;")?,
            get_name: jvm.get_method_id(member, "getName", "()Ljava/lang/String;")?,
            decimal_to_string: jvm.get_method_id(big_decimal, "toString", "()Ljava/lang/String;")?,
            to_local_date: jvm.get_method_id(ldt, "toLocalDate", "()Ljava/time/LocalDate;")?,
            to_local_time: jvm.get_method_id(ldt, "toLocalTime", "()Ljava/time/LocalTime;")?,
            ldt_of: jvm.get_method_id(
                ldt,
                "of",
                "(Ljava/time/LocalDate;Ljava/time/LocalTime;)Ljava/time/LocalDateTime;",
            )?,
        })
    }

    fn release(&self, jvm: &Jvm, classes: FxHashMap<WellKnownClass, GlobalRef>) {
        for (_, global) in classes {
            jvm.delete_global_ref(global);
        }
    }

    /// Release every pinned reference. Safe to call repeatedly and safe
    /// on a cache that was never populated.
    pub fn teardown(&self, jvm: &Jvm) {
        if let Some(inner) = self.locked().take() {
            self.release(jvm, inner.classes);
        }
    }

    /// Whether populate has run
    pub fn is_populated(&self) -> bool {
        self.locked().is_some()
    }

    /// The pinned class handle for a table entry
    pub fn class(&self, entry: WellKnownClass) -> BridgeResult<JClass> {
        self.locked()
            .as_ref()
            .and_then(|inner| inner.classes.get(&entry).map(GlobalRef::class))
            .ok_or_else(|| BridgeError::unknown_class(entry.jni_name()))
    }

    fn methods(&self) -> BridgeResult<MethodTable> {
        self.locked()
            .as_ref()
            .map(|inner| inner.methods)
            .ok_or_else(|| BridgeError::unknown_class("<cache not populated>"))
    }

    /// `Iterable.iterator()`
    pub fn iterator_mid(&self) -> BridgeResult<JMethodId> {
        Ok(self.methods()?.iterator)
    }

    /// `Iterator.hasNext()`
    pub fn has_next_mid(&self) -> BridgeResult<JMethodId> {
        Ok(self.methods()?.has_next)
    }

    /// `Iterator.next()`
    pub fn next_mid(&self) -> BridgeResult<JMethodId> {
        Ok(self.methods()?.next)
    }

    /// `Member.getName()`
    pub fn get_name_mid(&self) -> BridgeResult<JMethodId> {
        Ok(self.methods()?.get_name)
    }

    /// `BigDecimal.toString()`
    pub fn decimal_to_string_mid(&self) -> BridgeResult<JMethodId> {
        Ok(self.methods()?.decimal_to_string)
    }

    /// `LocalDateTime.toLocalDate()`
    pub fn to_local_date_mid(&self) -> BridgeResult<JMethodId> {
        Ok(self.methods()?.to_local_date)
    }

    /// `LocalDateTime.toLocalTime()`
    pub fn to_local_time_mid(&self) -> BridgeResult<JMethodId> {
        Ok(self.methods()?.to_local_time)
    }

    /// Static `LocalDateTime.of(LocalDate, LocalTime)`
    pub fn ldt_of_mid(&self) -> BridgeResult<JMethodId> {
        Ok(self.methods()?.ldt_of)
    }
}
