//! Class Descriptors and the Class Registry
//!
//! Classes and method identifiers are opaque, copyable handles, the way
//! `jclass` and `jmethodID` are opaque pointers in JNI. The registry maps
//! fully-qualified JNI names to descriptors and records the supertype
//! closure consulted by `is_instance_of`.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::error::{JvmError, JvmResult};

/// Opaque class descriptor handle. Cheap to copy, valid for the process
/// lifetime once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JClass(pub(crate) u32);

/// Opaque method identifier, keyed by (declaring class, name, signature).
/// Never released individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JMethodId {
    pub(crate) class: JClass,
    pub(crate) slot: u32,
}

impl JMethodId {
    /// The declaring class of this method
    pub fn declaring_class(&self) -> JClass {
        self.class
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MethodDesc {
    pub(crate) name: SmolStr,
    pub(crate) signature: SmolStr,
}

#[derive(Debug)]
pub(crate) struct ClassDesc {
    pub(crate) name: SmolStr,
    /// Transitive supertype closure, including interfaces
    pub(crate) supers: Vec<JClass>,
    pub(crate) methods: Vec<MethodDesc>,
}

/// The class registry: name → descriptor, plus method tables.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    by_name: FxHashMap<SmolStr, JClass>,
    classes: Vec<ClassDesc>,
}

impl Registry {
    /// Register a class with the given direct supertypes (by name). The
    /// supertype closure is resolved eagerly, so supertypes must already
    /// be registered. Re-registering a name returns the existing handle.
    pub(crate) fn register(&mut self, name: &str, supers: &[&str]) -> JvmResult<JClass> {
        if let Some(&existing) = self.by_name.get(name) {
            return Ok(existing);
        }
        let mut closure = Vec::new();
        for sup in supers {
            let sup_class = self
                .by_name
                .get(*sup)
                .copied()
                .ok_or_else(|| JvmError::class_not_found(*sup))?;
            if !closure.contains(&sup_class) {
                closure.push(sup_class);
            }
            for &indirect in &self.classes[sup_class.0 as usize].supers {
                if !closure.contains(&indirect) {
                    closure.push(indirect);
                }
            }
        }
        let id = JClass(self.classes.len() as u32);
        self.classes.push(ClassDesc {
            name: SmolStr::new(name),
            supers: closure,
            methods: Vec::new(),
        });
        self.by_name.insert(SmolStr::new(name), id);
        Ok(id)
    }

    /// Declare a method on a registered class.
    pub(crate) fn declare_method(&mut self, class: JClass, name: &str, signature: &str) {
        self.classes[class.0 as usize].methods.push(MethodDesc {
            name: SmolStr::new(name),
            signature: SmolStr::new(signature),
        });
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<JClass> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn name_of(&self, class: JClass) -> SmolStr {
        self.classes[class.0 as usize].name.clone()
    }

    /// `class` is `of` or lists `of` in its supertype closure.
    pub(crate) fn is_assignable(&self, class: JClass, of: JClass) -> bool {
        class == of || self.classes[class.0 as usize].supers.contains(&of)
    }

    /// Resolve a method on the class or any supertype, walking the same
    /// order JNI's `GetMethodID` does (the class itself first).
    pub(crate) fn method_id(
        &self,
        class: JClass,
        name: &str,
        signature: &str,
    ) -> JvmResult<JMethodId> {
        let candidates =
            std::iter::once(class).chain(self.classes[class.0 as usize].supers.iter().copied());
        for candidate in candidates {
            let desc = &self.classes[candidate.0 as usize];
            for (slot, method) in desc.methods.iter().enumerate() {
                if method.name == name && method.signature == signature {
                    return Ok(JMethodId {
                        class: candidate,
                        slot: slot as u32,
                    });
                }
            }
        }
        Err(JvmError::no_such_method(
            self.name_of(class),
            name,
            signature,
        ))
    }

    pub(crate) fn method_name(&self, mid: JMethodId) -> SmolStr {
        self.classes[mid.class.0 as usize].methods[mid.slot as usize]
            .name
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut reg = Registry::default();
        let object = reg.register("java/lang/Object", &[]).unwrap();
        let number = reg.register("java/lang/Number", &["java/lang/Object"]).unwrap();
        let integer = reg
            .register("java/lang/Integer", &["java/lang/Number"])
            .unwrap();

        assert_eq!(reg.lookup("java/lang/Integer"), Some(integer));
        assert_eq!(reg.lookup("java/lang/Missing"), None);

        // transitive closure: Integer <: Number <: Object
        assert!(reg.is_assignable(integer, number));
        assert!(reg.is_assignable(integer, object));
        assert!(!reg.is_assignable(number, integer));
    }

    #[test]
    fn register_is_idempotent() {
        let mut reg = Registry::default();
        let a = reg.register("java/lang/Object", &[]).unwrap();
        let b = reg.register("java/lang/Object", &[]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn method_resolution_walks_supertypes() {
        let mut reg = Registry::default();
        let object = reg.register("java/lang/Object", &[]).unwrap();
        reg.declare_method(object, "toString", "()Ljava/lang/String;");
        let sub = reg.register("java/util/ArrayList", &["java/lang/Object"]).unwrap();

        let mid = reg.method_id(sub, "toString", "()Ljava/lang/String;").unwrap();
        assert_eq!(mid.declaring_class(), object);
        assert_eq!(reg.method_name(mid), "toString");

        let err = reg.method_id(sub, "missing", "()V").unwrap_err();
        assert!(matches!(err, JvmError::NoSuchMethod { .. }));
    }
}
