//! Numeric Range Descriptors
//!
//! One descriptor per boxed Java numeric width. The minimum of each
//! signed width is derived from its maximum as `-MAX - 1`, which is
//! exact for two's complement and avoids writing the asymmetric
//! constant twice.

/// Largest `java.lang.Byte` value
pub const JBYTE_MAX: i64 = 127;
/// Smallest `java.lang.Byte` value
pub const JBYTE_MIN: i64 = -JBYTE_MAX - 1;

/// Largest `java.lang.Short` value
pub const JSHORT_MAX: i64 = 32_767;
/// Smallest `java.lang.Short` value
pub const JSHORT_MIN: i64 = -JSHORT_MAX - 1;

/// Largest `java.lang.Integer` value
pub const JINT_MAX: i64 = 2_147_483_647;
/// Smallest `java.lang.Integer` value
pub const JINT_MIN: i64 = -JINT_MAX - 1;

/// Largest `java.lang.Long` value
pub const JLONG_MAX: i64 = 9_223_372_036_854_775_807;
/// Smallest `java.lang.Long` value
pub const JLONG_MIN: i64 = -JLONG_MAX - 1;

/// Largest `char` value; the only unsigned Java scalar, so its minimum
/// is zero and is not derived
pub const JCHAR_MAX: i64 = 65_535;

/// Largest finite `java.lang.Float` value
pub const JFLOAT_MAX: f64 = f32::MAX as f64;
/// Smallest finite `java.lang.Float` value
pub const JFLOAT_MIN: f64 = -JFLOAT_MAX;

/// Signed integral widths of the boxed Java numeric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    /// 8-bit `java.lang.Byte`
    Byte,
    /// 16-bit `java.lang.Short`
    Short,
    /// 32-bit `java.lang.Integer`
    Int,
    /// 64-bit `java.lang.Long`
    Long,
}

impl IntWidth {
    /// Inclusive maximum of this width
    pub fn max(self) -> i64 {
        match self {
            IntWidth::Byte => JBYTE_MAX,
            IntWidth::Short => JSHORT_MAX,
            IntWidth::Int => JINT_MAX,
            IntWidth::Long => JLONG_MAX,
        }
    }

    /// Inclusive minimum of this width
    pub fn min(self) -> i64 {
        -self.max() - 1
    }

    /// Whether a value is representable at this width without wrapping
    pub fn contains(self, value: i64) -> bool {
        value >= self.min() && value <= self.max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_minimums() {
        assert_eq!(JBYTE_MIN, i64::from(i8::MIN));
        assert_eq!(JSHORT_MIN, i64::from(i16::MIN));
        assert_eq!(JINT_MIN, i64::from(i32::MIN));
        assert_eq!(JLONG_MIN, i64::MIN);
        assert_eq!(JLONG_MAX, i64::MAX);
    }

    #[test]
    fn width_ranges() {
        assert!(IntWidth::Byte.contains(127));
        assert!(!IntWidth::Byte.contains(128));
        assert!(IntWidth::Byte.contains(-128));
        assert!(!IntWidth::Byte.contains(-129));
        assert!(IntWidth::Long.contains(i64::MIN));
    }
}
