//! Bulk Primitive-Array Fast Path
//!
//! One-dimensional `numpy.ndarray` ↔ Java primitive array, moved as a
//! single region copy per direction instead of element-by-element
//! boxing. [`NdArray`] holds the element buffer in its wire form: a
//! contiguous little-endian byte vector plus a [`DType`] tag, the same
//! layout a C-contiguous ndarray exposes through the buffer protocol.
//!
//! The fast path is gated on numpy being importable in the embedded
//! interpreter. The probe result is process-wide; when numpy is absent
//! the conversion fails with a configuration error rather than falling
//! back to a silent elementwise copy.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use jpy_jvm::{JRef, Jvm};

use crate::error::{BridgeError, BridgeResult};

// ============================================================================
// numpy availability gate
// ============================================================================

// The model's import probe always succeeds; embeddings and tests flip
// the flag to exercise the unavailable path.
static NUMPY_AVAILABLE: AtomicBool = AtomicBool::new(true);

/// Whether the bulk fast path is usable in this process
pub fn numpy_available() -> bool {
    NUMPY_AVAILABLE.load(Ordering::Acquire)
}

/// Override the probe result (embedding startup and tests)
pub fn set_numpy_available(available: bool) {
    NUMPY_AVAILABLE.store(available, Ordering::Release);
}

fn ensure_numpy() -> BridgeResult<()> {
    if numpy_available() {
        Ok(())
    } else {
        Err(BridgeError::numpy_unavailable(
            "numpy is not importable in the embedded interpreter",
        ))
    }
}

// ============================================================================
// DType
// ============================================================================

/// Element type of an ndarray, matching the Java primitive widths the
/// fast path covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    /// `numpy.bool_` / `boolean[]`
    Bool,
    /// `numpy.int8` / `byte[]`
    Int8,
    /// `numpy.int16` / `short[]`
    Int16,
    /// `numpy.int32` / `int[]`
    Int32,
    /// `numpy.int64` / `long[]`
    Int64,
    /// `numpy.float32` / `float[]`
    Float32,
    /// `numpy.float64` / `double[]`
    Float64,
}

impl DType {
    /// Bytes per element
    pub fn itemsize(self) -> usize {
        match self {
            DType::Bool | DType::Int8 => 1,
            DType::Int16 => 2,
            DType::Int32 | DType::Float32 => 4,
            DType::Int64 | DType::Float64 => 8,
        }
    }

    /// The numpy dtype name
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// NdArray
// ============================================================================

/// A one-dimensional typed array. Clones share the buffer, matching
/// ndarray reference semantics on the interpreter heap.
#[derive(Debug, Clone)]
pub struct NdArray {
    dtype: DType,
    len: usize,
    data: Rc<RefCell<Vec<u8>>>,
}

impl NdArray {
    fn from_bytes(dtype: DType, len: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), len * dtype.itemsize());
        Self {
            dtype,
            len,
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// Build a `bool` array
    pub fn from_bool(values: &[bool]) -> Self {
        let data = values.iter().map(|&b| b as u8).collect();
        Self::from_bytes(DType::Bool, values.len(), data)
    }

    /// Build an `int8` array
    pub fn from_i8(values: &[i8]) -> Self {
        let data = values.iter().map(|&v| v as u8).collect();
        Self::from_bytes(DType::Int8, values.len(), data)
    }

    /// Build an `int16` array
    pub fn from_i16(values: &[i16]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::from_bytes(DType::Int16, values.len(), data)
    }

    /// Build an `int32` array
    pub fn from_i32(values: &[i32]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::from_bytes(DType::Int32, values.len(), data)
    }

    /// Build an `int64` array
    pub fn from_i64(values: &[i64]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::from_bytes(DType::Int64, values.len(), data)
    }

    /// Build a `float32` array
    pub fn from_f32(values: &[f32]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::from_bytes(DType::Float32, values.len(), data)
    }

    /// Build a `float64` array
    pub fn from_f64(values: &[f64]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::from_bytes(DType::Float64, values.len(), data)
    }

    /// Element type
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn expect_dtype(&self, dtype: DType) -> BridgeResult<()> {
        if self.dtype == dtype {
            Ok(())
        } else {
            Err(BridgeError::type_mismatch(
                format!("ndarray[{dtype}]"),
                format!("ndarray[{}]", self.dtype),
            ))
        }
    }

    /// Decode as `bool` elements
    pub fn to_bool(&self) -> BridgeResult<Vec<bool>> {
        self.expect_dtype(DType::Bool)?;
        Ok(self.data.borrow().iter().map(|&b| b != 0).collect())
    }

    /// Decode as `int8` elements
    pub fn to_i8(&self) -> BridgeResult<Vec<i8>> {
        self.expect_dtype(DType::Int8)?;
        Ok(self.data.borrow().iter().map(|&b| b as i8).collect())
    }

    /// Decode as `int16` elements
    pub fn to_i16(&self) -> BridgeResult<Vec<i16>> {
        self.expect_dtype(DType::Int16)?;
        Ok(decode(&self.data.borrow(), i16::from_le_bytes))
    }

    /// Decode as `int32` elements
    pub fn to_i32(&self) -> BridgeResult<Vec<i32>> {
        self.expect_dtype(DType::Int32)?;
        Ok(decode(&self.data.borrow(), i32::from_le_bytes))
    }

    /// Decode as `int64` elements
    pub fn to_i64(&self) -> BridgeResult<Vec<i64>> {
        self.expect_dtype(DType::Int64)?;
        Ok(decode(&self.data.borrow(), i64::from_le_bytes))
    }

    /// Decode as `float32` elements
    pub fn to_f32(&self) -> BridgeResult<Vec<f32>> {
        self.expect_dtype(DType::Float32)?;
        Ok(decode(&self.data.borrow(), f32::from_le_bytes))
    }

    /// Decode as `float64` elements
    pub fn to_f64(&self) -> BridgeResult<Vec<f64>> {
        self.expect_dtype(DType::Float64)?;
        Ok(decode(&self.data.borrow(), f64::from_le_bytes))
    }
}

impl PartialEq for NdArray {
    fn eq(&self, other: &Self) -> bool {
        self.dtype == other.dtype && *self.data.borrow() == *other.data.borrow()
    }
}

fn decode<const N: usize, T>(bytes: &[u8], from_le: impl Fn([u8; N]) -> T) -> Vec<T> {
    bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut buf = [0u8; N];
            buf.copy_from_slice(chunk);
            from_le(buf)
        })
        .collect()
}

// ============================================================================
// Fast-path conversions
// ============================================================================

/// Copy a Java primitive array into an ndarray: one `GetArrayLength`,
/// then a full-range region read.
pub fn py_ndarray_from_jarray(jvm: &Jvm, obj: &JRef) -> BridgeResult<NdArray> {
    ensure_numpy()?;
    let len = jvm.array_length(obj)?;
    let class = jvm.get_object_class(obj)?;
    let array = match jvm.class_name(class).as_str() {
        "[Z" => NdArray::from_bool(&jvm.boolean_array_region(obj)?),
        "[B" => NdArray::from_i8(&jvm.byte_array_region(obj)?),
        "[S" => NdArray::from_i16(&jvm.short_array_region(obj)?),
        "[I" => NdArray::from_i32(&jvm.int_array_region(obj)?),
        "[J" => NdArray::from_i64(&jvm.long_array_region(obj)?),
        "[F" => NdArray::from_f32(&jvm.float_array_region(obj)?),
        "[D" => NdArray::from_f64(&jvm.double_array_region(obj)?),
        other => {
            return Err(BridgeError::type_mismatch(
                "numeric primitive array",
                other.to_string(),
            ))
        }
    };
    debug_assert_eq!(array.len(), len);
    Ok(array)
}

/// Copy an ndarray into a freshly allocated Java primitive array of the
/// matching component type, in one region write.
pub fn jarray_from_py_ndarray(jvm: &Jvm, array: &NdArray) -> BridgeResult<JRef> {
    ensure_numpy()?;
    Ok(match array.dtype() {
        DType::Bool => jvm.new_boolean_array(array.to_bool()?),
        DType::Int8 => jvm.new_byte_array(array.to_i8()?),
        DType::Int16 => jvm.new_short_array(array.to_i16()?),
        DType::Int32 => jvm.new_int_array(array.to_i32()?),
        DType::Int64 => jvm.new_long_array(array.to_i64()?),
        DType::Float32 => jvm.new_float_array(array.to_f32()?),
        DType::Float64 => jvm.new_double_array(array.to_f64()?),
    })
}
