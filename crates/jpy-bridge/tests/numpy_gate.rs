//! The numpy availability gate is process-wide state, so this test
//! lives in its own binary: nothing else here converts arrays while the
//! gate is flipped.

use jpy_bridge::ndarray::{
    jarray_from_py_ndarray, py_ndarray_from_jarray, set_numpy_available,
};
use jpy_bridge::{BridgeError, NdArray};
use jpy_jvm::Jvm;

#[test]
fn conversions_fail_cleanly_without_numpy() {
    let jvm = Jvm::new();
    let jarr = jvm.new_double_array(vec![1.0, 2.0]);
    let ndarr = NdArray::from_i32(&[1, 2, 3]);

    set_numpy_available(false);
    let from_err = py_ndarray_from_jarray(&jvm, &jarr).unwrap_err();
    let to_err = jarray_from_py_ndarray(&jvm, &ndarr).unwrap_err();
    set_numpy_available(true);

    assert!(matches!(from_err, BridgeError::NumpyUnavailable { .. }));
    assert!(from_err.is_config_error());
    assert!(matches!(to_err, BridgeError::NumpyUnavailable { .. }));

    // the gate restores, and conversions work again
    let arr = py_ndarray_from_jarray(&jvm, &jarr).unwrap();
    assert_eq!(arr.len(), 2);
}
