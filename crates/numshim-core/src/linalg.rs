use crate::dtype::with_numeric_dtype;
use crate::{empty, shape, Array, ArrayDType, ArrayError, DType, Device};
use ndarray::{ArrayD, Ix1, Ix2, LinalgScalar};

fn check_same_dt(lhs: &Array, rhs: &Array) -> Result<(), ArrayError> {
    if lhs.dt() != rhs.dt() {
        return Err(ArrayError::DTypeMismatch {
            expected: lhs.dt(),
            actual: rhs.dt(),
        });
    }
    Ok(())
}

/// Inner, vector-matrix, matrix-vector or matrix product of 1-D and 2-D operands.
///
/// If either operand is accelerated, both are flagged for its bridge and announced with
/// [`crate::Bridge::handle_array`] before the product is computed on the host. The result
/// lives on the accelerated device.
pub fn dot(lhs: &Array, rhs: &Array) -> Result<Array, ArrayError> {
    check_same_dt(lhs, rhs)?;
    let device = Device::select_accelerated([lhs.device(), rhs.device()]);
    if let Some(device) = &device {
        let bridge = device.try_bridge()?;
        log::debug!(
            "Announcing dot operands {:?} and {:?} to bridge {}",
            lhs.shape(),
            rhs.shape(),
            bridge.name()
        );
        bridge.handle_array(&lhs.with_device(device.clone()))?;
        bridge.handle_array(&rhs.with_device(device.clone()))?;
    }
    let result = with_numeric_dtype!(lhs.dt(), T => host_dot::<T>(lhs, rhs)?, _ => {
        return Err(ArrayError::UnsupportedDType { op: "dot", dt: lhs.dt() })
    });
    Ok(result.with_device(device.unwrap_or_default()))
}

fn host_dot<T: ArrayDType + LinalgScalar>(
    lhs: &Array,
    rhs: &Array,
) -> Result<Array, ArrayError> {
    let (a, b) = (lhs.to_ndarray::<T>()?, rhs.to_ndarray::<T>()?);
    let inner = match (a.ndim(), b.ndim()) {
        (1, _) | (2, _) => a.shape()[a.ndim() - 1],
        _ => 0,
    };
    if matches!(a.ndim(), 1 | 2) && matches!(b.ndim(), 1 | 2) && b.shape()[0] != inner {
        return Err(ArrayError::ShapeMismatch(
            lhs.shape().clone(),
            rhs.shape().clone(),
        ));
    }

    let out: ArrayD<T> = match (a.ndim(), b.ndim()) {
        (1, 1) => {
            let (a, b) = (a.into_dimensionality::<Ix1>()?, b.into_dimensionality::<Ix1>()?);
            ndarray::arr0(a.dot(&b)).into_dyn()
        }
        (1, 2) => {
            let (a, b) = (a.into_dimensionality::<Ix1>()?, b.into_dimensionality::<Ix2>()?);
            a.dot(&b).into_dyn()
        }
        (2, 1) => {
            let (a, b) = (a.into_dimensionality::<Ix2>()?, b.into_dimensionality::<Ix1>()?);
            a.dot(&b).into_dyn()
        }
        (2, 2) => {
            let (a, b) = (a.into_dimensionality::<Ix2>()?, b.into_dimensionality::<Ix2>()?);
            a.dot(&b).into_dyn()
        }
        (l, r) => {
            return Err(ArrayError::Unsupported(format!(
                "dot of {}-D and {}-D arrays",
                l, r
            )))
        }
    };
    Ok(Array::from(out))
}

/// Matrix product of two 2-D arrays of the same dtype.
///
/// If either operand is accelerated, both are flagged for the same bridge and the bridge
/// writes the product into a freshly allocated `(m, n)` array.
pub fn matmul(lhs: &Array, rhs: &Array) -> Result<Array, ArrayError> {
    check_same_dt(lhs, rhs)?;
    for operand in [lhs, rhs] {
        if operand.rank() != 2 {
            return Err(ArrayError::RankMismatch {
                expected: 2,
                actual: operand.rank(),
            });
        }
    }
    let (m, k, n) = (lhs.shape()[0], lhs.shape()[1], rhs.shape()[1]);
    if rhs.shape()[0] != k {
        return Err(ArrayError::ShapeMismatch(
            lhs.shape().clone(),
            rhs.shape().clone(),
        ));
    }

    match Device::select_accelerated([lhs.device(), rhs.device()]) {
        Some(device) => {
            let bridge = device.try_bridge()?.clone();
            let (lhs, rhs) = (lhs.with_device(device.clone()), rhs.with_device(device.clone()));
            let dst = empty(shape![m, n], lhs.dt(), device);
            log::debug!(
                "Dispatching {:?} x {:?} matmul to bridge {}",
                lhs.shape(),
                rhs.shape(),
                bridge.name()
            );
            bridge.matmul(&lhs, &rhs, &dst)?;
            Ok(dst)
        }
        None => with_numeric_dtype!(lhs.dt(), T => host_matmul::<T>(lhs, rhs), _ => {
            Err(ArrayError::UnsupportedDType { op: "matmul", dt: lhs.dt() })
        }),
    }
}

fn host_matmul<T: ArrayDType + LinalgScalar>(
    lhs: &Array,
    rhs: &Array,
) -> Result<Array, ArrayError> {
    let a = lhs.to_ndarray::<T>()?.into_dimensionality::<Ix2>()?;
    let b = rhs.to_ndarray::<T>()?.into_dimensionality::<Ix2>()?;
    Ok(Array::from(a.dot(&b).into_dyn()))
}

/// LU factorization of a square floating point matrix.
///
/// Returns the packed `LU` factors and the `I32` pivot vector. Only accelerated arrays are
/// supported; there is no host implementation.
pub fn lu(a: &Array) -> Result<(Array, Array), ArrayError> {
    if !a.dt().is_float() {
        return Err(ArrayError::UnsupportedDType {
            op: "lu",
            dt: a.dt(),
        });
    }
    if a.rank() != 2 || a.shape()[0] != a.shape()[1] {
        return Err(ArrayError::NotSquare(a.shape().clone()));
    }
    let bridge = match a.device() {
        Device::Accelerated(bridge) => bridge,
        Device::Host => {
            return Err(ArrayError::Unsupported(
                "LU factorization requires an accelerated array".to_string(),
            ))
        }
    };

    let lu = a.deep_clone();
    let pivots = empty(shape![a.shape()[0]], DType::I32, a.device().clone());
    log::debug!("Dispatching {:?} lu to bridge {}", a.shape(), bridge.name());
    bridge.lu(&lu, &pivots)?;
    Ok((lu, pivots))
}
