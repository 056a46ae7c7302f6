use crate::dtype::with_float_dtype;
use crate::{Array, ArrayDType, ArrayError, DType};
use num_traits::{Float, FloatConst};

/// Applies `f` to every element, producing a new array on the input's device.
fn unary_apply<T: ArrayDType, U: ArrayDType>(
    input: &Array,
    f: impl Fn(T) -> U,
) -> Result<Array, ArrayError> {
    let data = input.to_vec::<T>()?.into_iter().map(f).collect::<Vec<_>>();
    Array::from_data(data, input.shape().clone(), input.device().clone())
}

fn binary_apply<T: ArrayDType>(
    lhs: &Array,
    rhs: &Array,
    f: impl Fn(T, T) -> T,
) -> Result<Array, ArrayError> {
    if lhs.dt() != rhs.dt() {
        return Err(ArrayError::DTypeMismatch {
            expected: lhs.dt(),
            actual: rhs.dt(),
        });
    }
    if lhs.shape() != rhs.shape() {
        return Err(ArrayError::ShapeMismatch(
            lhs.shape().clone(),
            rhs.shape().clone(),
        ));
    }
    let (l, r) = (lhs.to_vec::<T>()?, rhs.to_vec::<T>()?);
    let data = l.into_iter().zip(r).map(|(a, b)| f(a, b)).collect::<Vec<_>>();
    Array::from_data(data, lhs.shape().clone(), lhs.device().clone())
}

/// Writes `result` into `out` when one is given.
fn store(result: Array, out: Option<&Array>) -> Result<Array, ArrayError> {
    match out {
        Some(out) => {
            out.copy_from(&result)?;
            Ok(out.clone())
        }
        None => Ok(result),
    }
}

macro_rules! impl_float_unary {
    ($name:ident, $op:expr) => {
        pub fn $name(x: &Array, out: Option<&Array>) -> Result<Array, ArrayError> {
            let result = with_float_dtype!(x.dt(), T => unary_apply::<T, T>(x, $op)?, _ => {
                return Err(ArrayError::UnsupportedDType { op: stringify!($name), dt: x.dt() })
            });
            store(result, out)
        }
    };
}

macro_rules! impl_float_binary {
    ($name:ident, $op:expr) => {
        pub fn $name(x1: &Array, x2: &Array, out: Option<&Array>) -> Result<Array, ArrayError> {
            let result = with_float_dtype!(x1.dt(), T => binary_apply::<T>(x1, x2, $op)?, _ => {
                return Err(ArrayError::UnsupportedDType { op: stringify!($name), dt: x1.dt() })
            });
            store(result, out)
        }
    };
}

impl_float_unary!(rad2deg, |x: T| x.to_degrees());
impl_float_unary!(deg2rad, |x: T| x.to_radians());
impl_float_binary!(logaddexp, logaddexp_of::<T>);
impl_float_binary!(logaddexp2, logaddexp2_of::<T>);
impl_float_binary!(hypot, |x: T, y: T| x.hypot(y));

/// `ln(exp(x) + exp(y))` without overflowing for large inputs.
fn logaddexp_of<T: Float + FloatConst>(x: T, y: T) -> T {
    if x == y {
        // Also covers equal infinities.
        return x + T::LN_2();
    }
    let tmp = x - y;
    if tmp > T::zero() {
        x + (-tmp).exp().ln_1p()
    } else if tmp <= T::zero() {
        y + tmp.exp().ln_1p()
    } else {
        tmp
    }
}

/// `log2(2^x + 2^y)` without overflowing for large inputs.
fn logaddexp2_of<T: Float + FloatConst>(x: T, y: T) -> T {
    if x == y {
        return x + T::one();
    }
    let tmp = x - y;
    if tmp > T::zero() {
        x + (-tmp).exp2().ln_1p() * T::LOG2_E()
    } else if tmp <= T::zero() {
        y + tmp.exp2().ln_1p() * T::LOG2_E()
    } else {
        tmp
    }
}

/// Splits every element into `(x - floor(x), floor(x))`.
///
/// `out1` and `out2` receive the fractional and integral parts respectively.
pub fn modf(
    x: &Array,
    out1: Option<&Array>,
    out2: Option<&Array>,
) -> Result<(Array, Array), ArrayError> {
    let (frac, int) = with_float_dtype!(x.dt(), T => (
        unary_apply::<T, T>(x, |v| v - v.floor())?,
        unary_apply::<T, T>(x, |v| v.floor())?,
    ), _ => {
        return Err(ArrayError::UnsupportedDType { op: "modf", dt: x.dt() })
    });
    Ok((store(frac, out1)?, store(int, out2)?))
}

fn sign_of<T: ArrayDType + PartialOrd + std::ops::Neg<Output = T>>(x: T) -> T {
    if x > T::zero() {
        T::one()
    } else if x < T::zero() {
        -T::one()
    } else {
        T::zero()
    }
}

/// `-1`, `0` or `1` according to the sign of each element. NaN maps to `0`.
pub fn sign(x: &Array, out: Option<&Array>) -> Result<Array, ArrayError> {
    let result = match x.dt() {
        DType::I32 => unary_apply(x, sign_of::<i32>)?,
        DType::I64 => unary_apply(x, sign_of::<i64>)?,
        DType::F32 => unary_apply(x, sign_of::<f32>)?,
        DType::F64 => unary_apply(x, sign_of::<f64>)?,
        dt => return Err(ArrayError::UnsupportedDType { op: "sign", dt }),
    };
    store(result, out)
}

/// A `Bool` array that is `true` where the element is below zero.
pub fn signbit(x: &Array, out: Option<&Array>) -> Result<Array, ArrayError> {
    let result = match x.dt() {
        DType::I32 => unary_apply(x, |v: i32| v < 0)?,
        DType::I64 => unary_apply(x, |v: i64| v < 0)?,
        DType::U32 => unary_apply(x, |_: u32| false)?,
        DType::F32 => unary_apply(x, |v: f32| v < 0.0)?,
        DType::F64 => unary_apply(x, |v: f64| v < 0.0)?,
        dt => return Err(ArrayError::UnsupportedDType { op: "signbit", dt }),
    };
    store(result, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{shape, zeros, Device};
    use proptest::prelude::*;
    use test_strategy::proptest;

    fn vector<T: ArrayDType>(data: &[T]) -> Array {
        Array::from_data(data, shape![data.len()], Device::Host).unwrap()
    }

    #[test]
    fn test_angles() {
        let x = vector(&[0.0f64, std::f64::consts::PI, -std::f64::consts::FRAC_PI_2]);
        let degrees = rad2deg(&x, None).unwrap().to_vec::<f64>().unwrap();
        for (d, e) in degrees.iter().zip([0.0, 180.0, -90.0]) {
            assert!((d - e).abs() < 1e-9);
        }
        let back = deg2rad(&vector(&degrees), None).unwrap().to_vec::<f64>().unwrap();
        for (b, e) in back.iter().zip(x.to_vec::<f64>().unwrap()) {
            assert!((b - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_integers() {
        let x = vector(&[1i32, 2]);
        assert!(matches!(
            rad2deg(&x, None),
            Err(ArrayError::UnsupportedDType { op: "rad2deg", .. })
        ));
        assert!(matches!(
            hypot(&x, &x, None),
            Err(ArrayError::UnsupportedDType { op: "hypot", .. })
        ));
    }

    #[test]
    fn test_logaddexp_is_stable() {
        let x = vector(&[1000.0f64, -1000.0, 0.0, f64::NEG_INFINITY]);
        let y = vector(&[1000.0f64, -1001.0, 0.0, 2.0]);
        let out = logaddexp(&x, &y, None).unwrap().to_vec::<f64>().unwrap();
        assert!((out[0] - (1000.0 + std::f64::consts::LN_2)).abs() < 1e-9);
        assert!((out[1] - (-1000.0 + (-1.0f64).exp().ln_1p())).abs() < 1e-9);
        assert!((out[2] - std::f64::consts::LN_2).abs() < 1e-12);
        assert_eq!(out[3], 2.0);
    }

    #[test]
    fn test_logaddexp2() {
        let x = vector(&[3.0f32, 1.0]);
        let y = vector(&[3.0f32, 2.0]);
        let out = logaddexp2(&x, &y, None).unwrap().to_vec::<f32>().unwrap();
        assert_eq!(out[0], 4.0);
        assert!((out[1] - 6.0f32.log2()).abs() < 1e-5);
    }

    #[test]
    fn test_binary_validation() {
        let x = vector(&[3.0f32, 1.0]);
        let y = vector(&[3.0f32, 1.0, 2.0]);
        assert!(matches!(
            hypot(&x, &y, None),
            Err(ArrayError::ShapeMismatch(_, _))
        ));
        let z = vector(&[3.0f64, 1.0]);
        assert!(matches!(
            hypot(&x, &z, None),
            Err(ArrayError::DTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_hypot_into_out() {
        let x = vector(&[3.0f32, 5.0]);
        let y = vector(&[4.0f32, 12.0]);
        let out = zeros(shape![2], DType::F32, Device::Host);
        let result = hypot(&x, &y, Some(&out)).unwrap();
        assert!(result.shares_storage(&out));
        assert_eq!(out.to_vec::<f32>().unwrap(), vec![5.0, 13.0]);

        let wrong = zeros(shape![3], DType::F32, Device::Host);
        assert!(hypot(&x, &y, Some(&wrong)).is_err());
    }

    #[test]
    fn test_modf() {
        let x = vector(&[2.5f64, -1.25, 3.0]);
        let (frac, int) = modf(&x, None, None).unwrap();
        assert_eq!(frac.to_vec::<f64>().unwrap(), vec![0.5, 0.75, 0.0]);
        assert_eq!(int.to_vec::<f64>().unwrap(), vec![2.0, -2.0, 3.0]);

        let out2 = zeros(shape![3], DType::F64, Device::Host);
        let (_, int) = modf(&x, None, Some(&out2)).unwrap();
        assert!(int.shares_storage(&out2));
    }

    #[test]
    fn test_sign() {
        let ints = sign(&vector(&[-7i64, 0, 3]), None).unwrap();
        assert_eq!(ints.to_vec::<i64>().unwrap(), vec![-1, 0, 1]);

        let floats = sign(&vector(&[-0.5f32, -0.0, f32::NAN, 2.0]), None).unwrap();
        assert_eq!(floats.to_vec::<f32>().unwrap(), vec![-1.0, 0.0, 0.0, 1.0]);

        assert!(matches!(
            sign(&vector(&[1u32]), None),
            Err(ArrayError::UnsupportedDType { op: "sign", .. })
        ));
    }

    #[test]
    fn test_signbit() {
        let bits = signbit(&vector(&[-1.0f64, -0.0, 0.0, 4.0]), None).unwrap();
        assert_eq!(bits.dt(), DType::Bool);
        assert_eq!(bits.to_vec::<bool>().unwrap(), vec![true, false, false, false]);

        let unsigned = signbit(&vector(&[0u32, 9]), None).unwrap();
        assert_eq!(unsigned.to_vec::<bool>().unwrap(), vec![false, false]);
    }

    #[test]
    fn test_keeps_view_order() {
        let a = Array::from_data([1.0f32, -2.0, 3.0, -4.0], shape![2, 2], Device::Host).unwrap();
        let diag = a.diagonal(0).unwrap();
        let out = sign(&diag, None).unwrap();
        assert_eq!(out.to_vec::<f32>().unwrap(), vec![1.0, -1.0]);
    }

    #[proptest(cases = 64)]
    fn test_modf_reconstructs(
        #[strategy(proptest::collection::vec(-1e6f64..1e6, 1..16))] values: Vec<f64>,
    ) {
        let (frac, int) = modf(&vector(&values), None, None).unwrap();
        let (frac, int) = (frac.to_vec::<f64>().unwrap(), int.to_vec::<f64>().unwrap());
        for ((x, f), i) in values.iter().zip(&frac).zip(&int) {
            prop_assert!(*f >= 0.0 && *f <= 1.0);
            prop_assert_eq!(*i, x.floor());
            prop_assert!((f + i - x).abs() < 1e-9);
        }
    }

    #[proptest(cases = 64)]
    fn test_logaddexp_matches_naive(
        #[strategy(-30.0f64..30.0)] x: f64,
        #[strategy(-30.0f64..30.0)] y: f64,
    ) {
        let out = logaddexp(&vector(&[x]), &vector(&[y]), None).unwrap();
        let naive = (x.exp() + y.exp()).ln();
        prop_assert!((out.to_vec::<f64>().unwrap()[0] - naive).abs() < 1e-9);
    }
}
