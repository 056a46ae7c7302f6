use crate::HostBuffer;
use num::complex::{Complex32, Complex64};

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, Hash, strum_macros::EnumIter, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum DType {
    Bool,
    I32,
    I64,
    U32,
    #[default]
    F32,
    F64,
    C64,
    C128,
}

impl DType {
    pub fn is_float(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, DType::C64 | DType::C128)
    }
}

/// Element types that can live in a [`HostBuffer`].
pub trait ArrayDType: Copy + std::fmt::Debug + PartialEq + Send + Sync + 'static {
    fn dt() -> DType;

    fn zero() -> Self;

    fn one() -> Self;

    fn wrap(data: Vec<Self>) -> HostBuffer;

    fn slice_of(buffer: &HostBuffer) -> Option<&[Self]>;

    fn slice_of_mut(buffer: &mut HostBuffer) -> Option<&mut [Self]>;
}

macro_rules! map_type {
    ($t:ty, $v:ident, $zero:expr, $one:expr) => {
        impl ArrayDType for $t {
            fn dt() -> DType {
                DType::$v
            }

            fn zero() -> Self {
                $zero
            }

            fn one() -> Self {
                $one
            }

            fn wrap(data: Vec<Self>) -> HostBuffer {
                HostBuffer::$v(data)
            }

            fn slice_of(buffer: &HostBuffer) -> Option<&[Self]> {
                match buffer {
                    HostBuffer::$v(data) => Some(data),
                    _ => None,
                }
            }

            fn slice_of_mut(buffer: &mut HostBuffer) -> Option<&mut [Self]> {
                match buffer {
                    HostBuffer::$v(data) => Some(data),
                    _ => None,
                }
            }
        }
    };
}

map_type!(bool, Bool, false, true);
map_type!(i32, I32, 0, 1);
map_type!(i64, I64, 0, 1);
map_type!(u32, U32, 0, 1);
map_type!(f32, F32, 0.0, 1.0);
map_type!(f64, F64, 0.0, 1.0);
map_type!(Complex32, C64, Complex32::new(0.0, 0.0), Complex32::new(1.0, 0.0));
map_type!(Complex64, C128, Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0));

/// Binds `$T` to the element type of `$dt` and evaluates `$body`.
macro_rules! with_dtype {
    ($dt:expr, $T:ident => $body:expr) => {
        match $dt {
            $crate::DType::Bool => {
                type $T = bool;
                $body
            }
            $crate::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::DType::C64 => {
                type $T = ::num::complex::Complex32;
                $body
            }
            $crate::DType::C128 => {
                type $T = ::num::complex::Complex64;
                $body
            }
        }
    };
}

/// As [`with_dtype`], for the types that support arithmetic.
macro_rules! with_numeric_dtype {
    ($dt:expr, $T:ident => $body:expr, _ => $fallback:expr) => {
        match $dt {
            $crate::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::DType::C64 => {
                type $T = ::num::complex::Complex32;
                $body
            }
            $crate::DType::C128 => {
                type $T = ::num::complex::Complex64;
                $body
            }
            $crate::DType::Bool => $fallback,
        }
    };
}

macro_rules! with_float_dtype {
    ($dt:expr, $T:ident => $body:expr, _ => $fallback:expr) => {
        match $dt {
            $crate::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::DType::F64 => {
                type $T = f64;
                $body
            }
            _ => $fallback,
        }
    };
}

pub(crate) use with_dtype;
pub(crate) use with_float_dtype;
pub(crate) use with_numeric_dtype;

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_dispatch_matches_dt() {
        for dt in DType::iter() {
            let dispatched = with_dtype!(dt, T => <T as ArrayDType>::dt());
            assert_eq!(dispatched, dt);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(DType::C128.to_string(), "c128");
        assert_eq!(DType::F32.to_string(), "f32");
    }
}
