use crate::dtype::with_dtype;
use crate::{ArrayDType, DType};
use num::complex::{Complex32, Complex64};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Typed, contiguous element storage on the host.
#[derive(Clone, Debug, PartialEq)]
pub enum HostBuffer {
    Bool(Vec<bool>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C64(Vec<Complex32>),
    C128(Vec<Complex64>),
}

macro_rules! map_buffer {
    ($buffer:expr, $data:ident => $body:expr) => {
        match $buffer {
            HostBuffer::Bool($data) => HostBuffer::Bool($body),
            HostBuffer::I32($data) => HostBuffer::I32($body),
            HostBuffer::I64($data) => HostBuffer::I64($body),
            HostBuffer::U32($data) => HostBuffer::U32($body),
            HostBuffer::F32($data) => HostBuffer::F32($body),
            HostBuffer::F64($data) => HostBuffer::F64($body),
            HostBuffer::C64($data) => HostBuffer::C64($body),
            HostBuffer::C128($data) => HostBuffer::C128($body),
        }
    };
}

impl HostBuffer {
    fn filled<T: ArrayDType>(value: T, len: usize) -> Self {
        T::wrap(vec![value; len])
    }

    pub fn zeros(dt: DType, len: usize) -> Self {
        with_dtype!(dt, T => Self::filled(<T as ArrayDType>::zero(), len))
    }

    pub fn ones(dt: DType, len: usize) -> Self {
        with_dtype!(dt, T => Self::filled(<T as ArrayDType>::one(), len))
    }

    pub fn dt(&self) -> DType {
        match self {
            HostBuffer::Bool(_) => DType::Bool,
            HostBuffer::I32(_) => DType::I32,
            HostBuffer::I64(_) => DType::I64,
            HostBuffer::U32(_) => DType::U32,
            HostBuffer::F32(_) => DType::F32,
            HostBuffer::F64(_) => DType::F64,
            HostBuffer::C64(_) => DType::C64,
            HostBuffer::C128(_) => DType::C128,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            HostBuffer::Bool(data) => data.len(),
            HostBuffer::I32(data) => data.len(),
            HostBuffer::I64(data) => data.len(),
            HostBuffer::U32(data) => data.len(),
            HostBuffer::F32(data) => data.len(),
            HostBuffer::F64(data) => data.len(),
            HostBuffer::C64(data) => data.len(),
            HostBuffer::C128(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the elements at `offsets`, in order, into a new contiguous buffer.
    pub fn gather(&self, offsets: impl Iterator<Item = usize>) -> HostBuffer {
        map_buffer!(self, data => offsets.map(|i| data[i]).collect())
    }
}

/// Reference counted storage shared by an array and all of its views.
#[derive(Clone, Debug)]
pub struct Storage(Arc<RwLock<HostBuffer>>);

impl Storage {
    pub fn new(buffer: HostBuffer) -> Self {
        Self(Arc::new(RwLock::new(buffer)))
    }

    pub fn read(&self) -> RwLockReadGuard<HostBuffer> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<HostBuffer> {
        self.0.write()
    }

    pub fn ptr_eq(&self, other: &Storage) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_zeros_and_ones() {
        for dt in DType::iter() {
            let zeros = HostBuffer::zeros(dt, 3);
            let ones = HostBuffer::ones(dt, 3);
            assert_eq!(zeros.dt(), dt);
            assert_eq!(ones.len(), 3);
            assert_ne!(zeros, ones);
        }
    }

    #[test]
    fn test_gather() {
        let buffer = HostBuffer::I32(vec![0, 1, 2, 3, 4, 5]);
        let gathered = buffer.gather([5, 3, 1].into_iter());
        assert_eq!(gathered, HostBuffer::I32(vec![5, 3, 1]));
    }
}
