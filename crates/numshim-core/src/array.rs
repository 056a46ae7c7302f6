use crate::{
    shape, ArrayDType, BridgeError, DType, Device, DeviceError, DiagonalError, HostBuffer, Shape,
    Storage, StorageView, Strides, Subscription,
};
use ndarray::{ArrayD, IxDyn};
use num::complex::{Complex32, Complex64};

#[derive(thiserror::Error, Debug)]
pub enum ArrayError {
    #[error("DType mismatch, expected {expected:?}, got {actual:?}")]
    DTypeMismatch { expected: DType, actual: DType },
    #[error("Shape mismatch {0:?} != {1:?}")]
    ShapeMismatch(Shape, Shape),
    #[error("Expected a {expected}-D array, got {actual}-D")]
    RankMismatch { expected: usize, actual: usize },
    #[error("Expected a square matrix, got {0:?}")]
    NotSquare(Shape),
    #[error("Invalid subview: {0}")]
    InvalidSubview(String),
    #[error("View {0:?} is not contiguous")]
    NotContiguous(StorageView),
    #[error("{op} does not support dtype {dt:?}")]
    UnsupportedDType { op: &'static str, dt: DType },
    #[error("{0}")]
    Unsupported(String),
    #[error(transparent)]
    DiagonalError(#[from] DiagonalError),
    #[error(transparent)]
    DeviceError(#[from] DeviceError),
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
    #[error(transparent)]
    LayoutError(#[from] ndarray::ShapeError),
}

/// A runtime typed n-dimensional array.
///
/// Cloning an array, or taking a view of it, never copies data: every view shares the
/// same [`Storage`]. Writes through one view are visible through all others.
#[derive(Clone)]
pub struct Array {
    storage: Storage,
    view: StorageView,
    dt: DType,
    device: Device,
}

impl std::fmt::Debug for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Array")
            .field("dt", &self.dt)
            .field("shape", self.shape())
            .field("strides", self.strides())
            .field("offset", &self.view.offset())
            .field("device", &self.device)
            .finish()
    }
}

impl Array {
    pub(crate) fn from_buffer(buffer: HostBuffer, shape: Shape, device: Device) -> Self {
        debug_assert_eq!(buffer.len(), shape.numel());
        let dt = buffer.dt();
        Self {
            storage: Storage::new(buffer),
            view: StorageView::contiguous(shape),
            dt,
            device,
        }
    }

    /// Creates a new array from a chunk of data laid out in row-major order.
    pub fn from_data<T: ArrayDType, U: AsRef<[T]>>(
        data: U,
        shape: Shape,
        device: Device,
    ) -> Result<Array, ArrayError> {
        let data = data.as_ref();
        if data.len() != shape.numel() {
            return Err(ArrayError::ShapeMismatch(shape, shape![data.len()]));
        }
        Ok(Self::from_buffer(T::wrap(data.to_vec()), shape, device))
    }

    /// A new array over the same storage.
    pub(crate) fn with_view(&self, view: StorageView) -> Array {
        Self {
            storage: self.storage.clone(),
            view,
            dt: self.dt,
            device: self.device.clone(),
        }
    }

    /// Same storage and layout, flagged for `device`.
    pub fn with_device(&self, device: Device) -> Array {
        Self {
            device,
            ..self.clone()
        }
    }
}

impl Array {
    pub fn view(&self) -> &StorageView {
        &self.view
    }

    pub fn shape(&self) -> &Shape {
        self.view.shape()
    }

    pub fn strides(&self) -> &Strides {
        self.view.strides()
    }

    pub fn offset(&self) -> usize {
        self.view.offset()
    }

    pub fn rank(&self) -> usize {
        self.shape().rank()
    }

    pub fn numel(&self) -> usize {
        self.shape().numel()
    }

    pub fn dt(&self) -> DType {
        self.dt
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn is_accelerated(&self) -> bool {
        self.device.is_accelerated()
    }

    pub fn is_contiguous(&self) -> bool {
        self.view.is_contiguous()
    }

    pub fn shares_storage(&self, other: &Array) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    fn check_dt<T: ArrayDType>(&self) -> Result<(), ArrayError> {
        if T::dt() != self.dt {
            return Err(ArrayError::DTypeMismatch {
                expected: self.dt,
                actual: T::dt(),
            });
        }
        Ok(())
    }
}

impl Array {
    /// Reads the elements in logical row-major order, following the view.
    pub fn to_vec<T: ArrayDType>(&self) -> Result<Vec<T>, ArrayError> {
        self.check_dt::<T>()?;
        let guard = self.storage.read();
        let data = T::slice_of(&guard).ok_or(ArrayError::DTypeMismatch {
            expected: guard.dt(),
            actual: T::dt(),
        })?;
        Ok(self.view.offsets().map(|i| data[i]).collect())
    }

    /// Writes `values` through the view, in logical row-major order.
    pub fn assign<T: ArrayDType>(&self, values: &[T]) -> Result<(), ArrayError> {
        self.check_dt::<T>()?;
        if values.len() != self.numel() {
            return Err(ArrayError::ShapeMismatch(
                self.shape().clone(),
                shape![values.len()],
            ));
        }
        let mut guard = self.storage.write();
        let actual = guard.dt();
        let data = T::slice_of_mut(&mut guard).ok_or(ArrayError::DTypeMismatch {
            expected: actual,
            actual: T::dt(),
        })?;
        for (i, value) in self.view.offsets().zip(values) {
            data[i] = *value;
        }
        Ok(())
    }

    pub fn fill<T: ArrayDType>(&self, value: T) -> Result<(), ArrayError> {
        self.assign(&vec![value; self.numel()])
    }

    /// Copies the elements of `src` into this view. Shapes and dtypes must match.
    pub fn copy_from(&self, src: &Array) -> Result<(), ArrayError> {
        if src.shape() != self.shape() {
            return Err(ArrayError::ShapeMismatch(
                self.shape().clone(),
                src.shape().clone(),
            ));
        }
        if src.dt() != self.dt() {
            return Err(ArrayError::DTypeMismatch {
                expected: self.dt(),
                actual: src.dt(),
            });
        }
        // Gather first so the read guard is released before writing.
        let buffer = src.gather();
        let mut guard = self.storage.write();
        copy_into(&mut guard, &buffer, self.view.offsets());
        Ok(())
    }

    pub(crate) fn gather(&self) -> HostBuffer {
        self.storage.read().gather(self.view.offsets())
    }

    /// A contiguous copy with its own storage.
    pub fn deep_clone(&self) -> Array {
        Self::from_buffer(self.gather(), self.shape().clone(), self.device.clone())
    }

    /// Reinterprets a contiguous array with a new shape of the same size.
    pub fn reshape(&self, shape: Shape) -> Result<Array, ArrayError> {
        if shape.numel() != self.numel() {
            return Err(ArrayError::ShapeMismatch(self.shape().clone(), shape));
        }
        if !self.is_contiguous() {
            return Err(ArrayError::NotContiguous(self.view.clone()));
        }
        let strides = Strides::from(&shape);
        Ok(self.with_view(StorageView::new(shape, strides, self.offset())))
    }

    /// A strided view selecting `start:end:step` along every axis.
    pub fn subview(&self, subscription: &Subscription) -> Result<Array, ArrayError> {
        Ok(self.with_view(self.view.subview(subscription)?))
    }

    /// Every element widened to `Complex64`.
    pub fn to_complex_vec(&self) -> Result<Vec<Complex64>, ArrayError> {
        let real = |x: f64| Complex64::new(x, 0.0);
        Ok(match self.dt {
            DType::Bool => self
                .to_vec::<bool>()?
                .into_iter()
                .map(|b| real(if b { 1.0 } else { 0.0 }))
                .collect(),
            DType::I32 => self.to_vec::<i32>()?.into_iter().map(|x| real(x as f64)).collect(),
            DType::I64 => self.to_vec::<i64>()?.into_iter().map(|x| real(x as f64)).collect(),
            DType::U32 => self.to_vec::<u32>()?.into_iter().map(|x| real(x as f64)).collect(),
            DType::F32 => self.to_vec::<f32>()?.into_iter().map(|x| real(x as f64)).collect(),
            DType::F64 => self.to_vec::<f64>()?.into_iter().map(real).collect(),
            DType::C64 => self
                .to_vec::<Complex32>()?
                .into_iter()
                .map(|c| Complex64::new(c.re as f64, c.im as f64))
                .collect(),
            DType::C128 => self.to_vec::<Complex64>()?,
        })
    }
}

fn copy_into(dst: &mut HostBuffer, src: &HostBuffer, offsets: impl Iterator<Item = usize>) {
    macro_rules! scatter {
        ($($variant:ident),*) => {
            match (dst, src) {
                $((HostBuffer::$variant(dst), HostBuffer::$variant(src)) => {
                    for (i, value) in offsets.zip(src) {
                        dst[i] = *value;
                    }
                })*
                _ => unreachable!("dtypes checked by the caller"),
            }
        };
    }
    scatter!(Bool, I32, I64, U32, F32, F64, C64, C128);
}

/// Conversion to and from ndarray
impl Array {
    pub fn to_ndarray<T: ArrayDType>(&self) -> Result<ArrayD<T>, ArrayError> {
        let shape = self.shape().to_vec();
        Ok(ArrayD::from_shape_vec(IxDyn(&shape), self.to_vec::<T>()?)?)
    }
}

impl<T: ArrayDType> From<ArrayD<T>> for Array {
    fn from(it: ArrayD<T>) -> Self {
        let shape = it.shape().to_vec().into();
        let data = it.iter().copied().collect::<Vec<_>>();
        Array::from_buffer(T::wrap(data), shape, Device::Host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Subscription, ViewSpec};

    fn arange(shape: Shape) -> Array {
        let data = (0..shape.numel() as i32).collect::<Vec<_>>();
        Array::from_data(data, shape, Device::Host).unwrap()
    }

    #[test]
    fn test_from_data_checks_length() {
        let result = Array::from_data([1.0f32, 2.0, 3.0], shape![2, 2], Device::Host);
        assert!(matches!(result, Err(ArrayError::ShapeMismatch(_, _))));
    }

    #[test]
    fn test_dtype_checked() {
        let a = arange(shape![2, 2]);
        assert!(matches!(
            a.to_vec::<f32>(),
            Err(ArrayError::DTypeMismatch { .. })
        ));
        assert!(a.assign(&[1.0f64; 4]).is_err());
    }

    #[test]
    fn test_views_share_storage() {
        let a = arange(shape![4, 5]);
        let sub = Subscription::from(vec![ViewSpec::new(1, 2, 4), ViewSpec::new(1, 1, 3)]);
        let view = a.subview(&sub).unwrap();
        assert!(view.shares_storage(&a));
        assert_eq!(view.to_vec::<i32>().unwrap(), vec![6, 7, 16, 17]);

        view.fill(-1).unwrap();
        let all = a.to_vec::<i32>().unwrap();
        assert_eq!(all[6], -1);
        assert_eq!(all[17], -1);
        assert_eq!(all.iter().filter(|&&x| x == -1).count(), 4);
    }

    #[test]
    fn test_deep_clone_is_contiguous() {
        let a = arange(shape![3, 4]);
        let sub = Subscription::from(vec![ViewSpec::new(0, 2, 3), ViewSpec::new(1, 2, 4)]);
        let view = a.subview(&sub).unwrap();
        assert!(!view.is_contiguous());

        let copy = view.deep_clone();
        assert!(copy.is_contiguous());
        assert!(!copy.shares_storage(&a));
        assert_eq!(copy.to_vec::<i32>().unwrap(), vec![1, 3, 9, 11]);
    }

    #[test]
    fn test_reshape() {
        let a = arange(shape![2, 6]);
        let b = a.reshape(shape![3, 4]).unwrap();
        assert!(b.shares_storage(&a));
        assert_eq!(b.strides().to_vec(), vec![4, 1]);
        assert!(a.reshape(shape![5]).is_err());

        let sub = Subscription::from(vec![ViewSpec::new(0, 1, 2), ViewSpec::new(0, 2, 6)]);
        let strided = a.subview(&sub).unwrap();
        assert!(matches!(
            strided.reshape(shape![6]),
            Err(ArrayError::NotContiguous(_))
        ));
    }

    #[test]
    fn test_copy_from() {
        let a = arange(shape![2, 2]);
        let b = Array::from_data([9, 8, 7, 6], shape![2, 2], Device::Host).unwrap();
        a.copy_from(&b).unwrap();
        assert_eq!(a.to_vec::<i32>().unwrap(), vec![9, 8, 7, 6]);

        let c = Array::from_data([1.0f32; 4], shape![2, 2], Device::Host).unwrap();
        assert!(a.copy_from(&c).is_err());
    }

    #[test]
    fn test_ndarray_roundtrip() {
        let nd = ndarray::Array::from_shape_vec((2, 3), vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap()
            .into_dyn();
        let a = Array::from(nd.clone());
        assert_eq!(a.shape(), &shape![2, 3]);
        assert_eq!(a.to_ndarray::<f64>().unwrap(), nd);
    }
}
