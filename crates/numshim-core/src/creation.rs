use crate::{shape, Array, DType, Device, HostBuffer, Shape};

#[cfg(feature = "rand")]
use {
    crate::ArrayDType,
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
};

/// A new array of the given shape and dtype.
///
/// Safe Rust has no uninitialised buffers, so the contents are zeroed. Callers should
/// still treat them as unspecified and overwrite every element.
pub fn empty(shape: Shape, dt: DType, device: Device) -> Array {
    zeros(shape, dt, device)
}

pub fn zeros(shape: Shape, dt: DType, device: Device) -> Array {
    let buffer = HostBuffer::zeros(dt, shape.numel());
    Array::from_buffer(buffer, shape, device)
}

pub fn ones(shape: Shape, dt: DType, device: Device) -> Array {
    let buffer = HostBuffer::ones(dt, shape.numel());
    Array::from_buffer(buffer, shape, device)
}

/// An array shaped like `a`. `dt` and `device` default to those of `a`.
pub fn empty_like(a: &Array, dt: Option<DType>, device: Option<Device>) -> Array {
    empty(
        a.shape().clone(),
        dt.unwrap_or(a.dt()),
        device.unwrap_or_else(|| a.device().clone()),
    )
}

pub fn zeros_like(a: &Array, dt: Option<DType>, device: Option<Device>) -> Array {
    zeros(
        a.shape().clone(),
        dt.unwrap_or(a.dt()),
        device.unwrap_or_else(|| a.device().clone()),
    )
}

pub fn ones_like(a: &Array, dt: Option<DType>, device: Option<Device>) -> Array {
    ones(
        a.shape().clone(),
        dt.unwrap_or(a.dt()),
        device.unwrap_or_else(|| a.device().clone()),
    )
}

/// A contiguous 1-D copy of `a`, in row-major order.
pub fn flatten(a: &Array) -> Array {
    Array::from_buffer(a.gather(), shape![a.numel()], a.device().clone())
}

#[cfg(feature = "rand")]
impl Array {
    pub fn randn<T: ArrayDType>(shape: Shape, device: Device) -> Self
    where
        StandardNormal: Distribution<T>,
    {
        Self::randn_with(&mut rand::thread_rng(), shape, device)
    }

    /// Standard normal samples drawn from `rng`.
    pub fn randn_with<T: ArrayDType, R: Rng + ?Sized>(
        rng: &mut R,
        shape: Shape,
        device: Device,
    ) -> Self
    where
        StandardNormal: Distribution<T>,
    {
        let data = (0..shape.numel())
            .map(|_| StandardNormal.sample(rng))
            .collect::<Vec<T>>();
        Self::from_buffer(T::wrap(data), shape, device)
    }
}
