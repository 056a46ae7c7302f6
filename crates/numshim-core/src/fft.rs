use crate::{empty_like, Array, ArrayError, DType, Shape};
use num::complex::{Complex, Complex32, Complex64};
use rustfft::{FftNum, FftPlanner};

/// Which trailing axes a host transform runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FftAxes {
    Last,
    LastTwo,
}

impl FftAxes {
    fn min_rank(self) -> usize {
        match self {
            FftAxes::Last => 1,
            FftAxes::LastTwo => 2,
        }
    }
}

/// Forward transform of `data`, a contiguous row-major buffer of `shape`, in place.
fn host_fft<F: FftNum>(data: &mut [Complex<F>], shape: &Shape, axes: FftAxes) {
    if data.is_empty() {
        return;
    }
    let mut planner = FftPlanner::<F>::new();
    let rank = shape.rank();
    let n = shape[rank - 1];

    let rows = planner.plan_fft_forward(n);
    for row in data.chunks_exact_mut(n) {
        rows.process(row);
    }

    if axes == FftAxes::LastTwo {
        let m = shape[rank - 2];
        let cols = planner.plan_fft_forward(m);
        let mut column = Vec::with_capacity(m);
        for plane in data.chunks_exact_mut(m * n) {
            for j in 0..n {
                column.clear();
                column.extend((0..m).map(|i| plane[i * n + j]));
                cols.process(&mut column);
                for (i, value) in column.iter().enumerate() {
                    plane[i * n + j] = *value;
                }
            }
        }
    }
}

fn host_transform(a: &Array, axes: FftAxes) -> Result<Array, ArrayError> {
    if a.rank() < axes.min_rank() {
        return Err(ArrayError::RankMismatch {
            expected: axes.min_rank(),
            actual: a.rank(),
        });
    }
    if a.is_accelerated() {
        log::warn!(
            "{:?} {} array on {:?} has no accelerated {:?} transform, falling back to host",
            a.shape(),
            a.dt(),
            a.device(),
            axes
        );
    }

    let shape = a.shape().clone();
    let out = match a.dt() {
        DType::C64 => {
            let mut data = a.to_vec::<Complex32>()?;
            host_fft(&mut data, &shape, axes);
            Array::from_data(data, shape, a.device().clone())?
        }
        _ => {
            let mut data: Vec<Complex64> = a.to_complex_vec()?;
            host_fft(&mut data, &shape, axes);
            Array::from_data(data, shape, a.device().clone())?
        }
    };
    Ok(out)
}

/// 1-D discrete Fourier transform along the last axis.
///
/// Complex arrays of rank 1 or 2 on an accelerated device are transformed by their
/// bridge. Everything else runs on the host, where `C64` input stays `C64` and any other
/// dtype is promoted to `C128`.
pub fn fft(a: &Array) -> Result<Array, ArrayError> {
    if a.rank() == 0 {
        return Err(ArrayError::RankMismatch {
            expected: 1,
            actual: 0,
        });
    }
    if a.is_accelerated() && a.rank() <= 2 && a.dt().is_complex() {
        let bridge = a.device().try_bridge()?;
        let dst = empty_like(a, None, None);
        log::debug!("Dispatching {:?} fft to bridge {}", a.shape(), bridge.name());
        bridge.fft(a, &dst)?;
        return Ok(dst);
    }
    host_transform(a, FftAxes::Last)
}

/// 2-D discrete Fourier transform over the last two axes.
pub fn fft2(a: &Array) -> Result<Array, ArrayError> {
    if a.is_accelerated() && a.rank() == 2 && a.dt().is_complex() {
        let bridge = a.device().try_bridge()?;
        let dst = empty_like(a, None, None);
        log::debug!("Dispatching {:?} fft2 to bridge {}", a.shape(), bridge.name());
        bridge.fft2(a, &dst)?;
        return Ok(dst);
    }
    host_transform(a, FftAxes::LastTwo)
}
