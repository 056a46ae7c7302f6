use crate::Array;
use num::complex::Complex64;

impl Array {
    /// Element-wise `|a - b| <= atol + rtol * |b|` over every dtype, compared as `Complex64`.
    pub fn all_close(&self, other: &Self, atol: f64, rtol: f64) -> anyhow::Result<()> {
        if self.shape() != other.shape() {
            anyhow::bail!("Shape mismatch {:?} != {:?}", self.shape(), other.shape())
        }

        let (lhs, rhs) = (self.to_complex_vec()?, other.to_complex_vec()?);
        let mut stats = CloseStats::new(atol, rtol);
        for (idx, (a, b)) in lhs.iter().zip(&rhs).enumerate() {
            stats.update(a, b, idx);
        }

        if stats.fail_count > 0 {
            anyhow::bail!(
                "{} samples not close - AVGE={} MAE={} at {:?}",
                stats.fail_count,
                stats.avg_error(),
                stats.max_abs_error,
                stats.max_abs_error_idx,
            );
        }
        log::debug!(
            "All close - AVGE={} MAE={} at {:?}",
            stats.avg_error(),
            stats.max_abs_error,
            stats.max_abs_error_idx
        );
        Ok(())
    }
}

struct CloseStats {
    total_error: f64,
    max_abs_error: f64,
    max_abs_error_idx: Option<usize>,
    element_count: usize,
    fail_count: usize,
    atol: f64,
    rtol: f64,
}

impl CloseStats {
    fn new(atol: f64, rtol: f64) -> Self {
        Self {
            total_error: 0.0,
            max_abs_error: 0.0,
            max_abs_error_idx: None,
            element_count: 0,
            fail_count: 0,
            atol,
            rtol,
        }
    }

    fn update(&mut self, a: &Complex64, b: &Complex64, index: usize) {
        let abs_diff = (a - b).norm();
        if !abs_diff.is_nan() {
            self.total_error += abs_diff;
        }
        self.element_count += 1;

        if abs_diff > self.max_abs_error {
            self.max_abs_error = abs_diff;
            self.max_abs_error_idx = Some(index);
        }

        if !self.is_close(a, b, abs_diff) {
            self.fail_count += 1;
        }
    }

    fn avg_error(&self) -> f64 {
        if self.element_count == 0 {
            return 0.0;
        }
        self.total_error / self.element_count as f64
    }

    fn is_close(&self, a: &Complex64, b: &Complex64, abs_diff: f64) -> bool {
        (a.is_nan() && b.is_nan())
            || (a.is_infinite() && b.is_infinite() && a == b)
            || abs_diff <= self.atol + self.rtol * b.norm()
    }
}

#[cfg(test)]
mod tests {
    use crate::{shape, Array, Device};

    #[test]
    fn test_all_close() {
        let a = Array::from_data([1.0f32, 2.0, f32::NAN], shape![3], Device::Host).unwrap();
        let b = Array::from_data([1.0f32, 2.000001, f32::NAN], shape![3], Device::Host).unwrap();
        a.all_close(&b, 1e-5, 1e-5).unwrap();

        let c = Array::from_data([1.0f32, 2.5, f32::NAN], shape![3], Device::Host).unwrap();
        assert!(a.all_close(&c, 1e-5, 1e-5).is_err());

        let d = Array::from_data([1.0f32, 2.0], shape![2], Device::Host).unwrap();
        assert!(a.all_close(&d, 1e-5, 1e-5).is_err());
    }

    #[test]
    fn test_mixed_dtypes() {
        let a = Array::from_data([1i32, -2], shape![2], Device::Host).unwrap();
        let b = Array::from_data([1.0f64, -2.0], shape![2], Device::Host).unwrap();
        a.all_close(&b, 0.0, 0.0).unwrap();
    }
}
