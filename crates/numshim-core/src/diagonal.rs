use crate::{flatten, rvec, shape, zeros, Array, ArrayError, Shape, StorageView, Strides};
use derive_new::new;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagonalError {
    #[error("diagonal requires a 2-D array, got {0} dimensions")]
    InvalidDimension(usize),
    #[error("diag requires a 1-D or 2-D input, got {0} dimensions")]
    InvalidShape(usize),
    #[error("diagonal starts {start} elements from offset {offset}, outside the storage")]
    StartOutOfBounds { offset: usize, start: isize },
    #[error("a {len} element diagonal at offset {k} does not fit in a square matrix")]
    SizeOverflow { len: usize, k: isize },
}

/// A 1-D window, in elements, over the k-th diagonal of a matrix.
///
/// `start` is relative to the matrix's first element and is negative when the stride
/// walking to the diagonal is.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagonalView {
    pub start: isize,
    pub len: usize,
    pub stride: isize,
}

impl DiagonalView {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Locates the k-th diagonal of a `rows x cols` matrix laid out with `strides`.
///
/// `k > 0` selects diagonals above the main one, `k < 0` below. Offsets that fall outside
/// the matrix give an empty view.
pub fn diagonal_view(
    shape: &Shape,
    strides: &Strides,
    k: isize,
) -> Result<DiagonalView, DiagonalError> {
    if shape.rank() != 2 {
        return Err(DiagonalError::InvalidDimension(shape.rank()));
    }
    if strides.len() != 2 {
        return Err(DiagonalError::InvalidDimension(strides.len()));
    }
    let (rows, cols) = (shape[0], shape[1]);
    let (s0, s1) = (strides[0], strides[1]);
    let stride = s0 + s1;
    let offset = k.unsigned_abs();

    let (start, len) = if k >= 0 {
        if offset >= cols {
            return Ok(DiagonalView::new(0, 0, stride));
        }
        // Begins at (0, k).
        let len = if cols - offset > rows {
            rows
        } else {
            cols - offset
        };
        (offset as isize * s1, len)
    } else {
        if offset >= rows {
            return Ok(DiagonalView::new(0, 0, stride));
        }
        // Begins at (|k|, 0).
        let len = if rows - offset > cols {
            cols
        } else {
            rows - offset
        };
        (offset as isize * s0, len)
    };

    if len == 0 {
        return Ok(DiagonalView::new(0, 0, stride));
    }
    Ok(DiagonalView::new(start, len, stride))
}

impl Array {
    /// The k-th diagonal as a 1-D view sharing this array's storage.
    pub fn diagonal(&self, k: isize) -> Result<Array, ArrayError> {
        let diag = diagonal_view(self.shape(), self.strides(), k)?;
        let offset = self.offset().checked_add_signed(diag.start).ok_or(
            DiagonalError::StartOutOfBounds {
                offset: self.offset(),
                start: diag.start,
            },
        )?;
        let view = StorageView::new(shape![diag.len], Strides::new(rvec![diag.stride]), offset);
        Ok(self.with_view(view))
    }
}

pub fn diagonal(a: &Array, k: isize) -> Result<Array, ArrayError> {
    a.diagonal(k)
}

/// A square matrix with the flattened input on the k-th diagonal and zeros elsewhere.
///
/// The matrix has `v.numel() + |k|` rows and keeps `v`'s dtype and device.
pub fn diagflat(v: &Array, k: isize) -> Result<Array, ArrayError> {
    let v = flatten(v);
    let overflow = DiagonalError::SizeOverflow { len: v.numel(), k };
    let size = v.numel().checked_add(k.unsigned_abs()).ok_or(overflow.clone())?;
    size.checked_mul(size).ok_or(overflow)?;
    let a = zeros(shape![size, size], v.dt(), v.device().clone());
    a.diagonal(k)?.copy_from(&v)?;
    Ok(a)
}

/// Extracts a diagonal from a 2-D input or builds a diagonal matrix from a 1-D input.
pub fn diag(v: &Array, k: isize) -> Result<Array, ArrayError> {
    match v.rank() {
        1 => diagflat(v, k),
        2 => v.diagonal(k),
        rank => Err(DiagonalError::InvalidShape(rank).into()),
    }
}
