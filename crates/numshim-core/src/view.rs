use crate::{rvec, ArrayError, RVec, Shape, Strides};
use derive_new::new;

/// Arrays are just a view into their underlying storage.
///
/// `offset` is the position, in elements, of the first logical element.
#[derive(new, Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageView {
    shape: Shape,
    strides: Strides,
    offset: usize,
}

impl StorageView {
    pub fn contiguous(shape: Shape) -> Self {
        let strides = Strides::from(&shape);
        Self::new(shape, strides, 0)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    pub fn is_contiguous(&self) -> bool {
        self.strides == Strides::from(&self.shape)
    }

    /// Storage positions of every element, in row-major logical order.
    pub fn offsets(&self) -> Offsets<'_> {
        Offsets {
            view: self,
            index: rvec![0; self.shape.rank()],
            remaining: self.numel(),
            position: self.offset as isize,
        }
    }

    /// Restricts every axis to `start..end` with the given `step`.
    pub fn subview(&self, subscription: &Subscription) -> Result<StorageView, ArrayError> {
        if subscription.rank() != self.shape.rank() {
            return Err(ArrayError::InvalidSubview(format!(
                "subscription {} has {} dimensions, view has {}",
                subscription,
                subscription.rank(),
                self.shape.rank()
            )));
        }

        let mut offset = self.offset as isize;
        let mut shape = rvec![];
        let mut strides = rvec![];
        for ((spec, &dim), &stride) in subscription
            .iter()
            .zip(self.shape.iter())
            .zip(self.strides.iter())
        {
            if !spec.is_valid(dim) {
                return Err(ArrayError::InvalidSubview(format!(
                    "{} is out of bounds for a dimension of size {}",
                    spec, dim
                )));
            }
            offset += spec.start as isize * stride;
            shape.push(spec.len());
            strides.push(stride * spec.step as isize);
        }
        Ok(StorageView::new(
            Shape::new(shape),
            Strides::new(strides),
            offset as usize,
        ))
    }
}

pub struct Offsets<'a> {
    view: &'a StorageView,
    index: RVec<usize>,
    remaining: usize,
    position: isize,
}

impl Iterator for Offsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.position as usize;
        self.remaining -= 1;
        if self.remaining > 0 {
            let (shape, strides) = (&self.view.shape, &self.view.strides);
            for axis in (0..self.index.len()).rev() {
                self.index[axis] += 1;
                self.position += strides[axis];
                if self.index[axis] < shape[axis] {
                    break;
                }
                self.position -= strides[axis] * self.index[axis] as isize;
                self.index[axis] = 0;
            }
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets<'_> {}

/// A `start:end:step` range along one axis.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewSpec {
    pub start: usize,
    pub step: usize,
    pub end: usize,
}

impl ViewSpec {
    /// Number of indices `start, start + step, ...` below `end`.
    pub fn len(&self) -> usize {
        if self.end <= self.start || self.step == 0 {
            return 0;
        }
        (self.end - self.start).div_ceil(self.step)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, dim: usize) -> bool {
        self.step >= 1 && self.start < self.end && self.end <= dim
    }
}

impl std::fmt::Display for ViewSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.step)
    }
}

/// One [`ViewSpec`] per dimension.
#[derive(new, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription(RVec<ViewSpec>);

impl Subscription {
    pub fn iter(&self) -> impl Iterator<Item = &ViewSpec> {
        self.0.iter()
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Shape of the view this subscription selects.
    pub fn shape(&self) -> Shape {
        Shape::new(self.0.iter().map(ViewSpec::len).collect())
    }
}

impl std::ops::Index<usize> for Subscription {
    type Output = ViewSpec;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::from("[");
        for (idx, spec) in self.0.iter().enumerate() {
            if idx > 0 {
                s.push_str(", ");
            }
            s.push_str(&spec.to_string());
        }
        s.push(']');
        write!(f, "{}", s)
    }
}

impl From<Vec<ViewSpec>> for Subscription {
    fn from(specs: Vec<ViewSpec>) -> Self {
        Self(specs.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape;
    use proptest::prelude::*;
    use test_strategy::proptest;

    #[test]
    fn test_contiguous_offsets() {
        let view = StorageView::contiguous(shape![2, 3]);
        assert!(view.is_contiguous());
        assert_eq!(view.offsets().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_transposed_offsets() {
        let view = StorageView::new(shape![3, 2], Strides::from(vec![1, 3]), 0);
        assert!(!view.is_contiguous());
        assert_eq!(view.offsets().collect::<Vec<_>>(), vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_scalar_offsets() {
        let view = StorageView::new(shape![], Strides::default(), 7);
        assert_eq!(view.offsets().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_subview() {
        let view = StorageView::contiguous(shape![4, 5]);
        let sub = Subscription::from(vec![ViewSpec::new(1, 2, 4), ViewSpec::new(0, 3, 5)]);
        assert_eq!(sub.to_string(), "[1:4:2, 0:5:3]");

        let subview = view.subview(&sub).unwrap();
        assert_eq!(subview.shape(), &shape![2, 2]);
        assert_eq!(subview.strides().to_vec(), vec![10, 3]);
        assert_eq!(subview.offsets().collect::<Vec<_>>(), vec![5, 8, 15, 18]);
    }

    #[test]
    fn test_subview_rejects_bad_specs() {
        let view = StorageView::contiguous(shape![4, 5]);
        let rank = Subscription::from(vec![ViewSpec::new(0, 1, 2)]);
        assert!(matches!(
            view.subview(&rank),
            Err(ArrayError::InvalidSubview(_))
        ));

        let oob = Subscription::from(vec![ViewSpec::new(0, 1, 5), ViewSpec::new(0, 1, 2)]);
        assert!(view.subview(&oob).is_err());

        let zero_step = Subscription::from(vec![ViewSpec::new(0, 0, 2), ViewSpec::new(0, 1, 2)]);
        assert!(view.subview(&zero_step).is_err());
    }

    #[proptest(cases = 64)]
    fn test_view_spec_len(
        #[strategy(0usize..32)] start: usize,
        #[strategy(1usize..8)] step: usize,
        #[strategy(1usize..32)] extent: usize,
    ) {
        let spec = ViewSpec::new(start, step, start + extent);
        let expected = (start..start + extent).step_by(step).count();
        prop_assert_eq!(spec.len(), expected);
    }
}
