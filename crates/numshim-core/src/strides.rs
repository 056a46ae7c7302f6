use crate::{rvec, RVec, Shape};

/// Per-axis distance, in elements, between neighbouring entries.
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Strides(RVec<isize>);

impl Strides {
    pub fn new(strides: RVec<isize>) -> Self {
        Self(strides)
    }

    pub fn to_vec(&self) -> Vec<isize> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &isize> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Strides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape = format!("[{}", self.0.first().unwrap_or(&0));
        for dim in self.0.iter().skip(1) {
            shape.push_str(&format!("x{}", dim));
        }
        write!(f, "{}]", shape)
    }
}

impl std::ops::Index<usize> for Strides {
    type Output = isize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<&Shape> for Strides {
    fn from(shape: &Shape) -> Self {
        let mut strides = rvec![];
        let mut stride = 1;
        for size in shape.inner().iter().rev() {
            strides.push(stride);
            stride *= *size as isize;
        }
        strides.reverse();
        Self(strides)
    }
}

impl From<Vec<isize>> for Strides {
    fn from(strides: Vec<isize>) -> Self {
        Self(strides.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::shape;

    #[test]
    fn test_strides() {
        use super::*;
        let shape = shape![2, 3, 4];
        let strides = Strides::from(&shape);
        assert_eq!(strides.to_vec(), vec![12, 4, 1]);
    }

    #[test]
    fn test_scalar_strides() {
        use super::*;
        let strides = Strides::from(&shape![]);
        assert!(strides.is_empty());
    }
}
