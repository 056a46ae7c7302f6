use super::random_subscription;
use crate::{Array, ArrayError, Device, Shape, Subscription};
use rand::Rng;
use rustc_hash::FxHashSet;

/// Shapes of every rank in `min_ndim..=max_ndim`.
///
/// With `iters == 0` every shape with dimensions in `1..=max_dim` is enumerated, last axis
/// fastest. Otherwise each rank yields the all-ones shape, the all-`max_dim` shape and
/// `iters` shapes with dimensions drawn from `[1, max_dim)`.
pub fn gen_shapes<R: Rng + ?Sized>(
    max_ndim: usize,
    max_dim: usize,
    iters: usize,
    min_ndim: usize,
    rng: &mut R,
) -> Vec<Shape> {
    let mut shapes = vec![];
    for ndim in min_ndim..=max_ndim {
        if iters > 0 {
            shapes.push(Shape::from(vec![1; ndim]));
            shapes.push(Shape::from(vec![max_dim; ndim]));
            for _ in 0..iters {
                let dims = (0..ndim)
                    .map(|_| if max_dim > 1 { rng.gen_range(1..max_dim) } else { 1 })
                    .collect::<Vec<_>>();
                shapes.push(Shape::from(dims));
            }
        } else if max_dim > 0 {
            let mut dims = vec![1; ndim];
            'odometer: loop {
                shapes.push(Shape::from(dims.clone()));
                for d in (0..ndim).rev() {
                    dims[d] += 1;
                    if dims[d] <= max_dim {
                        continue 'odometer;
                    }
                    dims[d] = 1;
                }
                break;
            }
        }
    }
    shapes
}

/// A base shape and an optional subscription into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFixture {
    pub shape: Shape,
    pub subscription: Option<Subscription>,
    pub view_shape: Shape,
}

impl ViewFixture {
    pub fn whole(shape: Shape) -> Self {
        Self {
            view_shape: shape.clone(),
            shape,
            subscription: None,
        }
    }

    /// An `I64` array counting up from zero in `shape`, seen through the subscription.
    pub fn materialize(&self, device: Device) -> Result<Array, ArrayError> {
        let data = (0..self.shape.numel() as i64).collect::<Vec<_>>();
        let base = Array::from_data(data, self.shape.clone(), device)?;
        match &self.subscription {
            Some(subscription) => base.subview(subscription),
            None => Ok(base),
        }
    }
}

impl std::fmt::Display for ViewFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subscription {
            Some(subscription) => write!(
                f,
                "{}{} -> {}",
                self.shape, subscription, self.view_shape
            ),
            None => write!(f, "{} -> {}", self.shape, self.view_shape),
        }
    }
}

/// Fixtures for `samples` random shapes per rank, each followed by up to `samples`
/// distinct random subviews of it.
pub fn gen_random_views<R: Rng + ?Sized>(
    max_ndim: usize,
    max_dim: usize,
    min_ndim: usize,
    samples: usize,
    rng: &mut R,
) -> Vec<ViewFixture> {
    let mut fixtures = vec![];
    for shape in gen_shapes(max_ndim, max_dim, samples, min_ndim, rng) {
        fixtures.push(ViewFixture::whole(shape.clone()));
        if shape.is_degenerate() {
            continue;
        }
        let mut tried = FxHashSet::default();
        for _ in 0..samples {
            let (subscription, view_shape) = random_subscription(&shape, rng);
            if tried.insert(subscription.to_string()) {
                fixtures.push(ViewFixture {
                    shape: shape.clone(),
                    subscription: Some(subscription),
                    view_shape,
                });
            }
        }
    }
    log::debug!("Generated {} view fixtures", fixtures.len());
    fixtures
}
