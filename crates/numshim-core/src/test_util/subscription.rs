use crate::{RVec, Shape, Subscription, ViewSpec};
use rand::Rng;

/// Draws one random `start:end:step` range for every dimension of `shape`.
///
/// Per dimension of size `d`, `start` is uniform in `[0, d - 2]`, `step` is uniform in
/// `[1, d / 2]` when `d > 3` and `end` is uniform in `[start + 1, d - 2]` when that range
/// is non-empty, otherwise `start + 1`. Shapes holding at most one element are left to the
/// caller to skip.
pub fn random_subscription<R: Rng + ?Sized>(shape: &Shape, rng: &mut R) -> (Subscription, Shape) {
    let specs = shape
        .iter()
        .map(|&dim| {
            let start = if dim > 1 {
                rng.gen_range(0..=dim - 2)
            } else {
                0
            };
            let step = if dim > 3 {
                rng.gen_range(1..=dim / 2)
            } else {
                1
            };
            let end = if start + 1 < dim.saturating_sub(1) {
                rng.gen_range(start + 1..=dim - 2)
            } else {
                start + 1
            };
            ViewSpec::new(start, step, end)
        })
        .collect::<RVec<_>>();
    let subscription = Subscription::new(specs);
    let view_shape = subscription.shape();
    (subscription, view_shape)
}
