//! Generators and comparison helpers for exercising strided views.
mod close;
mod shapes;
mod subscription;

pub use shapes::*;
pub use subscription::*;
