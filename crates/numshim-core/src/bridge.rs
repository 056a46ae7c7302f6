use crate::Array;
use std::sync::Arc;

#[derive(Clone, Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Bridge operation failed: {0}")]
    Failed(String),
    #[error("Bridge does not support {0}")]
    Unsupported(String),
}

/// # Bridge
///
/// Entry points of an external acceleration backend.
///
/// Every array passed to a bridge is flagged [`crate::Device::Accelerated`]. Destination
/// arrays are allocated by the caller and must be filled in place, e.g. with
/// [`Array::assign`].
pub trait Bridge: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Announces an operand that is about to take part in an accelerated computation.
    fn handle_array(&self, array: &Array) -> Result<(), BridgeError>;

    fn matmul(&self, lhs: &Array, rhs: &Array, dst: &Array) -> Result<(), BridgeError>;

    /// Factorizes `lu` in place and writes the row permutation into `pivots`.
    fn lu(&self, lu: &Array, pivots: &Array) -> Result<(), BridgeError>;

    fn fft(&self, src: &Array, dst: &Array) -> Result<(), BridgeError>;

    fn fft2(&self, src: &Array, dst: &Array) -> Result<(), BridgeError>;
}

/// Shared handle to a [`Bridge`], compared by identity.
#[derive(Clone, Debug)]
pub struct BridgeHandle(Arc<dyn Bridge>);

impl BridgeHandle {
    pub fn new<B: Bridge + 'static>(bridge: B) -> Self {
        Self(Arc::new(bridge))
    }
}

impl From<Arc<dyn Bridge>> for BridgeHandle {
    fn from(bridge: Arc<dyn Bridge>) -> Self {
        Self(bridge)
    }
}

impl std::ops::Deref for BridgeHandle {
    type Target = dyn Bridge;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for BridgeHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}
