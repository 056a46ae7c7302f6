mod array;
mod bridge;
mod creation;
mod device;
mod diagonal;
mod dtype;
mod fft;
mod linalg;
mod shape;
mod storage;
mod strides;
mod ufunc;
mod view;

pub use array::*;
pub use bridge::*;
pub use creation::*;
pub use device::*;
pub use diagonal::*;
pub use dtype::*;
pub use fft::*;
pub use linalg::*;
pub use shape::*;
pub use storage::*;
pub use strides::*;
pub use ufunc::*;
pub use view::*;

use smallvec::SmallVec;
pub type RVec<T> = SmallVec<[T; 4]>;

//https://github.com/sonos/tract/blob/main/data/src/macros.rs#L2
#[macro_export]
macro_rules! rvec {
    (@one $x:expr) => (1usize);
    ($elem:expr; $n:expr) => ({
        $crate::RVec::from_elem($elem, $n)
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ rvec![@one $x])*;
        #[allow(unused_mut)]
        let mut vec = $crate::RVec::new();
        if count <= vec.inline_size() {
            $(vec.push($x);)*
            vec
        } else {
            $crate::RVec::from_vec(vec![$($x,)*])
        }
    });
}

#[macro_export]
macro_rules! shape {
    ($($x:expr),*$(,)*) => ({
        use $crate::rvec;
        $crate::Shape::new(rvec![$($x,)*])
    });
}

pub mod prelude {
    pub use crate::{rvec, shape, Array, DType, Device};
}

#[cfg(feature = "testing")]
pub mod test_util;
