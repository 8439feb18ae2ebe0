//! Sentinel Module
//!
//! Null/zero detection for cache keys and values.

use std::sync::Arc;

/// A type with a distinguished "null" or zero value that the cache refuses
/// to store or look up.
pub trait Sentinel {
    /// Returns true when `self` is the null/zero sentinel.
    fn is_sentinel(&self) -> bool;
}

impl Sentinel for String {
    fn is_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl Sentinel for str {
    fn is_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Sentinel for Vec<T> {
    fn is_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Sentinel for Option<T> {
    fn is_sentinel(&self) -> bool {
        self.is_none()
    }
}

impl<T: Sentinel + ?Sized> Sentinel for &T {
    fn is_sentinel(&self) -> bool {
        (**self).is_sentinel()
    }
}

impl<T: Sentinel + ?Sized> Sentinel for Box<T> {
    fn is_sentinel(&self) -> bool {
        (**self).is_sentinel()
    }
}

impl<T: Sentinel + ?Sized> Sentinel for Arc<T> {
    fn is_sentinel(&self) -> bool {
        (**self).is_sentinel()
    }
}

macro_rules! zero_sentinel {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Sentinel for $ty {
                fn is_sentinel(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

zero_sentinel!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
