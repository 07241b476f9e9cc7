//! Byte-size estimation for values stored in tracked collections.
//!
//! Estimates are approximations: they count the inline bytes of a value plus
//! the heap allocations it owns, and ignore allocator bookkeeping.

use std::cmp::Reverse;
use std::mem;

/// Bytes of one pointer-sized reference.
pub const REFERENCE_BYTES: u64 = mem::size_of::<usize>() as u64;

/// Values that can estimate how many bytes they occupy.
pub trait SizeOf {
    /// Inline bytes of the value itself, without anything it points to.
    fn shallow_size(&self) -> u64 {
        mem::size_of_val(self) as u64
    }

    /// Heap bytes owned by the value.
    fn heap_size(&self) -> u64 {
        0
    }

    /// Inline plus owned heap bytes.
    fn deep_size(&self) -> u64 {
        self.shallow_size() + self.heap_size()
    }
}

/// Deep size of `value` plus one reference pointing at it.
///
/// Approximates a boxed or node-linked slot, where the structure holds a
/// pointer to the value in addition to the value itself.
pub fn size_with_one_reference<T: SizeOf + ?Sized>(value: &T) -> u64 {
    value.deep_size() + REFERENCE_BYTES
}

macro_rules! inline_only {
    ($($t:ty),* $(,)?) => {
        $(impl SizeOf for $t {})*
    };
}

inline_only!(
    (), bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

impl SizeOf for &str {}

impl SizeOf for String {
    fn heap_size(&self) -> u64 {
        self.capacity() as u64
    }
}

impl<T: SizeOf> SizeOf for Vec<T> {
    fn heap_size(&self) -> u64 {
        let slots = (self.capacity() * mem::size_of::<T>()) as u64;
        slots + self.iter().map(SizeOf::heap_size).sum::<u64>()
    }
}

impl<T: SizeOf> SizeOf for Box<T> {
    fn heap_size(&self) -> u64 {
        self.as_ref().deep_size()
    }
}

impl<T: SizeOf> SizeOf for Option<T> {
    fn heap_size(&self) -> u64 {
        self.as_ref().map_or(0, SizeOf::heap_size)
    }
}

impl<T: SizeOf> SizeOf for Reverse<T> {
    fn heap_size(&self) -> u64 {
        self.0.heap_size()
    }
}

impl<A: SizeOf, B: SizeOf> SizeOf for (A, B) {
    fn heap_size(&self) -> u64 {
        self.0.heap_size() + self.1.heap_size()
    }
}

impl<A: SizeOf, B: SizeOf, C: SizeOf> SizeOf for (A, B, C) {
    fn heap_size(&self) -> u64 {
        self.0.heap_size() + self.1.heap_size() + self.2.heap_size()
    }
}
