//! Stack growth for deeply nested terms.
//!
//! Rule bodies can nest arbitrarily (long `~>` chains, right-nested lists),
//! and every pass over them is a recursive walk. Wrap each recursive step in
//! [`ensure_sufficient_stack`] so large definitions cannot overflow the
//! native stack. On `wasm32` the call is a plain passthrough.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
