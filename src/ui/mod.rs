//! Client-side UI helpers expressed as plain, time-explicit state.
//!
//! None of these touch a clock, a DOM, or a timer on their own: callers
//! pass the current [`std::time::Instant`] (or elapsed time) in, which keeps
//! every helper deterministic and testable.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`shortcuts`] | Keyboard chord normalization, matching, and display |
//! | [`motion`] | Easing, counters, parallax, scroll and reading progress |
//! | [`typing`] | Typing/deleting text cycle |
//! | [`toast`] | Toast queue with auto-dismiss |
//! | [`debounce`] | Settle-after-delay input holder |

pub mod debounce;
pub mod motion;
pub mod shortcuts;
pub mod toast;
pub mod typing;
