//! Panel geometry constants.
//!
//! Editing `GROUPS` (or switching to the `groups6` feature) reconfigures
//! the whole display; every other size in this module is derived from it.

/// Number of 8-column panel groups in the chain.
#[cfg(not(feature = "groups6"))]
pub const GROUPS: usize = 4;
#[cfg(feature = "groups6")]
pub const GROUPS: usize = 6;

/// Columns per group.
pub const GROUPCOLS: usize = 8;
/// Display rows (fixed by the panel hardware).
pub const H: usize = 5;
/// Panels per group.
pub const PPG: usize = 2;

/// Display width in columns.
pub const W: usize = GROUPS * GROUPCOLS;
/// Total panels in the chain.
pub const PANELS: usize = GROUPS * PPG;
/// Size in bytes of `buf` / `cur`.
pub const BUFLEN: usize = GROUPS * H;
/// Size in bytes of `req`.
pub const REQLEN: usize = PANELS * H;

/// Rolling-window width: ticks a coil stays energized before being relaxed.
///
/// Variant A from the design notes (supports ABORT, commits `cur` inside
/// `energize_column`).
pub const COL_POWER: usize = 4;

/// Sweep cursor value at which a BUSY sweep must end.
pub const COL_OVER: usize = W + COL_POWER;
