//! Timeline queries over a placed schedule.
//!
//! This module provides free-gap detection inside a day window.

mod gap;

pub use gap::{find_gaps, total_free, GapKind, TimeGap};
