//! Countdown timers for arrival slots.
//!
//! Every rendered arrival gets a timer that recomputes "time left" once a
//! second. Timers belong to the panel that rendered them and are aborted
//! when the panel re-renders; a timer whose element has been detached stops
//! on its next tick.

mod clock;
mod format;
mod timer;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub(crate) use clock::TokioClock;
pub use format::{CountdownFloor, EXPIRED_TEXT, Reading, Urgency, format_time_left};
pub use timer::{CountdownContext, CountdownSet, TICK};
