//! PAL timeout conventions.
//!
//! PAL callers express timeouts in microseconds as a signed integer: any
//! negative value waits forever and `0` polls. Inside the crate a timeout is
//! an `Option<Duration>` where `None` waits forever.

use libc::timespec;
use std::mem;
use std::time::Duration;

/// Microsecond value meaning "no timeout".
pub const NO_TIMEOUT: i64 = -1;

/// Converts a PAL microsecond timeout.
pub fn from_micros(micros: i64) -> Option<Duration> {
    u64::try_from(micros).ok().map(Duration::from_micros)
}

/// Splits a duration into the `timespec` expected by `pselect6`.
pub(crate) fn to_timespec(timeout: Duration) -> timespec {
    // SAFETY: timespec is plain old data; some targets carry padding fields.
    let mut ts: timespec = unsafe { mem::zeroed() };

    ts.tv_sec = timeout
        .as_secs()
        .try_into()
        .unwrap_or(libc::time_t::MAX);
    ts.tv_nsec = timeout.subsec_nanos() as _;

    ts
}
