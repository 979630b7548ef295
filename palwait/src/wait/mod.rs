//! Waiting on one or many PAL handles.
//!
//! Descriptor-backed handles are multiplexed through a single blocking
//! host call per wait; handles without descriptors are dispatched to their
//! [`Waitable`](crate::handle::Waitable) capability. Nothing is retried
//! here: [`PalError::WouldBlock`] and [`PalError::Interrupted`] go back to
//! the caller, who decides whether to loop.
//!
//! Result flags are sticky. A slot that already reported an error is not
//! watched again, nor is a slot already known to be writable watched for
//! writing, until [`Handle::clear_results`] re-arms it.

mod sets;

use crate::builder::WaiterBuilder;
use crate::error::{PalError, PalResult};
use crate::handle::{Handle, HandleBody};
use crate::sys::{Host, SysHost};

use sets::WatchSets;
use std::time::Duration;

/// Entry point of the wait subsystem.
///
/// Holds the host capabilities and the configuration; it keeps no state
/// between calls, so one waiter can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Waiter<H = SysHost> {
    host: H,
    probe_eof: bool,
}

impl Waiter<SysHost> {
    /// Creates a waiter over the real host with default settings.
    pub fn new() -> Self {
        WaiterBuilder::new().build()
    }

    /// Starts configuring a waiter.
    pub fn builder() -> WaiterBuilder<SysHost> {
        WaiterBuilder::new()
    }
}

impl Default for Waiter<SysHost> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Waiter<H> {
    pub(crate) fn from_parts(host: H, probe_eof: bool) -> Self {
        Self { host, probe_eof }
    }

    /// Waits until `handle` has something to report or `timeout` elapses.
    ///
    /// `None` waits forever and `Some(Duration::ZERO)` only polls. On
    /// success the handle's result flags have been updated.
    ///
    /// # Errors
    ///
    /// - [`PalError::NotSupported`] if the handle can't be waited on at all.
    /// - [`PalError::WouldBlock`] if there is nothing to watch or nothing
    ///   became ready in time.
    /// - [`PalError::Interrupted`] if a signal interrupted the host call.
    /// - Any translated host error otherwise.
    ///
    /// Handles without descriptors return whatever their wait capability
    /// returns.
    pub fn wait_one(&self, handle: &mut Handle, timeout: Option<Duration>) -> PalResult<()> {
        if let HandleBody::Waitable(waitable) = handle.body() {
            return match waitable {
                Some(waitable) => waitable.wait(timeout),
                None => Err(PalError::NotSupported),
            };
        }

        let mut sets = WatchSets::new();

        if sets.add(handle)? == 0 {
            return Err(PalError::WouldBlock);
        }

        sets.select(&self.host, timeout)?;
        sets.apply(&self.host, handle, self.probe_eof);

        Ok(())
    }

    /// Waits until any handle in `handles` has something to report.
    ///
    /// Absent entries are skipped. Returns the index of the first handle,
    /// in list order, that had a slot reported. Flags are updated on every
    /// handle that had a slot reported, not only the chosen one.
    ///
    /// A list holding a single handle behaves exactly like
    /// [`wait_one`](Self::wait_one). In longer lists only descriptor-backed
    /// handles take part; wait capabilities are not consulted.
    ///
    /// # Errors
    ///
    /// As for [`wait_one`](Self::wait_one). An empty list, or one where no
    /// handle has an armed slot, fails with [`PalError::WouldBlock`].
    pub fn wait_any(
        &self,
        handles: &mut [Option<&mut Handle>],
        timeout: Option<Duration>,
    ) -> PalResult<usize> {
        match handles {
            [] | [None] => return Err(PalError::WouldBlock),
            [Some(handle)] => return self.wait_one(handle, timeout).map(|()| 0),
            _ => {}
        }

        let mut sets = WatchSets::new();
        let mut armed = 0;

        for handle in handles.iter().flatten().filter(|h| h.has_descriptors()) {
            armed += sets.add(handle)?;
        }

        if armed == 0 {
            return Err(PalError::WouldBlock);
        }

        sets.select(&self.host, timeout)?;

        let mut chosen = None;

        for (index, entry) in handles.iter_mut().enumerate() {
            let Some(handle) = entry else {
                continue;
            };

            if sets.apply(&self.host, handle, self.probe_eof) && chosen.is_none() {
                chosen = Some(index);
            }
        }

        chosen.ok_or(PalError::WouldBlock)
    }
}

/// Waits on one handle using the real host.
///
/// Shorthand for [`Waiter::wait_one`] on a default [`Waiter`].
pub fn wait_one(handle: &mut Handle, timeout: Option<Duration>) -> PalResult<()> {
    Waiter::new().wait_one(handle, timeout)
}

/// Waits on several handles using the real host.
///
/// Shorthand for [`Waiter::wait_any`] on a default [`Waiter`].
pub fn wait_any(handles: &mut [Option<&mut Handle>], timeout: Option<Duration>) -> PalResult<usize> {
    Waiter::new().wait_any(handles, timeout)
}
