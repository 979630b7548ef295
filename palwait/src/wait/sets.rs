use crate::error::{PalError, PalResult};
use crate::handle::{Handle, MAX_FDS, SlotFlags};
use crate::readiness::{Readiness, classify_readable};
use crate::sys::{FdSet, Host};

use log::{debug, trace, warn};
use std::time::Duration;

/// Read, write and exception sets of one multiplexed wait.
///
/// Built from one or more handles, handed to the host once, then used to
/// update the flags of the same handles.
pub(crate) struct WatchSets {
    read: FdSet,
    write: FdSet,
    except: FdSet,
    nfds: i32,
}

impl WatchSets {
    pub(crate) fn new() -> Self {
        Self {
            read: FdSet::new(),
            write: FdSet::new(),
            except: FdSet::new(),
            nfds: 0,
        }
    }

    /// Adds every armed slot of `handle` and returns how many were added.
    ///
    /// Each watched descriptor also goes into the exception set so hang-ups
    /// are seen whatever direction was asked for.
    pub(crate) fn add(&mut self, handle: &Handle) -> PalResult<usize> {
        let mut added = 0;

        for interest in handle.interests() {
            let fd = interest.fd;

            if interest.read {
                self.read.insert(fd)?;
                self.except.insert(fd)?;
            }

            if interest.write {
                self.write.insert(fd)?;
                self.except.insert(fd)?;
            }

            self.nfds = self.nfds.max(fd + 1);
            added += 1;
        }

        Ok(added)
    }

    /// Runs the single blocking host call over the sets.
    ///
    /// On success the sets hold only the ready descriptors.
    pub(crate) fn select<H: Host + ?Sized>(
        &mut self,
        host: &H,
        timeout: Option<Duration>,
    ) -> PalResult<usize> {
        trace!(
            "select nfds={} read={:?} write={:?} except={:?} timeout={:?}",
            self.nfds, self.read, self.write, self.except, timeout
        );

        let ready = host
            .select(
                self.nfds,
                &mut self.read,
                &mut self.write,
                &mut self.except,
                timeout,
            )
            .map_err(|err| {
                let err = PalError::from(err);
                match err {
                    PalError::Interrupted => debug!("select interrupted by a signal"),
                    _ => warn!("select failed: {err}"),
                }
                err
            })?;

        if ready == 0 {
            debug!("select timed out after {timeout:?}");
            return Err(PalError::WouldBlock);
        }

        trace!("select reported {ready} ready descriptors");
        Ok(ready)
    }

    /// Records what the host reported for `handle`'s armed slots.
    ///
    /// Returns `true` if any slot of the handle was reported.
    pub(crate) fn apply<H: Host + ?Sized>(
        &self,
        host: &H,
        handle: &mut Handle,
        probe_eof: bool,
    ) -> bool {
        let kind = handle.kind();

        let mut armed = [None; MAX_FDS];
        for interest in handle.interests() {
            armed[interest.slot] = Some(interest);
        }

        let mut fired = false;

        for interest in armed.into_iter().flatten() {
            let fd = interest.fd;
            let readable = self.read.contains(fd);
            let writable = self.write.contains(fd);
            let errored = self.except.contains(fd);

            if !(readable || writable || errored) {
                continue;
            }

            fired = true;
            let mut results = SlotFlags::empty();

            if readable && probe_eof && classify_readable(host, kind, fd) == Readiness::Closed {
                results |= SlotFlags::ERROR;
            }

            if writable {
                results |= SlotFlags::WRITABLE;
            }

            if errored {
                results |= SlotFlags::ERROR;
            }

            handle.mark(interest.slot, results);
        }

        fired
    }
}
