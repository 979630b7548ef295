//! Host capabilities consumed by the wait path.
//!
//! The wait path needs exactly two things from the host:
//! - one multiplexed blocking wait over read, write and exception sets,
//! - a "bytes pending" query used to tell end of stream from real data.
//!
//! Both are behind the [`Host`] trait so tests can script the host. The
//! production implementation, [`SysHost`], issues `pselect6` and
//! `ioctl(FIONREAD)` directly.

mod fdset;

#[cfg(unix)]
mod unix;

pub use fdset::{FD_SETSIZE, FdSet};

#[cfg(unix)]
pub use unix::SysHost;

use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

/// Host primitives used by the wait path.
pub trait Host {
    /// Blocks until a descriptor in one of the sets is ready or `timeout`
    /// elapses.
    ///
    /// `nfds` is one past the highest descriptor in any set. On return the
    /// sets hold only the ready descriptors and the count of ready
    /// descriptors is returned; `0` means the timeout expired. `None` waits
    /// forever and `Some(Duration::ZERO)` must not block.
    fn select(
        &self,
        nfds: i32,
        read: &mut FdSet,
        write: &mut FdSet,
        except: &mut FdSet,
        timeout: Option<Duration>,
    ) -> io::Result<usize>;

    /// Returns the number of bytes that can be read from `fd` without
    /// blocking.
    fn bytes_available(&self, fd: RawFd) -> io::Result<usize>;
}

impl<H: Host + ?Sized> Host for &H {
    fn select(
        &self,
        nfds: i32,
        read: &mut FdSet,
        write: &mut FdSet,
        except: &mut FdSet,
        timeout: Option<Duration>,
    ) -> io::Result<usize> {
        (**self).select(nfds, read, write, except, timeout)
    }

    fn bytes_available(&self, fd: RawFd) -> io::Result<usize> {
        (**self).bytes_available(fd)
    }
}
