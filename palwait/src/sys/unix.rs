use super::{FdSet, Host};
use crate::timeout::to_timespec;

use libc::{c_int, pselect, timespec};
use std::io;
use std::os::fd::RawFd;
use std::ptr;
use std::time::Duration;

/// The real host: `pselect6` and `ioctl(FIONREAD)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysHost;

impl Host for SysHost {
    fn select(
        &self,
        nfds: i32,
        read: &mut FdSet,
        write: &mut FdSet,
        except: &mut FdSet,
        timeout: Option<Duration>,
    ) -> io::Result<usize> {
        let ts = timeout.map(to_timespec);
        let ts_ptr = ts
            .as_ref()
            .map_or(ptr::null(), |ts| ts as *const timespec);

        // SAFETY: the sets are valid for the duration of the call and the
        // timespec, if any, outlives it. No signal mask is installed.
        let rc = unsafe {
            pselect(
                nfds,
                read.as_mut_ptr(),
                write.as_mut_ptr(),
                except.as_mut_ptr(),
                ts_ptr,
                ptr::null(),
            )
        };

        if rc < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(rc as usize)
        }
    }

    fn bytes_available(&self, fd: RawFd) -> io::Result<usize> {
        let mut pending: c_int = 0;

        // SAFETY: FIONREAD writes a single int through the pointer.
        let rc = unsafe { libc::ioctl(fd, libc::FIONREAD, &mut pending as *mut c_int) };

        if rc < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(pending.max(0) as usize)
        }
    }
}
