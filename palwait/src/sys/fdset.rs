use crate::error::{PalError, PalResult};

use libc::fd_set;
use std::fmt;
use std::mem::MaybeUninit;
use std::os::fd::RawFd;

/// Highest descriptor value (exclusive) a set can hold.
pub const FD_SETSIZE: usize = libc::FD_SETSIZE as usize;

/// A `select(2)` descriptor set.
///
/// Thin wrapper over `libc::fd_set` that refuses descriptors the kernel
/// structure cannot represent instead of writing out of bounds.
#[derive(Clone, Copy)]
pub struct FdSet {
    raw: fd_set,
}

impl FdSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        let mut raw = MaybeUninit::<fd_set>::uninit();

        // SAFETY: FD_ZERO fully initializes the set.
        let raw = unsafe {
            libc::FD_ZERO(raw.as_mut_ptr());
            raw.assume_init()
        };

        Self { raw }
    }

    /// Adds `fd` to the set.
    ///
    /// # Errors
    ///
    /// Returns [`PalError::DescriptorOutOfRange`] if `fd` is negative or
    /// not below [`FD_SETSIZE`].
    pub fn insert(&mut self, fd: RawFd) -> PalResult<()> {
        if !in_range(fd) {
            return Err(PalError::DescriptorOutOfRange { fd });
        }

        // SAFETY: `fd` is within the bounds of the bit array.
        unsafe { libc::FD_SET(fd, &mut self.raw) };
        Ok(())
    }

    /// Tests whether `fd` is in the set.
    pub fn contains(&self, fd: RawFd) -> bool {
        // SAFETY: `fd` is within the bounds of the bit array.
        in_range(fd) && unsafe { libc::FD_ISSET(fd, &self.raw) }
    }

    /// Empties the set.
    pub fn clear(&mut self) {
        // SAFETY: the set is initialized and exclusively borrowed.
        unsafe { libc::FD_ZERO(&mut self.raw) };
    }

    /// Iterates the members below `nfds` in ascending order.
    pub fn iter(&self, nfds: i32) -> impl Iterator<Item = RawFd> + '_ {
        let end = nfds.clamp(0, FD_SETSIZE as i32);
        (0..end).filter(move |fd| self.contains(*fd))
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut fd_set {
        &mut self.raw
    }
}

impl Default for FdSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter(FD_SETSIZE as i32)).finish()
    }
}

fn in_range(fd: RawFd) -> bool {
    fd >= 0 && (fd as usize) < FD_SETSIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = FdSet::new();
        assert!(!set.contains(3));

        set.insert(3).unwrap();
        set.insert(64).unwrap();
        assert!(set.contains(3));
        assert!(set.contains(64));
        assert!(!set.contains(4));
    }

    #[test]
    fn test_out_of_range_descriptors() {
        let mut set = FdSet::new();
        let too_big = FD_SETSIZE as RawFd;

        assert_eq!(
            set.insert(too_big),
            Err(PalError::DescriptorOutOfRange { fd: too_big })
        );
        assert_eq!(
            set.insert(-1),
            Err(PalError::DescriptorOutOfRange { fd: -1 })
        );
        assert!(!set.contains(too_big));
        assert!(!set.contains(-1));
    }

    #[test]
    fn test_iter_is_bounded_by_nfds() {
        let mut set = FdSet::new();
        set.insert(1).unwrap();
        set.insert(5).unwrap();
        set.insert(9).unwrap();

        assert_eq!(set.iter(6).collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(set.iter(10).collect::<Vec<_>>(), vec![1, 5, 9]);
    }

    #[test]
    fn test_clear() {
        let mut set = FdSet::new();
        set.insert(2).unwrap();
        set.clear();

        assert_eq!(set.iter(FD_SETSIZE as i32).count(), 0);
    }
}
