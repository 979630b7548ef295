//! PAL handle model as seen by the wait path.
//!
//! A handle either owns up to [`MAX_FDS`] host descriptor slots, each with
//! its own [`SlotFlags`], or exposes a [`Waitable`] capability for kinds
//! that have no native descriptor (events, semaphores). The two shapes are
//! separate variants of [`HandleBody`], so a handle is never ambiguously
//! both.
//!
//! Handles are created and destroyed by the surrounding PAL; the wait path
//! only reads the descriptors and updates the result flags.

mod flags;

pub use flags::SlotFlags;

#[cfg(any(debug_assertions, feature = "leak-trace"))]
use crate::leak::{AllocRegistry, AllocToken};

use crate::error::{PalError, PalResult};

use std::fmt;
use std::os::fd::RawFd;
use std::sync::Arc;
use std::time::Duration;

/// Number of descriptor slots carried by every handle.
pub const MAX_FDS: usize = 3;

/// Type tag of a PAL handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    File,
    Pipe,
    PipeServer,
    PipeClient,
    PipePrivate,
    Device,
    Directory,
    Tcp,
    TcpServer,
    Udp,
    UdpServer,
    Process,
    Thread,
    Mutex,
    Event,
    Semaphore,
    Gipc,
}

impl HandleKind {
    /// Stream kinds report a hang-up as "readable"; the wait path has to
    /// ask the host how many bytes are really pending.
    pub fn is_stream(self) -> bool {
        matches!(
            self,
            HandleKind::Pipe
                | HandleKind::PipePrivate
                | HandleKind::Tcp
                | HandleKind::Udp
                | HandleKind::Process
        )
    }
}

/// Wait capability of a handle kind without host descriptors.
///
/// Supplied by the handle constructor. The result is handed back to the
/// caller of the wait untouched.
pub trait Waitable: Send + Sync {
    /// Blocks until the object is signaled or `timeout` elapses.
    ///
    /// `None` waits forever, `Some(Duration::ZERO)` only polls.
    fn wait(&self, timeout: Option<Duration>) -> PalResult<()>;
}

/// Descriptor slots of a handle.
#[derive(Debug, Clone, Default)]
pub struct Descriptors {
    fds: [Option<RawFd>; MAX_FDS],
    flags: [SlotFlags; MAX_FDS],
}

/// What a handle exposes to the wait path.
pub enum HandleBody {
    /// Host descriptors multiplexed by the wait path.
    Descriptors(Descriptors),

    /// A kind-specific wait operation; `None` if the kind cannot be waited on.
    Waitable(Option<Arc<dyn Waitable>>),
}

/// Armed interest of one occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInterest {
    /// Slot index, `< MAX_FDS`.
    pub slot: usize,
    /// Host descriptor stored in the slot.
    pub fd: RawFd,
    /// Watch for readability.
    pub read: bool,
    /// Watch for writability.
    pub write: bool,
}

/// A PAL handle.
pub struct Handle {
    kind: HandleKind,
    body: HandleBody,

    #[cfg(any(debug_assertions, feature = "leak-trace"))]
    trace: Option<AllocToken>,
}

impl Handle {
    /// Creates a descriptor-backed handle.
    ///
    /// `None` entries leave a slot unused. All slots start without interest.
    ///
    /// # Errors
    ///
    /// Returns [`PalError::InvalidArgument`] if more than [`MAX_FDS`]
    /// slots are given or a descriptor is negative.
    pub fn with_descriptors(kind: HandleKind, fds: &[Option<RawFd>]) -> PalResult<Self> {
        if fds.len() > MAX_FDS {
            return Err(PalError::InvalidArgument);
        }

        let mut descriptors = Descriptors::default();

        for (slot, fd) in fds.iter().enumerate() {
            if let Some(fd) = *fd {
                if fd < 0 {
                    return Err(PalError::InvalidArgument);
                }
                descriptors.fds[slot] = Some(fd);
            }
        }

        Ok(Self::from_body(kind, HandleBody::Descriptors(descriptors)))
    }

    /// Creates a handle without host descriptors.
    pub fn with_waitable(kind: HandleKind, waitable: Option<Arc<dyn Waitable>>) -> Self {
        Self::from_body(kind, HandleBody::Waitable(waitable))
    }

    fn from_body(kind: HandleKind, body: HandleBody) -> Self {
        Self {
            kind,
            body,
            #[cfg(any(debug_assertions, feature = "leak-trace"))]
            trace: None,
        }
    }

    /// Registers this handle with a leak-trace registry.
    ///
    /// The allocation is attributed to the caller's source location and is
    /// released when the handle is dropped.
    #[cfg(any(debug_assertions, feature = "leak-trace"))]
    #[track_caller]
    pub fn traced(mut self, registry: &Arc<AllocRegistry>) -> Self {
        self.trace = Some(registry.track());
        self
    }

    /// Returns the kind tag of this handle.
    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Returns what this handle exposes to the wait path.
    pub fn body(&self) -> &HandleBody {
        &self.body
    }

    /// Whether the handle is multiplexed through host descriptors.
    pub fn has_descriptors(&self) -> bool {
        matches!(self.body, HandleBody::Descriptors(_))
    }

    /// Returns the descriptor stored in `slot`, if any.
    pub fn fd(&self, slot: usize) -> Option<RawFd> {
        match &self.body {
            HandleBody::Descriptors(d) => d.fds.get(slot).copied().flatten(),
            HandleBody::Waitable(_) => None,
        }
    }

    /// Returns the full flag state of `slot`.
    pub fn flags(&self, slot: usize) -> SlotFlags {
        match &self.body {
            HandleBody::Descriptors(d) => d.flags.get(slot).copied().unwrap_or_default(),
            HandleBody::Waitable(_) => SlotFlags::empty(),
        }
    }

    /// Replaces the interest of `slot`, keeping its results.
    ///
    /// Only the `READ` and `WRITE` bits of `interest` are used.
    ///
    /// # Errors
    ///
    /// Returns [`PalError::InvalidArgument`] if the slot does not exist and
    /// [`PalError::NotSupported`] for handles without descriptors.
    pub fn set_interest(&mut self, slot: usize, interest: SlotFlags) -> PalResult<()> {
        let HandleBody::Descriptors(d) = &mut self.body else {
            return Err(PalError::NotSupported);
        };

        let flags = d.flags.get_mut(slot).ok_or(PalError::InvalidArgument)?;
        *flags = (*flags & SlotFlags::RESULTS) | (interest & SlotFlags::INTEREST);

        Ok(())
    }

    /// Whether `slot` has been observed writable.
    pub fn is_writable(&self, slot: usize) -> bool {
        self.flags(slot).contains(SlotFlags::WRITABLE)
    }

    /// Whether `slot` has reported an error or end of stream.
    pub fn has_error(&self, slot: usize) -> bool {
        self.flags(slot).contains(SlotFlags::ERROR)
    }

    /// Clears every result flag so all interested slots are watched again.
    pub fn clear_results(&mut self) {
        if let HandleBody::Descriptors(d) = &mut self.body {
            for flags in d.flags.iter_mut() {
                flags.remove(SlotFlags::RESULTS);
            }
        }
    }

    /// Enumerates the occupied slots that still have armed interest.
    ///
    /// Unused slots, slots without interest and slots whose interest has
    /// already been answered are skipped. Handles without descriptors
    /// yield nothing.
    pub fn interests(&self) -> impl Iterator<Item = SlotInterest> + '_ {
        (0..MAX_FDS).filter_map(move |slot| {
            let fd = self.fd(slot)?;
            let flags = self.flags(slot);
            let read = flags.armed_read();
            let write = flags.armed_write();

            (read || write).then_some(SlotInterest {
                slot,
                fd,
                read,
                write,
            })
        })
    }

    /// ORs result bits into `slot`.
    pub(crate) fn mark(&mut self, slot: usize, results: SlotFlags) {
        if let HandleBody::Descriptors(d) = &mut self.body {
            if let Some(flags) = d.flags.get_mut(slot) {
                flags.insert(results & SlotFlags::RESULTS);
            }
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Handle");
        out.field("kind", &self.kind);

        match &self.body {
            HandleBody::Descriptors(d) => out.field("descriptors", d),
            HandleBody::Waitable(w) => out.field("waitable", &w.is_some()),
        };

        out.finish()
    }
}
