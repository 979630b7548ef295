//! # palwait
//!
//! **palwait** is the object-wait subsystem of a platform abstraction layer
//! (PAL) sitting beneath a library OS. It lets higher PAL layers block on,
//! or poll, one or many opaque handles (pipes, sockets, processes, events,
//! semaphores) and learn which became ready.
//!
//! It provides:
//!
//! - A **uniform wait contract** over heterogeneous handle kinds: handles
//!   with host descriptors are multiplexed, the rest dispatch to their own
//!   wait capability
//! - **One blocking host call per wait**, whether waiting on one handle or
//!   many
//! - **End-of-stream detection** for stream kinds, reported as an error on
//!   the slot rather than as readability
//! - **Recoverable failures** for timeouts and signal interruption, left to
//!   the caller to retry
//! - An optional **allocation leak tracer** for debug builds
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use palwait::{Handle, HandleKind, SlotFlags, Waiter};
//! use std::time::Duration;
//!
//! let mut pipe = Handle::with_descriptors(HandleKind::PipePrivate, &[Some(write_fd)])?;
//! pipe.set_interest(0, SlotFlags::WRITE)?;
//!
//! let waiter = Waiter::new();
//! waiter.wait_one(&mut pipe, Some(Duration::from_millis(100)))?;
//! assert!(pipe.is_writable(0));
//! ```
//!
//! ## Modules
//!
//! - [`handle`] — Handle kinds, descriptor slots and their flags
//! - [`readiness`] — Readable-versus-closed classification
//! - [`sys`] — Host capabilities and the `pselect6` backend
//! - [`timeout`] — PAL microsecond timeouts
//! - [`error`] — Error taxonomy
//! - `leak` — Allocation leak tracing (debug builds)

mod builder;
mod wait;

pub mod error;
pub mod handle;
pub mod readiness;
pub mod sys;
pub mod timeout;

#[cfg(any(debug_assertions, feature = "leak-trace"))]
pub mod leak;

pub use builder::WaiterBuilder;
pub use error::{PalError, PalResult};
pub use handle::{Handle, HandleKind, MAX_FDS, SlotFlags, Waitable};
pub use wait::{Waiter, wait_any, wait_one};

#[cfg(any(debug_assertions, feature = "leak-trace"))]
pub use leak::{AllocRecord, AllocRegistry};
