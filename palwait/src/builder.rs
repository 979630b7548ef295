use crate::sys::{Host, SysHost};
use crate::wait::Waiter;

/// Builder for configuring and creating a [`Waiter`].
///
/// By default the waiter talks to the real host and probes stream
/// descriptors for end of stream when they are reported readable.
///
/// # Examples
///
/// ```rust,ignore
/// let waiter = WaiterBuilder::new()
///     .probe_eof(false)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct WaiterBuilder<H = SysHost> {
    /// Host capabilities used by the waiter.
    host: H,

    /// Whether readable stream descriptors are checked for end of stream.
    probe_eof: bool,
}

impl WaiterBuilder<SysHost> {
    /// Creates a `WaiterBuilder` with default configuration.
    pub fn new() -> Self {
        Self {
            host: SysHost,
            probe_eof: true,
        }
    }
}

impl<H: Host> WaiterBuilder<H> {
    /// Replaces the host the waiter calls into.
    ///
    /// Mostly useful to inject a scripted host in tests.
    pub fn host<H2: Host>(self, host: H2) -> WaiterBuilder<H2> {
        WaiterBuilder {
            host,
            probe_eof: self.probe_eof,
        }
    }

    /// Enables or disables the end-of-stream probe.
    ///
    /// When disabled, a stream reported readable is never reclassified as
    /// closed and no pending-bytes query is issued.
    pub fn probe_eof(mut self, enabled: bool) -> Self {
        self.probe_eof = enabled;
        self
    }

    /// Builds the waiter with the configured options.
    pub fn build(self) -> Waiter<H> {
        Waiter::from_parts(self.host, self.probe_eof)
    }
}

impl Default for WaiterBuilder<SysHost> {
    /// Creates a default `WaiterBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
