//! Readable-versus-closed classification.
//!
//! `select(2)` reports a stream whose peer hung up as readable. For stream
//! kinds the wait path asks the host how many bytes are pending: none, or a
//! failing query, means end of stream, which is reported as an error on the
//! slot so blocking readers treat EOF like any other failure.

use crate::handle::HandleKind;
use crate::sys::Host;

use log::trace;
use std::os::fd::RawFd;

/// What a host-reported "readable" descriptor really means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Data is pending (or the kind cannot tell).
    Readable,

    /// The peer closed the stream.
    Closed,
}

/// Classifies a descriptor that the host reported readable.
///
/// Only issues a host query for stream kinds; call it once per readable
/// slot and never for slots the host did not report.
pub fn classify_readable<H: Host + ?Sized>(host: &H, kind: HandleKind, fd: RawFd) -> Readiness {
    if !kind.is_stream() {
        return Readiness::Readable;
    }

    match host.bytes_available(fd) {
        Ok(0) => {
            trace!("fd {fd} readable with nothing pending, treating as closed");
            Readiness::Closed
        }
        Err(err) => {
            trace!("fd {fd} pending-bytes query failed ({err}), treating as closed");
            Readiness::Closed
        }
        Ok(_) => Readiness::Readable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::FdSet;

    use std::cell::Cell;
    use std::io;
    use std::time::Duration;

    struct Pending {
        answer: Option<usize>,
        queries: Cell<usize>,
    }

    impl Pending {
        fn new(answer: Option<usize>) -> Self {
            Self {
                answer,
                queries: Cell::new(0),
            }
        }
    }

    impl Host for Pending {
        fn select(
            &self,
            _nfds: i32,
            _read: &mut FdSet,
            _write: &mut FdSet,
            _except: &mut FdSet,
            _timeout: Option<Duration>,
        ) -> io::Result<usize> {
            unreachable!("classification never selects")
        }

        fn bytes_available(&self, _fd: RawFd) -> io::Result<usize> {
            self.queries.set(self.queries.get() + 1);
            self.answer
                .ok_or_else(|| io::Error::from_raw_os_error(libc::EBADF))
        }
    }

    #[test]
    fn test_stream_with_data_is_readable() {
        let host = Pending::new(Some(12));

        assert_eq!(classify_readable(&host, HandleKind::Tcp, 3), Readiness::Readable);
        assert_eq!(host.queries.get(), 1);
    }

    #[test]
    fn test_stream_without_data_is_closed() {
        let host = Pending::new(Some(0));

        assert_eq!(classify_readable(&host, HandleKind::Pipe, 3), Readiness::Closed);
    }

    #[test]
    fn test_failed_query_is_closed() {
        let host = Pending::new(None);

        assert_eq!(classify_readable(&host, HandleKind::Udp, 3), Readiness::Closed);
    }

    #[test]
    fn test_non_stream_skips_query() {
        let host = Pending::new(Some(0));

        assert_eq!(
            classify_readable(&host, HandleKind::TcpServer, 3),
            Readiness::Readable
        );
        assert_eq!(host.queries.get(), 0);
    }
}
