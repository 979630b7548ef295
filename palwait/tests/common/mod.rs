#![allow(dead_code)]

use palwait::sys::{FdSet, Host};
use palwait::{PalResult, Waitable};

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

/// What the scripted host does on the next `select`.
pub enum Outcome {
    /// Reports the given descriptors, restricted to those actually watched.
    Ready {
        read: Vec<RawFd>,
        write: Vec<RawFd>,
        except: Vec<RawFd>,
    },
    /// Overwrites the sets and the count without looking at the input.
    Raw {
        read: Vec<RawFd>,
        write: Vec<RawFd>,
        except: Vec<RawFd>,
        count: usize,
    },
    /// The timeout expires with nothing ready.
    Timeout,
    /// The call fails with the given errno.
    Fail(i32),
}

impl Outcome {
    pub fn readable(fds: &[RawFd]) -> Self {
        Outcome::Ready {
            read: fds.to_vec(),
            write: Vec::new(),
            except: Vec::new(),
        }
    }

    pub fn writable(fds: &[RawFd]) -> Self {
        Outcome::Ready {
            read: Vec::new(),
            write: fds.to_vec(),
            except: Vec::new(),
        }
    }

    pub fn errored(fds: &[RawFd]) -> Self {
        Outcome::Ready {
            read: Vec::new(),
            write: Vec::new(),
            except: fds.to_vec(),
        }
    }
}

/// Sets and timeout handed to one `select`.
#[derive(Debug, Clone)]
pub struct SelectCall {
    pub nfds: i32,
    pub read: Vec<RawFd>,
    pub write: Vec<RawFd>,
    pub except: Vec<RawFd>,
    pub timeout: Option<Duration>,
}

/// A host whose answers are scripted by the test.
#[derive(Default)]
pub struct ScriptedHost {
    outcomes: Mutex<VecDeque<Outcome>>,
    pending: Mutex<HashMap<RawFd, Option<usize>>>,
    calls: Mutex<Vec<SelectCall>>,
    queries: Mutex<Vec<RawFd>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: Outcome) -> Self {
        self.outcomes.lock().push_back(outcome);
        self
    }

    /// Scripts the pending-bytes answer for `fd`; `None` makes it fail.
    pub fn pending(self, fd: RawFd, bytes: Option<usize>) -> Self {
        self.pending.lock().insert(fd, bytes);
        self
    }

    pub fn calls(&self) -> Vec<SelectCall> {
        self.calls.lock().clone()
    }

    pub fn queries(&self) -> Vec<RawFd> {
        self.queries.lock().clone()
    }
}

fn members(set: &FdSet, nfds: i32) -> Vec<RawFd> {
    set.iter(nfds).collect()
}

fn fill(set: &mut FdSet, fds: &[RawFd], watched: Option<&[RawFd]>) -> usize {
    set.clear();
    let mut count = 0;

    for &fd in fds {
        if watched.is_none_or(|w| w.contains(&fd)) {
            set.insert(fd).expect("scripted descriptor out of range");
            count += 1;
        }
    }

    count
}

impl Host for ScriptedHost {
    fn select(
        &self,
        nfds: i32,
        read: &mut FdSet,
        write: &mut FdSet,
        except: &mut FdSet,
        timeout: Option<Duration>,
    ) -> io::Result<usize> {
        let call = SelectCall {
            nfds,
            read: members(read, nfds),
            write: members(write, nfds),
            except: members(except, nfds),
            timeout,
        };
        self.calls.lock().push(call.clone());

        let outcome = self
            .outcomes
            .lock()
            .pop_front()
            .expect("unscripted select call");

        match outcome {
            Outcome::Ready {
                read: r,
                write: w,
                except: e,
            } => {
                let mut count = fill(read, &r, Some(call.read.as_slice()));
                count += fill(write, &w, Some(call.write.as_slice()));
                count += fill(except, &e, Some(call.except.as_slice()));
                Ok(count)
            }
            Outcome::Raw {
                read: r,
                write: w,
                except: e,
                count,
            } => {
                fill(read, &r, None);
                fill(write, &w, None);
                fill(except, &e, None);
                Ok(count)
            }
            Outcome::Timeout => {
                read.clear();
                write.clear();
                except.clear();
                Ok(0)
            }
            Outcome::Fail(errno) => Err(io::Error::from_raw_os_error(errno)),
        }
    }

    fn bytes_available(&self, fd: RawFd) -> io::Result<usize> {
        self.queries.lock().push(fd);

        match self.pending.lock().get(&fd) {
            Some(Some(bytes)) => Ok(*bytes),
            Some(None) => Err(io::Error::from_raw_os_error(libc::EBADF)),
            None => Ok(1),
        }
    }
}

/// A wait capability that returns a fixed result and counts its calls.
pub struct FixedWaitable {
    result: PalResult<()>,
    pub calls: Mutex<Vec<Option<Duration>>>,
}

impl FixedWaitable {
    pub fn new(result: PalResult<()>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl Waitable for FixedWaitable {
    fn wait(&self, timeout: Option<Duration>) -> PalResult<()> {
        self.calls.lock().push(timeout);
        self.result
    }
}
