//! Cross-thread wakeup for descriptor readiness waits.
//!
//! A readiness wait (`poll(2)`) only returns when a watched descriptor
//! becomes ready or the timeout elapses, which leaves other threads no way
//! to interrupt it. [`WakeupNotify`] closes that gap with the classic
//! self-pipe pattern: every wait transparently watches one extra pipe
//! descriptor, and [`wake`](WakeupNotify::wake) from any thread writes a
//! single byte to it. Wakes are coalesced, so no matter how many producers
//! signal between two waits, at most one byte ever sits in the pipe and the
//! next wait consumes it exactly once.
//!
//! The pattern is kept descriptor-based on purpose: it composes with any
//! third-party readiness wait that only understands file descriptors.

use parking_lot::Mutex;
use std::fmt::{Display, Formatter};
use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Readiness interest and result flags for one watched descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Events(libc::c_short);

impl Events {
    pub const NONE: Events = Events(0);
    pub const READABLE: Events = Events(libc::POLLIN);
    pub const WRITABLE: Events = Events(libc::POLLOUT);
    pub const ERROR: Events = Events(libc::POLLERR);
    pub const HANGUP: Events = Events(libc::POLLHUP);

    pub fn contains(self, other: Events) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Events {
    type Output = Events;

    fn bitor(self, rhs: Events) -> Events {
        Events(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Events {
    fn bitor_assign(&mut self, rhs: Events) {
        self.0 |= rhs.0;
    }
}

/// One entry in a [`WakeupNotify::wait`] call. The caller sets `fd` and
/// `interest`; the wait fills `readiness`.
#[derive(Debug, Clone, Copy)]
pub struct Watch {
    pub fd: RawFd,
    pub interest: Events,
    pub readiness: Events,
}

impl Watch {
    pub fn new(fd: RawFd, interest: Events) -> Self {
        Self {
            fd,
            interest,
            readiness: Events::NONE,
        }
    }
}

/// Faults of the wakeup primitive. Ordinary outcomes (timeout, zero ready
/// descriptors) are not errors.
#[derive(Debug)]
pub enum NotifyError {
    /// The self-pipe could not be established; the instance is unusable.
    CreationFailed(io::Error),
    /// Growing the descriptor scratch buffer failed; this wait call is
    /// lost but the instance remains usable.
    ScratchAllocationFailed,
    /// The wake byte could not be written; no wake is pending and the
    /// caller may retry.
    WriteFailed(io::Error),
    /// The underlying readiness wait failed.
    WaitFailed(io::Error),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::CreationFailed(err) => write!(f, "self-pipe creation failed: {err}"),
            NotifyError::ScratchAllocationFailed => {
                write!(f, "descriptor scratch buffer allocation failed")
            }
            NotifyError::WriteFailed(err) => write!(f, "wake write failed: {err}"),
            NotifyError::WaitFailed(err) => write!(f, "readiness wait failed: {err}"),
        }
    }
}

impl std::error::Error for NotifyError {}

/// `true` while a wake byte is sitting undrained in the pipe.
struct PipeState {
    event: bool,
}

/// Reusable `pollfd` working area. Grows to the largest descriptor set a
/// wait has serviced and never shrinks, so steady-state waits allocate
/// nothing.
struct WaitScratch {
    fds: Vec<libc::pollfd>,
}

/// Self-pipe wrapper around `poll(2)` that lets any thread interrupt a
/// blocked readiness wait.
///
/// [`wake`](Self::wake) may be called from arbitrarily many threads, with
/// or without a wait in flight; a wake that completes before a wait begins
/// is never lost. Only one thread should wait on an instance at a time;
/// concurrent waits are a caller error and simply serialize on an internal
/// guard.
pub struct WakeupNotify {
    read_fd: RawFd,
    write_fd: RawFd,
    pipe: Mutex<PipeState>,
    // exclusive wait guard; holds the scratch so a second waiter can never
    // race on the working area
    wait_guard: Mutex<WaitScratch>,
}

impl WakeupNotify {
    pub fn new() -> Result<Self, NotifyError> {
        let (read_fd, write_fd) = wake_pipe().map_err(NotifyError::CreationFailed)?;
        Ok(Self {
            read_fd,
            write_fd,
            pipe: Mutex::new(PipeState { event: false }),
            wait_guard: Mutex::new(WaitScratch { fds: Vec::new() }),
        })
    }

    /// Blocks until a watched descriptor becomes ready, the timeout
    /// elapses, or another thread wakes this instance.
    ///
    /// Fills `readiness` on every watch and returns the total number of
    /// ready descriptors; a delivered wakeup counts as one even though the
    /// internal descriptor never appears among the caller's watches.
    /// `None` waits indefinitely.
    pub fn wait(
        &self,
        watches: &mut [Watch],
        timeout: Option<Duration>,
    ) -> Result<usize, NotifyError> {
        let mut scratch = self.wait_guard.lock();
        let want = watches.len() + 1;
        scratch.fds.clear();
        if scratch.fds.capacity() < want {
            scratch
                .fds
                .try_reserve(want)
                .map_err(|_| NotifyError::ScratchAllocationFailed)?;
        }
        for watch in watches.iter() {
            scratch.fds.push(libc::pollfd {
                fd: watch.fd,
                events: watch.interest.0,
                revents: 0,
            });
        }
        scratch.fds.push(libc::pollfd {
            fd: self.read_fd,
            events: libc::POLLIN,
            revents: 0,
        });

        let timeout_ms: libc::c_int = match timeout {
            None => -1,
            Some(t) => {
                let ms = t.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
                // a non-zero timeout must actually wait; round sub-millisecond
                // values up instead of degrading to an immediate poll
                if ms == 0 && !t.is_zero() {
                    1
                } else {
                    ms
                }
            }
        };

        let hr = unsafe {
            libc::poll(
                scratch.fds.as_mut_ptr(),
                scratch.fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };
        let ready = if hr < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                // interrupted: report zero readiness rather than resuming
                // with a skewed timeout
                0
            } else {
                return Err(NotifyError::WaitFailed(err));
            }
        } else {
            hr as usize
        };

        for (watch, fd) in watches.iter_mut().zip(scratch.fds.iter()) {
            watch.readiness = Events(fd.revents);
        }
        let wake_hit = scratch
            .fds
            .last()
            .is_some_and(|fd| fd.revents & libc::POLLIN != 0);

        // drain only a reported wake byte; a wake arriving after the poll
        // returned stays pending for the next wait
        if wake_hit {
            let mut pipe = self.pipe.lock();
            let mut dummy = [0u8; 8];
            let drained =
                unsafe { libc::read(self.read_fd, dummy.as_mut_ptr().cast(), dummy.len()) };
            // the flag only clears once the byte is actually out of the pipe
            if drained > 0 {
                pipe.event = false;
            }
        }
        Ok(ready)
    }

    /// Signals the instance, forcing an in-flight or future wait to return
    /// promptly. Redundant wakes coalesce: if a wake byte is already
    /// pending, nothing is written.
    pub fn wake(&self) -> Result<(), NotifyError> {
        let mut pipe = self.pipe.lock();
        if pipe.event {
            return Ok(());
        }
        let hr = unsafe { libc::write(self.write_fd, [1u8].as_ptr().cast(), 1) };
        if hr == 1 {
            pipe.event = true;
            Ok(())
        } else {
            let err = if hr < 0 {
                io::Error::last_os_error()
            } else {
                io::Error::new(io::ErrorKind::WriteZero, "wake byte not written")
            };
            Err(NotifyError::WriteFailed(err))
        }
    }
}

impl Drop for WakeupNotify {
    fn drop(&mut self) {
        unsafe {
            let _ = libc::close(self.read_fd);
            let _ = libc::close(self.write_fd);
        }
    }
}

/// Creates the connected descriptor pair backing a [`WakeupNotify`].
fn wake_pipe() -> io::Result<(RawFd, RawFd)> {
    let mut fds = [0 as RawFd; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    for fd in fds {
        if unsafe { libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC) } != 0 {
            let err = io::Error::last_os_error();
            unsafe {
                let _ = libc::close(fds[0]);
                let _ = libc::close(fds[1]);
            }
            return Err(err);
        }
    }
    Ok((fds[0], fds[1]))
}
