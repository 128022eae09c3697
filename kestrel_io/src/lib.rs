//! Low-level building blocks for socket event loops.
//!
//! Two primitives carry the real design weight here: [`AsyncReader`], which
//! turns an arbitrarily fragmented incoming byte stream into discrete
//! frames (bytes, delimited lines, or fixed-size blocks), and
//! [`WakeupNotify`], which wraps a self-pipe into every descriptor
//! readiness wait so any thread can interrupt a blocked waiter without
//! lost or duplicated wakeups. The remaining modules are small supporting
//! pieces: the byte queue the reader buffers through, and ANSI console
//! helpers for server-side terminal output.

pub mod byte_queue;
pub mod console;
#[cfg(unix)]
pub mod notify;
pub mod reader;

pub use byte_queue::ByteQueue;
#[cfg(unix)]
pub use notify::{Events, NotifyError, WakeupNotify, Watch};
pub use reader::{AsyncReader, ReadError, ReadMode};

pub use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
