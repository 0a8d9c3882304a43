/*!
 * Process Isolation
 *
 * Each benchmark iteration runs in a freshly forked child so that no
 * allocator or scheduler state carries over between runs. The child writes
 * its elapsed time into an anonymous shared mapping created before the first
 * fork; the parent reads it back after `waitpid`.
 */

use super::elapsed::Elapsed;
use crate::core::errors::BenchError;
use crate::core::types::BenchResult;
use nix::sys::mman::{mmap_anonymous, munmap, MapFlags, ProtFlags};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};
use serde::{Deserialize, Serialize};
use std::ffi::c_void;
use std::fmt;
use std::mem;
use std::num::NonZeroUsize;
use std::ptr::{self, NonNull};
use tracing::debug;

/// How benchmark iterations are separated from each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Isolation {
    /// One forked child process per iteration
    #[default]
    Fork,
    /// All iterations in the calling process
    InProcess,
}

impl fmt::Display for Isolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fork => write!(f, "fork"),
            Self::InProcess => write!(f, "in-process"),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy)]
struct Slot {
    recorded: u64,
    elapsed: Elapsed,
}

/// Anonymous `MAP_SHARED` region with one elapsed-time slot per iteration
///
/// Mappings survive `fork`, so a slot written by a child is visible to the
/// parent once the child has exited.
pub struct ResultRegion {
    base: NonNull<Slot>,
    slots: usize,
    len: usize,
}

impl ResultRegion {
    pub fn new(slots: usize) -> BenchResult<Self> {
        let len = slots
            .checked_mul(mem::size_of::<Slot>())
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                BenchError::InvalidConfig(format!("cannot map a result region for {slots} runs"))
            })?;

        // SAFETY: fresh anonymous mapping with no address hint; the kernel
        // zero-fills it, which is a valid unrecorded `Slot`.
        let base = unsafe {
            mmap_anonymous(
                None,
                len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
            )
        }
        .map_err(BenchError::SharedMemory)?;

        debug!(slots, bytes = len.get(), "result region mapped");
        Ok(Self {
            base: base.cast(),
            slots,
            len: len.get(),
        })
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Store the elapsed time of run `index`; out-of-range indices are ignored
    pub fn record(&self, index: usize, elapsed: Elapsed) {
        if let Some(slot) = self.slot(index) {
            // SAFETY: in bounds; volatile so the store reaches the shared
            // page before the child exits.
            unsafe {
                ptr::write_volatile(
                    slot,
                    Slot {
                        recorded: 1,
                        elapsed,
                    },
                )
            }
        }
    }

    /// Elapsed time of run `index`, if the run recorded one
    pub fn read(&self, index: usize) -> Option<Elapsed> {
        let slot = self.slot(index)?;
        // SAFETY: in bounds; the writer has exited before the parent reads.
        let slot = unsafe { ptr::read_volatile(slot) };
        (slot.recorded != 0).then_some(slot.elapsed)
    }

    fn slot(&self, index: usize) -> Option<*mut Slot> {
        // SAFETY: `index < slots` keeps the offset inside the mapping.
        (index < self.slots).then(|| unsafe { self.base.as_ptr().add(index) })
    }
}

impl Drop for ResultRegion {
    fn drop(&mut self) {
        // SAFETY: the mapping was created by `new` with exactly `len` bytes
        // and no reference into it outlives `self`.
        let result = unsafe { munmap(self.base.cast::<c_void>(), self.len) };
        if let Err(e) = result {
            debug!(error = %e, "result region unmap failed");
        }
    }
}

impl fmt::Debug for ResultRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultRegion")
            .field("slots", &self.slots)
            .field("bytes", &self.len)
            .finish()
    }
}

/// Which side of a fork the caller is on
pub enum Forked {
    Parent(Pid),
    Child,
}

/// Fork the calling process
///
/// Must be called while the process is single-threaded; the child then owns
/// a consistent copy of every lock.
pub fn fork_run() -> BenchResult<Forked> {
    // SAFETY: the driver forks from the main thread before any worker thread
    // of the iteration exists, and the previous iteration's threads all ran
    // in a child that has already been reaped.
    match unsafe { fork() }.map_err(BenchError::Fork)? {
        ForkResult::Parent { child } => Ok(Forked::Parent(child)),
        ForkResult::Child => Ok(Forked::Child),
    }
}

/// Wait for `child` and fail unless it exited with status 0
pub fn reap(child: Pid, iteration: usize) -> BenchResult<()> {
    match waitpid(child, None).map_err(BenchError::Wait)? {
        WaitStatus::Exited(_, 0) => Ok(()),
        WaitStatus::Exited(_, code) => Err(BenchError::ChildFailed {
            iteration,
            status: format!("exit code {code}"),
        }),
        WaitStatus::Signaled(_, signal, _) => Err(BenchError::ChildFailed {
            iteration,
            status: format!("killed by {signal}"),
        }),
        other => Err(BenchError::ChildFailed {
            iteration,
            status: format!("{other:?}"),
        }),
    }
}
