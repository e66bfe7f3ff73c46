//! Scoped thread pinning for stress measurements
//!
//! A [`ThreadPin`] binds a stress measurement to the OS thread that acquired
//! it. The guard is `!Send`, so neither it nor a measurement holding it can be
//! moved to another thread, and the pin is released by `Drop` on every exit
//! path, unwinding included. Pins nest: [`is_pinned`] stays true until the
//! outermost guard is dropped.

use std::cell::Cell;
use std::marker::PhantomData;
use std::thread::{self, ThreadId};

thread_local! {
    static PIN_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// RAII guard pinning the current measurement to the current OS thread
#[derive(Debug)]
pub struct ThreadPin {
    thread: ThreadId,
    _not_send: PhantomData<*const ()>,
}

impl ThreadPin {
    /// Pin the calling thread until the guard is dropped
    pub fn acquire() -> Self {
        PIN_DEPTH.with(|depth| depth.set(depth.get() + 1));

        Self {
            thread: thread::current().id(),
            _not_send: PhantomData,
        }
    }

    /// Thread the pin was acquired on
    pub fn thread_id(&self) -> ThreadId {
        self.thread
    }
}

impl Drop for ThreadPin {
    fn drop(&mut self) {
        PIN_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Whether the calling thread currently holds a pin
pub fn is_pinned() -> bool {
    PIN_DEPTH.with(|depth| depth.get() > 0)
}
