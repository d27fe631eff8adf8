//! executor::signal
//!
//! Watching for SIGINT (Ctrl-C) and, on Unix, SIGTERM around the guarded run.
//!
//! A signal that reaches the wrapper while it waits for the lock or while
//! rclone runs must not kill it outright: the wait is abandoned, the child is
//! killed, and control returns to the scope holding the process lock so the
//! lock is released normally.
//!
//! # Registration
//!
//! [`Shutdown::install`] registers the handlers immediately, so it must run
//! before the lock file is created. Signals that arrive between installation
//! and the first wait are buffered and seen by that wait.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use tokio::runtime::Runtime;

use crate::core::ops::Clock;

/// A signal that stops a running command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// SIGINT / Ctrl-C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl Signal {
    /// Conventional shell exit code for a process stopped by this signal.
    pub fn exit_code(self) -> i32 {
        match self {
            Signal::Interrupt => 128 + 2,
            Signal::Terminate => 128 + 15,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => f.write_str("SIGINT"),
            Signal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Registered listeners for the signals that stop a guarded run.
#[derive(Debug)]
pub struct Shutdown {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl Shutdown {
    /// Register the signal handlers now.
    ///
    /// Must be called from within a tokio runtime context. On platforms
    /// without Unix signals, Ctrl-C is only watched while a wait is running.
    pub fn install() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }

        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Wait for the next signal.
    pub async fn recv(&mut self) -> Signal {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => Signal::Interrupt,
                _ = self.terminate.recv() => Signal::Terminate,
            }
        }

        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
            Signal::Interrupt
        }
    }
}

/// Runs waits on a runtime, cutting them short when a signal arrives.
///
/// Also serves as the [`Clock`] for lock acquisition: a signal during a
/// pause cancels the acquisition. Once a signal has been received every
/// later wait returns at once.
#[derive(Debug)]
pub struct Interruptible<'a> {
    runtime: &'a Runtime,
    shutdown: RefCell<Shutdown>,
    received: Cell<Option<Signal>>,
}

impl<'a> Interruptible<'a> {
    /// Wait on `runtime`, watching the already installed `shutdown`.
    pub fn new(runtime: &'a Runtime, shutdown: Shutdown) -> Self {
        Self {
            runtime,
            shutdown: RefCell::new(shutdown),
            received: Cell::new(None),
        }
    }

    /// The first signal received, if any.
    pub fn received(&self) -> Option<Signal> {
        self.received.get()
    }

    /// Drive `future` to completion unless a signal arrives first.
    ///
    /// On a signal the future is dropped before this returns.
    pub fn run<F: Future>(&self, future: F) -> Result<F::Output, Signal> {
        if let Some(signal) = self.received.get() {
            return Err(signal);
        }

        let mut shutdown = self.shutdown.borrow_mut();
        let outcome = self.runtime.block_on(async {
            tokio::select! {
                output = future => Ok(output),
                signal = shutdown.recv() => Err(signal),
            }
        });

        if let Err(signal) = &outcome {
            self.received.set(Some(*signal));
        }
        outcome
    }
}

impl Clock for Interruptible<'_> {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        let _ = self.run(tokio::time::sleep(duration));
    }

    fn cancelled(&self) -> bool {
        self.received.get().is_some()
    }
}
