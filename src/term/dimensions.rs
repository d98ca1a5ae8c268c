//! Terminal-dimension prober.
//!
//! A `(width, height)` cache behind a lock, kept current by a probe-then-
//! wait loop: recomputed from hand-decoded CPR reports delivered by the
//! input decoder, rather than trusting `crossterm::terminal::size()`
//! directly.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::RwLock;

use super::ansi::queue_dimension_probe;
use crate::error::Error;
use crate::trigger::{Subscription, Trigger};

struct Shared {
    size: RwLock<(u16, u16)>,
    trigger: Trigger,
}

/// A cloneable handle over the shared `(width, height)` cache.
#[derive(Clone)]
pub struct Dimensions(Arc<Shared>);

impl Dimensions {
    pub fn new() -> Self {
        Self(Arc::new(Shared {
            size: RwLock::new((0, 0)),
            trigger: Trigger::new(),
        }))
    }

    /// A `(width, height)` snapshot; `(0, 0)` until the first CPR arrives.
    pub fn size(&self) -> (u16, u16) {
        *self.0.size.read()
    }

    pub fn subscribe(&self) -> Subscription {
        self.0.trigger.subscribe()
    }

    /// Called by the input decoder when it parses a CPR report.
    pub fn handle_cpr(&self, row: u16, col: u16) {
        *self.0.size.write() = (col, row);
        self.0.trigger.notify();
    }

    fn probe(&self) -> Result<(), Error> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        queue_dimension_probe(&mut out).map_err(Error::Tty)?;
        out.flush().map_err(Error::Tty)
    }

    /// Probe once at startup, then loop `wait on SIGWINCH; probe` (spec
    /// §4.C event loop).
    pub fn run(&self, mut winch: Subscription) -> Result<(), Error> {
        self.probe()?;
        loop {
            winch.wait();
            self.probe()?;
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new()
    }
}
