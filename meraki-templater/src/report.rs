//! Progress reporting hooks
//!
//! The pipeline narrates its work through the [`Reporter`] trait instead of
//! printing directly, so the console rendering stays a caller concern and
//! tests can run silently.

use std::sync::atomic::{AtomicUsize, Ordering};

use colored::Colorize;

/// Hooks a caller can wire to any reporting mechanism.
pub trait Reporter: Send + Sync {
    /// A batch of `total` items is about to be processed.
    fn start(&self, total: usize);
    /// A human-readable status line.
    fn message(&self, text: &str);
    /// One item finished (successfully or not).
    fn advance(&self);
    /// The batch is done.
    fn finish(&self);
}

/// Renders status lines and an `[n/total]` counter to stdout.
#[derive(Default)]
pub struct ConsoleReporter {
    total: AtomicUsize,
    done: AtomicUsize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn start(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
    }

    fn message(&self, text: &str) {
        println!("{}", text);
    }

    fn advance(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let total = self.total.load(Ordering::Relaxed);
        println!(
            "{}",
            format!("[{}/{}] networks processed", done, total).dimmed()
        );
    }

    fn finish(&self) {
        let total = self.total.load(Ordering::Relaxed);
        println!("{}", format!("Done ({} networks)", total).bold());
    }
}

/// Discards everything. Used by `--quiet` and by tests.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn start(&self, _total: usize) {}
    fn message(&self, _text: &str) {}
    fn advance(&self) {}
    fn finish(&self) {}
}
