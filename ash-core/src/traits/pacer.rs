//! Wall-clock pauses

use std::time::Duration;

/// Blocking pause between steps
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// Pacer backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
