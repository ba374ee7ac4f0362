use std::thread;
use std::time::Duration;

/// Blocking wait between timed steps.
pub trait Delay {
    fn delay(&mut self, dur: Duration);
}

/// Parks the calling thread for the whole duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Delay for ThreadSleep {
    fn delay(&mut self, dur: Duration) {
        thread::sleep(dur);
    }
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay(&mut self, dur: Duration) {
        (**self).delay(dur)
    }
}

impl<D: Delay + ?Sized> Delay for Box<D> {
    fn delay(&mut self, dur: Duration) {
        (**self).delay(dur)
    }
}
