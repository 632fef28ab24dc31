use std::ops::RangeInclusive;

/// Monotonic percentage reporter
///
/// Each generation phase owns a slice of the `0..=100` range. Values inside a phase are
/// mapped to that slice, and nothing lower than the last reported value is ever forwarded.
pub struct Progress<'a> {
    sink: &'a (dyn Fn(u8) + Sync),
    span: RangeInclusive<u8>,
    last: Option<u8>,
}

impl<'a> Progress<'a> {
    pub fn new(sink: &'a (dyn Fn(u8) + Sync)) -> Self {
        Self {
            sink,
            span: 0..=100,
            last: None,
        }
    }

    /// Reporter that drops everything
    pub fn silent() -> Progress<'static> {
        fn discard(_: u8) {}
        Progress::new(&discard)
    }

    /// Enter a new phase, owning the given slice of the range
    pub fn phase(&mut self, span: RangeInclusive<u8>) {
        debug_assert!(span.start() <= span.end() && *span.end() <= 100);
        self.span = span;
        self.report(0, 1);
    }

    /// Report `done` out of `total` units of the current phase
    pub fn report(&mut self, done: usize, total: usize) {
        let (start, end) = (*self.span.start() as usize, *self.span.end() as usize);
        let percentage = if total == 0 {
            end
        } else {
            start + (end - start) * done.min(total) / total
        } as u8;
        self.emit(percentage);
    }

    /// Report the end of the current phase
    pub fn finish_phase(&mut self) {
        self.report(1, 1);
    }

    /// Last value forwarded to the sink
    pub fn last(&self) -> Option<u8> {
        self.last
    }

    fn emit(&mut self, percentage: u8) {
        let percentage = percentage.min(100);
        if self.last.is_some_and(|last| last >= percentage) {
            return;
        }
        self.last = Some(percentage);
        (self.sink)(percentage);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn values_are_mapped_and_monotonic() {
        let seen = Mutex::new(vec![]);
        let sink = |p: u8| seen.lock().unwrap().push(p);
        let mut progress = Progress::new(&sink);
        progress.phase(0..=50);
        progress.report(1, 2);
        progress.report(1, 4);
        progress.finish_phase();
        progress.phase(50..=100);
        progress.report(3, 4);
        progress.finish_phase();
        assert_eq!(*seen.lock().unwrap(), vec![0, 25, 50, 87, 100]);
    }

    #[test]
    fn empty_phases_jump_to_their_end() {
        let seen = Mutex::new(vec![]);
        let sink = |p: u8| seen.lock().unwrap().push(p);
        let mut progress = Progress::new(&sink);
        progress.phase(10..=30);
        progress.report(0, 0);
        assert_eq!(progress.last(), Some(30));
        assert_eq!(*seen.lock().unwrap(), vec![10, 30]);
    }
}
