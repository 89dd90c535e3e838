use std::sync::atomic::{AtomicBool, Ordering};

/// At most one operation of a kind at a time; extra requests are dropped
/// rather than queued.
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `None` if an operation is already in flight.
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| FlightGuard { flight: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the slot when dropped.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flight.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_release() {
        let flight = SingleFlight::new();
        let guard = flight.try_begin();
        assert!(guard.is_some());
        assert!(flight.is_busy());
        assert!(flight.try_begin().is_none());
        drop(guard);
        assert!(!flight.is_busy());
        assert!(flight.try_begin().is_some());
    }
}
