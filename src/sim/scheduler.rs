//! Scene-owned timer scheduler
//!
//! Replaces the engine's delayed/looping callback registry with an explicit
//! polled design: timers fire ids, the scene dispatches them. All timed
//! behaviors (direction re-roll, run countdown, human transformation counter)
//! go through here so they run interleaved with ticks but never concurrently
//! with them, and so an owning entity can cancel its timers exactly once at
//! removal.

/// Handle to a scheduled timer
pub type TimerId = u32;

#[derive(Debug, Clone)]
struct TimerEntry {
    id: TimerId,
    fire_at: f64,
    /// `Some(interval)` for repeating timers, `None` for one-shots
    interval: Option<f64>,
}

/// Polled timer registry. Fires are returned in (due-time, id) order so
/// dispatch is deterministic.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: TimerId,
    timers: Vec<TimerEntry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            timers: Vec::new(),
        }
    }

    /// Register a repeating timer firing every `interval_ms` from `now`
    pub fn every(&mut self, now: f64, interval_ms: f64) -> TimerId {
        self.add(now + interval_ms, Some(interval_ms))
    }

    /// Register a one-shot timer firing once after `delay_ms`
    pub fn once(&mut self, now: f64, delay_ms: f64) -> TimerId {
        self.add(now + delay_ms, None)
    }

    fn add(&mut self, fire_at: f64, interval: Option<f64>) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(TimerEntry {
            id,
            fire_at,
            interval,
        });
        id
    }

    /// Remove a timer. Unknown ids are a no-op, so teardown is idempotent.
    pub fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Collect every timer due at `now`. Repeating timers re-arm and may
    /// fire multiple times if the clock jumped past several intervals.
    pub fn poll(&mut self, now: f64) -> Vec<TimerId> {
        let mut fired: Vec<(f64, TimerId)> = Vec::new();
        for timer in &mut self.timers {
            while timer.fire_at <= now {
                fired.push((timer.fire_at, timer.id));
                match timer.interval {
                    Some(interval) => timer.fire_at += interval,
                    None => {
                        timer.fire_at = f64::INFINITY;
                        break;
                    }
                }
            }
        }
        self.timers.retain(|t| t.fire_at.is_finite());
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_timer_fires_each_interval() {
        let mut sched = Scheduler::new();
        let id = sched.every(0.0, 1000.0);
        assert!(sched.poll(999.0).is_empty());
        assert_eq!(sched.poll(1000.0), vec![id]);
        assert_eq!(sched.poll(2000.5), vec![id]);
        assert!(sched.is_scheduled(id));
    }

    #[test]
    fn test_one_shot_fires_once_then_drops() {
        let mut sched = Scheduler::new();
        let id = sched.once(0.0, 500.0);
        assert_eq!(sched.poll(600.0), vec![id]);
        assert!(!sched.is_scheduled(id));
        assert!(sched.poll(2000.0).is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut sched = Scheduler::new();
        let id = sched.every(0.0, 100.0);
        sched.cancel(id);
        sched.cancel(id);
        assert!(sched.poll(1000.0).is_empty());
    }

    #[test]
    fn test_catch_up_fires_every_missed_interval() {
        let mut sched = Scheduler::new();
        let id = sched.every(0.0, 100.0);
        let fired = sched.poll(350.0);
        assert_eq!(fired, vec![id, id, id]);
    }

    #[test]
    fn test_fires_ordered_by_due_time() {
        let mut sched = Scheduler::new();
        let late = sched.once(0.0, 300.0);
        let early = sched.once(0.0, 100.0);
        assert_eq!(sched.poll(400.0), vec![early, late]);
    }
}
