//! One-shot delayed tasks
//!
//! Each participant owns its schedule and drains it from `advance`, so
//! tearing a participant down just clears the list.

/// Tasks due after a delay, measured in accumulated tick time
#[derive(Debug, Clone)]
pub struct Schedule<T> {
    elapsed: f32,
    tasks: Vec<(f32, T)>,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schedule<T> {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            tasks: Vec::new(),
        }
    }

    /// Run `task` once `delay` seconds of ticks have passed
    pub fn after(&mut self, delay: f32, task: T) {
        self.tasks.push((self.elapsed + delay.max(0.0), task));
    }

    /// Advance time and return every task now due, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.elapsed += dt.max(0.0);
        if self.tasks.is_empty() {
            return Vec::new();
        }
        let now = self.elapsed;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|(at, _)| *at <= now);
        self.tasks = pending;
        // Stable sort keeps insertion order among equal due times
        due.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        due.into_iter().map(|(_, task)| task).collect()
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_task_fires_once_after_delay() {
        let mut schedule = Schedule::new();
        schedule.after(1.0, "reveal");
        for _ in 0..9 {
            assert!(schedule.advance(0.1).is_empty());
        }
        // Accumulated 0.1 * 10 may land a hair below 1.0
        let fired: Vec<_> = (0..2).flat_map(|_| schedule.advance(0.1)).collect();
        assert_eq!(fired, vec!["reveal"]);
        assert!(schedule.is_empty());
        assert!(schedule.advance(10.0).is_empty());
    }

    #[test]
    fn test_clear_discards_pending() {
        let mut schedule = Schedule::new();
        schedule.after(0.3, 1);
        schedule.clear();
        assert!(schedule.advance(1.0).is_empty());
    }

    #[test]
    fn test_zero_dt_does_not_fire_future_tasks() {
        let mut schedule = Schedule::new();
        schedule.after(0.5, 'a');
        assert!(schedule.advance(0.0).is_empty());
        schedule.after(0.0, 'b');
        assert_eq!(schedule.advance(0.0), vec!['b']);
    }

    proptest! {
        #[test]
        fn prop_due_tasks_come_out_in_due_order(delays in proptest::collection::vec(0.0f32..5.0, 1..20)) {
            let mut schedule = Schedule::new();
            for (i, d) in delays.iter().enumerate() {
                schedule.after(*d, i);
            }
            let fired = schedule.advance(10.0);
            prop_assert_eq!(fired.len(), delays.len());
            for pair in fired.windows(2) {
                prop_assert!(delays[pair[0]] <= delays[pair[1]]);
            }
        }
    }
}
