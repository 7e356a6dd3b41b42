//! Periodic activities of a running game, driven by simulated time.
//!
//! The session owns one `Scheduler`; each activity holds at most one armed timer.
//! Hosts feed elapsed time through `next_due`, so the cadence of every activity is
//! independent of how often the host happens to call in.

/// Slack for float accumulation (1/60 s periods never sum exactly).
const EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activity {
    Clock,
    TargetMover,
    Projectile,
}

impl Activity {
    pub const ALL: [Activity; 3] = [Activity::Clock, Activity::TargetMover, Activity::Projectile];

    fn index(self) -> usize {
        match self {
            Activity::Clock => 0,
            Activity::TargetMover => 1,
            Activity::Projectile => 2,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    period: f64,
    remaining: f64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: [Option<Timer>; 3],
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms (or re-arms) `activity`; it first fires one full `period` from now.
    pub fn arm(&mut self, activity: Activity, period: f64) {
        self.timers[activity.index()] = Some(Timer { period, remaining: period });
    }

    pub fn cancel(&mut self, activity: Activity) {
        self.timers[activity.index()] = None;
    }

    pub fn cancel_all(&mut self) {
        self.timers = [None; 3];
    }

    pub fn is_armed(&self, activity: Activity) -> bool {
        self.timers[activity.index()].is_some()
    }

    pub fn armed(&self) -> impl Iterator<Item = Activity> + '_ {
        Activity::ALL.into_iter().filter(|a| self.is_armed(*a))
    }

    pub fn period(&self, activity: Activity) -> Option<f64> {
        self.timers[activity.index()].map(|t| t.period)
    }

    /// Finds the earliest activity due within `budget` seconds. All armed timers
    /// advance by the time until it fires and the fired timer starts its next
    /// period. Returns the elapsed time and the activity, or `None` (without
    /// advancing anything) when nothing is due inside the budget.
    pub fn next_due(&mut self, budget: f64) -> Option<(f64, Activity)> {
        let (activity, elapsed) = Activity::ALL
            .into_iter()
            .filter_map(|a| self.timers[a.index()].map(|t| (a, t.remaining)))
            .fold(None, |best: Option<(Activity, f64)>, (a, rem)| match best {
                Some((_, best_rem)) if best_rem <= rem => best,
                _ => Some((a, rem)),
            })?;
        if elapsed > budget + EPSILON {
            return None;
        }
        let elapsed = elapsed.max(0.0);
        for timer in self.timers.iter_mut().flatten() {
            timer.remaining -= elapsed;
        }
        if let Some(timer) = self.timers[activity.index()].as_mut() {
            timer.remaining += timer.period;
        }
        Some((elapsed, activity))
    }

    /// Lets `dt` seconds pass without any activity firing.
    pub fn elapse(&mut self, dt: f64) {
        for timer in self.timers.iter_mut().flatten() {
            timer.remaining -= dt;
        }
    }
}
