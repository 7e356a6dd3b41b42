/// One-second countdown for a round.
#[derive(Clone, Debug)]
pub struct GameClock {
    duration: u32,
    time_left: u32,
    ramp_every: Option<u32>,
}

/// Outcome of a single clock second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTick {
    pub time_left: u32,
    /// The round just ran out of time.
    pub expired: bool,
    /// A speed ramp interval elapsed while time remains.
    pub ramp: bool,
}

impl GameClock {
    pub fn new(duration: u32, ramp_every: Option<u32>) -> Self {
        Self { duration, time_left: duration, ramp_every }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn elapsed(&self) -> u32 {
        self.duration - self.time_left
    }

    pub fn reset(&mut self) {
        self.time_left = self.duration;
    }

    pub fn tick(&mut self) -> ClockTick {
        self.time_left = self.time_left.saturating_sub(1);
        let expired = self.time_left == 0;
        let ramp = !expired
            && self
                .ramp_every
                .is_some_and(|every| every > 0 && self.elapsed() % every == 0);
        ClockTick { time_left: self.time_left, expired, ramp }
    }
}
