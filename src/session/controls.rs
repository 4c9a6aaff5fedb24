use std::time::{Duration, Instant};

/// Reader-overlay visibility driven by a single idle deadline. Any
/// qualifying activity replaces the previous deadline, so there is never
/// more than one pending hide.
#[derive(Debug)]
pub struct ControlVisibility {
    visible: bool,
    deadline: Option<Instant>,
    hide_after: Duration,
}

impl ControlVisibility {
    /// Controls start visible with the idle timer already running.
    pub fn new(hide_after: Duration, now: Instant) -> Self {
        Self {
            visible: true,
            deadline: Some(now + hide_after),
            hide_after,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Activity: show the controls and restart the idle timer.
    pub fn touch(&mut self, now: Instant) {
        self.visible = true;
        self.deadline = Some(now + self.hide_after);
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.visible {
            self.visible = false;
            self.deadline = None;
        } else {
            self.touch(now);
        }
    }

    /// Advance the timer; hides once the deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.deadline {
            if now >= deadline {
                self.visible = false;
                self.deadline = None;
            }
        }
    }
}
