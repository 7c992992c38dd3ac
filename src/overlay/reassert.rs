/// A non-repeating timer driven by the UI clock (`egui::InputState::time`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OneShot {
    due: Option<f64>,
}

impl OneShot {
    pub fn arm(&mut self, now: f64, delay: f64) {
        self.due = Some(now + delay.max(0.0));
    }

    /// Seconds until the timer fires, if armed.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.due.map(|due| (due - now).max(0.0))
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline.
    pub fn fire(&mut self, now: f64) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
