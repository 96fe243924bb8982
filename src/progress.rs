use std::io::{self, Write};

/// In-place console progress bar for long passes.
///
/// Renders `[■■■□…□] 42.00%` on stderr, overwriting the previous frame with
/// a carriage return and dropping to a fresh line once 100% is reached.
pub struct ProgressBar {
    width: usize,
    finished: bool,
}

impl Default for ProgressBar {
    fn default() -> Self {
        ProgressBar::new(30)
    }
}

impl ProgressBar {
    pub fn new(width: usize) -> Self {
        ProgressBar {
            width: width.max(1),
            finished: false,
        }
    }

    /// Redraw the bar at `percentage` (0.0 - 100.0).
    pub fn update(&mut self, percentage: f64) {
        if self.finished {
            return;
        }
        let pct = percentage.clamp(0.0, 100.0);
        let filled = ((pct * self.width as f64) / 100.0) as usize;
        let filled = filled.min(self.width);
        let mut bar = String::with_capacity(self.width * 3 + 16);
        bar.push('[');
        for _ in 0..filled {
            bar.push('■');
        }
        for _ in filled..self.width {
            bar.push('□');
        }
        bar.push(']');
        // trailing spaces clear leftovers from a longer previous frame
        eprint!("\r{} {:.2}%      ", bar, pct);
        let _ = io::stderr().flush();
        if pct >= 100.0 {
            eprintln!();
            self.finished = true;
        }
    }

    /// Drop to a fresh line even if the pass stopped short of 100%.
    pub fn finish(&mut self) {
        if !self.finished {
            eprintln!();
            self.finished = true;
        }
    }
}
