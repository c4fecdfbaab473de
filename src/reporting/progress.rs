use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for the rate-limit burst.
pub struct BurstProgress {
    bar: ProgressBar,
    triggered: u32,
}

impl BurstProgress {
    pub fn new(total: u32, hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("  {bar:30.cyan/dark_gray} {pos}/{len} requests | {msg}")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar.set_message("0 rate limited");
        Self { bar, triggered: 0 }
    }

    pub fn record(&mut self, rate_limited: bool) {
        if rate_limited {
            self.triggered += 1;
        }
        self.bar.set_message(format!("{} rate limited", self.triggered));
        self.bar.inc(1);
    }

    /// Print a line above the bar.
    pub fn println(&self, msg: &str) {
        self.bar.println(msg);
    }

    pub fn triggered(&self) -> u32 {
        self.triggered
    }

    pub fn finish(self) -> u32 {
        self.bar.finish_and_clear();
        self.triggered
    }
}
