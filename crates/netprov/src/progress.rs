//! Terminal progress for the provisioning workflow.
//!
//! On a terminal each stage gets a spinner that turns into a check mark.
//! Otherwise finished stages are printed as plain `[n/6] message` lines.

use std::io::{self, IsTerminal};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

use netprov_core::{Progress, Step};

pub struct StageProgress {
    bar: Mutex<Option<ProgressBar>>,
    interactive: bool,
    color: bool,
    total: usize,
}

impl StageProgress {
    pub fn new(color: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            interactive: io::stdout().is_terminal(),
            color,
            total: Step::iter().count(),
        }
    }

    fn prefix(&self, step: Step) -> String {
        let index = Step::iter().position(|s| s == step).map_or(0, |i| i + 1);
        format!("[{index}/{}]", self.total)
    }
}

impl Progress for StageProgress {
    fn started(&self, step: Step, message: &str) {
        if !self.interactive {
            return;
        }
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        bar.set_style(
            ProgressStyle::with_template("{spinner} {prefix} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(self.prefix(step));
        bar.set_message(message.to_owned());
        bar.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn finished(&self, step: Step, message: &str) {
        let mark = if self.color {
            "✓".green().to_string()
        } else {
            "✓".to_owned()
        };
        let line = format!("{mark} {} {message}", self.prefix(step));
        let bar = self.bar.lock().ok().and_then(|mut slot| slot.take());
        match bar {
            Some(bar) => {
                if let Ok(style) = ProgressStyle::with_template("{msg}") {
                    bar.set_style(style);
                }
                bar.finish_with_message(line);
            }
            None => println!("{line}"),
        }
    }
}

impl Drop for StageProgress {
    fn drop(&mut self) {
        // A failed stage leaves its spinner running.
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.abandon();
            }
        }
    }
}
