use dartag::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// Bar state for the workflow phase currently running.
struct PhaseDisplay {
    bar: ProgressBar,
    phase: Option<&'static str>,
    warnings: usize,
}

impl PhaseDisplay {
    fn summary(&self) -> String {
        let phase = self.phase.unwrap_or("Done");
        let mut line = format!("✓ {}: {} reaction(s)", phase, self.bar.position());
        match self.warnings {
            0 => {}
            1 => line.push_str(", 1 warning"),
            n => line.push_str(&format!(", {} warnings", n)),
        }
        line
    }
}

/// Shows one stderr bar per workflow phase, counted in reactions, and closes
/// each phase with a summary line.
#[derive(Clone)]
pub struct CliProgressHandler {
    display: Arc<Mutex<PhaseDisplay>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(Self::spinner_style());
        bar.finish_and_clear();

        Self {
            display: Arc::new(Mutex::new(PhaseDisplay {
                bar,
                phase: None,
                warnings: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let display = Arc::clone(&self.display);

        Box::new(move |progress: Progress| {
            let Ok(mut display) = display.lock() else {
                warn!("Progress display lock was poisoned; dropping {:?}", progress);
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    display.phase = Some(name);
                    display.warnings = 0;
                    let bar = &display.bar;
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(Self::spinner_style());
                    bar.set_message(name);
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::TaskStart { total_steps } => {
                    let bar = &display.bar;
                    bar.disable_steady_tick();
                    bar.set_length(total_steps);
                    bar.set_position(0);
                    bar.set_style(Self::reaction_bar_style());
                }
                Progress::TaskIncrement { steps } => display.bar.inc(steps),
                Progress::TaskFinish => {
                    // Skipped rows still count as handled.
                    if let Some(length) = display.bar.length() {
                        display.bar.set_position(length);
                    }
                }
                Progress::PhaseFinish => {
                    display.bar.disable_steady_tick();
                    let summary = display.summary();
                    display.bar.finish_with_message(summary);
                }
                Progress::Message(msg) => {
                    display.warnings += 1;
                    display.bar.suspend(|| eprintln!("  ⚠ {}", msg));
                    if display.bar.is_finished() {
                        let summary = display.summary();
                        display.bar.set_message(summary);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Invalid spinner template")
    }

    fn reaction_bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{msg:<14} [{bar:40.cyan/blue}] {human_pos}/{human_len} reactions ({per_sec}, eta {eta})",
        )
        .expect("Invalid reaction bar template")
        .progress_chars("=> ")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartag::engine::progress::ProgressReporter;
    use std::thread;

    fn message(handler: &CliProgressHandler) -> String {
        handler.display.lock().unwrap().bar.message()
    }

    #[test]
    fn new_handler_has_no_phase() {
        let handler = CliProgressHandler::new();
        let display = handler.display.lock().unwrap();
        assert!(display.phase.is_none());
        assert!(display.bar.is_finished());
        assert_eq!(display.summary(), "✓ Done: 0 reaction(s)");
    }

    #[test]
    fn phase_summary_counts_every_reaction_even_when_rows_are_skipped() {
        let handler = CliProgressHandler::new();
        let reporter = ProgressReporter::with_callback(handler.get_callback());

        reporter.phase("Tagging", 5, || {
            reporter.advance(2);
            {
                let display = handler.display.lock().unwrap();
                assert_eq!(display.bar.length(), Some(5));
                assert_eq!(display.bar.position(), 2);
                assert!(!display.bar.is_finished());
            }
            reporter.advance(1);
        });

        assert_eq!(message(&handler), "✓ Tagging: 5 reaction(s)");
    }

    #[test]
    fn unmapped_reaction_notice_is_counted_as_a_warning() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Atom mapping" });
        assert_eq!(message(&handler), "Atom mapping");
        callback(Progress::TaskStart { total_steps: 40 });
        callback(Progress::TaskIncrement { steps: 40 });
        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);
        callback(Progress::Message("3 reaction(s) could not be mapped".to_string()));

        assert_eq!(message(&handler), "✓ Atom mapping: 40 reaction(s), 1 warning");
    }

    #[test]
    fn a_new_phase_starts_from_a_clean_slate() {
        let handler = CliProgressHandler::new();
        let reporter = ProgressReporter::with_callback(handler.get_callback());

        reporter.phase("Augmenting", 2, || {
            reporter.report(Progress::Message("row 0 skipped".to_string()));
            reporter.report(Progress::Message("row 1 skipped".to_string()));
        });
        assert_eq!(message(&handler), "✓ Augmenting: 2 reaction(s), 2 warnings");

        reporter.phase("Tokenizing", 1, || reporter.advance(1));
        assert_eq!(message(&handler), "✓ Tokenizing: 1 reaction(s)");
    }

    #[test]
    fn callback_can_run_on_a_worker_thread() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Tagging" });
            callback(Progress::TaskStart { total_steps: 8 });
            callback(Progress::TaskIncrement { steps: 8 });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let display = handler.display.lock().unwrap();
        assert!(display.bar.is_finished());
        assert_eq!(display.phase, Some("Tagging"));
    }
}
