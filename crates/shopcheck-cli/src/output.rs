//! Terminal reporting for suite runs

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Writes status lines and a phase progress bar to stderr
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    pub use_color: bool,
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a bar that advances once per suite phase
    pub fn start_phases(&mut self, total: u64) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        self.progress_bar = Some(pb);
    }

    /// Name the phase now running
    pub fn phase(&self, name: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(name.to_string());
        }
    }

    /// Mark the current phase finished
    pub fn advance(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Drop the bar so child output is not interleaved with it
    pub fn finish(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
    }

    fn line(&self, marker: &str, plain: &str, paint: fn(&str) -> String, message: &str) {
        let prefix = if self.use_color {
            paint(marker)
        } else {
            plain.to_string()
        };
        let text = format!("{prefix} {message}");
        match self.progress_bar {
            Some(ref pb) => pb.println(text),
            None => {
                let _ = self.term.write_line(&text);
            }
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.line("✓", "PASS", |m| style(m).green().bold().to_string(), message);
        }
    }

    /// Printed even in quiet mode
    pub fn failure(&self, message: &str) {
        self.line("✗", "FAIL", |m| style(m).red().bold().to_string(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            self.line("⚠", "WARN", |m| style(m).yellow().bold().to_string(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.line("ℹ", "INFO", |m| style(m).blue().bold().to_string(), message);
        }
    }

    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// One line for the whole run
    pub fn summary(&self, passed: usize, failed: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let total = passed + failed;
        let secs = duration.as_secs_f64();
        let line = if self.use_color {
            let ok = Style::new().green().bold();
            let bad = Style::new().red().bold();
            let status = if failed > 0 {
                bad.apply_to("FAILED")
            } else {
                ok.apply_to("PASSED")
            };
            format!(
                "{status} {total} phases in {secs:.1}s ({} passed, {} failed)",
                ok.apply_to(passed),
                bad.apply_to(failed)
            )
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            format!("{status} {total} phases in {secs:.1}s ({passed} passed, {failed} failed)")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&line);
    }
}
