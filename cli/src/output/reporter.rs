//! Result and progress reporting

use console::{style, StyledObject, Term};
use indicatif::{ProgressBar, ProgressStyle};
use integra_core::chart::TextPlot;
use integra_core::history::History;
use integra_core::present::{MathTypesetter, ResultsViewModel};
use std::time::Duration;

/// Prints results, errors and progress to the terminal
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    spinner: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(console::colors_enabled())
    }
}

impl Reporter {
    pub fn new(use_color: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            spinner: None,
            use_color,
        }
    }

    /// Show a spinner on stderr until [`Reporter::stop_spinner`]
    pub fn start_spinner(&mut self, message: &str) {
        if !self.err.is_term() {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(pb);
    }

    pub fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn paint(
        &self,
        text: &str,
        paint: impl Fn(StyledObject<&str>) -> StyledObject<&str>,
    ) -> String {
        if self.use_color {
            paint(style(text)).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&self, text: &str) {
        let _ = self.out.write_line(text);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        let prefix = self.paint("✓", |s| s.green().bold());
        self.line(&format!("{} {}", prefix, message));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        let prefix = self.paint("ℹ", |s| s.blue().bold());
        self.line(&format!("{} {}", prefix, message));
    }

    /// Print a solved integral with its steps and an optional text plot
    pub fn results(&self, results: &ResultsViewModel, plot: Option<TextPlot>) {
        self.line(&self.paint(&results.rendered_integral, |s| s.bold()));
        self.line(&format!(
            "{} {}",
            self.paint("=", |s| s.dim()),
            self.paint(&results.rendered_result, |s| s.cyan().bold())
        ));

        if !results.steps.is_empty() {
            self.line("");
            self.line(&self.paint("Steps", |s| s.bold().underlined()));
            for step in &results.steps {
                self.line(&format!("  {}", step.rendered));
            }
        }

        if let (Some(plot), Some(figure)) = (plot, results.figure.as_ref()) {
            let lines = plot.lines(figure);
            if !lines.is_empty() {
                self.line("");
                for line in lines {
                    self.line(&format!("  {}", line));
                }
            }
        }
    }

    /// Print the history, most recent first
    pub fn history(&self, history: &History, typesetter: &dyn MathTypesetter) {
        if history.is_empty() {
            self.info("No recent integrals.");
            return;
        }
        for (index, entry) in history.entries().enumerate() {
            let markup = entry.latex();
            let rendered = typesetter.typeset(&markup).unwrap_or(markup);
            let date = entry
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M");
            self.line(&format!(
                "{:>2}. {}  {}",
                index + 1,
                rendered,
                self.paint(&date.to_string(), |s| s.dim())
            ));
        }
    }
}
