//! One-shot solve command

use crate::config::CliConfigLoader;
use crate::output::Reporter;
use anyhow::{bail, Context, Result};
use clap::Args;
use integra_core::chart::{PlotlyHtmlRenderer, TextPlot};
use integra_core::clipboard::Osc52Clipboard;
use integra_core::present::PlainTextTypesetter;
use integra_core::{
    CalculatorSession, FieldRef, HistoryStore, HttpCalculatorClient, IntegralKind,
    JsonFileHistoryStore, RegionView, ResultPresenter,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    /// Function of x to integrate, e.g. "x^2" or "sin(x)*cos(x)"
    pub expression: String,

    /// Compute a definite integral between --lower and --upper
    #[arg(long)]
    pub definite: bool,

    /// Lower bound (implies --definite)
    #[arg(long, allow_hyphen_values = true)]
    pub lower: Option<String>,

    /// Upper bound (implies --definite)
    #[arg(long, allow_hyphen_values = true)]
    pub upper: Option<String>,

    /// Write an interactive Plotly chart to this HTML file
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Copy the result LaTeX to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Print the result as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl SolveArgs {
    fn kind(&self) -> IntegralKind {
        if self.definite || self.lower.is_some() || self.upper.is_some() {
            IntegralKind::Definite
        } else {
            IntegralKind::Indefinite
        }
    }
}

/// Solve one integral and print it
pub async fn solve_command(args: SolveArgs, config_loader: CliConfigLoader) -> Result<()> {
    let config = config_loader.load().await?;
    debug!("Using endpoint: {}", config.endpoint_url());

    let mut session = CalculatorSession::new(&config);
    session.set_kind(args.kind());
    session.set_field(FieldRef::Expression, args.expression.clone());
    session.set_field(FieldRef::LowerBound, args.lower.clone().unwrap_or_default());
    session.set_field(FieldRef::UpperBound, args.upper.clone().unwrap_or_default());

    let client = HttpCalculatorClient::new(&config).context("Failed to create HTTP client")?;
    let history: Arc<dyn HistoryStore> = Arc::new(JsonFileHistoryStore::new(
        &config.history_path,
        config.history_capacity,
    ));
    let presenter = ResultPresenter::new(Arc::new(PlainTextTypesetter), history);

    let mut reporter = Reporter::default();
    reporter.start_spinner("Calculating...");
    let solved = session.solve(&client, &presenter).await.cloned();
    reporter.stop_spinner();
    let region = solved?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&region)?);
    }

    let results = match region {
        RegionView::Results(results) => results,
        RegionView::Error(error) => bail!("{}", error.message),
        RegionView::Hidden => bail!("No result was produced"),
    };

    if !args.json {
        let (_, columns) = console::Term::stdout().size();
        let plot = TextPlot::new((columns as usize).saturating_sub(4).min(72), 16);
        reporter.results(&results, Some(plot));
    }

    if let Some(path) = &args.plot {
        match &results.figure {
            Some(figure) => {
                PlotlyHtmlRenderer::new(results.rendered_integral.clone())?
                    .write_to(figure, path)
                    .await
                    .with_context(|| format!("Failed to write plot to {}", path.display()))?;
                if !args.json {
                    reporter.success(&format!("Plot written to {}", path.display()));
                }
            }
            None => warn!("The service returned no plot data"),
        }
    }

    if args.copy {
        let clipboard = Osc52Clipboard::stdout();
        if session.copy_result(&clipboard, Instant::now())? && !args.json {
            reporter.success("Copied!");
        }
    }

    Ok(())
}
