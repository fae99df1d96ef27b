//! Interactive calculator
//!
//! The session lives in component state. Key presses edit it directly;
//! requests and history I/O run on the tokio runtime and report back over
//! the broadcast channel, where stale answers are dropped by ticket.

use crate::interactive::components::{
    FieldInput, HistoryPanel, KeypadPanel, ResultPanel, StatusLine, StatusLineContext,
};
use crate::interactive::components::history_panel::history_row;
use crate::interactive::keymap::{
    handle_history_key, handle_key, AppAction, HistoryNav, KEY_HELP,
};
use crate::interactive::message_handler::{
    accept_completion, accept_view, notify_cancelled, spawn_history_load, spawn_plot_export,
    spawn_solve, AppMessage,
};
use anyhow::Result;
use integra_core::clipboard::Osc52Clipboard;
use integra_core::input::Keypad;
use integra_core::present::PlainTextTypesetter;
use integra_core::{
    CalculatorClient, CalculatorSession, FieldRef, HistoryEntry, HttpCalculatorClient,
    IntegralKind, JsonFileHistoryStore, ResolvedClientConfig, ResultPresenter,
};
use iocraft::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// File the interactive plot export writes to
fn plot_export_path() -> std::path::PathBuf {
    std::env::temp_dir().join("integra-plot.html")
}

/// Everything the app needs from outside the UI thread
#[derive(Clone)]
pub struct AppContext {
    pub config: ResolvedClientConfig,
    pub client: Arc<dyn CalculatorClient>,
    pub presenter: Arc<ResultPresenter>,
    pub runtime: Handle,
    pub ui_sender: broadcast::Sender<AppMessage>,
}

impl AppContext {
    pub fn new(config: ResolvedClientConfig, runtime: Handle) -> Result<Self> {
        let client = Arc::new(HttpCalculatorClient::new(&config)?);
        let history = Arc::new(JsonFileHistoryStore::new(
            &config.history_path,
            config.history_capacity,
        ));
        let presenter = Arc::new(ResultPresenter::new(Arc::new(PlainTextTypesetter), history));
        let (ui_sender, _) = broadcast::channel::<AppMessage>(100);

        Ok(Self {
            config,
            client,
            presenter,
            runtime,
            ui_sender,
        })
    }
}

#[derive(Default, Props)]
pub struct CalculatorAppProps {
    pub context: Option<AppContext>,
}

fn kind_label(kind: IntegralKind) -> &'static str {
    match kind {
        IntegralKind::Indefinite => "Indefinite integral",
        IntegralKind::Definite => "Definite integral",
    }
}

fn placeholder(field: FieldRef) -> &'static str {
    match field {
        FieldRef::Expression => "e.g. x^2*sin(x)",
        FieldRef::LowerBound => "0",
        FieldRef::UpperBound => "pi",
    }
}

/// Width of each input box for a terminal `width` cells wide
fn field_widths(width: u16, kind: IntegralKind) -> (u16, u16) {
    const BOUND_WIDTH: u16 = 14;
    // App padding on both sides plus the gaps between boxes
    let usable = width.saturating_sub(4);
    if kind.is_definite() {
        let expression = usable.saturating_sub(2 * (BOUND_WIDTH + 1)).max(16);
        (expression, BOUND_WIDTH)
    } else {
        (usable.max(16), BOUND_WIDTH)
    }
}

#[component]
pub fn CalculatorApp(mut hooks: Hooks, props: &CalculatorAppProps) -> impl Into<AnyElement<'static>> {
    let Some(context) = props.context.clone() else {
        return AnyElement::from(element! { View {} });
    };

    let mut system = hooks.use_context_mut::<SystemContext>();
    let (width, height) = hooks.use_terminal_size();
    let session = hooks.use_state(|| CalculatorSession::new(&context.config));
    let history_entries = hooks.use_state(Vec::<HistoryEntry>::new);
    let history_open = hooks.use_state(|| false);
    let history_selected = hooks.use_state(|| 0usize);
    let notice = hooks.use_state(|| None::<String>);
    let should_exit = hooks.use_state(|| false);
    let keypad = Keypad::standard();

    // Results and history from the background tasks
    {
        let ui_sender = context.ui_sender.clone();
        let runtime = context.runtime.clone();
        let presenter = context.presenter.clone();
        let mut session = session;
        let mut history_entries = history_entries;
        let mut history_selected = history_selected;
        let mut notice = notice;
        hooks.use_future(async move {
            let mut rx = ui_sender.subscribe();
            loop {
                match rx.recv().await {
                    Ok(AppMessage::SolveCompleted { ticket, outcome }) => {
                        // Answers for cleared requests are dropped here
                        accept_completion(
                            &session.read(),
                            &runtime,
                            presenter.clone(),
                            ticket,
                            outcome,
                            &ui_sender,
                        );
                    }
                    Ok(AppMessage::SolvePresented {
                        ticket,
                        request,
                        view,
                    }) => {
                        accept_view(
                            &mut session.write(),
                            &runtime,
                            presenter.clone(),
                            &ticket,
                            request,
                            view,
                        );
                    }
                    Ok(AppMessage::HistoryLoaded(entries)) => {
                        history_entries.set(entries);
                        history_selected.set(0);
                    }
                    Ok(AppMessage::Notice(text)) => notice.set(Some(text)),
                    Ok(AppMessage::SolveStarted { .. } | AppMessage::SolveCancelled { .. }) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("UI fell behind by {} messages", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    // Redraws for the copy confirmation timeout
    let tick = hooks.use_state(|| 0u64);
    {
        let mut tick = tick;
        hooks.use_future(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(500)).await;
                tick.set(tick.get().wrapping_add(1));
            }
        });
    }

    hooks.use_terminal_events({
        let context = context.clone();
        let keypad = keypad.clone();
        let mut session = session;
        let history_entries = history_entries;
        let mut history_open = history_open;
        let mut history_selected = history_selected;
        let mut notice = notice;
        let mut should_exit = should_exit;
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) if kind != KeyEventKind::Release => {
                if history_open.get() {
                    let entries = history_entries.read();
                    match handle_history_key(code, modifiers, history_selected.get(), entries.len())
                    {
                        HistoryNav::Select(index) => history_selected.set(index),
                        HistoryNav::Restore(index) => {
                            if let Some(entry) = entries.get(index) {
                                session.write().restore_history(entry);
                            }
                            history_open.set(false);
                        }
                        HistoryNav::Close => {
                            let active = session.read().active_field();
                            session.write().focus(active);
                            history_open.set(false);
                        }
                        HistoryNav::Ignore => {}
                    }
                    return;
                }

                notice.set(None);
                let pending = session.read().pending_ticket().cloned();
                let action = handle_key(&mut session.write(), &keypad, code, modifiers);
                notify_cancelled(pending, &session.read(), &context.ui_sender);
                match action {
                    AppAction::Ignore | AppAction::Redraw => {}
                    AppAction::Quit => should_exit.set(true),
                    AppAction::Solve => {
                        // Validation failures land in the region on their own
                        let begun = session.write().begin_solve();
                        if let Ok((ticket, request)) = begun {
                            info!(ticket = %ticket, "Solving {}", request.expression);
                            spawn_solve(
                                &context.runtime,
                                context.client.clone(),
                                ticket,
                                request,
                                context.ui_sender.clone(),
                            );
                        }
                    }
                    AppAction::Copy => {
                        let clipboard = Osc52Clipboard::stdout();
                        if let Err(e) = session.write().copy_result(&clipboard, Instant::now()) {
                            warn!("Copy failed: {}", e);
                            notice.set(Some(format!("Copy failed: {}", e)));
                        }
                    }
                    AppAction::SavePlot => {
                        let figure = session
                            .read()
                            .region()
                            .results()
                            .and_then(|results| results.figure.clone());
                        match figure {
                            Some(figure) => spawn_plot_export(
                                &context.runtime,
                                figure,
                                plot_export_path(),
                                context.ui_sender.clone(),
                            ),
                            None => notice.set(Some("Nothing to plot yet.".to_string())),
                        }
                    }
                    AppAction::OpenHistory => {
                        session.write().blur();
                        history_open.set(true);
                        spawn_history_load(
                            &context.runtime,
                            context.presenter.clone(),
                            context.ui_sender.clone(),
                        );
                    }
                }
            }
            _ => {}
        }
    });

    if should_exit.get() {
        system.exit();
    }

    let session_ref = session.read();
    let now = Instant::now();
    let kind = session_ref.kind();
    let (expression_width, bound_width) = field_widths(width, kind);
    let focused = session_ref.router().focus().is_focused();
    let active = session_ref.active_field();
    let region_width = width.saturating_sub(6);
    let plot_height = height.saturating_sub(30).clamp(6, 16);

    let fields: Vec<(FieldRef, u16)> = session_ref
        .visible_fields()
        .iter()
        .map(|field| {
            let w = if field.is_bound() {
                bound_width
            } else {
                expression_width
            };
            (*field, w)
        })
        .collect();

    let history_rows: Vec<String> = history_entries
        .read()
        .iter()
        .map(|entry| history_row(entry, &PlainTextTypesetter, region_width as usize))
        .collect();

    let mode = format!(
        "{} · plotting {}",
        kind_label(kind),
        if session_ref.dual_graph() { "F(x)" } else { "f(x)" }
    );
    let footer = format!("{} · {}", KEY_HELP, session_ref.copy_label(now));
    let status_context = StatusLineContext {
        ui_sender: context.ui_sender.clone(),
    };

    AnyElement::from(element! {
        View(
            flex_direction: FlexDirection::Column,
            width: 100pct,
            padding: 1,
        ) {
            View(flex_direction: FlexDirection::Row, margin_bottom: 1) {
                Text(
                    content: "∫ Integra  ",
                    color: Color::Rgb { r: 34, g: 211, b: 238 },
                    weight: Weight::Bold,
                )
                Text(content: mode, color: Color::Grey)
            }

            View(flex_direction: FlexDirection::Row) {
                #(fields.into_iter().map(|(field, w)| element! {
                    FieldInput(
                        key: format!("{:?}", field),
                        label: field.label().to_string(),
                        value: session_ref.field(field).clone(),
                        placeholder: placeholder(field).to_string(),
                        focused: focused && field == active,
                        width: w,
                    )
                }))
            }

            View(margin_top: 1, margin_bottom: 1) {
                KeypadPanel(keypad: keypad, disabled: session_ref.is_pending())
            }

            StatusLine(context: status_context)

            #(if history_open.get() {
                Some(element! {
                    HistoryPanel(rows: history_rows, selected: history_selected.get())
                })
            } else {
                None
            })
            #(if history_open.get() {
                None
            } else {
                Some(element! {
                    ResultPanel(
                        region: session_ref.region().clone(),
                        width: region_width,
                        plot_height: plot_height,
                    )
                })
            })

            View(margin_top: 1, flex_direction: FlexDirection::Column) {
                #(notice.read().clone().map(|text| element! {
                    Text(content: text, color: Color::Yellow)
                }))
                Text(content: footer, color: Color::DarkGrey)
            }
        }
    })
}

/// Run the interactive calculator until the user quits
pub async fn run_interactive(config: ResolvedClientConfig) -> Result<()> {
    let context = AppContext::new(config, Handle::current())?;
    info!("Starting interactive mode against {}", context.config.endpoint_url());

    tokio::task::spawn_blocking(move || {
        smol::block_on(async move {
            element!(CalculatorApp(context: Some(context)))
                .render_loop()
                .await
        })
    })
    .await??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_widths() {
        assert_eq!(field_widths(80, IntegralKind::Indefinite), (76, 14));
        assert_eq!(field_widths(80, IntegralKind::Definite), (46, 14));
        // Narrow terminals keep a usable expression box
        assert_eq!(field_widths(30, IntegralKind::Definite).0, 16);
    }

    #[test]
    fn test_placeholders_and_labels() {
        assert_eq!(placeholder(FieldRef::Expression), "e.g. x^2*sin(x)");
        assert_eq!(kind_label(IntegralKind::Definite), "Definite integral");
    }

    #[tokio::test]
    async fn test_app_context_wires_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ResolvedClientConfig::new("http://127.0.0.1:9".to_string())
            .with_history_path(dir.path().join("history.json"));
        let context = AppContext::new(config, Handle::current()).unwrap();

        let history = context.presenter.history().load().await.unwrap();
        assert!(history.is_empty());
        assert_eq!(context.ui_sender.receiver_count(), 0);
    }
}
