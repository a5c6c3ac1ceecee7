use std::io;
use std::mem;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::BackendName;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::HISTORY_LIMIT;
use crate::infrastructure::backends::BackendManager;

const SLIDER_STEP: f32 = 5.0;

fn pane_block(title: String) -> Block<'static> {
    return Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title);
}

fn render_sources<B: Backend>(frame: &mut Frame<B>, app_state: &mut AppState, rect: Rect) {
    let max_images = app_state.intake().max_images();
    let block = pane_block(format!(
        " Source images {}/{} ",
        app_state.images.len(),
        max_images
    ));

    if app_state.images.is_empty() {
        frame.render_widget(
            Paragraph::new("No images yet. Use /add PATH to add one or two images.")
                .block(block)
                .wrap(Wrap { trim: true }),
            rect,
        );
        return;
    }

    let slots = app_state.images.len() as u32;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            (0..slots)
                .map(|_| return Constraint::Ratio(1, slots))
                .collect::<Vec<Constraint>>(),
        )
        .split(rect);

    for (idx, image) in app_state.images.iter().enumerate() {
        let block = pane_block(format!(" ({}) {} ", idx + 1, image.name()));
        let inner = block.inner(layout[idx]);
        let lines = app_state.canvas.lines(
            image.preview.url(),
            image.preview.data(),
            inner.width,
            inner.height,
        );
        frame.render_widget(Paragraph::new(lines).block(block), layout[idx]);
    }
}

fn render_result<B: Backend>(frame: &mut Frame<B>, app_state: &mut AppState, rect: Rect) {
    let title = if app_state.comparison_enabled() {
        format!(
            " Result | before {:.0}% after (drag or ALT+Left/Right) ",
            app_state.slider.position
        )
    } else {
        " Result ".to_string()
    };
    let block = pane_block(title);
    let inner = block.inner(rect);
    app_state.result_rect = inner;

    if app_state.current_result.is_none() {
        frame.render_widget(
            Paragraph::new("Your edited image will appear here.")
                .block(block)
                .wrap(Wrap { trim: true }),
            rect,
        );
        return;
    }

    let mut canvas = mem::take(&mut app_state.canvas);
    let lines = match (app_state.comparison_pair(), &app_state.current_result) {
        (Some((before, after)), _) => canvas.comparison_lines(
            (before.url(), before.data()),
            (after.id(), &after.image().data),
            inner.width,
            inner.height,
            app_state.slider.split_column(inner.width),
        ),
        (None, Some(result)) => canvas.lines(
            result.id(),
            &result.image().data,
            inner.width,
            inner.height,
        ),
        (None, None) => vec![],
    };
    app_state.canvas = canvas;

    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn render_history<B: Backend>(frame: &mut Frame<B>, app_state: &AppState, rect: Rect) {
    let mut spans = vec![Span::styled(
        format!("History {}/{HISTORY_LIMIT}: ", app_state.history.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if app_state.history.is_empty() {
        spans.push(Span::raw("nothing yet"));
    }

    for (idx, item) in app_state.history.items().iter().enumerate() {
        let mut prompt = item.prompt().split('\n').next().unwrap_or_default().to_string();
        if prompt.chars().count() > 24 {
            prompt = format!("{}...", prompt.chars().take(21).collect::<String>());
        }

        let mut style = Style::default();
        if app_state.current_result.as_ref().map(|e| return e.id()) == Some(item.id()) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("({}) {prompt}", idx + 1), style));
        spans.push(Span::raw("  "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), rect);
}

fn render_messages<B: Backend>(frame: &mut Frame<B>, app_state: &AppState, rect: Rect) {
    let block = pane_block(format!(" Status: {} ", app_state.status));

    let paragraph = if let Some(error) = &app_state.error {
        Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new(app_state.notice.clone().unwrap_or_default())
    };

    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), rect);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = TextArea::default();
    let mut loading = Loading::default();

    loop {
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Min(6),
                    Constraint::Length(1),
                    Constraint::Length(7),
                    Constraint::Length(4),
                ])
                .split(frame.size());

            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(layout[0]);

            render_sources(frame, app_state, panes[0]);
            render_result(frame, app_state, panes[1]);
            render_history(frame, app_state, layout[1]);
            render_messages(frame, app_state, layout[2]);

            if app_state.is_processing() {
                loading.render(frame, layout[3]);
            } else {
                frame.render_widget(textarea.widget(), layout[3]);
            }
        })?;

        match events.next().await? {
            Event::ImagesLoaded(files, errors) => {
                app_state.handle_images_loaded(files, errors);
            }
            Event::EditCompleted(res) => {
                app_state.handle_edit_completed(res);
            }
            Event::ResultSaved(res) => {
                app_state.handle_result_saved(res);
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardEnter() => {
                let input_str = textarea.lines().join("\n");
                let (should_break, handled) = app_state.handle_slash_commands(&input_str, &tx)?;
                if should_break {
                    break;
                }

                if handled {
                    textarea = TextArea::with_text(&app_state.prompt);
                    continue;
                }

                app_state.submit_prompt(&input_str, &tx)?;
            }
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
            }
            Event::KeyboardPaste(text) => {
                textarea.insert_str(&text);
            }
            Event::MouseDown(column, row) => {
                app_state.handle_mouse_down(column, row);
            }
            Event::MouseDrag(column, _) => {
                app_state.handle_mouse_drag(column);
            }
            Event::MouseUp() => {
                app_state.handle_mouse_up();
            }
            Event::SliderLeft() => {
                if app_state.comparison_enabled() {
                    app_state.slider.nudge(-SLIDER_STEP);
                }
            }
            Event::SliderRight() => {
                if app_state.comparison_enabled() {
                    app_state.slider.nudge(SLIDER_STEP);
                }
            }
            Event::UITick() => {
                if app_state.is_processing() {
                    loading.tick();
                }
            }
            Event::UIResize() => (),
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(Config::get(ConfigKey::MaxImages).parse::<usize>()?);
    if let Some(name) = BackendName::parse(Config::get(ConfigKey::Backend)) {
        app_state.check_backend(&BackendManager::get(name)?).await;
    }

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
