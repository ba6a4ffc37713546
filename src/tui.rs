use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::app::{Action, App, BrowserView, Effect, ListRow, Pane, LIST_HEIGHT};
use crate::export::{write_export, EXPORT_FILE};
use crate::models::FilterKind;

const IDLE_POLL: Duration = Duration::from_millis(250);
const HELP: &str = " Tab:Focus | 1:No-US 2:Remote 3:Visa | x:Export q:Quit";
const HEURISTIC_NOTE: &str =
    " US-only detection is a best-effort keyword heuristic, not an authoritative reading of a posting.";

pub fn run_browse(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, &app.view()))?;

        let timeout = app
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(action) = action_for(key) else { continue };
                match app.handle(action) {
                    Some(Effect::Quit) => break,
                    Some(Effect::Export { contents, count }) => {
                        let text = match write_export(Path::new(EXPORT_FILE), &contents) {
                            Ok(()) => format!("Exported {} jobs to {}", count, EXPORT_FILE),
                            Err(e) => {
                                tracing::error!(error = %format!("{:#}", e), "export failed");
                                format!("Export failed: {:#}", e)
                            }
                        };
                        app.notify(text, Instant::now());
                    }
                    None => {}
                }
            }
        }

        app.tick(Instant::now());
    }
    Ok(())
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Tab => Action::ToggleFocus,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Char('1') => Action::ToggleFilter(FilterKind::ExcludeUsOnly),
        KeyCode::Char('2') => Action::ToggleFilter(FilterKind::RemoteOnly),
        KeyCode::Char('3') => Action::ToggleFilter(FilterKind::VisaOnly),
        KeyCode::Char('x') => Action::Export,
        _ => return None,
    };
    Some(action)
}

fn draw(frame: &mut Frame, view: &BrowserView) {
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(LIST_HEIGHT as u16 + 2),
    ];
    if view.notification.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let title = Paragraph::new(Span::styled(
        "HN JOBS CLI",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Green)));
    frame.render_widget(title, chunks[0]);

    let status = Paragraph::new(Line::from(vec![
        Span::raw("Total: "),
        Span::styled(view.total.to_string(), Style::default().fg(Color::Green)),
        Span::raw(" | Filtered: "),
        Span::styled(view.visible.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw(" |"),
        Span::styled(HELP, Style::default().add_modifier(Modifier::DIM)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(status, chunks[1]);

    let indicator = |label: &'static str, kind: FilterKind| {
        let color = if view.filters.is_enabled(kind) { Color::Green } else { Color::Gray };
        Span::styled(label, Style::default().fg(color))
    };
    let filters = Paragraph::new(Line::from(vec![
        Span::raw("Filters: "),
        indicator("[1] No-US ", FilterKind::ExcludeUsOnly),
        indicator("[2] Remote ", FilterKind::RemoteOnly),
        indicator("[3] Visa ", FilterKind::VisaOnly),
    ]));
    frame.render_widget(filters, chunks[2]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[3]);
    draw_list(frame, panes[0], view);
    draw_detail(frame, panes[1], view);

    let mut next = 4;
    if let Some(text) = view.notification {
        let notice = Paragraph::new(Span::styled(text, Style::default().fg(Color::Green))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(notice, chunks[next]);
        next += 1;
    }

    let note = Paragraph::new(HEURISTIC_NOTE).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(note, chunks[next]);
}

fn pane_block(title: &str, active: bool) -> Block<'_> {
    let (border_type, color) = if active {
        (BorderType::Double, Color::Green)
    } else {
        (BorderType::Plain, Color::Blue)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
        .title(title)
}

fn draw_list(frame: &mut Frame, area: Rect, view: &BrowserView) {
    let block = pane_block(" Jobs ", view.active_pane == Pane::List);

    if view.rows.is_empty() {
        frame.render_widget(Paragraph::new("No jobs match filters.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = view.rows.iter().map(list_item).collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn list_item<'a>(row: &ListRow<'a>) -> ListItem<'a> {
    let job = row.job;
    let label = if job.company.is_empty() {
        job.header.chars().take(30).collect()
    } else {
        job.company.clone()
    };

    let mut flags = Vec::new();
    if job.is_remote {
        flags.push("Rem");
    }
    if job.is_visa {
        flags.push("Visa");
    }
    let flag_str = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(","))
    };

    let color = if row.is_selected { Color::Blue } else { Color::Green };
    ListItem::new(Line::from(vec![
        Span::styled(if row.is_selected { "> " } else { "  " }, Style::default().fg(color)),
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(flag_str, Style::default().add_modifier(Modifier::DIM)),
    ]))
}

fn draw_detail(frame: &mut Frame, area: Rect, view: &BrowserView) {
    let block = pane_block(" Detail ", view.active_pane == Pane::Detail);

    let Some(job) = view.selected_job else {
        let empty = Paragraph::new(Span::styled(
            "Select a job to view details",
            Style::default().fg(Color::Gray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let header = Paragraph::new(Span::styled(
        job.header.as_str(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
    .wrap(Wrap { trim: true });
    frame.render_widget(header, chunks[0]);

    let lines = wrap_content(&job.content, chunks[1].width);
    let total = lines.len();
    // Offsets past the end pin to the last line.
    let scroll = usize::from(view.detail_scroll).min(total.saturating_sub(1));
    let body: Vec<Line> = lines.into_iter().skip(scroll).map(Line::from).collect();
    frame.render_widget(Paragraph::new(body), chunks[1]);

    let footer = Paragraph::new(format!(
        "Posted by {} • {} • Line: {}/{}",
        job.user,
        job.age,
        scroll + 1,
        total
    ))
    .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[2]);
}

fn wrap_content(content: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    content
        .lines()
        .flat_map(|line| textwrap::wrap(line, width))
        .map(|line| line.into_owned())
        .collect()
}
