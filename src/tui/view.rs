use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::View;
use crate::session::{Outcome, SessionState};

pub fn render(frame: &mut Frame, view: &View, log_lines: usize) {
    let log_height = u16::try_from(log_lines).unwrap_or(u16::MAX).saturating_add(2);
    let [title, status, body, log, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(6),
        Constraint::Length(log_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("ripforge", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" {} | MakeMKV + HandBrakeCLI", env!("CARGO_PKG_VERSION"))),
        ])),
        title,
    );
    frame.render_widget(Paragraph::new(status_line(view)), status);

    match view.session.state() {
        SessionState::Scanning => frame.render_widget(
            Paragraph::new("Scanning for drives...").block(Block::bordered()),
            body,
        ),
        SessionState::DiscSelection => render_drives(frame, view, body),
        SessionState::TitleSelection => render_titles(frame, view, body),
        SessionState::Ripping => render_rip(frame, view, body),
        SessionState::Encoding => render_encode(frame, view, body),
        SessionState::Completed(outcome) => render_completed(frame, view, outcome, body),
    }

    let lines: Vec<Line> = view
        .session
        .log()
        .tail(log_lines)
        .map(|e| Line::raw(e.render()))
        .collect();
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().title("Log"))
            .wrap(Wrap { trim: false }),
        log,
    );

    frame.render_widget(
        Paragraph::new(help_line(view.session.state()))
            .style(Style::default().fg(Color::DarkGray)),
        help,
    );
}

fn status_line(view: &View) -> Line<'static> {
    let state = view.session.state();
    let color = match state {
        SessionState::Completed(Outcome::Succeeded) => Color::Green,
        SessionState::Completed(Outcome::Failed) => Color::Red,
        SessionState::Ripping | SessionState::Encoding => Color::Yellow,
        _ => Color::Cyan,
    };
    let mut spans = vec![Span::styled(state.to_string(), Style::default().fg(color))];
    if let Some(kind) = view.session.active_batch() {
        spans.push(Span::raw(format!("  ({kind} running)")));
    }
    Line::from(spans)
}

fn help_line(state: SessionState) -> &'static str {
    match state {
        SessionState::DiscSelection => "↑/↓ move  Enter load titles  e encode  r rescan  q quit",
        SessionState::TitleSelection => {
            "↑/↓ move  Space toggle  a all  s start rip  e encode  r rescan  q quit"
        }
        _ => "e encode  r rescan  q quit",
    }
}

fn cursor_style(is_cursor: bool) -> Style {
    if is_cursor {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn render_drives(frame: &mut Frame, view: &View, area: Rect) {
    let session = view.session;
    let lines: Vec<Line> = if session.drives().is_empty() {
        vec![Line::raw("No optical drives found")]
    } else {
        session
            .drives()
            .iter()
            .enumerate()
            .map(|(i, d)| {
                Line::styled(
                    format!("{}  {} [{}]", d.device_path.display(), d.display_name, d.disc_type),
                    cursor_style(i == session.drive_cursor()),
                )
            })
            .collect()
    };
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Drives")),
        area,
    );
}

fn render_titles(frame: &mut Frame, view: &View, area: Rect) {
    let session = view.session;
    let header = Line::styled(
        "     #  Duration  Size       Ch  Description",
        Style::default().add_modifier(Modifier::BOLD),
    );
    let mut lines = vec![header];
    lines.extend(session.titles().iter().enumerate().map(|(i, t)| {
        let mark = if session.is_selected(i) { "[X]" } else { "[ ]" };
        Line::styled(
            format!(
                "{mark} {:>2}  {:<8}  {:<9}  {:>2}  {}",
                t.index, t.duration, t.size, t.chapter_count, t.description
            ),
            cursor_style(i == session.title_cursor()),
        )
    }));

    let title = match session.device() {
        Some(device) => format!("Titles on {}", device.display()),
        None => "Titles".to_string(),
    };
    frame.render_widget(Paragraph::new(lines).block(Block::bordered().title(title)), area);
}

fn render_rip(frame: &mut Frame, view: &View, area: Rect) {
    let block = Block::bordered().title("Ripping");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [item, gauge, status, files] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    let rip = &view.rip;
    frame.render_widget(
        Paragraph::new(format!("Title {}/{}", rip.current_item, rip.total_items)),
        item,
    );
    frame.render_widget(progress_gauge(rip.percent), gauge);
    frame.render_widget(Paragraph::new(rip.status_text.clone()), status);
    render_ripped_files(frame, view, files);
}

fn render_encode(frame: &mut Frame, view: &View, area: Rect) {
    let block = Block::bordered().title("Encoding");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [input, gauge, rate, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    let enc = &view.encode;
    frame.render_widget(
        Paragraph::new(format!("Input: {}", enc.input_path.display())),
        input,
    );
    frame.render_widget(progress_gauge(enc.percent), gauge);
    frame.render_widget(
        Paragraph::new(format!(
            "FPS: {:.1} (avg {:.1})  ETA: {}",
            enc.fps,
            enc.avg_fps,
            enc.eta.as_deref().unwrap_or("--:--:--")
        )),
        rate,
    );
    frame.render_widget(Paragraph::new(enc.status_text.clone()), status);
}

fn render_completed(frame: &mut Frame, view: &View, outcome: Outcome, area: Rect) {
    let block = Block::bordered().title("Done");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [message, files] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
    let text = match outcome {
        Outcome::Succeeded => Span::styled(
            "All work finished. Press 'r' to start over.",
            Style::default().fg(Color::Green),
        ),
        Outcome::Failed => Span::styled(
            "Stopped after a failure; see the log. Press 'r' to start over.",
            Style::default().fg(Color::Red),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(text)), message);
    render_ripped_files(frame, view, files);
}

fn render_ripped_files(frame: &mut Frame, view: &View, area: Rect) {
    let files = view.session.ripped_files();
    if files.is_empty() || area.height == 0 {
        return;
    }
    let mut lines = vec![Line::styled(
        format!("Ripped files ({}):", files.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    lines.extend(
        files
            .iter()
            .map(|f| Line::raw(format!("  {} (title {})", f.output_name, f.title_number))),
    );
    frame.render_widget(Paragraph::new(lines), area);
}

fn progress_gauge(percent: f64) -> Gauge<'static> {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(format!("{percent:.1}%"))
}
