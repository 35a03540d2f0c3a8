//! Rendering: header line with affordances and badges, status log,
//! and the popup overlays.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use tabia_ui::{Affordance, AffordanceKey, MiniProfile};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let [header_area, hint_area, log_area, help_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    draw_header(frame, header_area, app, app.config.theme.as_deref().unwrap_or("brown"));
    draw_hint(frame, hint_area, app);
    draw_log(frame, log_area, app);
    draw_help(frame, help_area);

    if app.any_popup_open() {
        draw_popup(frame, app);
    }
}

/// The header: title on the left, resolved affordances on the right —
/// same contract the mobile client's `header()` renders. The board
/// theme arrives as a parameter, never from hidden state.
fn draw_header(frame: &mut Frame, area: Rect, app: &App, theme: &str) {
    let mut spans = vec![
        Span::styled(" tabia ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("[{theme}] "), Style::default().fg(Color::DarkGray)),
    ];
    for (i, aff) in app.affordances.iter().enumerate() {
        spans.push(Span::raw(" "));
        spans.extend(affordance_spans(i, aff));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black)),
        area,
    );
}

fn affordance_spans(index: usize, aff: &Affordance) -> Vec<Span<'static>> {
    let mut style = match aff.key {
        AffordanceKey::Friends => Style::default().fg(Color::Cyan),
        AffordanceKey::GamesMenu => Style::default().fg(Color::Green),
        AffordanceKey::NewGameForm => Style::default().fg(Color::White),
    };
    if aff.highlight {
        // New-challenge visual state.
        style = Style::default().fg(Color::Black).bg(Color::Red);
    }
    if !aff.visible {
        style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM);
    }

    let label = format!("[{}:{} {}]", index + 1, aff.icon(), aff.key.as_str());
    let mut spans = vec![Span::styled(label, style)];
    if let Some(badge) = aff.badge {
        spans.push(Span::styled(
            format!("({badge})"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

fn draw_hint(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(text) = app.active_hint() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {text}"),
                Style::default().fg(Color::Yellow),
            ))),
            area,
        );
    }
}

fn draw_log(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = app.log.len().saturating_sub(visible);
    let items: Vec<ListItem> = app.log[start..]
        .iter()
        .map(|l| ListItem::new(l.as_str()))
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("status")),
        area,
    );
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let text = " n net  s session  g/x games  c/C/X challenges  +/- friends  o offline cache\n 1/2 tap  !/@ long-press  u mini-user  v continue  p paste-FEN  Esc close  q quit";
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// Centered overlay rect, cleared beneath.
fn overlay(frame: &mut Frame, width: u16, height: u16) -> Rect {
    let full = frame.area();
    let w = width.min(full.width);
    let h = height.min(full.height);
    let area = Rect {
        x: full.x + (full.width - w) / 2,
        y: full.y + (full.height - h) / 2,
        width: w,
        height: h,
    };
    frame.render_widget(Clear, area);
    area
}

fn draw_popup(frame: &mut Frame, app: &App) {
    if app.mini_user.is_open() {
        draw_mini_user(frame, app);
    } else if let Some(names) = app.friends_popup.names() {
        let area = overlay(frame, 30, names.len() as u16 + 2);
        let items: Vec<ListItem> = names.iter().map(|n| ListItem::new(n.as_str())).collect();
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title("online friends")),
            area,
        );
    } else if let Some(fen) = app.continue_popup.fen() {
        let area = overlay(frame, 60, 5);
        let body = format!("Continue from position?\n{fen}\n[Enter] play  [Esc] cancel");
        frame.render_widget(
            Paragraph::new(body).block(Block::default().borders(Borders::ALL).title("continue")),
            area,
        );
    } else if let Some(input) = app.paste_fen.input() {
        let area = overlay(frame, 60, 4);
        let body = format!("{input}_\n[Enter] load  [Esc] cancel");
        frame.render_widget(
            Paragraph::new(body)
                .block(Block::default().borders(Borders::ALL).title("paste FEN")),
            area,
        );
    }
}

/// Mini-user card. The identity line renders in every state; the
/// rating chips and score line only once the profile has arrived.
fn draw_mini_user(frame: &mut Frame, app: &App) {
    let Some(payload) = app.mini_user.payload() else { return };
    let user = &payload.user;

    let mut lines: Vec<Line> = Vec::new();
    let dot = if user.online {
        Span::styled("● ", Style::default().fg(Color::Green))
    } else {
        Span::styled("● ", Style::default().fg(Color::DarkGray))
    };
    let mut title_spans = vec![dot];
    if let Some(title) = &user.title {
        title_spans.push(Span::styled(
            format!("{title} "),
            Style::default().fg(Color::Magenta),
        ));
    }
    title_spans.push(Span::styled(
        user.username.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    if user.patron {
        title_spans.push(Span::raw(" ♞"));
    }
    lines.push(Line::from(title_spans));
    lines.push(Line::from(""));

    match &payload.profile {
        None => {
            lines.push(Line::from(Span::styled(
                "  ◌ loading…",
                Style::default().fg(Color::DarkGray),
            )));
        }
        Some(profile) => {
            for (variant, perf) in &profile.perfs {
                lines.push(Line::from(format!("  {variant:<8} {}", MiniProfile::chip(perf))));
            }
            if let Some(ct) = &profile.crosstable {
                if let Some(score) = ct.score_line(app.config.user_id(), &user.id) {
                    lines.push(Line::from(""));
                    lines.push(Line::from(format!("  Your score: {score}")));
                }
            }
        }
    }

    let height = lines.len() as u16 + 2;
    let area = overlay(frame, 36, height);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("player")),
        area,
    );
}
