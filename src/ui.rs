pub mod charting;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};
use typerush::{config::TIME_PRESETS, layout::wrap_rows, session::Session, typing_policy::CharMark};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
/// Rows of words visible at once
pub const VISIBLE_ROWS: u16 = 3;

/// Columns available to the word display for a terminal of the given width
pub fn text_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.driver.session();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // timer and live stats
            Constraint::Length(1),
            Constraint::Length(VISIBLE_ROWS),
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let live = session.live_stats();
    let header = Paragraph::new(Span::styled(
        format!(
            "{}s   {} wpm   {} acc",
            session.time_remaining_secs(),
            live.wpm,
            live.accuracy
        ),
        if session.is_running() {
            bold_style.fg(Color::Yellow)
        } else {
            dim_bold_style
        },
    ))
    .alignment(Alignment::Center);
    header.render(chunks[1], buf);

    let words = Paragraph::new(word_lines(app, session, text_width(area.width)));
    words.render(chunks[3], buf);

    let legend_text = if session.is_idle() {
        let presets = TIME_PRESETS
            .iter()
            .enumerate()
            .map(|(i, secs)| format!("({}) {secs}s", i + 1))
            .join(" ");
        format!("start typing / {presets} / (tab) restart / (esc)ape")
    } else {
        "(tab) restart / (esc)ape".to_string()
    };
    Paragraph::new(Span::styled(legend_text, italic_style)).render(chunks[5], buf);
}

/// Lay the words out in rows and style the visible window of them
fn word_lines<'a>(app: &App, session: &'a Session, width: u16) -> Vec<Line<'a>> {
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let done_style = Style::default().fg(Color::DarkGray);
    let correct_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let incorrect_style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    let overflow_style = Style::default()
        .fg(Color::LightRed)
        .add_modifier(Modifier::CROSSED_OUT);
    let cursor_style = dim_style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);

    let first_row = app.scroll.offset;
    let last_row = first_row + VISIBLE_ROWS as u32;
    let mut lines: Vec<Vec<Span<'a>>> = vec![Vec::new(); VISIBLE_ROWS as usize];

    let rows = wrap_rows(session.words(), width);
    for (idx, (word, row)) in session.words().iter().zip(rows).enumerate() {
        if row < first_row || row >= last_row {
            continue;
        }
        let line = &mut lines[(row - first_row) as usize];
        if !line.is_empty() {
            line.push(Span::raw(" "));
        }

        if idx < session.word_index() {
            line.push(Span::styled(word.as_str(), done_style));
        } else if idx > session.word_index() {
            line.push(Span::styled(word.as_str(), dim_style));
        } else {
            let marks = session.active_marks();
            let cursor = marks.cursor();
            for (pos, (c, mark)) in word.chars().zip(&marks.positions).enumerate() {
                let style = match mark {
                    CharMark::Correct => correct_style,
                    CharMark::Incorrect => incorrect_style,
                    CharMark::Unset if cursor == Some(pos) => cursor_style,
                    CharMark::Unset => dim_style,
                };
                line.push(Span::styled(c.to_string(), style));
            }
            if !marks.overflow.is_empty() {
                let extra: String = marks.overflow.iter().collect();
                line.push(Span::styled(extra, overflow_style));
            }
        }
    }

    lines.into_iter().map(Line::from).collect()
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.driver.session();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let points = session.wpm_series().as_points();
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(&points, session.time_limit_secs() as f64);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        );
    chart.render(chunks[0], buf);

    let summary = match session.final_results() {
        Some(r) => format!(
            "{} wpm   {}% acc   {} raw   {} errors   {:.2} sd",
            r.wpm, r.accuracy, r.raw_chars, r.errors, r.consistency
        ),
        None => String::new(),
    };
    Paragraph::new(Span::styled(summary, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let legend = "(r)etry same words / (tab) new words / (esc)ape";
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[3], buf);
}
