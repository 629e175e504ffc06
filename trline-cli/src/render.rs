//! Terminal Gantt rendering
//!
//! Draws a [`TimelineView`] as fixed-width text: a two-line month axis, then
//! one bar per project with gate markers and a label line underneath.

use chrono::NaiveDate;
use colored::{Color, Colorize};

use trline_core::palette::{Rgb, DELAYED_COLOR, ON_TIME_COLOR};
use trline_core::{tick_label, Span, TimelineView};

const BAR: char = '━';
const ON_TIME_MARK: char = '■';
const DELAYED_MARK: char = '◆';
const AXIS: char = '─';
const TICK: char = '┬';
const AXIS_COLOR: &str = "#FF8C00";

const MIN_WIDTH: usize = 10;
const MAX_NAME_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Option<Rgb>,
}

impl Cell {
    fn blank() -> Self {
        Cell { ch: ' ', color: None }
    }
}

/// Maps dates onto chart columns
struct Scale {
    window: Span,
    width: usize,
}

impl Scale {
    fn new(window: Span, width: usize) -> Self {
        Self {
            window,
            width: width.max(MIN_WIDTH),
        }
    }

    /// Unclamped column; may fall outside `0..width`
    fn raw_column(&self, date: NaiveDate) -> i64 {
        let total = self.window.days().max(1) as f64;
        let offset = (date - self.window.start).num_days() as f64;
        (offset / total * (self.width - 1) as f64).round() as i64
    }

    fn column(&self, date: NaiveDate) -> Option<usize> {
        let col = self.raw_column(date);
        if col < 0 || col >= self.width as i64 {
            None
        } else {
            Some(col as usize)
        }
    }

    fn clamped(&self, date: NaiveDate) -> usize {
        self.raw_column(date).clamp(0, self.width as i64 - 1) as usize
    }
}

/// Writes `text` at `col` if it fits and does not overlap earlier labels
fn place(line: &mut [char], col: usize, text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let end = col + chars.len();
    if end > line.len() || line[col..end].iter().any(|c| *c != ' ') {
        return false;
    }
    // Keep one blank column between neighbouring labels
    if (col > 0 && line[col - 1] != ' ') || (end < line.len() && line[end] != ' ') {
        return false;
    }
    line[col..end].copy_from_slice(&chars);
    true
}

fn paint(cells: &[Cell]) -> String {
    cells
        .iter()
        .map(|cell| match cell.color {
            Some(rgb) => cell
                .ch
                .to_string()
                .color(Color::TrueColor {
                    r: rgb.r,
                    g: rgb.g,
                    b: rgb.b,
                })
                .to_string(),
            None => cell.ch.to_string(),
        })
        .collect()
}

fn rgb(hex: &str) -> Option<Rgb> {
    Rgb::from_hex(hex)
}

/// Render the view as terminal lines
pub fn render_gantt(view: &TimelineView<'_>, width: usize) -> Vec<String> {
    let scale = Scale::new(view.window, width);
    let name_width = view
        .rows
        .iter()
        .map(|r| r.timeline.name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, MAX_NAME_WIDTH);
    let gutter = " ".repeat(name_width + 1);

    let mut lines = Vec::new();

    // Axis labels
    let mut years = vec![' '; scale.width];
    let mut days = vec![' '; scale.width];
    let mut axis = vec![
        Cell {
            ch: AXIS,
            color: rgb(AXIS_COLOR),
        };
        scale.width
    ];
    for tick in &view.ticks {
        let Some(col) = scale.column(*tick) else {
            continue;
        };
        let (year, month_day) = tick_label(*tick);
        if place(&mut days, col, &month_day) {
            place(&mut years, col, &year);
        }
        axis[col].ch = TICK;
    }
    lines.push(format!("{}{}", gutter, years.iter().collect::<String>().trim_end()));
    lines.push(format!("{}{}", gutter, days.iter().collect::<String>().trim_end()));
    lines.push(format!("{}{}", gutter, paint(&axis)));

    for row in &view.rows {
        let timeline = row.timeline;
        let mut cells = vec![Cell::blank(); scale.width];
        let mut labels = vec![' '; scale.width];

        // An inverted span kept by policy still draws between its two ends
        let (first, last) = if timeline.start_date <= timeline.end_date {
            (timeline.start_date, timeline.end_date)
        } else {
            (timeline.end_date, timeline.start_date)
        };
        if scale.raw_column(last) >= 0 && scale.raw_column(first) < scale.width as i64 {
            let color = rgb(row.color);
            for cell in &mut cells[scale.clamped(first)..=scale.clamped(last)] {
                *cell = Cell { ch: BAR, color };
            }
        }

        for marker in row.markers() {
            let Some(col) = scale.column(marker.date) else {
                continue;
            };
            cells[col] = Cell {
                ch: if marker.is_delayed() {
                    DELAYED_MARK
                } else {
                    ON_TIME_MARK
                },
                color: rgb(marker.color()),
            };
            place(&mut labels, col, &marker.label());
        }

        let name: String = timeline.name.chars().take(name_width).collect();
        let padded = format!("{:<width$} ", name, width = name_width);
        let name_cell = match rgb(row.color) {
            Some(c) => padded
                .color(Color::TrueColor {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                })
                .bold()
                .to_string(),
            None => padded.bold().to_string(),
        };

        lines.push(format!("{}{}", name_cell, paint(&cells)));
        lines.push(format!(
            "{}{}",
            gutter,
            labels.iter().collect::<String>().trim_end()
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use trline_core::{sample_records, TimelineConfig, TimelineSnapshot, ViewRequest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> TimelineSnapshot {
        TimelineSnapshot::build(&sample_records(), &TimelineConfig::default(), date(2026, 10, 16))
    }

    #[test]
    fn test_scale_endpoints() {
        let scale = Scale::new(Span::new(date(2025, 1, 1), date(2025, 1, 11)), 11);
        assert_eq!(scale.column(date(2025, 1, 1)), Some(0));
        assert_eq!(scale.column(date(2025, 1, 6)), Some(5));
        assert_eq!(scale.column(date(2025, 1, 11)), Some(10));
        assert_eq!(scale.column(date(2024, 12, 31)), None);
        assert_eq!(scale.column(date(2025, 1, 12)), None);
        assert_eq!(scale.clamped(date(2030, 1, 1)), 10);
    }

    #[test]
    fn test_zero_width_window_does_not_divide_by_zero() {
        let day = date(2025, 1, 1);
        let scale = Scale::new(Span::new(day, day), 20);
        assert_eq!(scale.column(day), Some(0));
    }

    #[test]
    fn test_place_rejects_overlap() {
        let mut line = vec![' '; 12];
        assert!(place(&mut line, 0, "TR1"));
        assert!(!place(&mut line, 2, "TR2"));
        assert!(!place(&mut line, 10, "TR3"));
        assert!(place(&mut line, 5, "TR4"));
        assert_eq!(line.iter().collect::<String>(), "TR1  TR4    ");
    }

    #[test]
    fn test_render_layout() {
        colored::control::set_override(false);
        let snap = snapshot();
        let view = snap.view(&ViewRequest::all().with_projects(["A", "B"]));
        let lines = render_gantt(&view, 80);

        // Three axis lines, then two lines per project
        assert_eq!(lines.len(), 3 + 2 * 2);
        assert!(lines[0].contains("2024"));
        assert!(lines[1].contains("12.01"));
        assert!(lines[3].starts_with("A    "));
        assert!(lines[3].contains(ON_TIME_MARK));
        assert!(lines[3].contains(DELAYED_MARK));
        assert!(lines[4].contains("TR1"));
        assert!(lines[5].starts_with("B    "));
    }

    #[test]
    fn test_render_window_hides_outside_markers() {
        colored::control::set_override(false);
        let snap = snapshot();
        let view = snap.view(
            &ViewRequest::all()
                .with_projects(["A"])
                .with_window(date(2025, 1, 1), date(2025, 2, 28)),
        );
        let lines = render_gantt(&view, 60);
        let bar = &lines[3];
        // Only TR2 (2025-01-20, delayed) falls inside the window
        assert_eq!(bar.matches(DELAYED_MARK).count(), 1);
        assert_eq!(bar.matches(ON_TIME_MARK).count(), 0);
        assert!(lines[4].contains("TR2 +3d"));
    }
}
