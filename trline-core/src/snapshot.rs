//! Immutable timeline snapshot and the views derived from it
//!
//! A [`TimelineSnapshot`] is built once from the loaded records and handed
//! to the rendering side by reference. Filtering by project or changing the
//! visible window produces a [`TimelineView`] borrowing from the snapshot;
//! the snapshot itself never changes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::TimelineConfig;
use crate::milestone::Milestone;
use crate::models::{GlobalTimeline, ProjectTimeline, RawProjectRecord};
use crate::palette::{Palette, DELAYED_COLOR, ON_TIME_COLOR};
use crate::span::{Span, SpanPolicy};
use crate::timeline::{build_timelines, monthly_ticks};

/// Everything the dashboard shows, derived once at startup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSnapshot {
    built_on: NaiveDate,
    projects: Vec<ProjectTimeline>,
    global: GlobalTimeline,
    palette: Palette,
}

impl TimelineSnapshot {
    pub fn build(records: &[RawProjectRecord], config: &TimelineConfig, today: NaiveDate) -> Self {
        let (projects, global) = build_timelines(records, config, today);
        let palette = Palette::new(config.palette.clone().unwrap_or_default());
        Self {
            built_on: today,
            projects,
            global,
            palette,
        }
    }

    /// Date used for the "no data" fallbacks
    pub fn built_on(&self) -> NaiveDate {
        self.built_on
    }

    /// Project timelines in load order
    pub fn projects(&self) -> &[ProjectTimeline] {
        &self.projects
    }

    pub fn global(&self) -> &GlobalTimeline {
        &self.global
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn project_names(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.name.as_str()).collect()
    }

    /// Derive a view; an empty or non-matching project filter shows everything
    pub fn view(&self, request: &ViewRequest) -> TimelineView<'_> {
        let wanted: Vec<&str> = request.projects.iter().map(|p| p.trim()).collect();

        let mut rows: Vec<ProjectRow<'_>> = self
            .projects
            .iter()
            .enumerate()
            .filter(|(_, p)| wanted.is_empty() || wanted.contains(&p.name.as_str()))
            .map(|(index, timeline)| self.row(index, timeline))
            .collect();

        if rows.is_empty() && !wanted.is_empty() {
            log::warn!(
                "No project matches {:?}; showing all projects",
                request.projects
            );
            rows = self
                .projects
                .iter()
                .enumerate()
                .map(|(index, timeline)| self.row(index, timeline))
                .collect();
        }

        let window = match request.window {
            Some((from, to)) => Span::new(from, to).apply(SpanPolicy::Swap),
            None => Span::new(self.global.min_date, self.global.max_date),
        };

        TimelineView {
            rows,
            window,
            ticks: monthly_ticks(window.start, window.end),
        }
    }

    fn row<'a>(&'a self, index: usize, timeline: &'a ProjectTimeline) -> ProjectRow<'a> {
        ProjectRow {
            index,
            color: self.palette.color_for(index),
            timeline,
        }
    }
}

/// What the renderer asks for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRequest {
    /// Project names to show; empty means all
    pub projects: Vec<String>,
    /// Visible date range override
    pub window: Option<(NaiveDate, NaiveDate)>,
}

impl ViewRequest {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_projects<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_window(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.window = Some((from, to));
        self
    }
}

/// A filtered, windowed projection of a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView<'a> {
    pub rows: Vec<ProjectRow<'a>>,
    /// Visible date range, never inverted
    pub window: Span,
    /// First-of-month dates inside the window
    pub ticks: Vec<NaiveDate>,
}

/// One visible project with its assigned colour
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow<'a> {
    /// Position in the snapshot; colours are keyed on this, not on the view
    pub index: usize,
    pub color: &'a str,
    pub timeline: &'a ProjectTimeline,
}

impl ProjectRow<'_> {
    pub fn markers(&self) -> Vec<Marker> {
        self.timeline
            .observations
            .iter()
            .map(|(milestone, obs)| Marker {
                milestone: *milestone,
                date: obs.date,
                delay_days: obs.delay_days,
            })
            .collect()
    }
}

/// A gate marker on a project row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub milestone: Milestone,
    pub date: NaiveDate,
    pub delay_days: i64,
}

impl Marker {
    pub fn is_delayed(&self) -> bool {
        self.delay_days > 0
    }

    pub fn color(&self) -> &'static str {
        if self.is_delayed() {
            DELAYED_COLOR
        } else {
            ON_TIME_COLOR
        }
    }

    /// Gate id, with the slip appended when delayed (e.g. "TR2 +3d")
    pub fn label(&self) -> String {
        if self.is_delayed() {
            format!("{} +{}d", self.milestone, self.delay_days)
        } else {
            self.milestone.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_records;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> TimelineSnapshot {
        TimelineSnapshot::build(&sample_records(), &TimelineConfig::default(), date(2026, 10, 16))
    }

    #[test]
    fn test_empty_filter_shows_all() {
        let snap = snapshot();
        let view = snap.view(&ViewRequest::all());
        assert_eq!(view.rows.len(), 6);
        assert_eq!(view.window, Span::new(snap.global().min_date, snap.global().max_date));
        assert_eq!(view.ticks, snap.global().monthly_ticks);
    }

    #[test]
    fn test_filter_keeps_load_order_and_colours() {
        let snap = snapshot();
        let view = snap.view(&ViewRequest::all().with_projects(["E", " B"]));
        let names: Vec<&str> = view.rows.iter().map(|r| r.timeline.name.as_str()).collect();
        assert_eq!(names, vec!["B", "E"]);
        assert_eq!(view.rows[0].color, "#FF8C00");
        assert_eq!(view.rows[1].color, "#9370DB");
        assert_eq!(view.rows[1].index, 4);
    }

    #[test]
    fn test_unknown_names_fall_back_to_all() {
        let snap = snapshot();
        let view = snap.view(&ViewRequest::all().with_projects(["Z"]));
        assert_eq!(view.rows.len(), 6);
    }

    #[test]
    fn test_window_override() {
        let snap = snapshot();
        let view = snap.view(&ViewRequest::all().with_window(date(2025, 3, 15), date(2025, 1, 10)));
        assert_eq!(view.window, Span::new(date(2025, 1, 10), date(2025, 3, 15)));
        assert_eq!(view.ticks, vec![date(2025, 2, 1), date(2025, 3, 1)]);
    }

    #[test]
    fn test_view_does_not_mutate_snapshot() {
        let snap = snapshot();
        let before = snap.clone();
        let _ = snap.view(&ViewRequest::all().with_projects(["A"]));
        let _ = snap.view(&ViewRequest::all().with_window(date(2020, 1, 1), date(2021, 1, 1)));
        assert_eq!(snap, before);

        let first = snap.view(&ViewRequest::all().with_projects(["C"]));
        let second = snap.view(&ViewRequest::all().with_projects(["C"]));
        assert_eq!(first, second);
    }

    #[test]
    fn test_markers() {
        let snap = snapshot();
        let view = snap.view(&ViewRequest::all().with_projects(["A"]));
        let markers = view.rows[0].markers();
        assert_eq!(markers.len(), 8);

        let tr1 = markers[0];
        assert_eq!(tr1.label(), "TR1");
        assert_eq!(tr1.color(), ON_TIME_COLOR);

        let tr2 = markers[1];
        assert_eq!(tr2.label(), "TR2 +3d");
        assert_eq!(tr2.color(), DELAYED_COLOR);
    }

    #[test]
    fn test_custom_palette() {
        let config = TimelineConfig {
            palette: Some(vec!["#000000".to_string(), "#FFFFFF".to_string()]),
            ..Default::default()
        };
        let snap = TimelineSnapshot::build(&sample_records(), &config, date(2026, 10, 16));
        let view = snap.view(&ViewRequest::all());
        let colours: Vec<&str> = view.rows.iter().map(|r| r.color).collect();
        assert_eq!(
            colours,
            vec!["#000000", "#FFFFFF", "#000000", "#FFFFFF", "#000000", "#FFFFFF"]
        );
    }
}
