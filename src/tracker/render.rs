use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::deadline::{dday, is_urgent};
use super::models::{Job, JobId, JobStatus};

/// Shown in place of any absent field
pub const PLACEHOLDER: &str = "-";

/// Single row shown when nothing passes the filters
pub const EMPTY_MESSAGE: &str = "데이터가 없습니다.";

/// One displayed job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: JobId,
    pub company: String,
    pub title: String,
    pub deadline_raw: String,
    pub dday: String,
    pub urgent: bool,
    pub status: JobStatus,
    pub status_options: [JobStatus; 5],
    pub memo: String,
    pub url: String,
}

impl RowView {
    pub fn from_job(job: &Job, today: NaiveDate) -> Self {
        Self {
            id: job.id,
            company: or_placeholder(job.company.as_deref()),
            title: or_placeholder(job.title.as_deref()),
            deadline_raw: or_placeholder(job.deadline_raw.as_deref()),
            dday: dday(job.deadline_date, today),
            urgent: is_urgent(job.deadline_date, today),
            status: job.status,
            status_options: JobStatus::ALL,
            memo: job.memo.clone(),
            url: or_placeholder(job.url.as_deref()),
        }
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Rendered job list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Rows { rows: Vec<RowView> },
    Empty { message: String },
}

impl Default for View {
    fn default() -> Self {
        View::empty()
    }
}

impl View {
    pub fn empty() -> Self {
        View::Empty {
            message: EMPTY_MESSAGE.to_string(),
        }
    }

    pub fn rows(&self) -> &[RowView] {
        match self {
            View::Rows { rows } => rows,
            View::Empty { .. } => &[],
        }
    }

    /// Update a rendered row in place, leaving the rest of the view as is.
    /// Returns false when the row is not currently displayed.
    pub fn patch_row(&mut self, id: JobId, patch: impl FnOnce(&mut RowView)) -> bool {
        match self {
            View::Rows { rows } => match rows.iter_mut().find(|row| row.id == id) {
                Some(row) => {
                    patch(row);
                    true
                }
                None => false,
            },
            View::Empty { .. } => false,
        }
    }
}

/// Project already-filtered jobs into display rows
pub fn project(jobs: &[&Job], today: NaiveDate) -> View {
    if jobs.is_empty() {
        return View::empty();
    }
    View::Rows {
        rows: jobs.iter().map(|job| RowView::from_job(job, today)).collect(),
    }
}

/// (header, column width) for every padded column; the link column is last and unpadded
const COLUMNS: [(&str, usize); 7] = [
    ("COMPANY", 20),
    ("TITLE", 28),
    ("DEADLINE", 16),
    ("D-DAY", 12),
    ("STATUS", 8),
    ("MEMO", 24),
    ("LINK", 0),
];

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = match self {
            View::Empty { message } => return writeln!(f, "{}", message),
            View::Rows { rows } => rows,
        };

        let headers: Vec<&str> = COLUMNS.iter().map(|(name, _)| *name).collect();
        write_line(f, "ID", &headers)?;
        for row in rows {
            let dday = if row.urgent {
                format!("{} !", row.dday)
            } else {
                row.dday.clone()
            };
            let cells = [
                row.company.as_str(),
                row.title.as_str(),
                row.deadline_raw.as_str(),
                dday.as_str(),
                row.status.as_str(),
                row.memo.as_str(),
                row.url.as_str(),
            ];
            write_line(f, &row.id.to_string(), &cells)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, id: &str, cells: &[&str]) -> fmt::Result {
    write!(f, "{:>6}", id)?;
    for ((_, width), cell) in COLUMNS.iter().zip(cells) {
        if *width == 0 {
            write!(f, "  {}", cell)?;
        } else {
            write!(f, "  {}", fit(cell, *width))?;
        }
    }
    writeln!(f)
}

/// Pad or cut `value` to exactly `width` terminal columns. Hangul and other
/// wide characters take two columns each.
fn fit(value: &str, width: usize) -> String {
    if value.width() <= width {
        let padding = width - value.width();
        return format!("{}{}", value, " ".repeat(padding));
    }

    let mut cut = String::new();
    let mut used = 0;
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        // one column stays free for the ellipsis
        if used + w + 1 > width {
            break;
        }
        cut.push(c);
        used += w;
    }
    cut.push('…');
    used += 1;
    cut.push_str(&" ".repeat(width.saturating_sub(used)));
    cut
}
