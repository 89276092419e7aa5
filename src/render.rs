//! TUI rendering for roomsched types.
//!
//! Extension traits and helpers that turn roomsched-core types into colored
//! terminal output using owo_colors.

use roomsched_core::room::{Availability, Room};
use roomsched_core::timetable::Column;
use roomsched_core::{DisplayCategory, GridAssignment, Orientation, ScheduleDraft, ScheduleRecord, ScheduleStatus};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Colorize text according to the display category
fn paint(category: DisplayCategory, text: &str) -> String {
    match category {
        DisplayCategory::Primary => text.blue().to_string(),
        DisplayCategory::Success => text.green().to_string(),
        DisplayCategory::Neutral => text.dimmed().to_string(),
        DisplayCategory::Error => text.red().to_string(),
    }
}

impl Render for ScheduleStatus {
    fn render(&self) -> String {
        paint(roomsched_core::status_category(self), self.label())
    }
}

impl Render for ScheduleRecord {
    fn render(&self) -> String {
        let id = format!("#{}", self.id);
        let mut line = format!(
            "{} {} {} {}",
            id.dimmed(),
            self.time_range(),
            paint(self.category(), &self.title),
            format!("[{}]", self.room_name).dimmed()
        );
        if let Some(instructor) = self.instructor() {
            line.push_str(&format!(" {}", instructor.dimmed()));
        }
        line.push_str(&format!(" {}", self.status.render()));
        line
    }
}

impl Render for ScheduleDraft {
    fn render(&self) -> String {
        format!(
            "{} {} - {} {} {} {}",
            self.date.format("%a %b %-d"),
            self.start_time,
            self.end_time,
            paint(roomsched_core::status_category(&self.status), &self.title),
            format!("[room #{}]", self.room).dimmed(),
            self.status.render()
        )
    }
}

impl Render for Room {
    fn render(&self) -> String {
        let mut line = format!("{} {}", format!("#{}", self.id).dimmed(), self.to_string().bold());
        line.push_str(&format!(" {} · {} seats", self.room_type, self.capacity));
        if let Some(dept) = &self.department_name {
            line.push_str(&format!(" · {}", dept));
        }
        let location = match (self.building.is_empty(), self.floor.is_empty()) {
            (false, false) => format!("{}, floor {}", self.building, self.floor),
            (false, true) => self.building.clone(),
            (true, false) => format!("floor {}", self.floor),
            (true, true) => String::new(),
        };
        if !location.is_empty() {
            line.push_str(&format!(" {}", format!("({})", location).dimmed()));
        }
        line
    }
}

impl Render for Availability<'_> {
    fn render(&self) -> String {
        let mut lines = Vec::new();
        match self.current {
            Some(current) => lines.push(format!("{} {}", "Occupied:".red(), current.render())),
            None => lines.push("Available now".green().to_string()),
        }
        if let Some(next) = self.next {
            lines.push(format!("{} {}", "Next:".dimmed(), next.render()));
        }
        lines.join("\n")
    }
}

/// Color legend shown under the timetable
pub fn render_legend() -> String {
    ScheduleStatus::KNOWN
        .iter()
        .map(|status| paint(roomsched_core::status_category(status), &format!("■ {}", status.label())))
        .collect::<Vec<_>>()
        .join("  ")
}

const TIME_WIDTH: usize = 6;
const DAY_WIDTH: usize = 16;
const ROOM_WIDTH: usize = 22;

/// Pad or truncate to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else if width > 1 {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    } else {
        text.chars().take(width).collect()
    }
}

fn column_header(column: &Column) -> String {
    match column {
        Column::Day(day) => day.format("%a %b %d").to_string(),
        Column::Room(room) => room.clone(),
    }
}

fn entry_text(orientation: Orientation, record: &ScheduleRecord) -> String {
    match orientation {
        Orientation::Week => record.title.clone(),
        Orientation::Room => format!("{} {}", record.date.format("%a"), record.title),
    }
}

/// Render the projected grid as a text table. Room-view cells list every
/// booking on its own line, so a row grows to fit its fullest cell.
pub fn render_grid(grid: &GridAssignment<'_>) -> String {
    let width = match grid.orientation {
        Orientation::Week => DAY_WIDTH,
        Orientation::Room => ROOM_WIDTH,
    };

    let mut lines = Vec::new();

    let mut header = fit("Time", TIME_WIDTH).bold().to_string();
    for column in &grid.columns {
        header.push_str(" │ ");
        header.push_str(&fit(&column_header(column), width).bold().to_string());
    }
    lines.push(header);

    let rule_len = TIME_WIDTH + grid.columns.len() * (width + 3);
    lines.push("─".repeat(rule_len).dimmed().to_string());

    for (row, slot) in grid.slots.iter().enumerate() {
        let height = (0..grid.columns.len())
            .map(|col| grid.cell(row, col).len())
            .max()
            .unwrap_or(0)
            .max(1);

        for sub in 0..height {
            let label = if sub == 0 { slot.to_string() } else { String::new() };
            let mut line = fit(&label, TIME_WIDTH).bold().to_string();
            for col in 0..grid.columns.len() {
                line.push_str(" │ ");
                let cell = grid.cell(row, col);
                match cell.get(sub) {
                    Some(record) => {
                        line.push_str(&paint(record.category(), &fit(&entry_text(grid.orientation, record), width)))
                    }
                    None if sub == 0 => line.push_str(&fit("·", width).dimmed().to_string()),
                    None => line.push_str(&" ".repeat(width)),
                }
            }
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Tabular list of bookings
pub fn render_schedule_table(records: &[&ScheduleRecord]) -> String {
    if records.is_empty() {
        return "No schedules found".dimmed().to_string();
    }

    let mut lines = Vec::new();
    let mut current_date = None;

    for record in records {
        if current_date != Some(record.date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(record.date.format("%A, %b %-d").to_string().bold().to_string());
            current_date = Some(record.date);
        }
        lines.push(format!("  {}", record.render()));
    }

    lines.join("\n")
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 { word.to_string() } else { format!("{word}s") }
}
