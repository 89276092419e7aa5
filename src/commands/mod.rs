pub mod create;
pub mod delete;
pub mod edit;
pub mod init_config;
pub mod room;
pub mod rooms;
pub mod schedules;
pub mod show;
pub mod status;
pub mod timetable;
pub mod today;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use roomsched_core::config::RoomschedConfig;
use roomsched_core::week::parse_date;
use roomsched_core::{ClockTime, ScheduleDraft, ScheduleRecord, ScheduleStatus};
use tracing::debug;

use crate::client::{Client, ListResponse, ScheduleQuery};

/// Where schedule records come from: the API, or a JSON snapshot on disk.
pub enum Source {
    Api(Client),
    File(PathBuf),
}

impl Source {
    pub fn new(file: Option<PathBuf>, config: &RoomschedConfig) -> Result<Self> {
        match file {
            Some(path) => Ok(Source::File(path)),
            None => Ok(Source::Api(Client::new(config)?)),
        }
    }

    /// The API client, or an error naming the command that needs one.
    pub fn client(&self, command: &str) -> Result<&Client> {
        match self {
            Source::Api(client) => Ok(client),
            Source::File(_) => anyhow::bail!("`{}` needs the scheduling API and cannot run from --file", command),
        }
    }

    /// Fetch schedules. Snapshot files get the same filters applied locally.
    pub async fn schedules(&self, query: &ScheduleQuery) -> Result<Vec<ScheduleRecord>> {
        match self {
            Source::Api(client) => client.list_schedules(query).await,
            Source::File(path) => {
                let records = load_snapshot(path)?;
                Ok(records.into_iter().filter(|r| matches_query(r, query)).collect())
            }
        }
    }
}

fn matches_query(record: &ScheduleRecord, query: &ScheduleQuery) -> bool {
    query.room.is_none_or(|room| record.room == Some(room))
        && query.date.is_none_or(|date| record.date == date)
        && query.status.as_ref().is_none_or(|status| &record.status == status)
}

/// Read a JSON array of schedule records (or a paginated API response).
pub fn load_snapshot(path: &Path) -> Result<Vec<ScheduleRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot at {}", path.display()))?;

    let list: ListResponse<ScheduleRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot at {}", path.display()))?;

    let records = list.into_vec();
    debug!(count = records.len(), path = %path.display(), "loaded snapshot");
    Ok(records)
}

/// Booking fields given on the command line. Unset fields are left alone
/// when editing and required (where the server requires them) when creating.
#[derive(Args, Debug, Default, Clone)]
pub struct ScheduleFields {
    /// Room id
    #[arg(long)]
    pub room_id: Option<u64>,

    #[arg(long)]
    pub title: Option<String>,

    /// YYYY-MM-DD
    #[arg(short, long)]
    pub date: Option<String>,

    /// HH:MM
    #[arg(long)]
    pub start: Option<String>,

    /// HH:MM
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub instructor: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub course_code: Option<String>,

    /// scheduled, in_progress, completed or cancelled
    #[arg(short, long)]
    pub status: Option<String>,
}

impl ScheduleFields {
    /// A new draft. Room, title, date, start and end must all be given.
    pub fn into_draft(self) -> Result<ScheduleDraft> {
        let mut missing = Vec::new();
        if self.room_id.is_none() {
            missing.push("--room-id");
        }
        for (flag, value) in [
            ("--title", &self.title),
            ("--date", &self.date),
            ("--start", &self.start),
            ("--end", &self.end),
        ] {
            if value.is_none() {
                missing.push(flag);
            }
        }
        if !missing.is_empty() {
            anyhow::bail!("Missing required {}", missing.join(", "));
        }

        let mut draft = ScheduleDraft {
            room: 0,
            title: String::new(),
            description: String::new(),
            instructor: String::new(),
            course_code: String::new(),
            date: today(),
            start_time: ClockTime::default(),
            end_time: ClockTime::default(),
            status: ScheduleStatus::Scheduled,
        };
        self.apply(&mut draft)?;
        Ok(draft)
    }

    /// Overwrite the fields that were given.
    pub fn apply(self, draft: &mut ScheduleDraft) -> Result<()> {
        if let Some(room) = self.room_id {
            draft.room = room;
        }
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(date) = self.date {
            draft.date = parse_date(&date)?;
        }
        if let Some(start) = self.start {
            draft.start_time = start.parse()?;
        }
        if let Some(end) = self.end {
            draft.end_time = end.parse()?;
        }
        if let Some(instructor) = self.instructor {
            draft.instructor = instructor;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(course_code) = self.course_code {
            draft.course_code = course_code;
        }
        if let Some(status) = self.status {
            draft.status = ScheduleStatus::parse_known(&status)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.room_id.is_none()
            && self.title.is_none()
            && self.date.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.instructor.is_none()
            && self.description.is_none()
            && self.course_code.is_none()
            && self.status.is_none()
    }
}

/// Refuse a draft that would collide with an active booking in the same room.
/// The server checks this too; asking first gives a clearer message.
pub async fn ensure_no_conflicts(client: &Client, draft: &ScheduleDraft, editing: Option<u64>) -> Result<()> {
    let query = ScheduleQuery {
        room: Some(draft.room),
        date: Some(draft.date),
        status: None,
    };
    let records = client.list_schedules(&query).await?;
    let conflicts = draft.conflicts(&records, editing);
    if let Some(first) = conflicts.first() {
        anyhow::bail!(
            "This time slot overlaps with: {} ({}){}",
            first.title,
            first.time_range(),
            if conflicts.len() > 1 {
                format!(" and {} more", conflicts.len() - 1)
            } else {
                String::new()
            }
        );
    }
    Ok(())
}

/// Parse an optional `--date`, defaulting to today.
pub fn date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(today()),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
