//! HTTP client for the room-scheduling API

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response};
use roomsched_core::config::RoomschedConfig;
use roomsched_core::room::{Room, RoomType};
use roomsched_core::{ScheduleDraft, ScheduleRecord, ScheduleStatus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// HTTP client for the scheduling API
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

// Response types matching the server API

/// List endpoints answer either a bare array or a paginated `{"results": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) => items,
            ListResponse::Paged { results } => results,
        }
    }
}

#[derive(Deserialize)]
pub struct TodaySchedule {
    pub date: NaiveDate,
    pub schedules: Vec<ScheduleRecord>,
}

#[derive(Deserialize)]
pub struct RoomSummary {
    pub id: u64,
    pub name: String,
    pub number: String,
    pub department: String,
    pub capacity: u32,
    pub room_type: RoomType,
}

#[derive(Deserialize)]
pub struct RoomSchedule {
    pub room: RoomSummary,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Bookings grouped by date
    pub schedules: BTreeMap<NaiveDate, Vec<ScheduleRecord>>,
}

impl RoomSchedule {
    /// All bookings, by date then server order.
    pub fn records(&self) -> Vec<ScheduleRecord> {
        self.schedules.values().flatten().cloned().collect()
    }
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub message: String,
    pub schedule: ScheduleRecord,
}

#[derive(Serialize)]
struct StatusRequest<'a> {
    status: &'a ScheduleStatus,
}

/// Filters for GET /schedules/
#[derive(Debug, Default, Clone)]
pub struct ScheduleQuery {
    pub room: Option<u64>,
    pub date: Option<NaiveDate>,
    pub status: Option<ScheduleStatus>,
}

impl ScheduleQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(room) = self.room {
            params.push(("room", room.to_string()));
        }
        if let Some(date) = self.date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(status) = &self.status {
            params.push(("status", status.to_string()));
        }
        params
    }
}

/// Filters for GET /rooms/
#[derive(Debug, Default, Clone)]
pub struct RoomQuery {
    pub search: Option<String>,
    pub room_type: Option<String>,
    pub department: Option<u64>,
}

impl RoomQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(room_type) = &self.room_type {
            params.push(("type", room_type.clone()));
        }
        if let Some(department) = self.department {
            params.push(("department", department.to_string()));
        }
        params
    }
}

impl Client {
    pub fn new(config: &RoomschedConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).context("Unexpected response from the scheduling API")
    }

    /// Send and check the status, returning the raw body.
    async fn send_raw(&self, request: RequestBuilder) -> Result<String> {
        let resp = request
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", self.base_url))?;

        debug!(status = %resp.status(), url = %resp.url(), "api response");
        check_response(resp).await
    }

    /// GET /schedules/
    pub async fn list_schedules(&self, query: &ScheduleQuery) -> Result<Vec<ScheduleRecord>> {
        let request = self.http.get(self.url("schedules/")).query(&query.params());
        let list: ListResponse<ScheduleRecord> = self.send(request).await?;
        Ok(list.into_vec())
    }

    /// GET /schedules/:id/
    pub async fn get_schedule(&self, id: u64) -> Result<ScheduleRecord> {
        self.send(self.http.get(self.url(&format!("schedules/{id}/")))).await
    }

    fn create_request(&self, draft: &ScheduleDraft) -> RequestBuilder {
        self.http.post(self.url("schedules/")).json(draft)
    }

    fn update_request(&self, id: u64, draft: &ScheduleDraft) -> RequestBuilder {
        self.http.put(self.url(&format!("schedules/{id}/"))).json(draft)
    }

    fn delete_request(&self, id: u64) -> RequestBuilder {
        self.http.delete(self.url(&format!("schedules/{id}/")))
    }

    /// POST /schedules/
    pub async fn create_schedule(&self, draft: &ScheduleDraft) -> Result<ScheduleDraft> {
        self.send(self.create_request(draft)).await
    }

    /// PUT /schedules/:id/
    pub async fn update_schedule(&self, id: u64, draft: &ScheduleDraft) -> Result<ScheduleDraft> {
        self.send(self.update_request(id, draft)).await
    }

    /// DELETE /schedules/:id/
    pub async fn delete_schedule(&self, id: u64) -> Result<()> {
        self.send_raw(self.delete_request(id)).await?;
        Ok(())
    }

    /// GET /schedules/today/
    pub async fn today(&self) -> Result<TodaySchedule> {
        self.send(self.http.get(self.url("schedules/today/"))).await
    }

    /// POST /schedules/:id/status/
    pub async fn update_status(&self, id: u64, status: &ScheduleStatus) -> Result<StatusUpdate> {
        let request = self
            .http
            .post(self.url(&format!("schedules/{id}/status/")))
            .json(&StatusRequest { status });
        self.send(request).await
    }

    /// GET /rooms/
    pub async fn list_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>> {
        let request = self.http.get(self.url("rooms/")).query(&query.params());
        let list: ListResponse<Room> = self.send(request).await?;
        Ok(list.into_vec())
    }

    /// GET /rooms/:id/schedule/
    pub async fn room_schedule(&self, room_id: u64, start: NaiveDate, end: NaiveDate) -> Result<RoomSchedule> {
        let request = self.http.get(self.url(&format!("rooms/{room_id}/schedule/"))).query(&[
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
        ]);
        self.send(request).await
    }
}

async fn check_response(resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await.context("Failed to read response body")?;

    if !status.is_success() {
        anyhow::bail!("{}", error_message(status.as_u16(), &body));
    }
    Ok(body)
}

/// Pull a readable message out of an error body.
fn error_message(status: u16, body: &str) -> String {
    let described = serde_json::from_str::<Value>(body).ok().and_then(|v| describe_error(&v));
    match described {
        Some(msg) => format!("{msg} (HTTP {status})"),
        None if body.trim().is_empty() => format!("Request failed with HTTP {status}"),
        None => format!("Request failed with HTTP {status}: {}", body.trim()),
    }
}

/// `{"error": ..}`, `{"detail": ..}`, or a validation map such as
/// `{"non_field_errors": [..], "title": [..]}`.
fn describe_error(value: &Value) -> Option<String> {
    let joined = |parts: Vec<String>| (!parts.is_empty()).then(|| parts.join("; "));
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => joined(items.iter().filter_map(describe_error).collect()),
        Value::Object(map) => {
            if let Some(msg) = ["error", "detail"].iter().find_map(|key| map.get(*key).and_then(describe_error)) {
                return Some(msg);
            }
            joined(
                map.iter()
                    .filter_map(|(field, v)| {
                        let msg = describe_error(v)?;
                        Some(if field == "non_field_errors" { msg } else { format!("{field}: {msg}") })
                    })
                    .collect(),
            )
        }
        _ => None,
    }
}
