//! Workday client.
//!
//! Three Workday surfaces are used:
//!
//! - the `Timekeeping_System` and `Timeclocks` custom reports (JSON over
//!   basic auth), merged into a [`WorkerTimeReport`]
//! - the `Get_Calculated_Time_Blocks` SOAP operation of the Time Tracking
//!   service, parsed into a [`CalculatedBlockIndex`]
//! - the paginated worker summary and worker position exports, merged into
//!   [`RosterRecord`]s for the roster cache

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{RosterExport, TimeTrackingSource};
use crate::config::{RosterExportConfig, WorkdayConfig};
use crate::error::{DataSource, EngineError, EngineResult};
use crate::models::{
    CalculatedBlockIndex, CalculatedTimeBlock, DateWindow, ExternalClockEvent, ExternalTimeBlock,
    RosterPosition, RosterRecord, WorkerTimeReport,
};

/// HTTP client for Workday.
#[derive(Debug, Clone)]
pub struct WorkdayClient {
    http: Client,
    config: WorkdayConfig,
    export: RosterExportConfig,
}

impl WorkdayClient {
    /// Builds a client whose requests time out after the configured interval.
    pub fn new(config: WorkdayConfig, export: RosterExportConfig) -> EngineResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| EngineError::unavailable(DataSource::WorkdayApi, err))?;
        Ok(Self { http, config, export })
    }

    fn report_url(&self, report: &str) -> String {
        format!(
            "{}/ccx/service/customreport2/{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.tenant,
            self.config.report_owner,
            report
        )
    }

    fn time_tracking_url(&self) -> String {
        format!(
            "{}/ccx/service/{}/Time_Tracking/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.tenant,
            self.config.time_tracking_version
        )
    }

    async fn fetch_report<T: DeserializeOwned>(
        &self,
        report: &str,
        external_id: &str,
        window: &DateWindow,
    ) -> EngineResult<ReportEnvelope<T>> {
        let start_date = format!("{}-00:00", window.start_date.format("%Y-%m-%d"));
        let end_date = format!("{}-00:00", window.end_date.format("%Y-%m-%d"));
        let url = self.report_url(report);
        debug!(%url, external_id, "requesting workday report");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .query(&[
                ("employee_id", external_id),
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| EngineError::unavailable(DataSource::WorkdayApi, err))?;

        let body = response
            .text()
            .await
            .map_err(|err| EngineError::unavailable(DataSource::WorkdayApi, err))?;
        serde_json::from_str(&body).map_err(|err| EngineError::malformed(format!("{report} report"), err))
    }

    async fn fetch_export_table<T: DeserializeOwned>(&self, url: &str, filter: (&str, &str)) -> EngineResult<Vec<T>> {
        let page_size = self.export.page_size.to_string();
        let mut rows = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut next: Option<String> = None;

        for page in 1..=self.export.max_pages {
            let mut request = self
                .http
                .get(url)
                .query(&[filter, ("page_size", page_size.as_str())]);
            if let Some(token) = &next {
                request = request.query(&[("next_identifier", token.as_str())]);
            }
            let page_data: RosterExportPage<T> = self
                .authorize_export(request)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|err| EngineError::unavailable(DataSource::RosterExport, err))?
                .json()
                .await
                .map_err(|err| EngineError::malformed("roster export page", err))?;

            rows.extend(page_data.data);
            debug!(url, page, rows = rows.len(), "fetched roster export page");

            next = page_data
                .info
                .paging
                .next_identifier
                .filter(|token| !token.is_empty());
            match &next {
                None => return Ok(rows),
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    warn!(url, token = %token, "roster export repeated a page token");
                    return Ok(rows);
                }
                Some(_) => {}
            }
        }

        Err(EngineError::unavailable(
            DataSource::RosterExport,
            format!("{url} did not finish within {} pages", self.export.max_pages),
        ))
    }

    fn authorize_export(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.export.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request.basic_auth(&self.config.user, Some(&self.config.password)),
        }
    }
}

#[async_trait]
impl TimeTrackingSource for WorkdayClient {
    async fn time_report(&self, external_id: &str, window: &DateWindow) -> EngineResult<WorkerTimeReport> {
        let timekeeping: ReportEnvelope<TimekeepingEntry> = self
            .fetch_report(&self.config.timekeeping_report, external_id, window)
            .await?;
        let timeclocks: ReportEnvelope<TimeclockBlock> = self
            .fetch_report(&self.config.timeclocks_report, external_id, window)
            .await?;
        merge_time_report(external_id, timekeeping, timeclocks)
    }

    async fn calculated_time_blocks(
        &self,
        external_id: &str,
        window: &DateWindow,
    ) -> EngineResult<CalculatedBlockIndex> {
        let body = build_calculated_blocks_request(&self.config, external_id, window);
        let response = self
            .http
            .post(self.time_tracking_url())
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|err| EngineError::unavailable(DataSource::CalculatedTimeBlocks, err))?;

        // SOAP faults arrive as 500s with a parseable body.
        let text = response
            .text()
            .await
            .map_err(|err| EngineError::unavailable(DataSource::CalculatedTimeBlocks, err))?;
        let index = parse_calculated_time_blocks(&text)?;
        debug!(external_id, blocks = index.len(), "parsed calculated time blocks");
        Ok(index)
    }
}

#[async_trait]
impl RosterExport for WorkdayClient {
    async fn fetch_roster(&self) -> EngineResult<Vec<RosterRecord>> {
        let summaries: Vec<WorkerSummaryRow> = self
            .fetch_export_table(&self.export.worker_summary_url, ("is_active", "true"))
            .await?;
        let positions: Vec<WorkerPositionRow> = self
            .fetch_export_table(&self.export.worker_position_url, ("is_active_position", "true"))
            .await?;
        info!(
            workers = summaries.len(),
            positions = positions.len(),
            "downloaded roster export"
        );
        merge_roster_export(&summaries, &positions)
    }
}

// ---------------------------------------------------------------------------
// Custom reports
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ReportEnvelope<T> {
    #[serde(rename = "Report_Entry", default = "Vec::new")]
    report_entry: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct TimekeepingEntry {
    #[serde(rename = "employee_id", default)]
    worker_id: String,
    #[serde(rename = "intl_student", default)]
    international_status: String,
    #[serde(default)]
    time_blocks: Vec<TimekeepingBlock>,
    #[serde(default)]
    time_clock_events: Vec<TimekeepingEvent>,
}

#[derive(Debug, Default, Deserialize)]
struct TimekeepingEvent {
    #[serde(default)]
    time: String,
    #[serde(default)]
    event_type: String,
    #[serde(rename = "tce_position", default)]
    position: String,
    #[serde(rename = "timeblock_ref_id", default)]
    time_block_ref: String,
}

#[derive(Debug, Default, Deserialize)]
struct TimekeepingBlock {
    #[serde(default)]
    reported_date: String,
    #[serde(default)]
    hours: String,
    #[serde(default)]
    time_type: String,
    #[serde(default)]
    reference_id: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    in_time: String,
    #[serde(default)]
    out_time: String,
}

#[derive(Debug, Default, Deserialize)]
struct TimeclockBlock {
    #[serde(default)]
    in_time: String,
    #[serde(default)]
    out_time: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    time_type: String,
    #[serde(default)]
    hours: String,
    #[serde(default)]
    reference_id: String,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Merges the two custom reports.
///
/// Time blocks come from the `Timeclocks` report, with reported dates taken
/// from the matching `Timekeeping_System` block. Blocks only the
/// `Timekeeping_System` report knows about are appended after them.
fn merge_time_report(
    external_id: &str,
    timekeeping: ReportEnvelope<TimekeepingEntry>,
    timeclocks: ReportEnvelope<TimeclockBlock>,
) -> EngineResult<WorkerTimeReport> {
    let entry = timekeeping
        .report_entry
        .into_iter()
        .next()
        .filter(|entry| !entry.worker_id.trim().is_empty())
        .ok_or_else(|| EngineError::NotFound {
            entity: "workday worker".to_string(),
            id: external_id.to_string(),
        })?;

    let clock_events = entry
        .time_clock_events
        .into_iter()
        .map(|event| ExternalClockEvent {
            time: event.time,
            event_type: event.event_type,
            position: event.position,
            time_block_ref: event.time_block_ref,
        })
        .collect();

    let mut timekeeping_blocks: HashMap<String, TimekeepingBlock> = HashMap::new();
    let mut timekeeping_order = Vec::new();
    for block in entry.time_blocks {
        let reference = block.reference_id.trim().to_string();
        if reference.is_empty() {
            continue;
        }
        timekeeping_order.push(reference.clone());
        timekeeping_blocks.insert(reference, block);
    }

    let mut time_blocks = Vec::new();
    for block in timeclocks.report_entry {
        let reference = block.reference_id.trim().to_string();
        let known = timekeeping_blocks.remove(&reference);
        time_blocks.push(ExternalTimeBlock {
            position: block.position,
            hours: block.hours,
            in_time: non_empty(&block.in_time),
            out_time: non_empty(&block.out_time),
            reported_date: known.as_ref().and_then(|b| non_empty(&b.reported_date)),
            time_type: non_empty(&block.time_type),
            reference_id: reference,
        });
    }
    for reference in timekeeping_order {
        if let Some(block) = timekeeping_blocks.remove(&reference) {
            time_blocks.push(ExternalTimeBlock {
                reference_id: reference,
                position: block.position,
                hours: block.hours,
                in_time: non_empty(&block.in_time),
                out_time: non_empty(&block.out_time),
                reported_date: non_empty(&block.reported_date),
                time_type: non_empty(&block.time_type),
            });
        }
    }

    Ok(WorkerTimeReport {
        international_status: entry.international_status.trim() == "1",
        clock_events,
        time_blocks,
    })
}

// ---------------------------------------------------------------------------
// Calculated time blocks (SOAP)
// ---------------------------------------------------------------------------

/// Builds the `Get_Calculated_Time_Blocks` request envelope.
///
/// Credentials travel in a WS-Security username token; every interpolated
/// value is XML-escaped.
pub fn build_calculated_blocks_request(config: &WorkdayConfig, external_id: &str, window: &DateWindow) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:bsvc="urn:com.workday/bsvc">
  <soap:Header>
    <bsvc:Workday_Common_Header>
      <bsvc:Include_Reference_Descriptors_In_Response>Y</bsvc:Include_Reference_Descriptors_In_Response>
    </bsvc:Workday_Common_Header>
    <wsse:Security soap:mustUnderstand="1" xmlns:wsse="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd">
      <wsse:UsernameToken>
        <wsse:Username>{user}@{tenant}</wsse:Username>
        <wsse:Password Type="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordText">{password}</wsse:Password>
      </wsse:UsernameToken>
    </wsse:Security>
  </soap:Header>
  <soap:Body>
    <bsvc:Get_Calculated_Time_Blocks_Request bsvc:version="{version}">
      <bsvc:Request_Criteria>
        <bsvc:Start_Date>{start}</bsvc:Start_Date>
        <bsvc:End_Date>{end}</bsvc:End_Date>
        <bsvc:Worker_Reference>
          <bsvc:ID bsvc:type="Employee_ID">{worker}</bsvc:ID>
        </bsvc:Worker_Reference>
      </bsvc:Request_Criteria>
      <bsvc:Response_Filter>
        <bsvc:Page>1</bsvc:Page>
        <bsvc:Count>999</bsvc:Count>
      </bsvc:Response_Filter>
      <bsvc:Response_Group>
        <bsvc:Include_Worker>true</bsvc:Include_Worker>
        <bsvc:Include_Date>true</bsvc:Include_Date>
        <bsvc:Include_In_Out_Time>true</bsvc:Include_In_Out_Time>
        <bsvc:Include_Calculated_Quantity>true</bsvc:Include_Calculated_Quantity>
        <bsvc:Include_Status>true</bsvc:Include_Status>
        <bsvc:Include_Deleted>false</bsvc:Include_Deleted>
        <bsvc:Include_Calculation_Tags>true</bsvc:Include_Calculation_Tags>
      </bsvc:Response_Group>
    </bsvc:Get_Calculated_Time_Blocks_Request>
  </soap:Body>
</soap:Envelope>"#,
        user = escape(config.user.as_str()),
        tenant = escape(config.tenant.as_str()),
        password = escape(config.password.as_str()),
        version = escape(config.time_tracking_version.as_str()),
        start = window.start_date.format("%Y-%m-%d"),
        end = window.end_date.format("%Y-%m-%d"),
        worker = escape(external_id),
    )
}

#[derive(Debug, Default)]
struct PendingBlock {
    reference_ids: Vec<String>,
    data_sections: usize,
    block: CalculatedTimeBlock,
}

/// Parses a `Get_Calculated_Time_Blocks` response.
///
/// Blocks are keyed by the second `Worker_Time_Block_Reference` ID, which is
/// the reference the custom reports use; blocks without one are skipped. Only
/// the first `Calculated_Time_Block_Data` of each block is read.
///
/// # Errors
///
/// [`EngineError::SourceUnavailable`] for a SOAP fault and
/// [`EngineError::MalformedRecord`] for XML that cannot be read.
pub fn parse_calculated_time_blocks(xml: &str) -> EngineResult<CalculatedBlockIndex> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut pending: Option<PendingBlock> = None;
    let mut fault: Option<String> = None;
    let mut index = CalculatedBlockIndex::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|err| EngineError::malformed("calculated time blocks response", err))?;
        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                match name.as_str() {
                    "Calculated_Time_Block" => pending = Some(PendingBlock::default()),
                    "Calculated_Time_Block_Data" => {
                        if let Some(block) = pending.as_mut() {
                            block.data_sections += 1;
                        }
                    }
                    "Fault" => fault = Some(String::new()),
                    _ => {}
                }
                path.push(name);
            }
            Event::End(_) => {
                if path.pop().as_deref() == Some("Calculated_Time_Block") {
                    if let Some(done) = pending.take() {
                        match done.reference_ids.get(1) {
                            Some(reference) => {
                                let mut block = done.block;
                                block.reference_id = reference.clone();
                                index.insert(reference.clone(), block);
                            }
                            None => debug!("calculated time block without worker time block reference"),
                        }
                    }
                }
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|err| EngineError::malformed("calculated time blocks response", err))?
                    .into_owned();
                if let Some(message) = fault.as_mut() {
                    if path.last().map(String::as_str) == Some("faultstring") {
                        message.push_str(&value);
                    }
                    continue;
                }
                if let Some(block) = pending.as_mut() {
                    record_block_text(block, &path, value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(message) = fault {
        return Err(EngineError::unavailable(
            DataSource::CalculatedTimeBlocks,
            format!("SOAP fault: {message}"),
        ));
    }
    Ok(index)
}

fn record_block_text(pending: &mut PendingBlock, path: &[String], value: String) {
    let tail: Vec<&str> = path.iter().rev().take(2).map(String::as_str).collect();
    let (leaf, parent) = match tail.as_slice() {
        [leaf, parent] => (*leaf, *parent),
        _ => return,
    };

    if parent == "Worker_Time_Block_Reference" && leaf == "ID" {
        pending.reference_ids.push(value);
        return;
    }
    if pending.data_sections != 1 || !path.iter().any(|p| p == "Calculated_Time_Block_Data") {
        return;
    }
    let block = &mut pending.block;
    let slot = match (parent, leaf) {
        ("Calculated_Time_Block_Data", "In_Time") => &mut block.in_time,
        ("Calculated_Time_Block_Data", "Out_Time") => &mut block.out_time,
        ("Calculated_Time_Block_Data", "Calculated_Quantity") => &mut block.calculated_quantity,
        ("Status_Reference", "ID") => &mut block.status,
        ("Calculation_Tag_Reference", "ID") => &mut block.calculation_tag,
        _ => return,
    };
    if slot.is_none() {
        *slot = Some(value);
    }
}

// ---------------------------------------------------------------------------
// Roster export
// ---------------------------------------------------------------------------

/// One page of a roster export table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterExportPage<T> {
    /// Rows on this page.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Paging metadata.
    #[serde(default)]
    pub info: ExportInfo,
}

/// Paging metadata of a roster export page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
    /// Continuation details.
    #[serde(default)]
    pub paging: ExportPaging,
}

/// Continuation token of a roster export page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPaging {
    /// Token for the next page; absent or empty on the last page.
    #[serde(default)]
    pub next_identifier: Option<String>,
}

/// A row of the worker summary export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSummaryRow {
    /// External (badge) id.
    pub byu_id: String,
    /// Workday worker id.
    pub worker_id: String,
    /// Legal first name.
    pub first_name: String,
    /// Legal middle name.
    pub middle_name: String,
    /// Legal last name.
    pub last_name: String,
    /// Preferred first name.
    pub preferred_first_name: String,
    /// Preferred middle name.
    pub preferred_middle_name: String,
    /// Preferred last name.
    pub preferred_last_name: String,
    /// Time code groups the worker belongs to.
    pub time_code_groups: Vec<String>,
    /// Whether the worker is active.
    pub is_active: bool,
}

impl WorkerSummaryRow {
    /// `"Last, First Middle"`, using each preferred name when present.
    pub fn display_name(&self) -> String {
        let pick = |preferred: &str, legal: &str| {
            let preferred = preferred.trim();
            if preferred.is_empty() { legal.trim().to_string() } else { preferred.to_string() }
        };
        let first = pick(&self.preferred_first_name, &self.first_name);
        let middle = pick(&self.preferred_middle_name, &self.middle_name);
        let last = pick(&self.preferred_last_name, &self.last_name);
        format!("{last}, {first} {middle}").trim_end().to_string()
    }
}

/// A row of the worker position export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerPositionRow {
    /// External (badge) id of the worker holding the position.
    pub byu_id: String,
    /// Workday position id.
    pub position_number: String,
    /// Whether this is the worker's primary position.
    pub primary_position: bool,
    /// Whether the position is active.
    pub is_active_position: bool,
    /// Business title.
    pub business_title: String,
    /// Supervisory organization name.
    pub supervisory_org: String,
    /// Manager of the supervisory organization.
    pub manager_name: String,
}

/// Joins the worker summary and worker position exports into roster records.
///
/// Inactive workers, workers without ids and inactive positions are left
/// out. Records keep the order of the summary export.
pub fn merge_roster_export(
    summaries: &[WorkerSummaryRow],
    positions: &[WorkerPositionRow],
) -> EngineResult<Vec<RosterRecord>> {
    let mut by_worker: HashMap<&str, Vec<RosterPosition>> = HashMap::new();
    for row in positions.iter().filter(|p| p.is_active_position) {
        by_worker
            .entry(row.byu_id.trim())
            .or_default()
            .push(RosterPosition {
                position_number: row.position_number.clone(),
                primary_position: row.primary_position,
                is_active_position: true,
                business_title: row.business_title.clone(),
                supervisory_org: row.supervisory_org.clone(),
                manager_name: row.manager_name.clone(),
            });
    }

    let mut records = Vec::new();
    for summary in summaries {
        let external_id = summary.byu_id.trim();
        if !summary.is_active || external_id.is_empty() || summary.worker_id.trim().is_empty() {
            continue;
        }
        let worker_positions = by_worker.remove(external_id).unwrap_or_default();
        records.push(RosterRecord {
            external_id: external_id.to_string(),
            worker_id: summary.worker_id.trim().to_string(),
            employee_name: summary.display_name(),
            last_updated: None,
            time_code_groups: serde_json::to_string(&summary.time_code_groups)
                .map_err(|err| EngineError::malformed("roster time code groups", err))?,
            positions: serde_json::to_string(&worker_positions)
                .map_err(|err| EngineError::malformed("roster positions", err))?,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> DateWindow {
        DateWindow {
            start_date: NaiveDate::from_ymd_opt(2023, 12, 11).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
        }
    }

    fn config() -> WorkdayConfig {
        WorkdayConfig {
            base_url: "https://wd.example.com".to_string(),
            tenant: "acme".to_string(),
            user: "isu".to_string(),
            password: "p<a&ss".to_string(),
            ..WorkdayConfig::default()
        }
    }

    const TIMEKEEPING_JSON: &str = r#"{
        "Report_Entry": [{
            "employee_id": "W100",
            "time_code_group": "Student",
            "intl_student": "1",
            "time_blocks": [
                {"reported_date": "2024-01-09-07:00", "hours": "4", "reference_id": "TB-1", "position": "P1"},
                {"reported_date": "2024-01-08-07:00", "hours": "2", "reference_id": "TB-9", "position": "P1",
                 "in_time": "2024-01-08T08:00:00-07:00"}
            ],
            "time_clock_events": [
                {"time": "2024-01-09T08:00:00-07:00", "event_type": "Check-in", "tce_position": "P1", "timeblock_ref_id": "TB-1"},
                {"time": "2024-01-10T08:00:00-07:00", "event_type": "Check-in", "tce_position": "P1"}
            ]
        }]
    }"#;

    const TIMECLOCKS_JSON: &str = r#"{
        "Report_Entry": [
            {"employee_id": "W100", "in_time": "2024-01-09T08:00:00-07:00", "out_time": "",
             "position": "P1", "hours": "4", "reference_id": "TB-1"}
        ]
    }"#;

    #[test]
    fn test_merge_time_report() {
        let report = merge_time_report(
            "123",
            serde_json::from_str(TIMEKEEPING_JSON).unwrap(),
            serde_json::from_str(TIMECLOCKS_JSON).unwrap(),
        )
        .unwrap();

        assert!(report.international_status);
        assert_eq!(report.clock_events.len(), 2);
        assert!(report.clock_events[1].is_loose());
        assert_eq!(report.time_blocks.len(), 2);

        let first = &report.time_blocks[0];
        assert_eq!(first.reference_id, "TB-1");
        assert_eq!(first.in_time.as_deref(), Some("2024-01-09T08:00:00-07:00"));
        assert_eq!(first.out_time, None);
        assert_eq!(first.reported_date.as_deref(), Some("2024-01-09-07:00"));

        let second = &report.time_blocks[1];
        assert_eq!(second.reference_id, "TB-9");
        assert_eq!(second.in_time.as_deref(), Some("2024-01-08T08:00:00-07:00"));
    }

    #[test]
    fn test_merge_time_report_requires_worker() {
        let empty: ReportEnvelope<TimekeepingEntry> = serde_json::from_str(r#"{"Report_Entry": []}"#).unwrap();
        let timeclocks: ReportEnvelope<TimeclockBlock> = serde_json::from_str("{}").unwrap();
        let err = merge_time_report("123", empty, timeclocks).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_international_status_requires_one() {
        let json = r#"{"Report_Entry": [{"employee_id": "W100", "intl_student": "0"}]}"#;
        let report = merge_time_report(
            "123",
            serde_json::from_str(json).unwrap(),
            serde_json::from_str("{}").unwrap(),
        )
        .unwrap();
        assert!(!report.international_status);
    }

    #[test]
    fn test_request_escapes_credentials() {
        let body = build_calculated_blocks_request(&config(), "123<456", &window());
        assert!(body.contains("<wsse:Username>isu@acme</wsse:Username>"));
        assert!(body.contains("p&lt;a&amp;ss"));
        assert!(body.contains("123&lt;456"));
        assert!(body.contains("<bsvc:Start_Date>2023-12-11</bsvc:Start_Date>"));
        assert!(body.contains("<bsvc:End_Date>2024-01-11</bsvc:End_Date>"));
    }

    const CALCULATED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<env:Envelope xmlns:env="http://schemas.xmlsoap.org/soap/envelope/">
  <env:Body>
    <wd:Get_Calculated_Time_Blocks_Response xmlns:wd="urn:com.workday/bsvc">
      <wd:Response_Data>
        <wd:Calculated_Time_Block>
          <wd:Worker_Time_Block_Reference>
            <wd:ID wd:type="WID">abc123</wd:ID>
            <wd:ID wd:type="Worker_Time_Block_ID">TB-1</wd:ID>
          </wd:Worker_Time_Block_Reference>
          <wd:Calculated_Time_Block_Data>
            <wd:In_Time>2024-01-09T08:00:00.000-07:00</wd:In_Time>
            <wd:Out_Time>2024-01-09T12:00:00.000-07:00</wd:Out_Time>
            <wd:Calculated_Quantity>4</wd:Calculated_Quantity>
            <wd:Status_Reference wd:Descriptor="Approved">
              <wd:ID wd:type="WID">s1</wd:ID>
              <wd:ID wd:type="Time_Tracking_Set_Up_Option_ID">APPROVED</wd:ID>
            </wd:Status_Reference>
            <wd:Calculation_Tag_Reference wd:Descriptor="Regular">
              <wd:ID wd:type="Calculation_Tag_ID">REG</wd:ID>
            </wd:Calculation_Tag_Reference>
          </wd:Calculated_Time_Block_Data>
          <wd:Calculated_Time_Block_Data>
            <wd:In_Time>2030-01-01T00:00:00.000-07:00</wd:In_Time>
          </wd:Calculated_Time_Block_Data>
        </wd:Calculated_Time_Block>
        <wd:Calculated_Time_Block>
          <wd:Worker_Time_Block_Reference>
            <wd:ID wd:type="WID">lonely</wd:ID>
          </wd:Worker_Time_Block_Reference>
          <wd:Calculated_Time_Block_Data>
            <wd:In_Time>2024-01-10T08:00:00.000-07:00</wd:In_Time>
          </wd:Calculated_Time_Block_Data>
        </wd:Calculated_Time_Block>
      </wd:Response_Data>
    </wd:Get_Calculated_Time_Blocks_Response>
  </env:Body>
</env:Envelope>"#;

    #[test]
    fn test_parse_calculated_time_blocks() {
        let index = parse_calculated_time_blocks(CALCULATED_XML).unwrap();
        assert_eq!(index.len(), 1);
        let block = &index["TB-1"];
        assert_eq!(block.reference_id, "TB-1");
        assert_eq!(block.in_time.as_deref(), Some("2024-01-09T08:00:00.000-07:00"));
        assert_eq!(block.out_time.as_deref(), Some("2024-01-09T12:00:00.000-07:00"));
        assert_eq!(block.calculated_quantity.as_deref(), Some("4"));
        assert_eq!(block.status.as_deref(), Some("s1"));
        assert_eq!(block.calculation_tag.as_deref(), Some("REG"));
    }

    #[test]
    fn test_parse_soap_fault() {
        let xml = r#"<env:Envelope xmlns:env="http://schemas.xmlsoap.org/soap/envelope/">
            <env:Body><env:Fault><faultcode>SOAP-ENV:Client.validationError</faultcode>
            <faultstring>Invalid username or password</faultstring></env:Fault></env:Body></env:Envelope>"#;
        let err = parse_calculated_time_blocks(xml).unwrap_err();
        assert!(matches!(err, EngineError::SourceUnavailable { origin: DataSource::CalculatedTimeBlocks, .. }));
        assert!(err.to_string().contains("Invalid username or password"));
    }

    #[test]
    fn test_parse_rejects_broken_xml() {
        let err = parse_calculated_time_blocks("<a><b></a>").unwrap_err();
        assert!(matches!(err, EngineError::MalformedRecord { .. }));
    }

    #[test]
    fn test_display_name_prefers_preferred_names() {
        let row = WorkerSummaryRow {
            first_name: "Jonathan".to_string(),
            middle_name: "Q".to_string(),
            last_name: "Public".to_string(),
            preferred_first_name: "Jon".to_string(),
            ..Default::default()
        };
        assert_eq!(row.display_name(), "Public, Jon Q");

        let no_middle = WorkerSummaryRow {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            ..Default::default()
        };
        assert_eq!(no_middle.display_name(), "Lee, Ann");
    }

    #[test]
    fn test_merge_roster_export() {
        let summaries = vec![
            WorkerSummaryRow {
                byu_id: "111".to_string(),
                worker_id: "W1".to_string(),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                time_code_groups: vec!["Student".to_string()],
                is_active: true,
                ..Default::default()
            },
            WorkerSummaryRow {
                byu_id: "222".to_string(),
                worker_id: "W2".to_string(),
                is_active: false,
                ..Default::default()
            },
        ];
        let positions = vec![
            WorkerPositionRow {
                byu_id: "111".to_string(),
                position_number: "P1".to_string(),
                is_active_position: true,
                business_title: "Tutor".to_string(),
                ..Default::default()
            },
            WorkerPositionRow {
                byu_id: "111".to_string(),
                position_number: "P0".to_string(),
                is_active_position: false,
                ..Default::default()
            },
        ];

        let records = merge_roster_export(&summaries, &positions).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].external_id, "111");
        assert_eq!(records[0].employee_name, "Lee, Ann");
        assert_eq!(records[0].time_code_groups, r#"["Student"]"#);

        let parsed: Vec<RosterPosition> = serde_json::from_str(&records[0].positions).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].position_number, "P1");
    }

    #[test]
    fn test_export_page_without_next_identifier() {
        let page: RosterExportPage<WorkerSummaryRow> =
            serde_json::from_str(r#"{"data": [{"byu_id": "1", "worker_id": "W1", "is_active": true}], "info": {"paging": {}}}"#)
                .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.info.paging.next_identifier, None);
    }
}
