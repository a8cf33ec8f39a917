//
//  crconnect
//  api/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Project CRUD, lifecycle transitions, listing, and statistics.
//!
//! A project is created in the `Unpublished` state and must be transitioned
//! to `Live` (via [`update_status`]) to start collecting data. Lifecycle
//! transitions are constrained server-side:
//!
//! | From | Allowed transitions |
//! |------|---------------------|
//! | `Unpublished` | `Live`, `Archived` |
//! | `Live` | `Paused` |
//! | `Paused` | `Live`, `Closed` |
//!
//! `Completed` is set automatically when all participant spots are filled.
//! Transitioning to `Live` requires sufficient funds in the account balance.
//!
//! Listing uses cursor-based pagination; see [`list_all`] and
//! [`Paginator`](crate::Paginator).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use super::client::{self, CallOptions, Query};
use super::common::{Error, Paginator};
use super::demographics::DemographicTargeting;
use super::session::Session;

/// Additional capability a participant's device or environment must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemRequirement {
    Audio,
    Camera,
    Microphone,
    DownloadSoftware,
    Writing,
}

/// Device class a participant may use to take a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Desktop,
    Tablet,
    Mobile,
}

/// How participants signal completion of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectCompletionType {
    RedirectUrl,
    CompletionCode,
    Template,
}

/// Completion configuration for a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSettings {
    /// The completion code or redirect URL, depending on the type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_completion_type: Option<ProjectCompletionType>,
}

/// Participant-level allow/deny lists for a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantTargeting {
    /// The participant ids that should be allowed to take this project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_participants: Option<Vec<String>>,

    /// The participant ids that should be prevented from taking this project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_participants: Option<Vec<String>>,
}

/// Project-level allow/deny lists: gate eligibility on participation in
/// other projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTargeting {
    /// Project ids whose participants are allowed to take this project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_projects: Option<Vec<String>>,

    /// Project ids whose participants are excluded from this project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_projects: Option<Vec<String>>,
}

/// Platform targeting criteria (participants and prior projects).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTargeting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<ParticipantTargeting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<ProjectTargeting>,
}

/// The kind of task template attached to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskTemplateType {
    DataLabeling,
    CustomHtml,
}

/// A single cell of template data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDataCell {
    /// The value of the cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One row of template data distributed to participants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDataRow {
    /// All the data cells of this row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<TemplateDataCell>>,
}

/// The response method for a data-labeling template question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataLabelingResponseMethod {
    TypedResponse,
    SelectOne,
    SelectAll,
}

/// A choice option for `SelectOne`/`SelectAll` data-labeling questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataLabelingSelectOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Configuration of a data-labeling template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLabelingSettings {
    /// The question text presented to the participant (1-500 characters).
    pub prompt: String,

    /// The type of response the participant will give.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_labeling_response_method: Option<DataLabelingResponseMethod>,

    /// Choice options the participant can select from. Only valid for
    /// `SelectOne` and `SelectAll` response methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_labeling_select_options: Option<Vec<DataLabelingSelectOptions>>,
}

/// Settings of a task template, keyed by template type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSettings {
    /// The html template markup. Only set if the template type is `CustomHtml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_template_markup: Option<String>,

    /// Data labeling settings. Only set if the template type is `DataLabeling`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_labeling_settings: Option<DataLabelingSettings>,
}

/// A task template distributing rows of data to participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    /// The type of task template.
    pub task_template_type: TaskTemplateType,

    /// The header columns for your data. All values need to be unique and
    /// match the number of cells in each row.
    pub headers: Vec<String>,

    /// The data that should be distributed to participants.
    pub data: Vec<TemplateDataRow>,

    /// Template settings.
    pub settings: TemplateSettings,
}

/// Parameters for creating or editing a project.
///
/// Only `name`, `payment`, `estimated_time_in_minutes`, and `participants`
/// are required by the server; everything else may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    /// Name of your Connect project, visible to participants (500 characters max.).
    pub name: String,

    /// The URL of your survey (e.g. Qualtrics).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,

    /// The amount in USD that you will pay per participant.
    pub payment: f64,

    /// Estimated completion time in minutes (2 minutes minimum).
    pub estimated_time_in_minutes: u32,

    /// The number of participants (minimum 1).
    pub participants: u32,

    /// Summary of your project (5000 characters max.).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Custom html instructions displayed before beginning your project.
    /// The max size limit for the instructions is 20MB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// The internal name for your project, not visible to participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_name: Option<String>,

    /// Additional requirements participants need in order to take your
    /// project. An empty array means no additional requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_requirements: Option<Vec<SystemRequirement>>,

    /// Indicates that your project contains sensitive content.
    #[serde(default)]
    pub has_sensitive_content: bool,

    /// All the devices participants can use. An empty array allows all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_requirements: Option<Vec<DeviceType>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_settings: Option<CompletionSettings>,

    /// The maximum time in minutes a participant has to submit. Must exceed
    /// `estimated_time_in_minutes`; `None` lets the server pick an optimized
    /// value based on your estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_in_minutes: Option<u32>,

    /// The demographic targeting criteria for your project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_targeting: Option<DemographicTargeting>,

    /// The platform targeting criteria for your project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_targeting: Option<PlatformTargeting>,

    /// Template settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_template: Option<TaskTemplate>,
}

/// A project as returned by the server: the caller-supplied fields plus
/// server-assigned status information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponseData {
    /// The caller-supplied project fields, flattened on the wire.
    #[serde(flatten)]
    pub data: ProjectData,

    /// The id of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// The total cost of the project including Connect fees.
    #[serde(default)]
    pub total_cost: f64,

    /// The UTC time the project was created at.
    #[serde(default)]
    pub created_at: String,
}

/// Envelope wrapping a single project in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectResponseData>,
}

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Unpublished,
    Paused,
    Live,
    Closed,
    Completed,
    Archived,
}

impl ProjectStatus {
    /// The wire form of the status, as sent in queries and bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Unpublished => "Unpublished",
            ProjectStatus::Paused => "Paused",
            ProjectStatus::Live => "Live",
            ProjectStatus::Closed => "Closed",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter narrowing the results of [`list_all`].
///
/// Renders as the `Status`, `Size`, and `NextToken` query parameters, in
/// that order. Callers rarely set `next_token` themselves; the paginator
/// threads it automatically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterQuery {
    /// Only list projects currently in this status.
    pub status: Option<ProjectStatus>,

    /// How many results to return per page. The default size is 10 and the
    /// max size is 100.
    pub size: Option<u32>,

    /// A server-issued identifier retrieving the next set of results. The
    /// token expires after an hour.
    pub next_token: Option<String>,
}

impl From<&FilterQuery> for Query {
    fn from(filter: &FilterQuery) -> Self {
        let mut map = Map::new();
        if let Some(status) = filter.status {
            map.insert("Status".to_string(), Value::String(status.as_str().to_string()));
        }
        if let Some(size) = filter.size {
            map.insert("Size".to_string(), Value::from(size));
        }
        if let Some(token) = &filter.next_token {
            map.insert("NextToken".to_string(), Value::String(token.clone()));
        }
        Query::Map(map)
    }
}

impl From<FilterQuery> for Query {
    fn from(filter: FilterQuery) -> Self {
        Query::from(&filter)
    }
}

/// Creates a project.
///
/// The project is created in the `Unpublished` state and needs to be
/// launched with [`update_status`] to start collecting data.
///
/// # Errors
///
/// [`Error::Api`] on 400 (bad request) or 401 (invalid API key or
/// unauthorized resource access).
///
/// # Example
///
/// ```rust,no_run
/// use crconnect::api::{client::CallOptions, project::{self, ProjectData}};
///
/// crconnect::create_session("your-api-key", true)?;
///
/// let data = ProjectData {
///     name: "Consumer preferences survey".to_string(),
///     payment: 1.25,
///     estimated_time_in_minutes: 10,
///     participants: 200,
///     ..ProjectData::default()
/// };
/// let created = project::create(&data, None, &CallOptions::idempotency_token("survey-1"))?;
/// println!("{:?}", created.project.and_then(|p| p.project_id));
/// # Ok::<(), crconnect::Error>(())
/// ```
pub fn create(
    project_data: &ProjectData,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<ProjectResponse, Error> {
    client::post("/project", None, Some(project_data), session, opts)
}

/// Lists projects for the authenticated account.
///
/// Projects are ordered by creation time in descending order, so newer
/// projects come first. The returned [`Paginator`] performs no network call
/// until first advanced, then fetches pages as its items are consumed.
pub fn list_all(
    query: Option<FilterQuery>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Paginator<ProjectResponseData> {
    Paginator::new(
        "/project",
        query.as_ref().map(Query::from),
        session,
        opts.clone(),
    )
}

/// Retrieves a project by id.
pub fn retrieve(
    project_id: &str,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<ProjectResponse, Error> {
    client::get(&format!("/project/{project_id}"), None, session, opts)
}

/// Edits a project.
///
/// An unpublished project can be fully edited. Once a project is `Live` or
/// `Paused`, only `name`, `project_url`, `participants` (increases only),
/// `summary`, and `instructions` may change.
pub fn edit(
    project_id: &str,
    project_data: &ProjectData,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<ProjectResponse, Error> {
    client::post(
        &format!("/project/{project_id}"),
        None,
        Some(project_data),
        session,
        opts,
    )
}

/// Updates the status of a project.
///
/// When the status changes to [`ProjectStatus::Live`], participants start
/// taking your survey; the account balance must cover the project cost or
/// the server answers with an insufficient-funds error.
pub fn update_status(
    project_id: &str,
    status: ProjectStatus,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<(), Error> {
    client::post_unit(
        &format!("/project/{project_id}/update-status"),
        None,
        Some(&json!({ "status": status })),
        session,
        opts,
    )
}

/// Completion and duration statistics for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    /// The id of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Assignments not yet approved or rejected.
    #[serde(default)]
    pub pending_assignments: u32,

    /// Assignments that have been approved or rejected.
    #[serde(default)]
    pub completed_assignments: u32,

    /// Participants currently taking the project.
    #[serde(default)]
    pub in_progress: u32,

    /// Assignments that have been approved.
    #[serde(default)]
    pub approved_assignments: u32,

    /// Ratio of participants who started the project to those who completed it.
    #[serde(default)]
    pub completion_rate: f64,

    /// Ratio of participants who started the project to those who did not complete it.
    #[serde(default)]
    pub bounce_rate: f64,

    /// Average duration in minutes of completed assignments.
    #[serde(default)]
    pub average_duration: f64,

    /// Median duration in minutes of completed assignments.
    #[serde(default)]
    pub median_duration: f64,
}

/// Retrieves the statistics of a project by id.
pub fn retrieve_statistics(
    project_id: &str,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<ProjectStatistics, Error> {
    client::get(
        &format!("/project/{project_id}/statistics"),
        None,
        session,
        opts,
    )
}
