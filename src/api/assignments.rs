//
//  crconnect
//  api/assignments.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Assignment approval, rejection, reversal, and bonus workflows.
//!
//! After a participant completes their assignment, it sits in the `Pending`
//! state. Researchers have 14 days to either approve or reject the submitted
//! work; an assignment not approved within 14 days of its completion time is
//! approved automatically by the platform.
//!
//! A `Pending` assignment can be approved or rejected. Once `Approved`, an
//! assignment can no longer be rejected. A `Rejected` assignment, on the
//! other hand, can still be approved afterwards ([`reverse_rejections`]).
//!
//! When assignments are rejected, the account balance is credited with the
//! amount that would have been paid to the participants plus any associated
//! Connect fees.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::client::{self, CallOptions};
use super::common::Error;
use super::session::Session;

/// The submission method used by a participant to complete a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionType {
    CompletionCode,
    Redirect,
}

/// How the participant submitted the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInfo {
    /// The code the participant submitted when completing the project, or
    /// `None` if completed using a redirect link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_code: Option<String>,

    pub submission_type: SubmissionType,
}

/// Review state of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Pending,
    Approved,
    Rejected,
}

/// One participant's assignment on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// The id of the participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,

    /// When the participant started the project, in UTC.
    #[serde(default)]
    pub start_time: String,

    /// When the participant completed the project, in UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<String>,

    /// The review status of the assignment.
    pub status: AssignmentStatus,

    /// The amount in USD that you will pay.
    #[serde(default)]
    pub payment: f64,

    /// How much the participant has been bonused for this project.
    #[serde(default)]
    pub bonus: f64,

    /// Information on how the participant submitted the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionInfo>,
}

/// Envelope wrapping the assignment list of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<Assignment>>,
}

/// A participant (or assignment) targeted by an approval or rejection,
/// with an optional feedback message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// The participant or assignment id to approve or reject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The message to display to the participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A bonus payment to one participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusPayment {
    /// The id of the participant or assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The message to display to the participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The amount to bonus, in USD.
    #[serde(default)]
    pub amount: f64,
}

/// Lists all assignments for a project.
///
/// # Errors
///
/// [`Error::Api`] on 400 (bad request) or 401 (invalid API key or
/// unauthorized resource access).
pub fn list_all(
    project_id: &str,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<AssignmentResponse, Error> {
    client::get(&format!("/assignments/{project_id}"), None, session, opts)
}

/// Approves participants associated with a project.
///
/// `participants` must not be empty.
pub fn approve(
    project_id: &str,
    participants: &[Participant],
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<(), Error> {
    client::post_unit(
        &format!("/assignments/{project_id}/approve"),
        None,
        Some(&json!({ "participants": participants })),
        session,
        opts,
    )
}

/// Approves all participants associated with a project.
///
/// An absent `message` is sent as an empty feedback string.
pub fn approve_all(
    project_id: &str,
    message: Option<&str>,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<(), Error> {
    client::post_unit(
        &format!("/assignments/{project_id}/approve-all"),
        None,
        Some(&json!({ "message": message.unwrap_or("") })),
        session,
        opts,
    )
}

/// Rejects participants associated with a project.
///
/// Every rejected assignment needs to include a message explaining why it
/// was rejected. Your account balance will be credited with the amount that
/// would have been paid to the participants plus any associated Connect fees.
pub fn reject(
    project_id: &str,
    participants: &[Participant],
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<(), Error> {
    client::post_unit(
        &format!("/assignments/{project_id}/reject"),
        None,
        Some(&json!({ "participants": participants })),
        session,
        opts,
    )
}

/// Pays bonuses to participants associated with a project.
///
/// The account must hold enough funds for the total amount plus any
/// associated Connect fees; with insufficient funds, none of the bonuses go
/// through.
pub fn bonus(
    project_id: &str,
    bonus_payments: &[BonusPayment],
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<(), Error> {
    client::post_unit(
        &format!("/assignments/{project_id}/bonus"),
        None,
        Some(&json!({ "bonusPayment": bonus_payments })),
        session,
        opts,
    )
}

/// Reverses rejections for previously rejected assignments of a project.
///
/// Once approved, an assignment can no longer be rejected. The account
/// balance must cover paying the previously rejected participants.
pub fn reverse_rejections(
    project_id: &str,
    participants: &[Participant],
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<(), Error> {
    client::post_unit(
        &format!("/assignments/{project_id}/reverse-reject"),
        None,
        Some(&json!({ "participants": participants })),
        session,
        opts,
    )
}
