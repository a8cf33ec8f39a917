//
//  crconnect
//  api/demographics.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Demographic targeting catalogue and project feasibility.
//!
//! Connect maintains a catalogue of demographic questions (age, gender,
//! education, …) whose ids can be referenced in targeting criteria when
//! creating a project. [`list_all`] retrieves that catalogue;
//! [`calc_feasibility`] estimates whether a project with a given targeting
//! configuration can be filled, and at what total cost.

use serde::{Deserialize, Serialize};

use super::client::{self, CallOptions};
use super::common::Error;
use super::session::Session;

/// An inclusive numeric range requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// The lower bound of the range.
    pub lower: i64,

    /// The upper bound of the range, including the value itself.
    pub upper: i64,
}

/// One demographic requirement with a participant target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicQuota {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_id: Option<String>,

    /// Demographic options of which targeted participants must have at
    /// least one. Required for single and multiple choice questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_option_ids: Option<Vec<String>>,

    /// For demographics that require a range of values, the required range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_requirements: Option<Range>,

    /// How many participants are being targeted for this requirement.
    #[serde(default)]
    pub target: u32,
}

/// The targeting strategy for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetOption {
    /// Open to everyone without any targeting criteria.
    #[serde(rename = "GenPop")]
    GeneralPopulation,

    /// Targets a breakdown between genders.
    GenderSplit,

    /// Targets a Census matched template.
    CensusMatched,

    Custom,
}

/// Demographic requirements targeting a specific audience.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicRequirements {
    /// The demographics used to select eligible participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotas: Option<Vec<DemographicQuota>>,
}

/// The demographic targeting criteria of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicTargeting {
    /// The targeting strategy to use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_option: Option<TargetOption>,

    /// The locations participants may complete the project from. See the
    /// Connect API reference for the supported values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,

    /// The languages participants need to know. See the Connect API
    /// reference for the supported values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,

    /// Demographic requirements targeting a specific audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_requirements: Option<DemographicRequirements>,
}

/// One answer option of a catalogue demographic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicOption {
    /// Option id to include when creating targeting criteria.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_option_id: Option<String>,

    /// The specific option that was presented to the participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One demographic question from the targeting catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsData {
    /// Demographic id to include when creating targeting criteria.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_id: Option<String>,

    /// The question that was asked to the participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// The category of the demographic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// For single and multiple choice questions, the options that were
    /// presented to the participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<DemographicOption>>,

    /// For demographics that require a range of values, the required range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_requirements: Option<Range>,
}

/// Envelope wrapping the demographic catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicsResponse {
    /// Demographics that can be used to target a specific audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Vec<DemographicsData>>,
}

/// Parameters used to calculate the feasibility of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityRequest {
    /// Estimated completion time in minutes.
    #[serde(default)]
    pub estimated_time_in_minutes: u32,

    /// The number of participants.
    #[serde(default)]
    pub participants: u32,

    /// The amount in USD that you will pay.
    #[serde(default)]
    pub payment: f64,

    /// Custom criteria for targeting participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting_criteria: Option<DemographicTargeting>,
}

/// A platform on which a project can be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Connect,
    ManagedResearch,
}

/// Feasibility information for a prospective project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityResponse {
    /// Total cost of the project; `None` if the project is not feasible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_project_cost: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_platforms: Option<Vec<Platform>>,
}

/// Lists the demographics that can be used as targeting criteria.
///
/// # Errors
///
/// [`Error::Api`] on 400 (bad request) or 401 (invalid API key or
/// unauthorized resource access).
pub fn list_all(
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<DemographicsResponse, Error> {
    client::get("/demographics/list", None, session, opts)
}

/// Calculates the feasibility of a project.
///
/// # Example
///
/// ```rust,no_run
/// use crconnect::api::{client::CallOptions, demographics::{self, FeasibilityRequest}};
///
/// crconnect::create_session("your-api-key", true)?;
///
/// let request = FeasibilityRequest {
///     estimated_time_in_minutes: 10,
///     participants: 200,
///     payment: 1.25,
///     targeting_criteria: None,
/// };
/// let feasibility = demographics::calc_feasibility(&request, None, &CallOptions::default())?;
/// match feasibility.total_project_cost {
///     Some(cost) => println!("feasible at {cost} USD"),
///     None => println!("not feasible"),
/// }
/// # Ok::<(), crconnect::Error>(())
/// ```
pub fn calc_feasibility(
    data: &FeasibilityRequest,
    session: Option<&Session>,
    opts: &CallOptions,
) -> Result<FeasibilityResponse, Error> {
    client::post("/demographics/feasibility", None, Some(data), session, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_session(server: &mockito::Server) -> Session {
        crate::create_session("test-key", false)
            .unwrap()
            .with_base_url(server.url())
    }

    #[test]
    fn test_target_option_gen_pop_wire_value() {
        let value = serde_json::to_value(TargetOption::GeneralPopulation).unwrap();
        assert_eq!(value, "GenPop");
        let parsed: TargetOption = serde_json::from_str(r#""GenderSplit""#).unwrap();
        assert_eq!(parsed, TargetOption::GenderSplit);
    }

    #[test]
    fn test_list_all_decodes_catalogue() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/api/v1/demographics/list")
            .with_body(
                r#"{
                    "demographics": [{
                        "demographicId": "dem-age",
                        "question": "What is your age?",
                        "category": "Basics",
                        "rangeRequirements": { "lower": 18, "upper": 99 }
                    }]
                }"#,
            )
            .create();

        let session = test_session(&server);
        let response = list_all(Some(&session), &CallOptions::default()).unwrap();
        let demographics = response.demographics.unwrap();
        assert_eq!(demographics[0].demographic_id.as_deref(), Some("dem-age"));
        assert_eq!(
            demographics[0].range_requirements,
            Some(Range { lower: 18, upper: 99 })
        );
    }

    #[test]
    fn test_calc_feasibility_posts_request_and_decodes_cost() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/v1/demographics/feasibility")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "estimatedTimeInMinutes": 10,
                "participants": 200,
                "payment": 1.25,
            })))
            .with_body(r#"{"totalProjectCost": 312.5, "availablePlatforms": ["Connect"]}"#)
            .expect(1)
            .create();

        let session = test_session(&server);
        let request = FeasibilityRequest {
            estimated_time_in_minutes: 10,
            participants: 200,
            payment: 1.25,
            targeting_criteria: None,
        };
        let response =
            calc_feasibility(&request, Some(&session), &CallOptions::default()).unwrap();
        assert_eq!(response.total_project_cost, Some(312.5));
        assert_eq!(response.available_platforms, Some(vec![Platform::Connect]));
        mock.assert();
    }
}
