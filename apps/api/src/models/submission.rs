use std::fmt;

use chrono::NaiveDate;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

/// Headcount bracket of the hiring company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "Small (0-200)")]
    Small,
    #[serde(rename = "Medium (201-1000)")]
    Medium,
    #[serde(rename = "Large (1000+)")]
    Large,
    #[default]
    #[serde(rename = "Not specified")]
    Unspecified,
}

impl CompanySize {
    pub fn label(self) -> &'static str {
        match self {
            CompanySize::Small => "Small (0-200)",
            CompanySize::Medium => "Medium (201-1000)",
            CompanySize::Large => "Large (1000+)",
            CompanySize::Unspecified => "Not specified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Entry-level")]
    Entry,
    #[serde(rename = "Mid-level")]
    Mid,
    Senior,
    #[serde(rename = "Lead/Principal")]
    Lead,
    #[serde(rename = "Director/VP")]
    Director,
}

impl ExperienceLevel {
    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry-level",
            ExperienceLevel::Mid => "Mid-level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Lead => "Lead/Principal",
            ExperienceLevel::Director => "Director/VP",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub fn label(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Internship => "Internship",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteWorkPolicy {
    #[default]
    #[serde(rename = "Not specified")]
    Unspecified,
    #[serde(rename = "Fully remote")]
    FullyRemote,
    Hybrid,
    #[serde(rename = "On-site")]
    OnSite,
}

impl RemoteWorkPolicy {
    pub fn label(self) -> &'static str {
        match self {
            RemoteWorkPolicy::Unspecified => "Not specified",
            RemoteWorkPolicy::FullyRemote => "Fully remote",
            RemoteWorkPolicy::Hybrid => "Hybrid",
            RemoteWorkPolicy::OnSite => "On-site",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(CompanySize, ExperienceLevel, EmploymentType, RemoteWorkPolicy);

fn default_true() -> bool {
    true
}

/// `null` reads as the field's default, the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// An unselected level arrives as `""` or `null`; both mean "not chosen".
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<ExperienceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(label) if !label.trim().is_empty() => {
            ExperienceLevel::deserialize(label.trim().into_deserializer()).map(Some)
        }
        _ => Ok(None),
    }
}

/// Raw form input as posted by the client. Every field may be absent or `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionForm {
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_size: CompanySize,
    #[serde(deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_website: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub employment_type: EmploymentType,
    #[serde(deserialize_with = "null_as_default")]
    pub salary_range: String,
    #[serde(deserialize_with = "null_as_default")]
    pub remote_work: RemoteWorkPolicy,
    /// Comma-separated, normalized during validation.
    #[serde(deserialize_with = "null_as_default")]
    pub skills: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub include_benefits: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub include_company_culture: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub include_growth_opportunities: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub include_team_info: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub application_email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub application_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_person: String,
    pub application_deadline: Option<NaiveDate>,
    #[serde(deserialize_with = "null_as_default")]
    pub application_instructions: String,
}

/// A validated submission, ready for prompting and persistence.
/// Maps one-to-one onto a `job_submissions` row.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSubmission {
    pub company_name: String,
    pub company_size: CompanySize,
    pub industry: String,
    pub company_website: Option<String>,
    pub company_description: Option<String>,
    pub job_title: String,
    pub experience_level: ExperienceLevel,
    pub location: String,
    pub employment_type: EmploymentType,
    pub salary_range: Option<String>,
    pub remote_work: RemoteWorkPolicy,
    pub skills: String,
    pub include_benefits: bool,
    pub include_company_culture: bool,
    pub include_growth_opportunities: bool,
    pub include_team_info: bool,
    pub application_email: String,
    pub application_link: Option<String>,
    pub contact_person: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub application_instructions: String,
}
