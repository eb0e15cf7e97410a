// Prompt template for job description generation.
// Optional fields fall back to fixed phrases; each inclusion flag contributes one line.

use crate::models::submission::JobSubmission;

const NOT_SPECIFIED: &str = "Not specified";
const COMPETITIVE: &str = "Competitive";

const INCLUDE_BENEFITS: &str = "Include benefits.";
const INCLUDE_CULTURE: &str = "Include company culture.";
const INCLUDE_GROWTH: &str = "Include growth opportunities.";
const INCLUDE_TEAM: &str = "Include team info.";

/// Builds the generation prompt for a validated submission. Pure and deterministic.
pub fn build_prompt(submission: &JobSubmission) -> String {
    let skills = if submission.skills.is_empty() {
        NOT_SPECIFIED
    } else {
        submission.skills.as_str()
    };

    format!(
        "Generate a job description for:\n\
         Job Title: {job_title}\n\
         Company: {company}\n\
         Experience Level: {experience}\n\
         Industry: {industry}\n\
         Location: {location}\n\
         Type: {employment_type}\n\
         Skills: {skills}\n\
         Salary: {salary}\n\
         Remote: {remote}\n\
         Description: {description}\n\
         Website: {website}\n\
         Additional Instructions: {instructions}\n\
         {benefits}\n\
         {culture}\n\
         {growth}\n\
         {team}\n",
        job_title = submission.job_title,
        company = submission.company_name,
        experience = submission.experience_level,
        industry = submission.industry,
        location = submission.location,
        employment_type = submission.employment_type,
        salary = submission.salary_range.as_deref().unwrap_or(COMPETITIVE),
        remote = submission.remote_work,
        description = submission
            .company_description
            .as_deref()
            .unwrap_or(NOT_SPECIFIED),
        website = submission.company_website.as_deref().unwrap_or(NOT_SPECIFIED),
        instructions = submission.application_instructions,
        benefits = flag_line(submission.include_benefits, INCLUDE_BENEFITS),
        culture = flag_line(submission.include_company_culture, INCLUDE_CULTURE),
        growth = flag_line(submission.include_growth_opportunities, INCLUDE_GROWTH),
        team = flag_line(submission.include_team_info, INCLUDE_TEAM),
    )
}

fn flag_line(enabled: bool, line: &'static str) -> &'static str {
    if enabled {
        line
    } else {
        ""
    }
}
