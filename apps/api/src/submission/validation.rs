//! Form validation and normalization. Turns a raw `SubmissionForm` into a `JobSubmission`.

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::submission::{JobSubmission, SubmissionForm};

/// Validates the two required fields and normalizes the rest.
///
/// `today` is the server's local date; a deadline equal to it is treated as
/// the date picker's untouched default and dropped.
pub fn validate_submission(
    form: SubmissionForm,
    today: NaiveDate,
) -> Result<JobSubmission, AppError> {
    let job_title = form.job_title.trim().to_string();

    let mut missing = Vec::new();
    if job_title.is_empty() {
        missing.push("job title");
    }
    if form.experience_level.is_none() {
        missing.push("experience level");
    }
    let Some(experience_level) = form.experience_level.filter(|_| missing.is_empty()) else {
        return Err(AppError::Validation(format!(
            "Please fill required fields: {}",
            missing.join(", ")
        )));
    };

    Ok(JobSubmission {
        company_name: form.company_name.trim().to_string(),
        company_size: form.company_size,
        industry: form.industry.trim().to_string(),
        company_website: non_blank(form.company_website),
        company_description: non_blank(form.company_description),
        job_title,
        experience_level,
        location: form.location.trim().to_string(),
        employment_type: form.employment_type,
        salary_range: non_blank(form.salary_range),
        remote_work: form.remote_work,
        skills: normalize_skills(&form.skills),
        include_benefits: form.include_benefits,
        include_company_culture: form.include_company_culture,
        include_growth_opportunities: form.include_growth_opportunities,
        include_team_info: form.include_team_info,
        application_email: form.application_email.trim().to_string(),
        application_link: non_blank(form.application_link),
        contact_person: non_blank(form.contact_person),
        application_deadline: normalize_deadline(form.application_deadline, today),
        application_instructions: form.application_instructions.trim().to_string(),
    })
}

/// Splits on commas, trims, drops empty tokens, and rejoins with `", "`.
pub fn normalize_skills(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn normalize_deadline(deadline: Option<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
    deadline.filter(|d| *d != today)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submission::ExperienceLevel;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn valid_form() -> SubmissionForm {
        SubmissionForm {
            job_title: "Backend Engineer".to_string(),
            experience_level: Some(ExperienceLevel::Senior),
            include_benefits: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_skills_drops_empty_tokens() {
        assert_eq!(normalize_skills("Python, , SQL ,Go"), "Python, SQL, Go");
    }

    #[test]
    fn test_normalize_skills_empty_input() {
        assert_eq!(normalize_skills(""), "");
        assert_eq!(normalize_skills(" , ,"), "");
    }

    #[test]
    fn test_missing_job_title_is_rejected() {
        let form = SubmissionForm {
            job_title: "   ".to_string(),
            ..valid_form()
        };
        match validate_submission(form, today()) {
            Err(AppError::Validation(msg)) => assert!(msg.contains("job title")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_experience_level_is_rejected() {
        let form = SubmissionForm {
            experience_level: None,
            ..valid_form()
        };
        match validate_submission(form, today()) {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("experience level"));
                assert!(!msg.contains("job title"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_both_missing_lists_both() {
        match validate_submission(SubmissionForm::default(), today()) {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Please fill required fields: job title, experience level")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_deadline_equal_to_today_is_nulled() {
        let form = SubmissionForm {
            application_deadline: Some(today()),
            ..valid_form()
        };
        let submission = validate_submission(form, today()).unwrap();
        assert!(submission.application_deadline.is_none());
    }

    #[test]
    fn test_other_deadline_is_kept() {
        let deadline = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let form = SubmissionForm {
            application_deadline: Some(deadline),
            ..valid_form()
        };
        let submission = validate_submission(form, today()).unwrap();
        assert_eq!(submission.application_deadline, Some(deadline));
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let form = SubmissionForm {
            company_website: "  ".to_string(),
            salary_range: "$120k - $150k".to_string(),
            skills: "Go,Postgres,".to_string(),
            ..valid_form()
        };
        let submission = validate_submission(form, today()).unwrap();
        assert!(submission.company_website.is_none());
        assert_eq!(submission.salary_range.as_deref(), Some("$120k - $150k"));
        assert_eq!(submission.skills, "Go, Postgres");
        assert_eq!(submission.experience_level, ExperienceLevel::Senior);
    }
}
