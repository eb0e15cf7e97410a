//! Persistence writer. One `job_submissions` row per successful generation.

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::db::open_connection;
use crate::models::submission::JobSubmission;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database is not configured")]
    NotConfigured,

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Write-only sink for validated submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn save(&self, submission: &JobSubmission) -> Result<(), StoreError>;
}

/// PostgreSQL-backed store. Opens one connection per `save`, never pooled.
#[derive(Debug, Clone)]
pub struct PgSubmissionStore {
    database: Option<DatabaseConfig>,
}

impl PgSubmissionStore {
    pub fn new(database: Option<DatabaseConfig>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn save(&self, submission: &JobSubmission) -> Result<(), StoreError> {
        let config = self.database.as_ref().ok_or(StoreError::NotConfigured)?;

        // Any `?` below drops the connection, which releases it.
        let mut conn = open_connection(config).await?;
        insert_submission(&mut conn, submission).await?;
        conn.close().await?;

        info!("Saved submission for '{}'", submission.job_title);
        Ok(())
    }
}

const INSERT_SUBMISSION: &str = r#"
    INSERT INTO job_submissions (
        company_name, company_size, industry, company_website, company_description,
        job_title, experience_level, location, employment_type, salary_range, remote_work,
        skills, include_benefits, include_company_culture, include_growth_opportunities,
        include_team_info, application_email, application_link, contact_person,
        application_deadline, application_instructions
    ) VALUES (
        $1, $2, $3, $4, $5,
        $6, $7, $8, $9, $10, $11,
        $12, $13, $14, $15,
        $16, $17, $18, $19,
        $20, $21
    )
"#;

/// Inserts one row inside its own transaction.
async fn insert_submission(
    conn: &mut PgConnection,
    submission: &JobSubmission,
) -> Result<(), sqlx::Error> {
    let mut tx = conn.begin().await?;

    sqlx::query(INSERT_SUBMISSION)
        .bind(&submission.company_name)
        .bind(submission.company_size.label())
        .bind(&submission.industry)
        .bind(&submission.company_website)
        .bind(&submission.company_description)
        .bind(&submission.job_title)
        .bind(submission.experience_level.label())
        .bind(&submission.location)
        .bind(submission.employment_type.label())
        .bind(&submission.salary_range)
        .bind(submission.remote_work.label())
        .bind(&submission.skills)
        .bind(submission.include_benefits)
        .bind(submission.include_company_culture)
        .bind(submission.include_growth_opportunities)
        .bind(submission.include_team_info)
        .bind(&submission.application_email)
        .bind(&submission.application_link)
        .bind(&submission.contact_person)
        .bind(submission.application_deadline)
        .bind(&submission.application_instructions)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every saved submission; optionally fails every save.
    #[derive(Default)]
    pub(crate) struct RecordingStore {
        pub saved: Mutex<Vec<JobSubmission>>,
        pub fail: bool,
    }

    impl RecordingStore {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub(crate) fn saved(&self) -> Vec<JobSubmission> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SubmissionStore for RecordingStore {
        async fn save(&self, submission: &JobSubmission) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            self.saved.lock().unwrap().push(submission.clone());
            Ok(())
        }
    }

    #[test]
    fn test_insert_lists_twenty_one_columns_and_placeholders() {
        let columns = INSERT_SUBMISSION
            .split("VALUES")
            .next()
            .unwrap()
            .matches(',')
            .count()
            + 1;
        assert_eq!(columns, 21);
        assert!(INSERT_SUBMISSION.contains("$21"));
        assert!(!INSERT_SUBMISSION.contains("$22"));
    }

    #[tokio::test]
    async fn test_unconfigured_store_reports_not_configured() {
        let store = PgSubmissionStore::new(None);
        let submission = crate::submission::pipeline::tests::acme_submission();
        let err = store.save(&submission).await.unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured));
        assert_eq!(err.to_string(), "database is not configured");
    }
}
