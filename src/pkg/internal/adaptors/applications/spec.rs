use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Review state of an application. Any state may move to any other; the
/// email copy treats approved and rejected as conclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Approved,
    Rejected,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(UnknownStatus(raw.to_string())),
        }
    }
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Wording shown to applicants.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Not Yet Reviewed",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Employers may only write directly to applicants in these states.
    pub fn accepts_direct_email(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Shortlisted
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored attachment: sanitized display name plus its public path.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: i32,
    pub job_id: i32,
    pub qualification_text: String,
    pub full_name: String,
    pub applicant_email: String,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    pub resume: Option<StoredDocument>,
    pub other: Option<StoredDocument>,
}

/// An application joined with the job it targets, as seen by the job's poster.
#[derive(Debug, Clone, FromRow)]
pub struct OwnedApplication {
    pub id: i32,
    pub status: String,
    pub applicant_email: Option<String>,
    pub full_name: Option<String>,
    pub job_title: String,
    pub company: String,
}

impl OwnedApplication {
    pub fn status(&self) -> Option<ApplicationStatus> {
        self.status.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SeekerApplication {
    pub application_id: i32,
    pub job_id: i32,
    pub status: String,
    pub created_at: Option<NaiveDateTime>,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmployerApplication {
    pub application_id: i32,
    pub job_id: i32,
    pub full_name: Option<String>,
    pub applicant_email: Option<String>,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    pub qualification_text: Option<String>,
    pub document_name: Option<String>,
    pub document_path: Option<String>,
    pub other_document_name: Option<String>,
    pub other_document_path: Option<String>,
    pub status: String,
    pub created_at: Option<NaiveDateTime>,
    pub job_title: String,
    pub company: String,
    pub posted_by: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_lenient_on_case_and_space() {
        assert_eq!(
            " Shortlisted ".parse::<ApplicationStatus>(),
            Ok(ApplicationStatus::Shortlisted)
        );
        assert_eq!(
            "APPROVED".parse::<ApplicationStatus>(),
            Ok(ApplicationStatus::Approved)
        );
        assert!("hired".parse::<ApplicationStatus>().is_err());
        assert!("".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_direct_email_states() {
        assert!(ApplicationStatus::Approved.accepts_direct_email());
        assert!(ApplicationStatus::Shortlisted.accepts_direct_email());
        assert!(!ApplicationStatus::Pending.accepts_direct_email());
        assert!(!ApplicationStatus::Rejected.accepts_direct_email());
    }
}
