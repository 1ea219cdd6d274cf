use std::fmt::{self, Display};

use super::{display_name, SendEmail};
use crate::pkg::internal::adaptors::applications::spec::ApplicationStatus;

/// Sent to the applicant after an employer moves their application.
pub struct StatusUpdateTemplate<'a> {
    pub name: &'a str,
    pub job_title: &'a str,
    pub company: &'a str,
    pub status: ApplicationStatus,
}

impl<'a> Display for StatusUpdateTemplate<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, job, company) = (display_name(self.name), self.job_title, self.company);
        match self.status {
            ApplicationStatus::Approved => write!(
                f,
                "Hello {name},\n\nCongratulations. Your application for {job} at {company} has been approved.\n\nWe will contact you soon with next steps.\n\nRegards,\n{company}"
            ),
            ApplicationStatus::Rejected => write!(
                f,
                "Hello {name},\n\nThank you for your interest in {job} at {company}. After careful review, we will not be moving forward at this time.\n\nWe appreciate your effort and encourage you to apply to future opportunities.\n\nRegards,\n{company}"
            ),
            ApplicationStatus::Shortlisted => write!(
                f,
                "Hello {name},\n\nGood news. Your application for {job} at {company} has been shortlisted.\n\nWe will reach out with the next steps.\n\nRegards,\n{company}"
            ),
            ApplicationStatus::Pending => write!(
                f,
                "Hello {name},\n\nYour application status for {job} at {company} is now: {}.\n\nRegards,\n{company}",
                self.status.label()
            ),
        }
    }
}

impl<'a> SendEmail for StatusUpdateTemplate<'a> {
    fn subject(&self) -> String {
        let prefix = match self.status {
            ApplicationStatus::Approved => "Application Approved",
            ApplicationStatus::Rejected => "Application Update",
            _ => "Application Progress Update",
        };
        format!("{}: {} at {}", prefix, self.job_title, self.company)
    }

    fn recipient(&self) -> &str {
        display_name(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(status: ApplicationStatus) -> StatusUpdateTemplate<'static> {
        StatusUpdateTemplate {
            name: "Ann",
            job_title: "Welder",
            company: "Acme",
            status,
        }
    }

    #[test]
    fn test_subject_prefix_by_status() {
        assert_eq!(
            template(ApplicationStatus::Approved).subject(),
            "Application Approved: Welder at Acme"
        );
        assert_eq!(
            template(ApplicationStatus::Rejected).subject(),
            "Application Update: Welder at Acme"
        );
        assert_eq!(
            template(ApplicationStatus::Shortlisted).subject(),
            "Application Progress Update: Welder at Acme"
        );
        assert_eq!(
            template(ApplicationStatus::Pending).subject(),
            "Application Progress Update: Welder at Acme"
        );
    }

    #[test]
    fn test_body_by_status() {
        let approved = template(ApplicationStatus::Approved).to_string();
        assert!(approved.starts_with("Hello Ann,"));
        assert!(approved.contains("has been approved"));
        assert!(approved.ends_with("Regards,\nAcme"));

        assert!(template(ApplicationStatus::Rejected)
            .to_string()
            .contains("will not be moving forward"));
        assert!(template(ApplicationStatus::Shortlisted)
            .to_string()
            .contains("has been shortlisted"));
        assert!(template(ApplicationStatus::Pending)
            .to_string()
            .contains("is now: Not Yet Reviewed."));
    }

    #[test]
    fn test_blank_name_greets_applicant() {
        let body = StatusUpdateTemplate {
            name: "",
            ..template(ApplicationStatus::Approved)
        }
        .to_string();
        assert!(body.starts_with("Hello Applicant,"));
    }
}
