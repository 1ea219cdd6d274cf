use std::fmt::{self, Display};

use super::{display_name, SendEmail};

/// Free-form message from an employer to one of their applicants.
pub struct DirectMessageTemplate<'a> {
    pub name: &'a str,
    pub job_title: &'a str,
    pub company: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

impl<'a> Display for DirectMessageTemplate<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message.trim();
        writeln!(f, "Hello {},", display_name(self.name))?;
        writeln!(f)?;
        if message.is_empty() {
            writeln!(
                f,
                "You have an update regarding your application for {} at {}.",
                self.job_title, self.company
            )?;
        } else {
            writeln!(f, "{}", message)?;
        }
        writeln!(f)?;
        writeln!(f, "Regards,")?;
        write!(f, "{}", self.company)
    }
}

impl<'a> SendEmail for DirectMessageTemplate<'a> {
    fn subject(&self) -> String {
        match self.subject.trim() {
            "" => format!(
                "Update on your application: {} at {}",
                self.job_title, self.company
            ),
            subject => subject.to_string(),
        }
    }

    fn recipient(&self) -> &str {
        display_name(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_message_layout() {
        let t = DirectMessageTemplate {
            name: "Ann",
            job_title: "Welder",
            company: "Acme",
            subject: "  ",
            message: " Please call us. ",
        };
        assert_eq!(t.subject(), "Update on your application: Welder at Acme");
        assert_eq!(
            t.to_string(),
            "Hello Ann,\n\nPlease call us.\n\nRegards,\nAcme"
        );
    }

    #[test]
    fn test_explicit_subject_is_kept() {
        let t = DirectMessageTemplate {
            name: "",
            job_title: "Welder",
            company: "Acme",
            subject: " Interview ",
            message: "Tuesday?",
        };
        assert_eq!(t.subject(), "Interview");
        assert!(t.to_string().starts_with("Hello Applicant,"));
    }
}
