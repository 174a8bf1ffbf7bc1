use super::domain::{ApplicationForm, FormField, ResumeKind};

/// Rejection reasons surfaced back to the applicant without leaving the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please fill all fields and upload a resume ({0} is missing)")]
    MissingField(FormField),
    #[error("please enter a valid email address")]
    MalformedEmail,
    #[error("unsupported resume format '.{extension}'; accepted formats: PDF, DOCX, DOC")]
    UnsupportedResumeType { extension: String },
}

/// Check the form before any gateway is touched. Values are taken as-is;
/// no trimming or case folding happens here.
pub fn validate(form: &ApplicationForm) -> Result<(), ValidationError> {
    if form.name.is_empty() {
        return Err(ValidationError::MissingField(FormField::Name));
    }
    if form.email.is_empty() {
        return Err(ValidationError::MissingField(FormField::Email));
    }
    if form.location.is_empty() {
        return Err(ValidationError::MissingField(FormField::Location));
    }
    if form.languages.is_empty() {
        return Err(ValidationError::MissingField(FormField::Languages));
    }
    if form.resume.file_name.is_empty() || form.resume.is_empty() {
        return Err(ValidationError::MissingField(FormField::Resume));
    }

    if !has_email_shape(&form.email) {
        return Err(ValidationError::MalformedEmail);
    }

    if ResumeKind::from_file_name(&form.resume.file_name).is_none() {
        let extension = form
            .resume
            .extension()
            .unwrap_or_default()
            .to_ascii_lowercase();
        return Err(ValidationError::UnsupportedResumeType { extension });
    }

    Ok(())
}

/// Accepts `<local>@<domain>.<tld>`: a nonempty `@`-free local part, a
/// nonempty `@`-free domain, a dot, and at least one more character before
/// any further `@`. Trailing text is tolerated.
fn has_email_shape(email: &str) -> bool {
    let Some((local, rest)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }

    let domain_region = match rest.find('@') {
        Some(at) => &rest[..at],
        None => rest,
    };

    domain_region
        .find('.')
        .is_some_and(|dot| dot > 0 && dot + 1 < domain_region.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::intake::domain::ResumeUpload;

    fn form() -> ApplicationForm {
        ApplicationForm {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            location: "Remote".to_string(),
            languages: "English".to_string(),
            resume: ResumeUpload::new("resume.pdf", b"%PDF-1.4".to_vec()),
        }
    }

    #[test]
    fn accepts_complete_form() {
        assert_eq!(validate(&form()), Ok(()));
    }

    #[test]
    fn each_empty_field_is_reported() {
        let cases = [
            (FormField::Name, {
                let mut f = form();
                f.name.clear();
                f
            }),
            (FormField::Email, {
                let mut f = form();
                f.email.clear();
                f
            }),
            (FormField::Location, {
                let mut f = form();
                f.location.clear();
                f
            }),
            (FormField::Languages, {
                let mut f = form();
                f.languages.clear();
                f
            }),
            (FormField::Resume, {
                let mut f = form();
                f.resume.content.clear();
                f
            }),
        ];

        for (field, candidate) in cases {
            assert_eq!(
                validate(&candidate),
                Err(ValidationError::MissingField(field)),
                "expected {field} to be reported missing"
            );
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["not-an-email", "@x.com", "jane@com", "jane@x.", "jane@.com", "jane@@x.com"] {
            let mut candidate = form();
            candidate.email = email.to_string();
            assert_eq!(
                validate(&candidate),
                Err(ValidationError::MalformedEmail),
                "expected '{email}' to be rejected"
            );
        }
    }

    #[test]
    fn tolerates_trailing_text_after_valid_shape() {
        let mut candidate = form();
        candidate.email = "jane@x.com extra".to_string();
        assert_eq!(validate(&candidate), Ok(()));
    }

    #[test]
    fn no_normalization_happens() {
        let mut candidate = form();
        candidate.name = "  ".to_string();
        assert_eq!(validate(&candidate), Ok(()), "whitespace-only name is still nonempty");
    }

    #[test]
    fn rejects_unsupported_resume_format() {
        let mut candidate = form();
        candidate.resume = ResumeUpload::new("resume.txt", vec![1, 2, 3]);
        assert_eq!(
            validate(&candidate),
            Err(ValidationError::UnsupportedResumeType {
                extension: "txt".to_string()
            })
        );
    }

    #[test]
    fn accepts_each_allowed_format() {
        for file_name in ["a.pdf", "b.docx", "c.DOC"] {
            let mut candidate = form();
            candidate.resume = ResumeUpload::new(file_name, vec![1]);
            assert_eq!(validate(&candidate), Ok(()), "expected '{file_name}' to pass");
        }
    }
}
