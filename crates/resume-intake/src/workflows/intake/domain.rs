use serde::{Deserialize, Serialize};

/// Resume blob as received from the applicant, with the client-side filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Text after the final dot of the filename, if any.
    pub fn extension(&self) -> Option<&str> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension)
            .filter(|extension| !extension.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Accepted resume document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeKind {
    Pdf,
    Docx,
    Doc,
}

impl ResumeKind {
    pub const ACCEPTED_EXTENSIONS: [&'static str; 3] = ["pdf", "docx", "doc"];

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = file_name.rsplit_once('.')?.1;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }
}

/// One applicant's input, captured at submission time and discarded after
/// processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub location: String,
    pub languages: String,
    pub resume: ResumeUpload,
}

/// The form's required fields, used to report which one is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Location,
    Languages,
    Resume,
}

impl FormField {
    pub const fn label(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Location => "preferred job location",
            FormField::Languages => "languages known",
            FormField::Resume => "resume",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Confirmed submission: exists only after the resume was stored and the
/// roster row appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedRecord {
    pub name: String,
    pub email: String,
    pub location: String,
    pub languages: String,
    pub resume_url: String,
}

impl SubmittedRecord {
    /// The ordered tuple appended to the roster sheet.
    pub fn row(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.email.clone(),
            self.location.clone(),
            self.languages.clone(),
            self.resume_url.clone(),
        ]
    }
}
