use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ValidationError};
use crate::services::composer::{is_quota_notice, is_unavailable_notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
}

/// Inbound body of `POST /api/generate-summary`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub topic: String,
    pub language: Language,
    #[serde(default)]
    pub include_key_points: bool,
    pub course: Option<String>,
    pub source_text: Option<String>,
    #[serde(default)]
    pub source_is_generic: bool,
}

/// A validated summary request. Fields are private so `topic` and
/// `book_title` are guaranteed non-blank.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    book_title: String,
    topic: String,
    language: Language,
    include_key_points: bool,
    course: Option<String>,
    source_text: Option<String>,
    source_is_generic: bool,
}

impl SummaryRequest {
    pub fn new(
        book_title: impl Into<String>,
        topic: impl Into<String>,
        language: Language,
    ) -> Result<Self, ValidationError> {
        let book_title = book_title.into().trim().to_string();
        let topic = topic.into().trim().to_string();
        if book_title.is_empty() {
            return Err(ValidationError::MissingField("bookTitle"));
        }
        if topic.is_empty() {
            return Err(ValidationError::MissingField("topic"));
        }

        Ok(Self {
            book_title,
            topic,
            language,
            include_key_points: false,
            course: None,
            source_text: None,
            source_is_generic: false,
        })
    }

    pub fn with_key_points(mut self, include: bool) -> Self {
        self.include_key_points = include;
        self
    }

    pub fn with_course(mut self, course: Option<String>) -> Self {
        self.course = course
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    pub fn with_source_text(mut self, source_text: Option<String>) -> Self {
        self.source_text = source_text;
        self
    }

    pub fn with_generic_source(mut self, generic: bool) -> Self {
        self.source_is_generic = generic;
        self
    }

    pub fn book_title(&self) -> &str {
        &self.book_title
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn include_key_points(&self) -> bool {
        self.include_key_points
    }

    pub fn course(&self) -> Option<&str> {
        self.course.as_deref()
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }

    pub fn source_is_generic(&self) -> bool {
        self.source_is_generic
    }
}

impl TryFrom<SummaryPayload> for SummaryRequest {
    type Error = ValidationError;

    fn try_from(payload: SummaryPayload) -> Result<Self, Self::Error> {
        Ok(
            SummaryRequest::new(payload.book_title, payload.topic, payload.language)?
                .with_key_points(payload.include_key_points)
                .with_course(payload.course)
                .with_source_text(payload.source_text)
                .with_generic_source(payload.source_is_generic),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    Failure(ErrorKind, String),
}

/// One strategy try inside a single orchestration run.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    pub strategy_id: String,
    pub outcome: AttemptOutcome,
}

impl GenerationAttempt {
    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            AttemptOutcome::Failure(kind, _) => Some(*kind),
            AttemptOutcome::Success(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedContent {
    pub introduction: String,
    pub sections: Vec<Section>,
    pub definitions: Vec<Definition>,
    pub examples: Vec<String>,
}

impl ParsedContent {
    pub fn is_empty(&self) -> bool {
        self.introduction.is_empty()
            && self.sections.is_empty()
            && self.definitions.is_empty()
            && self.examples.is_empty()
    }
}

/// Which strategy produced a [`SummaryResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPath {
    Ai,
    BookContent,
    QuotaBookContent,
    QuotaNotice,
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_points: Option<Vec<String>>,
    pub progress: String,
    pub path: GenerationPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl SummaryResult {
    /// True for the explanatory documents returned when nothing could be
    /// generated.
    pub fn is_notice(&self) -> bool {
        is_unavailable_notice(&self.summary) || is_quota_notice(&self.summary)
    }
}
