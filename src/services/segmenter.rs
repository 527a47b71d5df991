use crate::models::{Definition, ParsedContent, Section};
use once_cell::sync::Lazy;
use regex::Regex;

const INTRODUCTION_MIN_CHARS: usize = 50;
const DEFINITION_MIN_CHARS: usize = 20;
const EXAMPLE_MIN_CHARS: usize = 15;

static HEADER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(?:\d+\.?\s+)?[A-ZÁÉÍÓÚÑÜ][A-ZÁÉÍÓÚÑÜ\s]+$", // 1. LA CÉLULA, SISTEMA NERVIOSO
        r"^#{1,3}\s+\S",                               // # Title, ## Title, ### Title
        r"(?i)^(?:cap[íi]tulo|unidad|parte|secci[óo]n|chapter|unit|part|section)\b", // Unidad 2: ...
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static MARKDOWN_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s*").unwrap());
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\s+").unwrap());

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-ZÁÉÍÓÚÑÜ][a-záéíóúñüA-ZÁÉÍÓÚÑÜ\s]+)[:–-]\s*(.+)$").unwrap()
});

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-•]\s+").unwrap());
static EXAMPLE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^ejemplo:\s*").unwrap());

/// Section headers: all-caps lines (optionally numbered), markdown headings
/// and chapter/unit/section keywords.
pub fn is_header(line: &str) -> bool {
    HEADER_PATTERNS.iter().any(|regex| regex.is_match(line))
}

pub fn header_title(line: &str) -> String {
    let without_marker = MARKDOWN_MARKER.replace(line, "");
    LEADING_NUMBER
        .replace(&without_marker, "")
        .trim()
        .to_string()
}

/// `Term: explanation`, `Term – explanation` or `Term - explanation`.
pub fn parse_definition(line: &str) -> Option<Definition> {
    let captures = DEFINITION.captures(line)?;
    let definition = captures.get(2)?.as_str().trim();
    if definition.chars().count() <= DEFINITION_MIN_CHARS {
        return None;
    }

    Some(Definition {
        term: captures.get(1)?.as_str().trim().to_string(),
        definition: definition.to_string(),
    })
}

pub fn parse_example(line: &str) -> Option<String> {
    let example = if BULLET.is_match(line) {
        BULLET.replace(line, "")
    } else if EXAMPLE_LABEL.is_match(line) {
        EXAMPLE_LABEL.replace(line, "")
    } else {
        return None;
    };

    let example = example.trim();
    (example.chars().count() > EXAMPLE_MIN_CHARS).then(|| example.to_string())
}

struct OpenSection<'a> {
    title: String,
    lines: Vec<&'a str>,
}

impl<'a> OpenSection<'a> {
    fn titled(title: String) -> Self {
        Self {
            title,
            lines: Vec::new(),
        }
    }

    fn close_into(self, sections: &mut Vec<Section>) {
        if self.lines.is_empty() {
            return;
        }
        sections.push(Section {
            title: self.title,
            body: self.lines.join("\n"),
        });
    }
}

/// Split raw textbook text into introduction, sections, definitions and
/// examples in one pass over its non-blank lines.
///
/// Every non-header line lands in a section body; definition, example and
/// introduction lines are additionally copied into their own containers.
pub fn segment(source: &str) -> ParsedContent {
    let mut parsed = ParsedContent::default();
    if source.trim().is_empty() {
        return parsed;
    }

    let mut current = OpenSection::titled(String::new());
    let mut header_seen = false;

    for line in source.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if is_header(line) {
            let next = OpenSection::titled(header_title(line));
            std::mem::replace(&mut current, next).close_into(&mut parsed.sections);
            header_seen = true;
            continue;
        }

        if let Some(definition) = parse_definition(line) {
            parsed.definitions.push(definition);
        }
        if let Some(example) = parse_example(line) {
            parsed.examples.push(example);
        }
        if !header_seen
            && parsed.introduction.is_empty()
            && line.chars().count() >= INTRODUCTION_MIN_CHARS
        {
            parsed.introduction = line.to_string();
        }

        current.lines.push(line);
    }
    current.close_into(&mut parsed.sections);

    if parsed.sections.is_empty() {
        parsed.sections.push(Section {
            title: String::new(),
            body: source.to_string(),
        });
    }

    parsed
}
