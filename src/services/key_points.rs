use crate::models::Language;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_KEY_POINTS: usize = 5;
pub const MAX_KEY_POINTS: usize = 10;
pub const MAX_POINT_CHARS: usize = 300;

const LINE_MIN_CHARS: usize = 30;
const LINE_MAX_CHARS: usize = 300;
const TERM_MAX_CHARS: usize = 50;
/// The first `:` must sit past this byte offset.
const COLON_MIN_OFFSET: usize = 3;
const EXPLANATION_MIN_CHARS: usize = 15;
const BULLET_MIN_CHARS: usize = 25;
const NUMBERED_MIN_CHARS: usize = 25;
const NUMBERED_MAX_CHARS: usize = 250;

static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.+)$").unwrap());

static KEY_POINTS_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^#{2,3}\s*(?:puntos\s+clave|key\s+points)\s*:?\s*$").unwrap()
});

static OUTPUT_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-•]|\*\s|\d+[.)]\s)\s*(.+)$").unwrap());

/// Ordered, duplicate-free collection of points capped at [`MAX_KEY_POINTS`].
#[derive(Debug, Default)]
struct KeyPointSet {
    points: Vec<String>,
}

impl KeyPointSet {
    fn is_full(&self) -> bool {
        self.points.len() >= MAX_KEY_POINTS
    }

    fn insert(&mut self, point: &str) {
        let point = truncate_point(point);
        if !self.is_full() && !self.points.contains(&point) {
            self.points.push(point);
        }
    }

    fn finish(mut self, topic: &str, language: Language) -> Vec<String> {
        for filler in generic_points(topic, language) {
            if self.points.len() >= MIN_KEY_POINTS {
                break;
            }
            self.insert(&filler);
        }
        self.points
    }
}

/// Pull up to ten salient lines out of raw textbook text, padding with
/// generic points about `topic` so the result always holds five to ten.
pub fn extract_key_points(source: &str, topic: &str, language: Language) -> Vec<String> {
    let mut points = KeyPointSet::default();

    for line in source.lines().map(str::trim) {
        if points.is_full() {
            break;
        }
        let length = line.chars().count();
        if !(LINE_MIN_CHARS..=LINE_MAX_CHARS).contains(&length) {
            continue;
        }
        if let Some(point) = candidate(line) {
            points.insert(&point);
        }
    }

    points.finish(topic, language)
}

/// Key points from the `## Puntos Clave` / `## Key Points` block of a
/// provider response. `None` when the response has no such block.
pub fn key_points_from_output(
    output: &str,
    topic: &str,
    language: Language,
) -> Option<Vec<String>> {
    let heading = KEY_POINTS_HEADING.find(output)?;
    let mut points = KeyPointSet::default();

    for line in output[heading.end()..].lines().map(str::trim) {
        if line.starts_with('#') {
            break;
        }
        if let Some(item) = OUTPUT_ITEM.captures(line).and_then(|c| c.get(1)) {
            let item = item.as_str().trim();
            if !item.is_empty() {
                points.insert(item);
            }
        }
    }

    Some(points.finish(topic, language))
}

fn candidate(line: &str) -> Option<String> {
    definition_point(line)
        .or_else(|| bullet_point(line))
        .or_else(|| numbered_point(line))
}

fn starts_with_bullet(line: &str) -> bool {
    line.starts_with('-') || line.starts_with('•')
}

fn definition_point(line: &str) -> Option<String> {
    if starts_with_bullet(line) {
        return None;
    }
    let colon = line.find(':')?;
    if colon <= COLON_MIN_OFFSET {
        return None;
    }
    let term = line[..colon].trim();
    let explanation = line[colon + 1..].trim();
    if term.is_empty()
        || term.chars().count() >= TERM_MAX_CHARS
        || explanation.chars().count() <= EXPLANATION_MIN_CHARS
    {
        return None;
    }
    Some(format!("**{term}:** {explanation}"))
}

fn bullet_point(line: &str) -> Option<String> {
    if !starts_with_bullet(line) {
        return None;
    }
    let content = line.trim_start_matches(['-', '•']).trim();
    (content.chars().count() > BULLET_MIN_CHARS).then(|| content.to_string())
}

fn numbered_point(line: &str) -> Option<String> {
    let text = NUMBERED.captures(line)?.get(1)?.as_str().trim();
    let length = text.chars().count();
    (length > NUMBERED_MIN_CHARS && length <= NUMBERED_MAX_CHARS).then(|| text.to_string())
}

fn truncate_point(point: &str) -> String {
    if point.chars().count() <= MAX_POINT_CHARS {
        return point.to_string();
    }
    let mut truncated: String = point.chars().take(MAX_POINT_CHARS - 1).collect();
    truncated.push('…');
    truncated
}

fn generic_points(topic: &str, language: Language) -> [String; MIN_KEY_POINTS] {
    match language {
        Language::Es => [
            format!("**Punto clave sobre {topic}:** Concepto fundamental relacionado con el tema de estudio."),
            format!("**Definición de {topic}:** Identifica qué es {topic} y cuáles son sus elementos principales."),
            format!("**Características de {topic}:** Reconoce los rasgos que distinguen a {topic} dentro de la asignatura."),
            format!("**Ejemplos de {topic}:** Busca situaciones cotidianas donde se observe o aplique {topic}."),
            format!("**Importancia de {topic}:** Explica por qué {topic} es relevante para comprender la asignatura."),
        ],
        Language::En => [
            format!("**Key point about {topic}:** Fundamental concept related to the study topic."),
            format!("**Definition of {topic}:** Identify what {topic} is and what its main elements are."),
            format!("**Characteristics of {topic}:** Recognize the features that distinguish {topic} within the subject."),
            format!("**Examples of {topic}:** Look for everyday situations where {topic} can be observed or applied."),
            format!("**Importance of {topic}:** Explain why {topic} matters for understanding the subject."),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_bounds(points: &[String]) {
        assert!(
            (MIN_KEY_POINTS..=MAX_KEY_POINTS).contains(&points.len()),
            "got {} points",
            points.len()
        );
        let unique: HashSet<&String> = points.iter().collect();
        assert_eq!(unique.len(), points.len(), "duplicate points: {points:?}");
    }

    #[test]
    fn test_empty_source_yields_five_generic_points() {
        let points = extract_key_points("", "La célula", Language::Es);
        assert_eq!(points.len(), MIN_KEY_POINTS);
        assert_bounds(&points);
        assert!(points.iter().all(|p| p.contains("La célula")));
    }

    #[test]
    fn test_definition_line_becomes_bold_term() {
        let source = "Los seres vivos están formados por estructuras microscópicas.\n\
                      Célula: unidad básica de los seres vivos\n\
                      Todas las células provienen de otras células preexistentes por división.";
        let points = extract_key_points(source, "La célula", Language::Es);

        assert!(points.contains(&"**Célula:** unidad básica de los seres vivos".to_string()));
        assert_bounds(&points);
    }

    #[test]
    fn test_colon_too_close_to_line_start_is_not_a_definition() {
        let short_term = "ADN: molécula que guarda la información genética de los seres";
        assert!(definition_point(short_term).is_none());
        assert_eq!(
            definition_point("Agua: sustancia formada por hidrógeno y oxígeno").as_deref(),
            Some("**Agua:** sustancia formada por hidrógeno y oxígeno")
        );

        let points = extract_key_points(short_term, "El ADN", Language::Es);
        assert!(points.iter().all(|p| !p.starts_with("**ADN:**")));
        assert_eq!(points.len(), MIN_KEY_POINTS);
    }

    #[test]
    fn test_numbered_length_bounds() {
        let item = |len: usize| format!("1. {}", "x".repeat(len));

        assert_eq!(numbered_point(&item(250)).map(|p| p.chars().count()), Some(250));
        assert!(numbered_point(&item(251)).is_none());
        assert!(numbered_point(&item(25)).is_none());
        assert!(numbered_point(&item(26)).is_some());

        let points = extract_key_points(&item(250), "Topic", Language::En);
        assert_eq!(points[0], "x".repeat(250));
    }

    #[test]
    fn test_bullets_and_numbered_items() {
        let source = "\
- La evaporación transforma el agua líquida en vapor por acción del calor.
• La condensación forma nubes cuando el vapor se enfría en la atmósfera.
1. La precipitación devuelve el agua a la superficie en forma de lluvia.
- corto";
        let points = extract_key_points(source, "El ciclo del agua", Language::Es);

        assert_eq!(
            &points[..3],
            &[
                "La evaporación transforma el agua líquida en vapor por acción del calor.",
                "La condensación forma nubes cuando el vapor se enfría en la atmósfera.",
                "La precipitación devuelve el agua a la superficie en forma de lluvia.",
            ]
        );
        assert_eq!(points.len(), MIN_KEY_POINTS);
    }

    #[test]
    fn test_caps_at_ten_and_dedupes() {
        let mut source = String::new();
        for i in 0..15 {
            source.push_str(&format!(
                "- Enunciado número {i} sobre las fracciones equivalentes y su uso\n"
            ));
            source.push_str(&format!(
                "- Enunciado número {i} sobre las fracciones equivalentes y su uso\n"
            ));
        }
        let points = extract_key_points(&source, "Fracciones", Language::Es);

        assert_eq!(points.len(), MAX_KEY_POINTS);
        assert_bounds(&points);
        assert!(points[9].contains("número 9"));
    }

    #[test]
    fn test_skips_lines_outside_length_window() {
        let long_line = format!("- {}", "palabra ".repeat(50));
        let points = extract_key_points(&long_line, "Topic", Language::En);
        assert!(points.iter().all(|p| p.starts_with("**")));
        assert_eq!(points.len(), MIN_KEY_POINTS);
    }

    #[test]
    fn test_points_are_truncated() {
        let line = format!("Término: {}", "a".repeat(290));
        assert!(line.chars().count() <= 300);

        let points = extract_key_points(&line, "Topic", Language::En);
        assert_eq!(points[0].chars().count(), MAX_POINT_CHARS);
        assert!(points[0].ends_with('…'));
    }

    #[test]
    fn test_key_points_from_output_block() {
        let output = "\
## Introducción
Texto.

## Puntos Clave
- La célula es la unidad básica de la vida
- La membrana controla el paso de sustancias
* El núcleo guarda el material genético
**Nota:** esto no es un punto
1. Las mitocondrias producen energía
- La célula es la unidad básica de la vida

## Conclusión
- Esto ya no es un punto clave";
        let points = key_points_from_output(output, "La célula", Language::Es).unwrap();

        assert_eq!(
            &points[..4],
            &[
                "La célula es la unidad básica de la vida",
                "La membrana controla el paso de sustancias",
                "El núcleo guarda el material genético",
                "Las mitocondrias producen energía",
            ]
        );
        assert_eq!(points.len(), MIN_KEY_POINTS);
        assert!(!points.iter().any(|p| p.contains("ya no es")));
    }

    #[test]
    fn test_key_points_from_output_without_block() {
        assert!(key_points_from_output("## Summary\n- a point", "x", Language::En).is_none());
    }
}
