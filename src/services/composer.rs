//! Deterministic markdown summaries built from segmented textbook content.
//!
//! Nothing here can fail: when there is no content at all, [`compose`]
//! returns the unavailable notice instead of an empty document.

use crate::models::{Language, ParsedContent};

pub const UNAVAILABLE_MARKER_ES: &str = "# Error: No se pudo generar el resumen";
pub const UNAVAILABLE_MARKER_EN: &str = "# Error: Could not generate summary";
pub const QUOTA_MARKER_ES: &str = "# ⚠️ Límite de API Alcanzado";
pub const QUOTA_MARKER_EN: &str = "# ⚠️ API Limit Reached";

struct Labels {
    title: &'static str,
    general_info: &'static str,
    subject: &'static str,
    topic: &'static str,
    introduction: &'static str,
    content: &'static str,
    key_concepts: &'static str,
    examples: &'static str,
    conclusion: &'static str,
}

const LABELS_ES: Labels = Labels {
    title: "RESUMEN",
    general_info: "Información General",
    subject: "Asignatura",
    topic: "Tema",
    introduction: "Introducción",
    content: "Contenido Educativo",
    key_concepts: "Conceptos Clave",
    examples: "Ejemplos y Aplicaciones",
    conclusion: "Conclusión",
};

const LABELS_EN: Labels = Labels {
    title: "SUMMARY",
    general_info: "General Information",
    subject: "Subject",
    topic: "Topic",
    introduction: "Introduction",
    content: "Educational Content",
    key_concepts: "Key Concepts",
    examples: "Examples and Applications",
    conclusion: "Conclusion",
};

pub fn compose(
    topic: &str,
    book_title: &str,
    course: Option<&str>,
    parsed: &ParsedContent,
    language: Language,
) -> String {
    if parsed.is_empty() {
        return unavailable_notice(topic, language);
    }

    let labels = match language {
        Language::Es => &LABELS_ES,
        Language::En => &LABELS_EN,
    };
    let course_info = match (course, language) {
        (Some(course), Language::Es) => format!(" para {course}"),
        (Some(course), Language::En) => format!(" for {course}"),
        (None, _) => String::new(),
    };

    let mut doc = String::new();
    doc.push_str(&format!("# {}: {}\n\n", labels.title, topic.to_uppercase()));
    doc.push_str(&format!("## {}\n", labels.general_info));
    doc.push_str(&format!("**{}:** {book_title}{course_info}\n", labels.subject));
    doc.push_str(&format!("**{}:** {topic}\n\n", labels.topic));
    doc.push_str("---\n\n");

    doc.push_str(&format!("## {}\n\n", labels.introduction));
    if parsed.introduction.is_empty() {
        doc.push_str(&format!("{}\n\n", generic_introduction(topic, book_title, language)));
    } else {
        doc.push_str(&format!("{}\n\n", parsed.introduction));
    }

    doc.push_str(&format!("## {}\n\n", labels.content));
    for section in &parsed.sections {
        if !section.title.is_empty() {
            doc.push_str(&format!("### {}\n\n", section.title));
        }
        doc.push_str(&format!("{}\n\n", section.body.trim_end()));
    }

    if !parsed.definitions.is_empty() {
        doc.push_str(&format!("## {}\n\n", labels.key_concepts));
        for definition in &parsed.definitions {
            doc.push_str(&format!("**{}:** {}\n\n", definition.term, definition.definition));
        }
    }

    if !parsed.examples.is_empty() {
        doc.push_str(&format!("## {}\n\n", labels.examples));
        for example in &parsed.examples {
            doc.push_str(&format!("- {example}\n"));
        }
        doc.push('\n');
    }

    doc.push_str(&format!("## {}\n\n", labels.conclusion));
    doc.push_str(&format!("{}\n\n", conclusion(topic, book_title, language)));
    doc.push_str("---\n\n");
    doc.push_str(&attribution(book_title, &course_info, language));

    doc
}

fn generic_introduction(topic: &str, book_title: &str, language: Language) -> String {
    match language {
        Language::Es => format!(
            "{topic} es un tema fundamental en el estudio de {book_title}. A continuación se presenta el contenido educativo completo basado en el currículo oficial."
        ),
        Language::En => format!(
            "{topic} is a fundamental topic in the study of {book_title}. Below is the complete educational content based on the official curriculum."
        ),
    }
}

fn conclusion(topic: &str, book_title: &str, language: Language) -> String {
    match language {
        Language::Es => format!(
            "El estudio de {topic} es esencial para comprender los fundamentos de {book_title}. Los conceptos presentados proporcionan una base sólida para el aprendizaje continuo en esta área del conocimiento."
        ),
        Language::En => format!(
            "The study of {topic} is essential for understanding the fundamentals of {book_title}. The concepts presented provide a solid foundation for continued learning in this area of knowledge."
        ),
    }
}

fn attribution(book_title: &str, course_info: &str, language: Language) -> String {
    match language {
        Language::Es => format!(
            "*Resumen generado a partir del contenido oficial del libro de {book_title}{course_info}.*"
        ),
        Language::En => format!(
            "*Summary generated from the official {book_title} textbook content{course_info}.*"
        ),
    }
}

/// Explanatory document returned when no AI provider answered and there was
/// no book content to fall back on.
pub fn unavailable_notice(topic: &str, language: Language) -> String {
    match language {
        Language::Es => format!(
            r#"{UNAVAILABLE_MARKER_ES}

## El sistema no pudo acceder a la IA

Para generar un resumen educativo sobre "{topic}", el sistema necesita conectarse con el servicio de IA.

### Posibles causas:
- Las credenciales de los proveedores de IA no están configuradas
- El servicio de IA no está disponible temporalmente

### Solución:
Por favor, contacta al administrador del sistema para verificar la configuración de los proveedores de IA.

---

*Este mensaje aparece porque no hay contenido específico del libro para este tema y no se pudo conectar con la IA.*"#
        ),
        Language::En => format!(
            r#"{UNAVAILABLE_MARKER_EN}

## The system could not access the AI

To generate an educational summary about "{topic}", the system needs to connect to the AI service.

### Possible causes:
- The AI provider credentials are not configured
- The AI service is temporarily unavailable

### Solution:
Please contact the system administrator to verify the AI provider configuration.

---

*This message appears because there is no specific book content for this topic and the AI connection failed.*"#
        ),
    }
}

/// Explanatory document returned when the provider quota is exhausted and
/// there was no book content to fall back on.
pub fn quota_notice(language: Language) -> String {
    match language {
        Language::Es => format!(
            r#"{QUOTA_MARKER_ES}

## El servicio de IA ha alcanzado su límite de uso

El proveedor de IA ha excedido su cuota disponible. Esto es temporal.

### Soluciones:

1. **Esperar**: La cuota se restablece automáticamente (generalmente cada día)
2. **Elegir un tema con contenido del libro**: Los temas con contenido extraído del libro se resumen sin IA
3. **Contactar al administrador**: Para actualizar el plan de la API

---

*Por favor, intenta con otro tema o espera a que se restablezca la cuota de la API.*"#
        ),
        Language::En => format!(
            r#"{QUOTA_MARKER_EN}

## The AI service has reached its usage limit

The AI provider has exceeded its available quota. This is temporary.

### Solutions:

1. **Wait**: The quota resets automatically (usually daily)
2. **Pick a topic with book content**: Topics with extracted book content are summarized without AI
3. **Contact administrator**: To upgrade the API plan

---

*Please try another topic or wait for the API quota to reset.*"#
        ),
    }
}

pub fn is_unavailable_notice(doc: &str) -> bool {
    doc.starts_with(UNAVAILABLE_MARKER_ES) || doc.starts_with(UNAVAILABLE_MARKER_EN)
}

pub fn is_quota_notice(doc: &str) -> bool {
    doc.starts_with(QUOTA_MARKER_ES) || doc.starts_with(QUOTA_MARKER_EN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Definition, Section};

    fn sample() -> ParsedContent {
        ParsedContent {
            introduction: "La célula es la unidad básica de la vida en todos los organismos.".into(),
            sections: vec![
                Section {
                    title: String::new(),
                    body: "Texto inicial.".into(),
                },
                Section {
                    title: "Organelos".into(),
                    body: "Mitocondria y núcleo.".into(),
                },
            ],
            definitions: vec![Definition {
                term: "Núcleo".into(),
                definition: "estructura que contiene el ADN de la célula".into(),
            }],
            examples: vec!["Las bacterias son células procariotas".into()],
        }
    }

    #[test]
    fn test_compose_spanish_layout() {
        let doc = compose(
            "La célula",
            "Ciencias Naturales",
            Some("6to Básico"),
            &sample(),
            Language::Es,
        );

        assert!(doc.starts_with("# RESUMEN: LA CÉLULA\n"));
        assert!(doc.contains("**Asignatura:** Ciencias Naturales para 6to Básico\n"));
        assert!(doc.contains("**Tema:** La célula\n"));
        assert!(doc.contains("## Introducción\n\nLa célula es la unidad básica"));
        assert!(doc.contains("## Contenido Educativo\n\nTexto inicial.\n\n### Organelos\n"));
        assert!(doc.contains("**Núcleo:** estructura que contiene el ADN de la célula"));
        assert!(doc.contains("## Ejemplos y Aplicaciones\n\n- Las bacterias son células procariotas\n"));
        assert!(doc.ends_with(
            "*Resumen generado a partir del contenido oficial del libro de Ciencias Naturales para 6to Básico.*"
        ));

        let order = [
            "## Introducción",
            "## Contenido Educativo",
            "## Conceptos Clave",
            "## Ejemplos",
            "## Conclusión",
        ];
        let positions: Vec<usize> = order.iter().map(|h| doc.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_compose_english_without_optional_sections() {
        let parsed = ParsedContent {
            sections: vec![Section {
                title: String::new(),
                body: "Fractions split a whole into equal parts.".into(),
            }],
            ..Default::default()
        };
        let doc = compose("Fractions", "Mathematics", None, &parsed, Language::En);

        assert!(doc.starts_with("# SUMMARY: FRACTIONS\n"));
        assert!(doc.contains("**Subject:** Mathematics\n"));
        assert!(doc.contains("Fractions is a fundamental topic in the study of Mathematics."));
        assert!(!doc.contains("## Key Concepts"));
        assert!(!doc.contains("## Examples and Applications"));
        assert!(!doc.contains("###"));
        assert!(!is_unavailable_notice(&doc));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let a = compose("La célula", "Ciencias", None, &sample(), Language::Es);
        let b = compose("La célula", "Ciencias", None, &sample(), Language::Es);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_content_returns_unavailable_notice() {
        let doc = compose("Fracciones", "Matemáticas", None, &ParsedContent::default(), Language::Es);
        assert_eq!(doc, unavailable_notice("Fracciones", Language::Es));
        assert!(is_unavailable_notice(&doc));
        assert!(!is_quota_notice(&doc));
    }

    #[test]
    fn test_quota_notice_marker() {
        assert!(is_quota_notice(&quota_notice(Language::En)));
        assert!(is_quota_notice(&quota_notice(Language::Es)));
        assert!(!is_unavailable_notice(&quota_notice(Language::Es)));
    }
}
