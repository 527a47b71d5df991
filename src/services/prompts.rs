use crate::models::{Language, SummaryRequest};

const SYSTEM_PROMPT_ES: &str = r#"Eres un experto educador y creador de contenido pedagógico especializado en el currículo escolar chileno. Tu tarea es crear resúmenes educativos completos y de alta calidad en español.

IMPORTANTE:
- Genera contenido educativo REAL y ESPECÍFICO sobre el tema
- NO uses frases genéricas como "es un tema importante" o "conjunto de conocimientos"
- Incluye definiciones claras, ejemplos concretos y datos específicos
- Usa formato Markdown con ## para títulos y ### para subtítulos
- Usa **negrita** para términos importantes"#;

const SYSTEM_PROMPT_EN: &str = r#"You are an expert educator and pedagogical content creator specialized in the Chilean school curriculum. Your task is to create complete, high-quality educational summaries in English.

IMPORTANT:
- Generate REAL and SPECIFIC educational content about the topic
- DO NOT use generic phrases like "this is an important topic" or "set of knowledge"
- Include clear definitions, concrete examples and specific data
- Use Markdown format with ## for titles and ### for subtitles
- Use **bold** for important terms"#;

pub fn system_prompt(language: Language) -> &'static str {
    match language {
        Language::Es => SYSTEM_PROMPT_ES,
        Language::En => SYSTEM_PROMPT_EN,
    }
}

/// Build the user prompt. `source` is the usable book content, if any.
pub fn user_prompt(request: &SummaryRequest, source: Option<&str>) -> String {
    let topic = request.topic();
    let book = request.book_title();
    let course = request.course();

    let mut prompt = match request.language() {
        Language::Es => format!(
            r#"Genera un resumen educativo completo sobre "{topic}" para la asignatura de {book}{}.

El resumen DEBE incluir:
1. **Introducción**: Qué es {topic} y por qué es importante
2. **Conceptos Fundamentales**: Definiciones claras y precisas
3. **Desarrollo del Tema**: Explicación detallada con ejemplos
4. **Características/Componentes**: Elementos principales del tema
5. **Ejemplos Prácticos**: Casos concretos y aplicaciones
6. **Importancia**: Relevancia del tema en la vida real
7. **Conclusión**: Síntesis de los puntos principales"#,
            course.map(|c| format!(" (nivel: {c})")).unwrap_or_default()
        ),
        Language::En => format!(
            r#"Generate a complete educational summary about "{topic}" for the subject {book}{}.

The summary MUST include:
1. **Introduction**: What is {topic} and why is it important
2. **Fundamental Concepts**: Clear and precise definitions
3. **Topic Development**: Detailed explanation with examples
4. **Characteristics/Components**: Main elements of the topic
5. **Practical Examples**: Concrete cases and applications
6. **Importance**: Relevance of the topic in real life
7. **Conclusion**: Synthesis of main points"#,
            course.map(|c| format!(" (level: {c})")).unwrap_or_default()
        ),
    };

    if let Some(source) = source {
        prompt.push_str(&match request.language() {
            Language::Es => format!(
                "\n\n=== CONTENIDO DEL LIBRO DE TEXTO ===\nBasa tu resumen en esta información:\n\n{source}\n=== FIN DEL CONTENIDO ==="
            ),
            Language::En => format!(
                "\n\n=== TEXTBOOK CONTENT ===\nBase your summary on this information:\n\n{source}\n=== END OF CONTENT ==="
            ),
        });
    }

    if request.include_key_points() {
        prompt.push_str(match request.language() {
            Language::Es => "\n\nAdemás, al final incluye una sección \"## Puntos Clave\" con exactamente 10 puntos importantes del tema, cada uno en una línea separada comenzando con \"- \".",
            Language::En => "\n\nAlso, at the end include a \"## Key Points\" section with exactly 10 important points about the topic, each on a separate line starting with \"- \".",
        });
    }

    prompt
}
