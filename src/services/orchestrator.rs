//! Ordered fallback across AI strategies, degrading to deterministic
//! composition from book content and finally to explanatory notices.

use crate::config::AppConfig;
use crate::error::ErrorKind;
use crate::models::{
    AttemptOutcome, GenerationAttempt, GenerationPath, Language, SummaryRequest, SummaryResult,
};
use crate::services::cache::{CacheKey, SummaryCache};
use crate::services::classifier::classify;
use crate::services::composer::{compose, quota_notice, unavailable_notice};
use crate::services::key_points::{extract_key_points, key_points_from_output};
use crate::services::segmenter::segment;
use crate::services::strategy::{AiStrategy, SummaryStrategy};
use std::sync::Arc;

/// Source text at or below this many characters is ignored.
pub const MIN_SOURCE_CHARS: usize = 100;

const LEGACY_GENERIC_MARKER: &str = "CONTENIDO EDUCATIVO:";
const LEGACY_GENERIC_PHRASE: &str = "se define como un conjunto de conocimientos y habilidades";

pub struct Orchestrator {
    strategies: Vec<Arc<dyn SummaryStrategy>>,
    cache: Option<SummaryCache>,
}

impl Orchestrator {
    pub fn new(strategies: Vec<Arc<dyn SummaryStrategy>>) -> Self {
        Self {
            strategies,
            cache: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let strategies = config
            .providers
            .iter()
            .map(|provider| {
                Arc::new(AiStrategy::new(provider.clone(), config.request_timeout))
                    as Arc<dyn SummaryStrategy>
            })
            .collect();

        let orchestrator = Self::new(strategies);
        match SummaryCache::from_config(&config.cache) {
            Some(cache) => orchestrator.with_cache(cache),
            None => orchestrator,
        }
    }

    pub fn with_cache(mut self, cache: SummaryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Produce a summary for `request`. Every failure is absorbed into one
    /// of the degraded paths, so this always returns a document.
    pub async fn generate(&self, request: &SummaryRequest) -> SummaryResult {
        let source = usable_source(request);
        let cache_key = CacheKey::from_request(request, source);

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&cache_key).await {
                tracing::debug!(topic = %request.topic(), "summary cache hit");
                return hit;
            }
        }

        let available: Vec<&Arc<dyn SummaryStrategy>> = self
            .strategies
            .iter()
            .filter(|strategy| strategy.is_available())
            .collect();

        if available.is_empty() {
            tracing::warn!(topic = %request.topic(), "no AI provider configured");
            if let Some(source) = source {
                return from_book_content(request, source, GenerationPath::BookContent);
            }
        }

        let mut attempts = Vec::with_capacity(available.len());
        for strategy in available {
            match strategy.attempt(request, source).await {
                Ok(output) => {
                    attempts.push(GenerationAttempt {
                        strategy_id: strategy.id().to_string(),
                        outcome: AttemptOutcome::Success(output),
                    });
                    break;
                }
                Err(err) => {
                    let kind = classify(&err);
                    tracing::warn!(
                        strategy = %strategy.id(),
                        error_kind = %kind,
                        error = %err,
                        "strategy failed"
                    );
                    attempts.push(GenerationAttempt {
                        strategy_id: strategy.id().to_string(),
                        outcome: AttemptOutcome::Failure(kind, err.to_string()),
                    });

                    if kind == ErrorKind::QuotaExceeded {
                        if let Some(source) = source {
                            return from_book_content(
                                request,
                                source,
                                GenerationPath::QuotaBookContent,
                            );
                        }
                    }
                }
            }
        }

        if let Some(GenerationAttempt {
            strategy_id,
            outcome: AttemptOutcome::Success(output),
        }) = attempts.last()
        {
            let result = ai_result(request, strategy_id, output);
            if let Some(cache) = &self.cache {
                cache.put(cache_key, result.clone()).await;
            }
            return result;
        }

        if let Some(source) = source {
            return from_book_content(request, source, GenerationPath::BookContent);
        }

        let quota_exhausted = attempts
            .last()
            .and_then(GenerationAttempt::failure_kind)
            == Some(ErrorKind::QuotaExceeded);
        let path = if quota_exhausted {
            GenerationPath::QuotaNotice
        } else {
            GenerationPath::Unavailable
        };
        let last_error = attempts.last().and_then(|attempt| match &attempt.outcome {
            AttemptOutcome::Failure(_, message) => Some(message.as_str()),
            AttemptOutcome::Success(_) => None,
        });
        tracing::warn!(
            topic = %request.topic(),
            path = ?path,
            attempts = attempts.len(),
            last_error = last_error.unwrap_or("no provider available"),
            "returning notice"
        );

        let language = request.language();
        SummaryResult {
            summary: if quota_exhausted {
                quota_notice(language)
            } else {
                unavailable_notice(request.topic(), language)
            },
            key_points: None,
            progress: progress_message(path, None, request.topic(), language),
            path,
            provider: None,
        }
    }
}

/// Generic-placeholder detection: the explicit flag wins, the legacy
/// marker pair is still honoured for older extractors.
pub fn is_generic_source(request: &SummaryRequest, text: &str) -> bool {
    request.source_is_generic()
        || (text.contains(LEGACY_GENERIC_MARKER) && text.contains(LEGACY_GENERIC_PHRASE))
}

/// Trimmed source text when it is long enough and not a generic placeholder.
pub fn usable_source(request: &SummaryRequest) -> Option<&str> {
    let text = request.source_text()?.trim();
    if text.chars().count() <= MIN_SOURCE_CHARS || is_generic_source(request, text) {
        return None;
    }
    Some(text)
}

fn from_book_content(
    request: &SummaryRequest,
    source: &str,
    path: GenerationPath,
) -> SummaryResult {
    let language = request.language();
    let parsed = segment(source);
    let summary = compose(
        request.topic(),
        request.book_title(),
        request.course(),
        &parsed,
        language,
    );
    let key_points = request
        .include_key_points()
        .then(|| extract_key_points(source, request.topic(), language));

    tracing::info!(topic = %request.topic(), path = ?path, "summary composed from book content");
    SummaryResult {
        summary,
        key_points,
        progress: progress_message(path, None, request.topic(), language),
        path,
        provider: None,
    }
}

fn ai_result(request: &SummaryRequest, provider: &str, output: &str) -> SummaryResult {
    let language = request.language();
    let key_points = request.include_key_points().then(|| {
        key_points_from_output(output, request.topic(), language)
            .unwrap_or_else(|| extract_key_points(output, request.topic(), language))
    });

    tracing::info!(strategy = %provider, topic = %request.topic(), "summary generated");
    SummaryResult {
        summary: output.to_string(),
        key_points,
        progress: progress_message(GenerationPath::Ai, Some(provider), request.topic(), language),
        path: GenerationPath::Ai,
        provider: Some(provider.to_string()),
    }
}

fn progress_message(
    path: GenerationPath,
    provider: Option<&str>,
    topic: &str,
    language: Language,
) -> String {
    let provider = provider.unwrap_or_default();
    match (path, language) {
        (GenerationPath::Ai, Language::Es) => {
            format!("Resumen generado exitosamente usando {provider} para \"{topic}\".")
        }
        (GenerationPath::Ai, Language::En) => {
            format!("Summary generated successfully using {provider} for \"{topic}\".")
        }
        (GenerationPath::QuotaBookContent, Language::Es) => {
            "Resumen generado desde el contenido del libro (IA temporalmente no disponible por límite de cuota)."
                .to_string()
        }
        (GenerationPath::QuotaBookContent, Language::En) => {
            "Summary generated from book content (AI temporarily unavailable due to quota limit)."
                .to_string()
        }
        (GenerationPath::BookContent, Language::Es) => {
            "Resumen generado basado en el contenido educativo del tema.".to_string()
        }
        (GenerationPath::BookContent, Language::En) => {
            "Summary generated based on educational topic content.".to_string()
        }
        (GenerationPath::QuotaNotice, Language::Es) => {
            "Límite de cuota de API alcanzado. Intenta más tarde.".to_string()
        }
        (GenerationPath::QuotaNotice, Language::En) => {
            "API quota limit reached. Please try again later.".to_string()
        }
        (GenerationPath::Unavailable, Language::Es) => {
            "Error: No se pudo conectar con el servicio de IA.".to_string()
        }
        (GenerationPath::Unavailable, Language::En) => {
            "Error: Could not connect to the AI service.".to_string()
        }
    }
}
