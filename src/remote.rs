use crate::catalog::ArtStyle;
use crate::error::{PosterError, PosterResult};

/// A text replacement the user asked for: keep the layout, swap the words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextReplacement {
    pub original: String,
    pub replacement: String,
}

/// A free-form instruction targeting one detected subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityModification {
    pub entity: String,
    pub instruction: String,
}

/// The full request for one style transformation.
#[derive(Clone, Debug, Default)]
pub struct TransformRequest {
    pub custom_prompt: String,
    pub text_replacements: Vec<TextReplacement>,
    pub entity_modifications: Vec<EntityModification>,
}

/// What the analysis pass learned about the current image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageAnalysis {
    pub texts: Vec<String>,
    pub entities: Vec<String>,
}

/// The remote generative backend. Implementations are synchronous; the
/// caller decides how to schedule them.
pub trait StyleService: Sync {
    /// Visible text strings in the image.
    fn detect_text(&self, png: &[u8]) -> PosterResult<Vec<String>>;

    /// The 2-3 most prominent subjects in the image.
    fn detect_entities(&self, png: &[u8]) -> PosterResult<Vec<String>>;

    /// Re-render the image under `prompt`, returning new PNG bytes.
    fn transform(&self, png: &[u8], prompt: &str) -> PosterResult<Vec<u8>>;
}

/// Fallback subjects offered when entity detection fails. Text detection has
/// no equivalent: an empty list just hides the replacement UI.
pub const DEFAULT_ENTITIES: [&str; 2] = ["Person", "Background"];

/// Run both detection passes concurrently. Neither failure aborts analysis:
/// failed text detection yields no texts, failed entity detection yields the
/// default subjects.
pub fn analyze(service: &dyn StyleService, png: &[u8]) -> ImageAnalysis {
    let (texts, entities) = std::thread::scope(|scope| {
        let text_task = scope.spawn(|| service.detect_text(png));
        let entity_task = scope.spawn(|| service.detect_entities(png));
        (join_detection(text_task), join_detection(entity_task))
    });

    let texts = texts.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "text detection failed");
        Vec::new()
    });
    let entities = entities.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "entity detection failed");
        DEFAULT_ENTITIES.iter().map(|s| s.to_string()).collect()
    });
    ImageAnalysis { texts, entities }
}

fn join_detection(
    handle: std::thread::ScopedJoinHandle<'_, PosterResult<Vec<String>>>,
) -> PosterResult<Vec<String>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(PosterError::remote("detection worker panicked")),
    }
}

/// Assemble the final transformation prompt: the style's base prompt (or the
/// custom one), then text replacement instructions, then subject
/// modifications. Empty and no-op replacement entries are dropped.
pub fn build_prompt(style: ArtStyle, request: &TransformRequest) -> PosterResult<String> {
    let mut prompt = match style.descriptor() {
        Some(d) => d.prompt.to_string(),
        None => {
            let custom = request.custom_prompt.trim();
            if custom.is_empty() {
                return Err(PosterError::input(
                    "a custom style needs a non-empty prompt",
                ));
            }
            custom.to_string()
        }
    };

    let replacements: Vec<String> = request
        .text_replacements
        .iter()
        .filter(|tr| {
            !tr.original.trim().is_empty()
                && !tr.replacement.trim().is_empty()
                && tr.original != tr.replacement
        })
        .map(|tr| {
            format!(
                "Change the text that says \"{}\" to \"{}\".",
                tr.original, tr.replacement
            )
        })
        .collect();
    if !replacements.is_empty() {
        prompt.push_str(&format!(
            " IMPORTANT: {} Ensure the new text is rendered clearly and integrated naturally.",
            replacements.join(" ")
        ));
    }

    let modifications: Vec<String> = request
        .entity_modifications
        .iter()
        .filter(|em| !em.instruction.trim().is_empty())
        .map(|em| format!("Modify the {}: {}.", em.entity, em.instruction))
        .collect();
    if !modifications.is_empty() {
        prompt.push_str(&format!(" SUBJECT MODIFICATIONS: {}", modifications.join(" ")));
    }

    Ok(prompt)
}
