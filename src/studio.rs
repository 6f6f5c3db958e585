use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog::ArtStyle;
use crate::compose::{Compositor, RenderOptions};
use crate::error::{PosterError, PosterResult};
use crate::fonts::FontLibrary;
use crate::history::{HistoryCache, HistoryStore};
use crate::remote::{self, ImageAnalysis, StyleService, TransformRequest};
use crate::session::EditSession;

/// Ties the whole editor together: the working image, the edit session, the
/// remote style service, and the generation history.
pub struct Studio<'a, H: HistoryStore> {
    service: &'a dyn StyleService,
    fonts: &'a FontLibrary,
    options: RenderOptions,
    history: HistoryCache<H>,
    session: EditSession,
    image: Option<Vec<u8>>,
    analysis: ImageAnalysis,
    transforming: bool,
}

impl<'a, H: HistoryStore> Studio<'a, H> {
    pub fn new(
        service: &'a dyn StyleService,
        fonts: &'a FontLibrary,
        history: HistoryCache<H>,
    ) -> Self {
        Self {
            service,
            fonts,
            options: RenderOptions::default(),
            history,
            session: EditSession::new(),
            image: None,
            analysis: ImageAnalysis::default(),
            transforming: false,
        }
    }

    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    pub fn history(&self) -> &HistoryCache<H> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryCache<H> {
        &mut self.history
    }

    pub fn analysis(&self) -> &ImageAnalysis {
        &self.analysis
    }

    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }

    /// Load a new source image. Resets the edit session and re-runs the
    /// detection passes on the fresh image.
    pub fn load_image(&mut self, bytes: Vec<u8>) -> PosterResult<()> {
        // Reject undecodable bytes up front rather than at first render.
        crate::compose::decode(&bytes)?;
        self.image = Some(bytes);
        self.session.clear();
        self.refresh_analysis();
        Ok(())
    }

    /// Render the current image with the session's adjustments, without
    /// changing any state. This is the preview path.
    pub fn render_preview(&self) -> PosterResult<Vec<u8>> {
        let image = self.require_image()?;
        let compositor = Compositor::with_options(self.fonts, self.options);
        compositor.render(image, self.session.adjustments())
    }

    /// Bake the session's adjustments into the working image. The flattened
    /// result becomes the new source; the session resets and the image is
    /// re-analyzed, since baked-in text changes what detection sees.
    pub fn apply_edits(&mut self) -> PosterResult<Vec<u8>> {
        let image = self.require_image()?;
        let compositor = Compositor::with_options(self.fonts, self.options);
        let flattened = compositor.render(image, self.session.adjustments())?;
        self.image = Some(flattened.clone());
        self.session.clear();
        self.refresh_analysis();
        Ok(flattened)
    }

    /// Send the working image through the remote style transformation. On
    /// success the result replaces the working image and is recorded in
    /// history. A transformation already in flight rejects the new request
    /// instead of queueing it.
    pub fn transform(
        &mut self,
        style: ArtStyle,
        request: &TransformRequest,
    ) -> PosterResult<Vec<u8>> {
        if self.transforming {
            return Err(PosterError::input("a transformation is already running"));
        }
        let image = self.require_image()?.to_vec();
        let prompt = remote::build_prompt(style, request)?;

        self.transforming = true;
        let result = self.service.transform(&image, &prompt);
        self.transforming = false;

        let generated = result?;
        tracing::info!(?style, bytes = generated.len(), "style transformation done");
        self.image = Some(generated.clone());
        self.session.clear();
        self.refresh_analysis();
        self.history.record(generated.clone(), style);
        Ok(generated)
    }

    /// Bring a past generation back as the working image.
    pub fn restore_from_history(&mut self, id: &str) -> bool {
        let Some(item) = self.history.get(id) else {
            return false;
        };
        self.image = Some(item.png.clone());
        self.session.clear();
        self.refresh_analysis();
        true
    }

    fn require_image(&self) -> PosterResult<&[u8]> {
        self.image
            .as_deref()
            .ok_or_else(|| PosterError::input("load an image first"))
    }

    fn refresh_analysis(&mut self) {
        match &self.image {
            Some(image) => self.analysis = remote::analyze(self.service, image),
            None => self.analysis = ImageAnalysis::default(),
        }
    }
}

/// Timestamped download name for an exported poster.
pub fn export_name() -> String {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("ai-poster-{ms}.png")
}
