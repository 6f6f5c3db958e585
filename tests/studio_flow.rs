use std::sync::Mutex;

use posterforge::catalog::ArtStyle;
use posterforge::compose::encode_png;
use posterforge::error::{PosterError, PosterResult};
use posterforge::history::{HISTORY_CAP, HistoryCache, JsonHistoryStore};
use posterforge::remote::{StyleService, TransformRequest};
use posterforge::{FontLibrary, Studio};

/// Service double that generates a differently-shaded image per call.
struct CountingService {
    calls: Mutex<u8>,
}

impl CountingService {
    fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }
}

impl StyleService for CountingService {
    fn detect_text(&self, _png: &[u8]) -> PosterResult<Vec<String>> {
        Ok(vec!["夏日特惠".into()])
    }

    fn detect_entities(&self, _png: &[u8]) -> PosterResult<Vec<String>> {
        Ok(vec!["Person".into(), "Building".into()])
    }

    fn transform(&self, _png: &[u8], prompt: &str) -> PosterResult<Vec<u8>> {
        if prompt.is_empty() {
            return Err(PosterError::remote("empty prompt"));
        }
        let mut calls = self.calls.lock().map_err(|_| PosterError::remote("lock"))?;
        *calls += 1;
        let shade = *calls * 10;
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([shade, shade, shade, 255]));
        encode_png(&img)
    }
}

fn sample_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(6, 6, image::Rgba([200, 100, 50, 255]));
    encode_png(&img).unwrap()
}

fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn repeated_transforms_evict_the_oldest_generations() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let fonts = FontLibrary::empty();
    let svc = CountingService::new();
    let store = JsonHistoryStore::new(dir.path().join("history.json"));
    let mut studio = Studio::new(&svc, &fonts, HistoryCache::load(store));

    studio.load_image(sample_png()).unwrap();
    let styles = [
        ArtStyle::Renaissance,
        ArtStyle::Watercolor,
        ArtStyle::Chinese,
        ArtStyle::Comic,
        ArtStyle::Photography,
        ArtStyle::Cyberpunk,
        ArtStyle::Anime,
    ];
    for style in styles {
        studio.transform(style, &TransformRequest::default()).unwrap();
    }

    let items = studio.history().items();
    assert_eq!(items.len(), HISTORY_CAP);
    // Most recent first; the first two generations fell off the tail.
    assert_eq!(items[0].style, ArtStyle::Anime);
    assert_eq!(items[HISTORY_CAP - 1].style, ArtStyle::Chinese);
    assert!(items.windows(2).all(|w| w[0].created_ms >= w[1].created_ms));
}

#[test]
fn history_persists_across_studio_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    let fonts = FontLibrary::empty();
    let svc = CountingService::new();

    let generated;
    {
        let mut studio = Studio::new(
            &svc,
            &fonts,
            HistoryCache::load(JsonHistoryStore::new(&path)),
        );
        studio.load_image(sample_png()).unwrap();
        generated = studio
            .transform(ArtStyle::Manga, &TransformRequest::default())
            .unwrap();
        studio.history_mut().mark_onboarding_seen();
    }

    let mut studio = Studio::new(
        &svc,
        &fonts,
        HistoryCache::load(JsonHistoryStore::new(&path)),
    );
    assert!(studio.history().onboarding_seen());
    let items = studio.history().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].png, generated);

    let id = items[0].id.clone();
    assert!(studio.restore_from_history(&id));
    assert_eq!(studio.image().unwrap(), generated.as_slice());
}

#[test]
fn analysis_feeds_the_prompt_builder() {
    let dir = tempfile::tempdir().unwrap();
    let fonts = FontLibrary::empty();
    let svc = CountingService::new();
    let store = JsonHistoryStore::new(dir.path().join("history.json"));
    let mut studio = Studio::new(&svc, &fonts, HistoryCache::load(store));

    studio.load_image(sample_png()).unwrap();
    assert_eq!(studio.analysis().texts, vec!["夏日特惠"]);
    assert_eq!(studio.analysis().entities, vec!["Person", "Building"]);

    // Use a detected text and entity in a transformation request.
    let request = TransformRequest {
        text_replacements: vec![posterforge::remote::TextReplacement {
            original: studio.analysis().texts[0].clone(),
            replacement: "年末清仓".into(),
        }],
        entity_modifications: vec![posterforge::remote::EntityModification {
            entity: studio.analysis().entities[0].clone(),
            instruction: "add sunglasses".into(),
        }],
        ..TransformRequest::default()
    };
    let prompt = posterforge::remote::build_prompt(ArtStyle::Photography, &request).unwrap();
    assert!(prompt.contains("Change the text that says \"夏日特惠\" to \"年末清仓\"."));
    assert!(prompt.contains("Modify the Person: add sunglasses."));

    studio.transform(ArtStyle::Photography, &request).unwrap();
    assert_eq!(studio.history().items()[0].style, ArtStyle::Photography);
}
