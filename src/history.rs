use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::catalog::ArtStyle;
use crate::error::{PosterError, PosterResult};

/// How many generations are kept. Older entries are evicted from the tail.
pub const HISTORY_CAP: usize = 5;

/// One remembered generation: the finished poster bytes and the style that
/// produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: String,
    pub png: Vec<u8>,
    pub style: ArtStyle,
    pub created_ms: u64,
}

/// Everything the cache persists. The onboarding flag rides along under its
/// own field so clearing history does not re-trigger onboarding.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub items: Vec<StoredItem>,
    #[serde(default)]
    pub onboarding_seen: bool,
}

/// Serialized form of a history item; image bytes travel base64-encoded.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredItem {
    pub id: String,
    pub image_b64: String,
    pub style: ArtStyle,
    pub created_ms: u64,
}

impl StoredItem {
    fn from_item(item: &HistoryItem) -> Self {
        Self {
            id: item.id.clone(),
            image_b64: BASE64.encode(&item.png),
            style: item.style,
            created_ms: item.created_ms,
        }
    }

    fn into_item(self) -> PosterResult<HistoryItem> {
        let png = BASE64
            .decode(&self.image_b64)
            .map_err(|e| PosterError::persistence(format!("decode history image: {e}")))?;
        Ok(HistoryItem {
            id: self.id,
            png,
            style: self.style,
            created_ms: self.created_ms,
        })
    }
}

/// Persistence seam for the history cache. Injected so the cache logic tests
/// without touching the filesystem.
pub trait HistoryStore {
    fn load(&self) -> PosterResult<StoredState>;
    fn save(&self, state: &StoredState) -> PosterResult<()>;
}

/// JSON-file-backed store. A missing file is an empty state, not an error.
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> PosterResult<StoredState> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredState::default());
            }
            Err(e) => {
                return Err(PosterError::persistence(format!(
                    "read '{}': {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            PosterError::persistence(format!("parse '{}': {e}", self.path.display()))
        })
    }

    fn save(&self, state: &StoredState) -> PosterResult<()> {
        let json = serde_json::to_vec(state)
            .map_err(|e| PosterError::persistence(format!("serialize history: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| {
            PosterError::persistence(format!("write '{}': {e}", self.path.display()))
        })
    }
}

/// In-memory, most-recent-first cache of the last few generations. Storage
/// failures are logged and swallowed: persistence must never break editing.
pub struct HistoryCache<S: HistoryStore> {
    items: Vec<HistoryItem>,
    onboarding_seen: bool,
    store: S,
}

impl<S: HistoryStore> HistoryCache<S> {
    /// Load persisted state through the store. Unreadable state starts the
    /// cache empty instead of failing.
    pub fn load(store: S) -> Self {
        let state = match store.load() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "history load failed; starting empty");
                StoredState::default()
            }
        };
        let mut items = Vec::new();
        for stored in state.items {
            match stored.into_item() {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!(error = %e, "dropping corrupt history item"),
            }
        }
        items.truncate(HISTORY_CAP);
        Self {
            items,
            onboarding_seen: state.onboarding_seen,
            store,
        }
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Remember a new generation at the front, evicting beyond the cap, and
    /// persist. Returns the new item's id.
    pub fn record(&mut self, png: Vec<u8>, style: ArtStyle) -> String {
        let item = HistoryItem {
            id: uuid::Uuid::new_v4().to_string(),
            png,
            style,
            created_ms: now_ms(),
        };
        let id = item.id.clone();
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAP);
        self.persist();
        id
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    pub fn onboarding_seen(&self) -> bool {
        self.onboarding_seen
    }

    pub fn mark_onboarding_seen(&mut self) {
        if self.onboarding_seen {
            return;
        }
        self.onboarding_seen = true;
        self.persist();
    }

    fn persist(&self) {
        let state = StoredState {
            items: self.items.iter().map(StoredItem::from_item).collect(),
            onboarding_seen: self.onboarding_seen,
        };
        if let Err(e) = self.store.save(&state) {
            tracing::warn!(error = %e, "history save failed");
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
