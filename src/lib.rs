#![forbid(unsafe_code)]

pub mod blur;
pub mod catalog;
pub mod color;
pub mod compose;
pub mod composite;
pub mod drag;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod history;
pub mod mask;
pub mod model;
pub mod remote;
pub mod session;
pub mod sticker;
pub mod studio;
pub mod styles;
pub mod text;

pub use catalog::{ArtStyle, STYLE_CATALOG, StyleDescriptor};
pub use compose::{Compositor, RenderOptions};
pub use error::{PosterError, PosterResult};
pub use fonts::{FontClass, FontLibrary};
pub use history::{HistoryCache, HistoryItem, HistoryStore, JsonHistoryStore};
pub use model::{Adjustments, AspectRatio, Rotation, StickerLayer, TextLayer, TextStyleTag};
pub use remote::{ImageAnalysis, StyleService, TransformRequest};
pub use session::EditSession;
pub use studio::Studio;
