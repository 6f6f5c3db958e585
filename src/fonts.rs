use std::collections::HashMap;
use std::path::Path;

use ab_glyph::FontVec;

use crate::error::{PosterError, PosterResult};

/// Coarse font families the typography presets resolve against. Concrete
/// faces come from explicit overrides or a system scan; weight and slant are
/// synthesized at rasterization time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontClass {
    Sans,
    Serif,
    /// CJK kai/regular-script face for the traditional vertical style.
    Kai,
    Cursive,
}

impl FontClass {
    fn query_families(self) -> &'static [fontdb::Family<'static>] {
        match self {
            FontClass::Sans => &[fontdb::Family::SansSerif],
            FontClass::Serif => &[fontdb::Family::Serif, fontdb::Family::SansSerif],
            FontClass::Kai => &[
                fontdb::Family::Name("Kaiti"),
                fontdb::Family::Name("KaiTi"),
                fontdb::Family::Name("Noto Serif CJK SC"),
                fontdb::Family::Serif,
            ],
            FontClass::Cursive => &[fontdb::Family::Cursive, fontdb::Family::SansSerif],
        }
    }

    /// Fallback order when a class has no resolved face.
    fn fallbacks(self) -> &'static [FontClass] {
        match self {
            FontClass::Sans => &[],
            FontClass::Serif => &[FontClass::Sans],
            FontClass::Kai => &[FontClass::Serif, FontClass::Sans],
            FontClass::Cursive => &[FontClass::Sans],
        }
    }

    fn all() -> &'static [FontClass] {
        &[
            FontClass::Sans,
            FontClass::Serif,
            FontClass::Kai,
            FontClass::Cursive,
        ]
    }
}

/// Resolved fonts for the compositor. Built once per process; the compositor
/// borrows faces per text layer.
#[derive(Default)]
pub struct FontLibrary {
    faces: HashMap<FontClass, FontVec>,
}

impl FontLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan system fonts and resolve every class it can. Classes with no
    /// match are left unset and fall back through `fallbacks()` at lookup.
    pub fn from_system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let mut lib = Self::default();
        for &class in FontClass::all() {
            let query = fontdb::Query {
                families: class.query_families(),
                ..fontdb::Query::default()
            };
            let Some(id) = db.query(&query) else {
                tracing::debug!(?class, "no system font matched");
                continue;
            };
            let loaded = db.with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
            });
            if let Some(Some(font)) = loaded {
                lib.faces.insert(class, font);
            }
        }
        lib
    }

    /// Bind a class to an explicit font file, overriding any scanned face.
    pub fn load_override(&mut self, class: FontClass, path: &Path) -> PosterResult<()> {
        let bytes = std::fs::read(path).map_err(|e| {
            PosterError::validation(format!("read font '{}': {e}", path.display()))
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| {
            PosterError::validation(format!("parse font '{}': {e}", path.display()))
        })?;
        self.faces.insert(class, font);
        Ok(())
    }

    pub fn has(&self, class: FontClass) -> bool {
        self.faces.contains_key(&class)
    }

    /// Face for a class, following the class's fallback chain.
    pub fn font_for(&self, class: FontClass) -> PosterResult<&FontVec> {
        if let Some(font) = self.faces.get(&class) {
            return Ok(font);
        }
        for &fb in class.fallbacks() {
            if let Some(font) = self.faces.get(&fb) {
                tracing::debug!(?class, fallback = ?fb, "font class fell back");
                return Ok(font);
            }
        }
        Err(PosterError::validation(format!(
            "no font available for class {class:?}; install a system font or pass an override"
        )))
    }
}
