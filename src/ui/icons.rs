use std::collections::HashMap;
use std::sync::OnceLock;

/// Something that can draw an event type's icon.
pub trait IconRenderer: Send + Sync {
    fn key(&self) -> &'static str;
    fn glyph(&self) -> &'static str;
}

/// Renders an icon as a fixed terminal glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphIcon {
    key: &'static str,
    glyph: &'static str,
}

impl GlyphIcon {
    pub const fn new(key: &'static str, glyph: &'static str) -> Self {
        Self { key, glyph }
    }
}

impl IconRenderer for GlyphIcon {
    fn key(&self) -> &'static str {
        self.key
    }

    fn glyph(&self) -> &'static str {
        self.glyph
    }
}

pub const DEFAULT_ICON_KEY: &str = "CalendarDays";

const BUILTIN_ICONS: [GlyphIcon; 15] = [
    GlyphIcon::new("Sun", "☀"),
    GlyphIcon::new("Coffee", "☕"),
    GlyphIcon::new("Shield", "⛨"),
    GlyphIcon::new("Heart", "♥"),
    GlyphIcon::new("Star", "★"),
    GlyphIcon::new("Zap", "⚡"),
    GlyphIcon::new("Clock", "◷"),
    GlyphIcon::new("Home", "⌂"),
    GlyphIcon::new("Briefcase", "▣"),
    GlyphIcon::new("Plane", "✈"),
    GlyphIcon::new("Car", "⛟"),
    GlyphIcon::new("Phone", "☎"),
    GlyphIcon::new("Mail", "✉"),
    GlyphIcon::new("Award", "✪"),
    GlyphIcon::new("Gift", "✿"),
];

/// Maps icon keys stored on event types to renderers. Keys without a renderer
/// resolve to the calendar icon.
pub struct IconCatalog {
    icons: HashMap<&'static str, Box<dyn IconRenderer>>,
    order: Vec<&'static str>,
    fallback: Box<dyn IconRenderer>,
}

impl IconCatalog {
    pub fn empty() -> Self {
        Self {
            icons: HashMap::new(),
            order: Vec::new(),
            fallback: Box::new(GlyphIcon::new(DEFAULT_ICON_KEY, "▦")),
        }
    }

    pub fn builtin() -> Self {
        BUILTIN_ICONS
            .iter()
            .fold(Self::empty(), |catalog, icon| catalog.with_icon(Box::new(*icon)))
    }

    pub fn with_icon(mut self, icon: Box<dyn IconRenderer>) -> Self {
        let key = icon.key();
        if self.icons.insert(key, icon).is_none() {
            self.order.push(key);
        }
        self
    }

    pub fn resolve(&self, key: &str) -> &dyn IconRenderer {
        self.icons
            .get(key)
            .map(|icon| icon.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.icons.contains_key(key)
    }

    /// Keys in registration order, for pickers.
    pub fn available_icons(&self) -> &[&'static str] {
        &self.order
    }
}

/// Process-wide catalog of the built-in icons.
pub fn builtin_catalog() -> &'static IconCatalog {
    static CATALOG: OnceLock<IconCatalog> = OnceLock::new();
    CATALOG.get_or_init(IconCatalog::builtin)
}
