use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The closed set of UI elements the canvas can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Header,
    Button,
    Input,
    Text,
    Image,
    Card,
}

impl ComponentKind {
    /// Palette order.
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Header,
        ComponentKind::Button,
        ComponentKind::Input,
        ComponentKind::Text,
        ComponentKind::Image,
        ComponentKind::Card,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Header => "header",
            ComponentKind::Button => "button",
            ComponentKind::Input => "input",
            ComponentKind::Text => "text",
            ComponentKind::Image => "image",
            ComponentKind::Card => "card",
        }
    }

    pub fn default_size(self) -> Size {
        let (width, height) = match self {
            ComponentKind::Header => (300.0, 60.0),
            ComponentKind::Button => (120.0, 40.0),
            ComponentKind::Input => (200.0, 40.0),
            ComponentKind::Text => (200.0, 30.0),
            ComponentKind::Image => (200.0, 150.0),
            ComponentKind::Card => (250.0, 200.0),
        };
        Size { width, height }
    }

    pub fn default_label(self) -> Option<&'static str> {
        match self {
            ComponentKind::Header => Some("Header"),
            ComponentKind::Button => Some("Button"),
            ComponentKind::Text => Some("Text content"),
            ComponentKind::Card => Some("Card"),
            ComponentKind::Input | ComponentKind::Image => None,
        }
    }

    pub fn default_properties(self) -> Properties {
        let mut props = Properties::new();
        match self {
            ComponentKind::Input => {
                props.insert(Properties::PLACEHOLDER, "Enter text...");
            }
            ComponentKind::Image => {
                props.insert(Properties::SRC, "https://via.placeholder.com/200x150");
                props.insert(Properties::ALT, "Image");
            }
            ComponentKind::Button => {
                props.insert(Properties::VARIANT, "primary");
            }
            ComponentKind::Header | ComponentKind::Text | ComponentKind::Card => {}
        }
        props
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas-relative top-left corner. Coordinates are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.max(0.0),
            y: y.max(0.0),
        }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// False for hand-built positions that skipped the clamp in [`Position::new`].
    pub fn is_valid(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Open key-value bag of per-component settings.
///
/// Keys are not restricted. The constants below are the ones the palette
/// and the prompt builder know about; anything else is passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Hint text shown by an empty `input`.
    pub const PLACEHOLDER: &'static str = "placeholder";
    /// Image source URL.
    pub const SRC: &'static str = "src";
    /// Image alternative text.
    pub const ALT: &'static str = "alt";
    /// Visual style of a button (`primary`, `secondary`, ...).
    pub const VARIANT: &'static str = "variant";
    pub const BACKGROUND: &'static str = "background";
    pub const COLOR: &'static str = "color";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut String)> {
        self.0.iter_mut()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Canonical record of one UI element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Component {
    /// A component of `kind` at `position` with the palette defaults.
    pub fn new(id: impl Into<String>, kind: ComponentKind, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            size: kind.default_size(),
            properties: kind.default_properties(),
            text: kind.default_label().map(str::to_string),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Size { width, height };
        self
    }
}
