use serde::{Deserialize, Serialize};
use std::fmt;

pub const HTML_PLACEHOLDER: &str = "<!-- Generated HTML will appear here -->";
pub const CSS_PLACEHOLDER: &str = "/* Generated CSS will appear here */";
pub const JAVASCRIPT_PLACEHOLDER: &str = "// Generated JavaScript will appear here";

/// One of the three code outputs. Also used as the active editor tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    #[default]
    Html,
    Css,
    Javascript,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Html, ArtifactKind::Css, ArtifactKind::Javascript];

    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Html => "HTML",
            ArtifactKind::Css => "CSS",
            ArtifactKind::Javascript => "JavaScript",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            ArtifactKind::Html => "html",
            ArtifactKind::Css => "css",
            ArtifactKind::Javascript => "js",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ArtifactKind::Html => HTML_PLACEHOLDER,
            ArtifactKind::Css => CSS_PLACEHOLDER,
            ArtifactKind::Javascript => JAVASCRIPT_PLACEHOLDER,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The markup/style/behavior triple. All three are always present.
///
/// An empty string means "nothing for this artifact", never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifacts {
    pub html: String,
    pub css: String,
    pub javascript: String,
}

impl Default for GeneratedArtifacts {
    fn default() -> Self {
        Self::placeholders()
    }
}

impl GeneratedArtifacts {
    pub fn new(
        html: impl Into<String>,
        css: impl Into<String>,
        javascript: impl Into<String>,
    ) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            javascript: javascript.into(),
        }
    }

    pub fn placeholders() -> Self {
        Self::new(HTML_PLACEHOLDER, CSS_PLACEHOLDER, JAVASCRIPT_PLACEHOLDER)
    }

    pub fn get(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Html => &self.html,
            ArtifactKind::Css => &self.css,
            ArtifactKind::Javascript => &self.javascript,
        }
    }

    pub fn get_mut(&mut self, kind: ArtifactKind) -> &mut String {
        match kind {
            ArtifactKind::Html => &mut self.html,
            ArtifactKind::Css => &mut self.css,
            ArtifactKind::Javascript => &mut self.javascript,
        }
    }

    pub fn set(&mut self, kind: ArtifactKind, text: impl Into<String>) {
        *self.get_mut(kind) = text.into();
    }

    /// True while `kind` still holds its untouched placeholder.
    pub fn is_placeholder(&self, kind: ArtifactKind) -> bool {
        self.get(kind) == kind.placeholder()
    }

    pub fn is_generated(&self) -> bool {
        !self.is_placeholder(ArtifactKind::Html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_placeholders() {
        let a = GeneratedArtifacts::default();
        for kind in ArtifactKind::ALL {
            assert!(a.is_placeholder(kind));
        }
        assert!(!a.is_generated());
    }

    #[test]
    fn test_set_replaces_single_artifact() {
        let mut a = GeneratedArtifacts::default();
        a.set(ArtifactKind::Css, "p{margin:0}");
        assert_eq!(a.css, "p{margin:0}");
        assert!(a.is_placeholder(ArtifactKind::Html));
        assert!(!a.is_placeholder(ArtifactKind::Css));
    }
}
