//! Source units.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// What a source unit contains, which guides how a provider parses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceKind {
    /// A whole file.
    #[default]
    File,
    /// A sequence of statements.
    Statements,
    /// A single expression.
    Expression,
    /// Code typed at an interactive prompt.
    Interactive,
}

/// One immutable unit of input code plus its identity.
///
/// Cloning is cheap; the text is shared.
///
/// # Example
///
/// ```
/// use mosaic_core::SourceUnit;
///
/// let unit = SourceUnit::new("/lib/a.scm", "(define x 1)");
/// assert_eq!(unit.extension(), Some("scm"));
/// assert!(unit.language().is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SourceUnit {
    id: Arc<str>,
    text: Arc<str>,
    language: Option<Arc<str>>,
    kind: SourceKind,
}

impl SourceUnit {
    /// A file-kind unit with no explicit language tag.
    ///
    /// The compiler falls back to the id's file extension to find the language.
    pub fn new(id: impl AsRef<str>, text: impl AsRef<str>) -> Self {
        Self {
            id: Arc::from(id.as_ref()),
            text: Arc::from(text.as_ref()),
            language: None,
            kind: SourceKind::File,
        }
    }

    /// Tag the unit with the identifier of its owning language.
    pub fn with_language(mut self, language: impl AsRef<str>) -> Self {
        self.language = Some(Arc::from(language.as_ref()));
        self
    }

    /// Set the unit's kind.
    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Read a file from disk. The path becomes the unit's identity.
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_string_lossy(), text))
    }

    /// The code identity (usually a path).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Explicit language tag, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// File extension of the identity, without the dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&*self.id).extension().and_then(|ext| ext.to_str())
    }

    /// Number of lines in the text.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

impl fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUnit")
            .field("id", &self.id)
            .field("language", &self.language)
            .field("kind", &self.kind)
            .field("len", &self.text.len())
            .finish()
    }
}
