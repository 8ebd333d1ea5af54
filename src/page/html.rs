//! Markup adapter: tracked elements and in-place attribute rewriting.
//!
//! Backed by `lol_html`, a streaming rewriter. Only the attributes that are
//! actually set change; every other byte of the input, including markup the
//! loader does not care about, comes out exactly as it went in.

use lol_html::{HtmlRewriter, Settings, element};
use thiserror::Error;

/// Selector matching every tracked element that carries its tracked attribute.
const TRACKED_SELECTOR: &str = "img[src], link[href], script[src]";

/// Reference-bearing element kinds the loader handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<img src>`
    Image,
    /// `<link href>`
    Link,
    /// `<script src>`
    Script,
}

impl ElementKind {
    /// Tag name of the element.
    #[must_use]
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::Image => "img",
            Self::Link => "link",
            Self::Script => "script",
        }
    }

    /// Attribute holding the reference.
    #[must_use]
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Image | Self::Script => "src",
            Self::Link => "href",
        }
    }

    fn from_tag_name(tag: &str) -> Option<Self> {
        match tag {
            "img" => Some(Self::Image),
            "link" => Some(Self::Link),
            "script" => Some(Self::Script),
            _ => None,
        }
    }
}

/// One tracked attribute as found in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    /// Position among the tracked references, in document order.
    pub ordinal: usize,
    /// Element kind; also determines the attribute name.
    pub kind: ElementKind,
    /// The attribute value as written in the markup.
    pub raw_value: String,
}

impl ResourceReference {
    /// Name of the attribute this reference lives in.
    #[must_use]
    pub fn attribute(&self) -> &'static str {
        self.kind.attribute()
    }
}

/// The markup engine rejected the document or a rewrite.
#[derive(Debug, Error)]
#[error("markup processing failed: {message}")]
pub struct MarkupError {
    message: String,
}

impl MarkupError {
    fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// A page's markup, mutated in place by attribute rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    markup: String,
}

impl Document {
    /// Wraps page markup.
    #[must_use]
    pub fn parse(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// Returns every tracked reference with a non-empty value, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] if the markup cannot be processed.
    pub fn references(&self) -> Result<Vec<ResourceReference>, MarkupError> {
        let mut found = Vec::new();
        self.run(|reference| {
            found.push(reference.clone());
            None
        })?;
        Ok(found)
    }

    /// Returns the tracked references of one element kind, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] if the markup cannot be processed.
    pub fn references_of(&self, kind: ElementKind) -> Result<Vec<ResourceReference>, MarkupError> {
        Ok(self
            .references()?
            .into_iter()
            .filter(|reference| reference.kind == kind)
            .collect())
    }

    /// Visits every tracked reference in document order. When `rewrite`
    /// returns a value, the reference's attribute is set to it.
    ///
    /// Returns the number of attributes rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] if the markup cannot be processed; the
    /// document is left unchanged in that case.
    pub fn rewrite_references<F>(&mut self, rewrite: F) -> Result<usize, MarkupError>
    where
        F: FnMut(&ResourceReference) -> Option<String>,
    {
        let (markup, rewritten) = self.run(rewrite)?;
        if rewritten > 0 {
            self.markup = markup;
        }
        Ok(rewritten)
    }

    /// Serializes the document back to markup.
    #[must_use]
    pub fn serialize(&self) -> &str {
        &self.markup
    }

    /// Consumes the document, returning its markup.
    #[must_use]
    pub fn into_markup(self) -> String {
        self.markup
    }

    fn run<F>(&self, mut visit: F) -> Result<(String, usize), MarkupError>
    where
        F: FnMut(&ResourceReference) -> Option<String>,
    {
        let mut output = Vec::with_capacity(self.markup.len());
        let mut ordinal = 0usize;
        let mut rewritten = 0usize;

        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!(TRACKED_SELECTOR, |el| {
                    let Some(kind) = ElementKind::from_tag_name(&el.tag_name()) else {
                        return Ok(());
                    };
                    let Some(raw_value) = el.get_attribute(kind.attribute()) else {
                        return Ok(());
                    };
                    if raw_value.trim().is_empty() {
                        return Ok(());
                    }

                    let reference = ResourceReference {
                        ordinal,
                        kind,
                        raw_value,
                    };
                    ordinal += 1;

                    if let Some(value) = visit(&reference) {
                        el.set_attribute(kind.attribute(), &value)?;
                        rewritten += 1;
                    }
                    Ok(())
                })],
                ..Settings::default()
            },
            |chunk: &[u8]| output.extend_from_slice(chunk),
        );

        rewriter
            .write(self.markup.as_bytes())
            .map_err(MarkupError::new)?;
        rewriter.end().map_err(MarkupError::new)?;

        let markup = String::from_utf8(output).map_err(MarkupError::new)?;
        Ok((markup, rewritten))
    }
}
