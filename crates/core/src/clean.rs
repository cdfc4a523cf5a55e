//! The cleaning pipeline that turns raw markup into plain text.
//!
//! Cleaning is an ordered list of [`Stage`]s. The default order matters:
//! non-content elements go first so nothing inside a `<style>` or `<script>`
//! block leaks out, comments go before generic tags so tag-like text inside
//! a comment is not mistaken for markup, and entity references are removed
//! last because that pass does not care about tags.
//!
//! The pipeline never trims its output; blank lines left behind by removed
//! blocks are part of the result.

use crate::entities::strip_entities;
use crate::strip::{strip_comments, strip_element, strip_tags};

/// One text-rewriting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Remove every element with this tag name, content included.
    RemoveElement(String),
    /// Remove `<!-- ... -->` comments.
    RemoveComments,
    /// Remove all remaining tags, keeping their text.
    StripTags,
    /// Remove HTML character references.
    StripEntities,
}

impl Stage {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::RemoveElement(name) => strip_element(text, name),
            Self::RemoveComments => strip_comments(text),
            Self::StripTags => strip_tags(text),
            Self::StripEntities => strip_entities(text),
        }
    }
}

/// Ordered stages applied by [`clean_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanConfig {
    pub stages: Vec<Stage>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            stages: vec![
                Stage::RemoveElement("style".to_string()),
                Stage::RemoveElement("script".to_string()),
                Stage::RemoveComments,
                Stage::StripTags,
                Stage::StripEntities,
            ],
        }
    }
}

impl CleanConfig {
    /// Creates a new builder starting from the default stages.
    ///
    /// # Example
    ///
    /// ```rust
    /// use htmlstrip_core::{CleanConfig, clean_html};
    ///
    /// let config = CleanConfig::builder().remove_element("noscript").build();
    /// let text = clean_html("a<noscript>Enable JS</noscript>b", &config);
    /// assert_eq!(text, "a b");
    /// ```
    pub fn builder() -> CleanConfigBuilder {
        CleanConfigBuilder::new()
    }
}

/// Builder for CleanConfig.
///
/// Extra elements are removed after `style` and `script` and before
/// comments; the relative order of the remaining stages is fixed.
#[derive(Debug, Clone)]
pub struct CleanConfigBuilder {
    elements: Vec<String>,
    decode_entities: bool,
}

impl CleanConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { elements: vec!["style".to_string(), "script".to_string()], decode_entities: true }
    }

    /// Also remove elements named `name`. Repeated names are ignored.
    pub fn remove_element(mut self, name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        if !name.is_empty() && !self.elements.contains(&name) {
            self.elements.push(name);
        }
        self
    }

    /// Whether to remove entity references (default: true).
    pub fn decode_entities(mut self, value: bool) -> Self {
        self.decode_entities = value;
        self
    }

    /// Builds the CleanConfig.
    pub fn build(self) -> CleanConfig {
        let mut stages: Vec<Stage> = self.elements.into_iter().map(Stage::RemoveElement).collect();
        stages.push(Stage::RemoveComments);
        stages.push(Stage::StripTags);
        if self.decode_entities {
            stages.push(Stage::StripEntities);
        }
        CleanConfig { stages }
    }
}

impl Default for CleanConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Run every stage of `config` over `html`, in order.
pub fn clean_html(html: &str, config: &CleanConfig) -> String {
    config
        .stages
        .iter()
        .fold(html.to_string(), |text, stage| stage.apply(&text))
}

/// Reduce raw markup to plain text with the default pipeline.
///
/// # Example
///
/// ```rust
/// use htmlstrip_core::strip_html;
///
/// assert_eq!(strip_html("<b>hello</p>&amp;<script>potato</script>world"), "hello world");
/// ```
pub fn strip_html(html: &str) -> String {
    clean_html(html, &CleanConfig::default())
}
