//! Page snapshot model consumed by the field classifier.
//!
//! A snapshot is a flat list of elements in document scan order. Parent
//! links are handles rather than nested nodes, so a snapshot can be
//! captured incrementally and may contain nodes that were detached while
//! the capture was running.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Opaque reference to an element of the captured page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub u64);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rendered size of an element in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the element occupies any area on screen.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// The subset of computed style the classifier looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline-block".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
        }
    }
}

/// A single captured element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub handle: ElementHandle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementHandle>,

    /// Lower-case tag name.
    pub tag: String,

    /// Attributes keyed by lower-case name.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Current value for form controls.
    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub rect: Rect,

    #[serde(default)]
    pub style: ComputedStyle,

    /// False once the node has been removed from the document.
    #[serde(default = "default_connected")]
    pub connected: bool,
}

fn default_connected() -> bool {
    true
}

/// Input types that accept free-form text entry.
const TEXT_CAPABLE_TYPES: &[&str] = &["text", "tel", "number", "password"];

impl ElementSnapshot {
    /// Create a visible, empty element with the given tag.
    pub fn new(handle: u64, tag: impl Into<String>) -> Self {
        Self {
            handle: ElementHandle(handle),
            parent: None,
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            value: String::new(),
            rect: Rect::new(120.0, 32.0),
            style: ComputedStyle::default(),
            connected: true,
        }
    }

    /// Set the parent handle.
    pub fn with_parent(mut self, parent: u64) -> Self {
        self.parent = Some(ElementHandle(parent));
        self
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set the rendered size.
    pub fn with_rect(mut self, width: f64, height: f64) -> Self {
        self.rect = Rect::new(width, height);
        self
    }

    /// Set the computed style.
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the current value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Look up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether a boolean attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn is_input(&self) -> bool {
        self.tag == "input"
    }

    /// Declared input type in lower case, `None` for untyped inputs.
    pub fn input_type(&self) -> Option<String> {
        self.attr("type")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_ascii_lowercase)
    }

    /// An input that accepts typed text (text, tel, number, password or untyped).
    pub fn is_text_capable(&self) -> bool {
        self.is_input()
            && self
                .input_type()
                .is_none_or(|t| TEXT_CAPABLE_TYPES.contains(&t.as_str()))
    }

    /// Declared `maxlength`; absent, negative, or unparsable values yield `None`.
    pub fn max_length(&self) -> Option<u32> {
        parse_dimension(self.attr("maxlength"))
    }

    /// Declared `size` attribute.
    pub fn size(&self) -> Option<u32> {
        parse_dimension(self.attr("size"))
    }
}

fn parse_dimension(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
}

/// A captured page: its elements in document order plus its visible text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub elements: Vec<ElementSnapshot>,

    /// Rendered text of the page body.
    #[serde(default)]
    pub visible_text: String,
}

impl PageSnapshot {
    pub fn new(elements: Vec<ElementSnapshot>) -> Self {
        Self {
            elements,
            visible_text: String::new(),
        }
    }

    /// Set the visible page text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.visible_text = text.into();
        self
    }

    /// Decode a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    /// Check that every handle is unique.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element.handle) {
                return Err(SnapshotError::DuplicateHandle(element.handle));
            }
        }
        Ok(())
    }

    /// Elements still attached to the document, in scan order.
    ///
    /// A node counts as detached when it is flagged disconnected or when its
    /// parent handle no longer appears in the snapshot.
    pub fn attached(&self) -> impl Iterator<Item = &ElementSnapshot> {
        let known: HashSet<ElementHandle> = self.elements.iter().map(|e| e.handle).collect();
        self.elements.iter().filter(move |e| {
            e.connected && e.parent.is_none_or(|parent| known.contains(&parent))
        })
    }
}
