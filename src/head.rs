//! The document head as an injected capability
//!
//! The reconciler never holds on to element handles between passes. It
//! describes the element it wants with a [`HeadElementRef`] and asks the
//! [`Head`] to look it up again every time, so elements added or removed
//! by other code are picked up instead of conflicting.

use std::fmt;

/// Element kinds the reconciler manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Meta,
    Link,
    Script,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Meta => "meta",
            Tag::Link => "link",
            Tag::Script => "script",
        }
    }
}

/// Opaque identifier of a live head element
///
/// Only valid until the next mutation of the head; never stored across
/// reconciliation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Where a new element goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Last,
}

/// Lazily resolved reference to a head element
///
/// Matches elements of `tag` carrying `attribute`, and if `value` is set,
/// only those whose attribute equals it (`meta[name="description"]`,
/// `meta[charset]`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadElementRef {
    pub tag: Tag,
    pub attribute: String,
    pub value: Option<String>,
}

impl HeadElementRef {
    /// `meta[{attribute}="{value}"]`
    pub fn meta(attribute: &str, value: &str) -> Self {
        Self {
            tag: Tag::Meta,
            attribute: attribute.to_string(),
            value: Some(value.to_string()),
        }
    }

    /// `meta[charset]`
    pub fn charset() -> Self {
        Self {
            tag: Tag::Meta,
            attribute: "charset".to_string(),
            value: None,
        }
    }

    /// `link[rel="{rel}"]`
    pub fn link(rel: &str) -> Self {
        Self {
            tag: Tag::Link,
            attribute: "rel".to_string(),
            value: Some(rel.to_string()),
        }
    }

    /// `script[type="application/ld+json"]`
    pub fn json_ld() -> Self {
        Self {
            tag: Tag::Script,
            attribute: "type".to_string(),
            value: Some(crate::vocab::JSON_LD_TYPE.to_string()),
        }
    }

    /// Whether an element with this tag and attribute list matches
    pub fn matches(&self, tag: Tag, attributes: &[(String, String)]) -> bool {
        tag == self.tag
            && attributes.iter().any(|(name, value)| {
                name == &self.attribute && self.value.as_ref().map_or(true, |v| v == value)
            })
    }

    /// Resolve against the live head, first match in document order
    pub fn resolve<H: Head + ?Sized>(&self, head: &H) -> Option<NodeId> {
        head.query_all(self).into_iter().next()
    }
}

impl fmt::Display for HeadElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}[{}=\"{}\"]", self.tag.as_str(), self.attribute, v),
            None => write!(f, "{}[{}]", self.tag.as_str(), self.attribute),
        }
    }
}

/// Mutable access to a document head
///
/// Implemented over a real DOM by the host, and by [`MemoryHead`] for
/// tests and server-side use.
pub trait Head {
    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &HeadElementRef) -> Vec<NodeId>;

    /// Create an element with the given attributes
    fn create(&mut self, tag: Tag, attributes: &[(&str, &str)], position: Position) -> NodeId;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn set_text(&mut self, node: NodeId, text: &str);

    fn remove(&mut self, node: NodeId);

    /// Set the document title
    fn set_title(&mut self, title: &str);

    /// Set the `lang` attribute of the root `<html>` element
    fn set_lang(&mut self, lang: &str);
}

/// A head element held by [`MemoryHead`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadElement {
    pub id: NodeId,
    pub tag: Tag,
    pub attributes: Vec<(String, String)>,
    pub text: String,
}

impl HeadElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// In-memory head surrogate that counts every write
#[derive(Debug, Default)]
pub struct MemoryHead {
    elements: Vec<HeadElement>,
    title: Option<String>,
    lang: Option<String>,
    next_id: u64,
    mutations: usize,
}

impl MemoryHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[HeadElement] {
        &self.elements
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Number of writes performed so far
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    pub fn find(&self, selector: &HeadElementRef) -> Option<&HeadElement> {
        self.find_all(selector).into_iter().next()
    }

    pub fn find_all(&self, selector: &HeadElementRef) -> Vec<&HeadElement> {
        self.elements
            .iter()
            .filter(|e| selector.matches(e.tag, &e.attributes))
            .collect()
    }

    /// `content` of the first `meta[{attribute}="{value}"]`
    pub fn meta_content(&self, attribute: &str, value: &str) -> Option<&str> {
        self.find(&HeadElementRef::meta(attribute, value))
            .and_then(|e| e.attribute("content"))
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut HeadElement> {
        self.elements.iter_mut().find(|e| e.id == node)
    }
}

impl Head for MemoryHead {
    fn query_all(&self, selector: &HeadElementRef) -> Vec<NodeId> {
        self.find_all(selector).into_iter().map(|e| e.id).collect()
    }

    fn create(&mut self, tag: Tag, attributes: &[(&str, &str)], position: Position) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.mutations += 1;

        let element = HeadElement {
            id,
            tag,
            attributes: attributes
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            text: String::new(),
        };
        match position {
            Position::First => self.elements.insert(0, element),
            Position::Last => self.elements.push(element),
        }
        id
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.mutations += 1;
        if let Some(element) = self.element_mut(node) {
            match element.attributes.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => *v = value.to_string(),
                None => element
                    .attributes
                    .push((name.to_string(), value.to_string())),
            }
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.mutations += 1;
        if let Some(element) = self.element_mut(node) {
            element.text = text.to_string();
        }
    }

    fn remove(&mut self, node: NodeId) {
        self.mutations += 1;
        self.elements.retain(|e| e.id != node);
    }

    fn set_title(&mut self, title: &str) {
        self.mutations += 1;
        self.title = Some(title.to_string());
    }

    fn set_lang(&mut self, lang: &str) {
        self.mutations += 1;
        self.lang = Some(lang.to_string());
    }
}
