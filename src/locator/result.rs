//! Lookup results
//!
//! Views into the located document. Nothing is copied out of the arena until
//! a caller asks for owned text.

use std::borrow::Cow;
use std::fmt;

use crate::dom::serialize::serialize_node;
use crate::dom::{DocumentAccess, NodeId, XmlDocument};
use crate::path::{Selection, SelectionIter, Target};

/// A located element.
pub struct ElementRef<'a, D: ?Sized = XmlDocument> {
    doc: &'a D,
    id: NodeId,
}

impl<'a, D: DocumentAccess + ?Sized> ElementRef<'a, D> {
    pub(crate) fn new(doc: &'a D, id: NodeId) -> Self {
        ElementRef { doc, id }
    }

    /// Arena id of the element
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Name as written in the document, including its prefix
    pub fn name(&self) -> &'a str {
        self.doc.node_name(self.id).unwrap_or("")
    }

    pub fn local_name(&self) -> &'a str {
        self.doc.node_local_name(self.id).unwrap_or("")
    }

    pub fn namespace_uri(&self) -> Option<&'a str> {
        self.doc.namespace_uri(self.id)
    }

    /// Concatenated character data of the element and its descendants
    pub fn text(&self) -> String {
        self.doc.string_value(self.id)
    }

    /// Value of an attribute, by name as written
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.doc.get_attribute(self.id, name)
    }

    /// All attributes as (name, value) pairs, namespace declarations included
    pub fn attributes(&self) -> Vec<(&'a str, &'a str)> {
        self.doc.get_attribute_values(self.id)
    }

    /// The element re-rendered as markup
    pub fn outer_xml(&self) -> String {
        serialize_node(self.doc, self.id)
    }
}

impl<D: ?Sized> Clone for ElementRef<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for ElementRef<'_, D> {}

impl<D: ?Sized> PartialEq for ElementRef<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl<D: ?Sized> Eq for ElementRef<'_, D> {}

impl<D: DocumentAccess + ?Sized> fmt::Debug for ElementRef<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("namespace", &self.namespace_uri())
            .finish()
    }
}

/// A located attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRef<'a> {
    /// Arena id of the owning element
    pub element: NodeId,
    pub name: &'a str,
    pub value: &'a str,
}

/// Result of a generic lookup: the element or attribute a path targets.
pub enum Match<'a, D: ?Sized = XmlDocument> {
    Element(ElementRef<'a, D>),
    Attribute(AttributeRef<'a>),
}

impl<'a, D: DocumentAccess + ?Sized> Match<'a, D> {
    /// Element text, or the attribute value
    pub fn text(&self) -> Cow<'a, str> {
        match self {
            Match::Element(element) => Cow::Owned(element.text()),
            Match::Attribute(attr) => Cow::Borrowed(attr.value),
        }
    }

    pub fn as_element(&self) -> Option<ElementRef<'a, D>> {
        match self {
            Match::Element(element) => Some(*element),
            Match::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<AttributeRef<'a>> {
        match self {
            Match::Attribute(attr) => Some(*attr),
            Match::Element(_) => None,
        }
    }
}

impl<D: ?Sized> Clone for Match<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for Match<'_, D> {}

impl<D: ?Sized> PartialEq for Match<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Match::Element(a), Match::Element(b)) => a == b,
            (Match::Attribute(a), Match::Attribute(b)) => a == b,
            _ => false,
        }
    }
}

impl<D: DocumentAccess + ?Sized> fmt::Debug for Match<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Match::Element(element) => f.debug_tuple("Element").field(element).finish(),
            Match::Attribute(attr) => f.debug_tuple("Attribute").field(attr).finish(),
        }
    }
}

/// Elements matched by a repeatable field.
///
/// Evaluation is lazy and restartable: each [`Elements::iter`] walks the
/// document again, in document order.
pub struct Elements<'a, D: ?Sized = XmlDocument> {
    selection: Selection<'a, D>,
}

impl<'a, D: DocumentAccess + ?Sized> Elements<'a, D> {
    pub(crate) fn new(selection: Selection<'a, D>) -> Self {
        Elements { selection }
    }

    pub fn iter(&self) -> ElementsIter<'_, 'a, D> {
        ElementsIter {
            doc: self.selection.doc(),
            inner: self.selection.iter(),
        }
    }

    pub fn first(&self) -> Option<ElementRef<'a, D>> {
        self.iter().next()
    }

    /// Number of matches; walks the document
    pub fn len(&self) -> usize {
        self.selection.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.first().is_none()
    }
}

impl<'s, 'a, D: DocumentAccess + ?Sized> IntoIterator for &'s Elements<'a, D> {
    type Item = ElementRef<'a, D>;
    type IntoIter = ElementsIter<'s, 'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, D: DocumentAccess + ?Sized> IntoIterator for Elements<'a, D> {
    type Item = ElementRef<'a, D>;
    type IntoIter = ElementsIter<'a, 'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        ElementsIter {
            doc: self.selection.doc(),
            inner: self.selection.into_iter(),
        }
    }
}

impl<D: DocumentAccess + ?Sized> fmt::Debug for Elements<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over [`Elements`].
pub struct ElementsIter<'s, 'a, D: ?Sized> {
    doc: &'a D,
    inner: SelectionIter<'s, D>,
}

impl<D: ?Sized> Clone for ElementsIter<'_, '_, D> {
    fn clone(&self) -> Self {
        ElementsIter {
            doc: self.doc,
            inner: self.inner.clone(),
        }
    }
}

impl<'a, D: DocumentAccess + ?Sized> Iterator for ElementsIter<'_, 'a, D> {
    type Item = ElementRef<'a, D>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|id| ElementRef::new(self.doc, id))
    }
}

/// All matches of a field, element or attribute alike.
pub struct Matches<'a, D: ?Sized = XmlDocument> {
    elements: Elements<'a, D>,
    target: Target,
}

impl<'a, D: DocumentAccess + ?Sized> Matches<'a, D> {
    pub(crate) fn new(elements: Elements<'a, D>, target: Target) -> Self {
        Matches { elements, target }
    }

    pub fn iter(&self) -> impl Iterator<Item = Match<'a, D>> + '_ {
        let target = self.target;
        self.elements
            .iter()
            .filter_map(move |element| project(element, target))
    }

    pub fn first(&self) -> Option<Match<'a, D>> {
        self.iter().next()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

impl<D: DocumentAccess + ?Sized> fmt::Debug for Matches<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Apply a path's target to an element reached by its steps
pub(crate) fn project<'a, D: DocumentAccess + ?Sized>(
    element: ElementRef<'a, D>,
    target: Target,
) -> Option<Match<'a, D>> {
    match target {
        Target::Element => Some(Match::Element(element)),
        Target::Attribute(name) => element.attribute(name).map(|value| {
            Match::Attribute(AttributeRef {
                element: element.id(),
                name,
                value,
            })
        }),
    }
}
