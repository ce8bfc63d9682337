//! Location path evaluation
//!
//! Walks child axes from the root element, matching each step by
//! (namespace URI, local name). Names are compared as interned string ids;
//! if a required name was never interned the document cannot contain a
//! match and the selection is empty without touching the tree.

use std::borrow::Cow;

use super::{LocationPath, Step};
use crate::binding::NamespaceBinding;
use crate::dom::{DocumentAccess, NodeId};

/// A step resolved against one document's string pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedStep {
    namespace_id: u32,
    local_id: u32,
}

fn resolve_steps<D: DocumentAccess + ?Sized>(
    doc: &D,
    steps: &[Step],
    binding: &NamespaceBinding,
) -> Option<Vec<ResolvedStep>> {
    let strings = doc.strings();
    steps
        .iter()
        .map(|step| {
            Some(ResolvedStep {
                namespace_id: strings.lookup(binding.uri(step.role))?,
                local_id: strings.lookup(step.local)?,
            })
        })
        .collect()
}

#[inline]
fn matches_step<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId, step: &ResolvedStep) -> bool {
    doc.get_node(node).is_some_and(|n| {
        n.is_element() && n.local_id == step.local_id && n.namespace_id == step.namespace_id
    })
}

/// All elements matching a path's steps, produced lazily in document order.
///
/// The selection itself is immutable; every call to [`Selection::iter`]
/// starts a fresh walk.
#[derive(Debug)]
pub struct Selection<'a, D: ?Sized> {
    doc: &'a D,
    root: NodeId,
    steps: Option<Vec<ResolvedStep>>,
}

impl<'a, D: DocumentAccess + ?Sized> Selection<'a, D> {
    /// Prepare evaluation of `path`'s element steps below `root`
    pub fn new(doc: &'a D, root: NodeId, path: &LocationPath, binding: &NamespaceBinding) -> Self {
        Selection {
            doc,
            root,
            steps: resolve_steps(doc, path.steps, binding),
        }
    }

    pub fn iter(&self) -> SelectionIter<'_, D> {
        let stack = match &self.steps {
            Some(_) => vec![(self.root, 0)],
            None => Vec::new(),
        };
        SelectionIter {
            doc: self.doc,
            steps: Cow::Borrowed(self.steps.as_deref().unwrap_or(&[])),
            stack,
        }
    }

    /// First match in document order
    pub fn first(&self) -> Option<NodeId> {
        self.iter().next()
    }

    pub fn doc(&self) -> &'a D {
        self.doc
    }
}

impl<'a, D: DocumentAccess + ?Sized> IntoIterator for Selection<'a, D> {
    type Item = NodeId;
    type IntoIter = SelectionIter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        match self.steps {
            Some(steps) => SelectionIter {
                doc: self.doc,
                steps: Cow::Owned(steps),
                stack: vec![(self.root, 0)],
            },
            None => SelectionIter {
                doc: self.doc,
                steps: Cow::Borrowed(&[]),
                stack: Vec::new(),
            },
        }
    }
}

impl<'s, 'a, D: DocumentAccess + ?Sized> IntoIterator for &'s Selection<'a, D> {
    type Item = NodeId;
    type IntoIter = SelectionIter<'s, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first walk over the matches of a [`Selection`].
#[derive(Debug)]
pub struct SelectionIter<'s, D: ?Sized> {
    doc: &'s D,
    steps: Cow<'s, [ResolvedStep]>,
    /// (node, number of steps it has matched)
    stack: Vec<(NodeId, usize)>,
}

impl<D: ?Sized> Clone for SelectionIter<'_, D> {
    fn clone(&self) -> Self {
        SelectionIter {
            doc: self.doc,
            steps: self.steps.clone(),
            stack: self.stack.clone(),
        }
    }
}

impl<'s, D: DocumentAccess + ?Sized> Iterator for SelectionIter<'s, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, matched)) = self.stack.pop() {
            let Some(step) = self.steps.get(matched).copied() else {
                return Some(node);
            };

            // Push matching children in reverse so the first is visited first
            let mut child_id = self.doc.get_node(node).and_then(|n| n.last_child);
            while let Some(cid) = child_id {
                if matches_step(self.doc, cid, &step) {
                    self.stack.push((cid, matched + 1));
                }
                child_id = self.doc.get_node(cid).and_then(|n| n.prev_sibling);
            }
        }
        None
    }
}
