//! Location paths
//!
//! A location path is a fixed list of namespace-qualified child steps below
//! the document's root element (`/*`), optionally ending at an unqualified
//! attribute of the last element. Paths are static data; prefixes and URIs
//! are supplied by a [`NamespaceBinding`] at evaluation time.

mod eval;

pub use eval::{Selection, SelectionIter};

use std::fmt;

use crate::binding::{NamespaceBinding, NamespaceRole};

/// One child step: an element in the namespace bound to `role` with the
/// given local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub role: NamespaceRole,
    pub local: &'static str,
}

impl Step {
    pub const fn protocol(local: &'static str) -> Self {
        Step {
            role: NamespaceRole::Protocol,
            local,
        }
    }

    pub const fn signature(local: &'static str) -> Self {
        Step {
            role: NamespaceRole::Signature,
            local,
        }
    }
}

/// What the path selects once all steps matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The element reached by the last step
    Element,
    /// An unqualified attribute of that element
    Attribute(&'static str),
}

/// Rooted path from the document element to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationPath {
    pub steps: &'static [Step],
    pub target: Target,
}

impl LocationPath {
    pub const fn element(steps: &'static [Step]) -> Self {
        LocationPath {
            steps,
            target: Target::Element,
        }
    }

    pub const fn attribute(steps: &'static [Step], name: &'static str) -> Self {
        LocationPath {
            steps,
            target: Target::Attribute(name),
        }
    }

    /// Number of element steps below the root element
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Render the path with the prefixes of `binding`,
    /// e.g. `/*/ebics:header/ebics:mutable/ebics:ReturnCode`.
    pub fn display_with<'a>(&'a self, binding: &'a NamespaceBinding) -> impl fmt::Display + 'a {
        DisplayPath {
            path: self,
            binding,
        }
    }
}

struct DisplayPath<'a> {
    path: &'a LocationPath,
    binding: &'a NamespaceBinding,
}

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/*")?;
        for step in self.path.steps {
            write!(f, "/{}", self.binding.qualify(step.role, step.local))?;
        }
        if let Target::Attribute(name) = self.path.target {
            write!(f, "/@{name}")?;
        }
        Ok(())
    }
}
