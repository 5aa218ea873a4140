//! Defensive category-tree construction and traversal.
//!
//! Upstream category data is *expected* to be a forest but is never trusted
//! to be one. Construction is depth-bounded and tracks visited ids, so a
//! self-reference, back-edge, or disconnected cycle terminates with a
//! [`TreeMalformation`] instead of looping. Callers degrade to a flat list
//! on malformation rather than failing assembly.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use canopy_core::{Category, CategoryId};

/// Hard bound on nesting depth; anything deeper is treated as malformed.
pub const MAX_TREE_DEPTH: usize = 32;

/// Why a category graph could not be shaped into a forest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeMalformation {
    #[error("category {0} references itself")]
    SelfReference(CategoryId),
    #[error("category {0} is referenced by more than one path (back-edge or shared child)")]
    BackEdge(CategoryId),
    #[error("category nesting exceeds {MAX_TREE_DEPTH} levels")]
    TooDeep,
    #[error("category graph contains a cycle not reachable from any root")]
    DisconnectedCycle,
}

/// A category with its resolved children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// The category portion of a snapshot: nested when the upstream graph is a
/// well-formed forest, flat otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryView {
    Nested(Vec<CategoryNode>),
    Flat(Vec<Category>),
}

impl CategoryView {
    /// Shape upstream categories into a view, falling back to a flat list
    /// when the graph is malformed. The malformation, if any, is returned
    /// for logging.
    #[must_use]
    pub fn from_categories(categories: Vec<Category>) -> (Self, Option<TreeMalformation>) {
        match build_forest(&categories) {
            Ok(roots) => (Self::Nested(roots), None),
            Err(malformation) => (Self::Flat(categories), Some(malformation)),
        }
    }

    /// Whether the view degraded to the flat fallback.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        matches!(self, Self::Flat(_))
    }

    /// Categories shown in top-level navigation: forest roots, or every
    /// category in the flat fallback.
    #[must_use]
    pub fn top_level(&self) -> Vec<&Category> {
        match self {
            Self::Nested(roots) => roots.iter().map(|n| &n.category).collect(),
            Self::Flat(categories) => categories.iter().collect(),
        }
    }

    /// Root-to-target breadcrumb path for the category with the given slug.
    ///
    /// In the flat fallback the path is just the category itself. Returns
    /// `None` when no category has the slug.
    #[must_use]
    pub fn breadcrumb_path(&self, slug: &str) -> Option<Vec<&Category>> {
        match self {
            Self::Nested(roots) => {
                let mut path = Vec::new();
                if descend(roots, slug, &mut path) {
                    Some(path)
                } else {
                    None
                }
            }
            Self::Flat(categories) => categories
                .iter()
                .find(|c| c.slug == slug)
                .map(|c| vec![c]),
        }
    }

    /// Find a category by slug anywhere in the view.
    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&Category> {
        self.breadcrumb_path(slug).and_then(|path| path.last().copied())
    }
}

/// Depth-first breadcrumb search. The nested view is acyclic by
/// construction, so plain recursion is safe here.
fn descend<'a>(nodes: &'a [CategoryNode], slug: &str, path: &mut Vec<&'a Category>) -> bool {
    for node in nodes {
        path.push(&node.category);
        if node.category.slug == slug || descend(&node.children, slug, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Shape categories into a forest, rejecting malformed graphs.
fn build_forest(categories: &[Category]) -> Result<Vec<CategoryNode>, TreeMalformation> {
    let index: HashMap<&CategoryId, &Category> =
        categories.iter().map(|c| (&c.id, c)).collect();

    let referenced: HashSet<&CategoryId> =
        categories.iter().flat_map(|c| c.children.iter()).collect();

    let mut visited: HashSet<CategoryId> = HashSet::new();
    let mut roots = Vec::new();
    for category in categories.iter().filter(|c| !referenced.contains(&c.id)) {
        roots.push(build_node(category, &index, &mut visited, 0)?);
    }

    // Nodes never reached from a root are tied up in a cycle (e.g. two
    // categories referencing each other, or a node referencing itself).
    if visited.len() != categories.len() {
        return Err(TreeMalformation::DisconnectedCycle);
    }

    Ok(roots)
}

fn build_node(
    category: &Category,
    index: &HashMap<&CategoryId, &Category>,
    visited: &mut HashSet<CategoryId>,
    depth: usize,
) -> Result<CategoryNode, TreeMalformation> {
    if depth >= MAX_TREE_DEPTH {
        return Err(TreeMalformation::TooDeep);
    }
    if !visited.insert(category.id.clone()) {
        return Err(TreeMalformation::BackEdge(category.id.clone()));
    }

    let mut children = Vec::with_capacity(category.children.len());
    for child_id in &category.children {
        if *child_id == category.id {
            return Err(TreeMalformation::SelfReference(category.id.clone()));
        }
        // Dangling references are dropped; the category store may lag
        // behind a deletion.
        if let Some(child) = index.get(child_id) {
            children.push(build_node(child, index, visited, depth + 1)?);
        }
    }

    Ok(CategoryNode {
        category: category.clone(),
        children,
    })
}
