//! # Tree Operations
//!
//! Pure functions over an immutable document tree.
//!
//! ## Semantics
//!
//! - Every edit returns a new root. Only the path from the root to the
//!   edited node is copied; all other subtrees are shared with the input.
//! - A failed edit returns an error and the caller keeps the input tree.
//! - Lookups walk depth-first, pre-order.
//!
//! ### Insert
//! - `before`/`after` place the node as a sibling of the anchor
//! - `append`/`prepend` place it as the last/first child of the anchor
//! - Fails if the host cannot legally hold the node or an id is taken
//!
//! ### Move
//! - Detach, then insert with the same position semantics
//! - Fails if the anchor is the node itself or inside its subtree

use crate::errors::{EditorError, EditorResult, StructuralViolation};
use crate::validator::validate_subtree;
use mina_model::{can_contain, EditorNode, IdGenerator, NodeId, NodeRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Where `insert_node`/`move_node` place a node relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Before,
    After,
    Append,
    Prepend,
}

/// Lazy pre-order walk over a tree. Each call to [`traverse_tree`] starts a
/// fresh walk from the given root.
pub struct Traverse<'a> {
    stack: Vec<&'a EditorNode>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a EditorNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| child.as_ref()));
        Some(node)
    }
}

pub fn traverse_tree(tree: &EditorNode) -> Traverse<'_> {
    Traverse { stack: vec![tree] }
}

/// Visitor form of [`traverse_tree`]
pub fn for_each_node(tree: &EditorNode, mut visitor: impl FnMut(&EditorNode)) {
    for node in traverse_tree(tree) {
        visitor(node);
    }
}

pub fn find_node_by_id<'a>(tree: &'a EditorNode, id: &str) -> Option<&'a EditorNode> {
    traverse_tree(tree).find(|node| node.id() == id)
}

pub fn find_parent_by_id<'a>(tree: &'a EditorNode, id: &str) -> Option<&'a EditorNode> {
    traverse_tree(tree).find(|node| node.children().iter().any(|child| child.id() == id))
}

/// Shared handle to a node, so it can be re-attached without copying
pub fn find_node_ref<'a>(tree: &'a NodeRef, id: &str) -> Option<&'a NodeRef> {
    if tree.id() == id {
        return Some(tree);
    }
    tree.children()
        .iter()
        .find_map(|child| find_node_ref(child, id))
}

pub fn contains_node(tree: &EditorNode, id: &str) -> bool {
    find_node_by_id(tree, id).is_some()
}

/// Every id in the tree
pub fn collect_ids(tree: &EditorNode) -> HashSet<&str> {
    traverse_tree(tree).map(|node| node.id()).collect()
}

/// Whether `id` lies strictly below `ancestor_id`
pub fn is_descendant(tree: &EditorNode, ancestor_id: &str, id: &str) -> bool {
    ancestor_id != id
        && find_node_by_id(tree, ancestor_id)
            .map(|ancestor| contains_node(ancestor, id))
            .unwrap_or(false)
}

/// Child indices leading from the root to `id`
pub fn node_path(tree: &EditorNode, id: &str) -> Option<Vec<usize>> {
    if tree.id() == id {
        return Some(Vec::new());
    }
    tree.children().iter().enumerate().find_map(|(index, child)| {
        node_path(child, id).map(|mut path| {
            path.insert(0, index);
            path
        })
    })
}

/// Field-wise equality that compares children by identity
pub fn shallow_eq(a: &EditorNode, b: &EditorNode) -> bool {
    let same_children = a.children().len() == b.children().len()
        && a.children()
            .iter()
            .zip(b.children())
            .all(|(x, y)| Arc::ptr_eq(x, y));

    same_children
        && match (a, b) {
            (EditorNode::Container(x), EditorNode::Container(y)) => {
                x.id == y.id && x.node_type == y.node_type && x.attributes == y.attributes
            }
            (EditorNode::Text(x), EditorNode::Text(y)) => {
                x.id == y.id
                    && x.node_type == y.node_type
                    && x.attributes == y.attributes
                    && x.content == y.content
                    && x.formats == y.formats
                    && x.styles == y.styles
            }
            _ => false,
        }
}

/// Replace the node `id` with `updater` applied to a copy of it.
///
/// If the updater leaves the node unchanged the original root is returned,
/// so callers can detect no-ops with `Arc::ptr_eq`.
pub fn update_node_by_id<F>(tree: &NodeRef, id: &str, updater: F) -> EditorResult<NodeRef>
where
    F: FnOnce(&mut EditorNode) -> EditorResult<()>,
{
    let mut updater = Some(updater);
    match rebuild_path(tree, id, &mut updater)? {
        Some(new_tree) => Ok(new_tree),
        None => Err(EditorError::not_found(id)),
    }
}

fn rebuild_path<F>(node: &NodeRef, id: &str, updater: &mut Option<F>) -> EditorResult<Option<NodeRef>>
where
    F: FnOnce(&mut EditorNode) -> EditorResult<()>,
{
    if node.id() == id {
        let mut copy = (**node).clone();
        if let Some(update) = updater.take() {
            update(&mut copy)?;
        }
        if shallow_eq(&copy, node) {
            return Ok(Some(Arc::clone(node)));
        }
        return Ok(Some(Arc::new(copy)));
    }

    for (index, child) in node.children().iter().enumerate() {
        if let Some(new_child) = rebuild_path(child, id, updater)? {
            if Arc::ptr_eq(&new_child, child) {
                return Ok(Some(Arc::clone(node)));
            }
            let mut copy = (**node).clone();
            copy.children_mut()[index] = new_child;
            return Ok(Some(Arc::new(copy)));
        }
    }

    Ok(None)
}

/// Remove a node and its subtree
pub fn delete_node_by_id(tree: &NodeRef, id: &str) -> EditorResult<NodeRef> {
    if tree.id() == id {
        return Err(StructuralViolation::RootOperation { operation: "delete" }.into());
    }

    let parent_id = find_parent_by_id(tree, id)
        .ok_or_else(|| EditorError::not_found(id))?
        .id()
        .to_string();

    update_node_by_id(tree, &parent_id, |parent| {
        parent.children_mut().retain(|child| child.id() != id);
        Ok(())
    })
}

/// Insert a new node (and its subtree) relative to `anchor_id`
pub fn insert_node(
    tree: &NodeRef,
    node: EditorNode,
    anchor_id: &str,
    position: InsertPosition,
) -> EditorResult<NodeRef> {
    ensure_fresh_ids(tree, &node)?;
    if let Some(violation) = validate_subtree(&node).into_iter().next() {
        return Err(violation.into());
    }
    place(tree, Arc::new(node), anchor_id, position)
}

fn ensure_fresh_ids(tree: &EditorNode, node: &EditorNode) -> EditorResult<()> {
    let existing = collect_ids(tree);
    let mut seen = HashSet::new();

    for inserted in traverse_tree(node) {
        if existing.contains(inserted.id()) || !seen.insert(inserted.id()) {
            return Err(StructuralViolation::DuplicateId {
                id: inserted.id().to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn ensure_can_host(host: &EditorNode, child: &EditorNode) -> EditorResult<()> {
    if can_contain(host, child) {
        Ok(())
    } else {
        Err(StructuralViolation::IllegalChild {
            parent_id: host.id().to_string(),
            parent_type: host.node_type(),
            child_id: child.id().to_string(),
            child_type: child.node_type(),
        }
        .into())
    }
}

/// Attach an already-built node; ids are assumed to be free
fn place(tree: &NodeRef, node: NodeRef, anchor_id: &str, position: InsertPosition) -> EditorResult<NodeRef> {
    let anchor = find_node_by_id(tree, anchor_id).ok_or_else(|| EditorError::not_found(anchor_id))?;

    match position {
        InsertPosition::Append | InsertPosition::Prepend => {
            ensure_can_host(anchor, &node)?;
            update_node_by_id(tree, anchor_id, |host| {
                let children = host.children_mut();
                if position == InsertPosition::Append {
                    children.push(node);
                } else {
                    children.insert(0, node);
                }
                Ok(())
            })
        }

        InsertPosition::Before | InsertPosition::After => {
            let parent = find_parent_by_id(tree, anchor_id).ok_or(StructuralViolation::RootOperation {
                operation: "insert a sibling of",
            })?;
            ensure_can_host(parent, &node)?;
            let parent_id = parent.id().to_string();

            update_node_by_id(tree, &parent_id, |host| {
                let children = host.children_mut();
                let index = children
                    .iter()
                    .position(|child| child.id() == anchor_id)
                    .ok_or_else(|| EditorError::not_found(anchor_id))?;
                let index = if position == InsertPosition::After { index + 1 } else { index };
                children.insert(index, node);
                Ok(())
            })
        }
    }
}

/// Detach the subtree at `id` and re-attach it relative to `anchor_id`
pub fn move_node(
    tree: &NodeRef,
    id: &str,
    anchor_id: &str,
    position: InsertPosition,
) -> EditorResult<NodeRef> {
    if tree.id() == id {
        return Err(StructuralViolation::RootOperation { operation: "move" }.into());
    }

    let subtree = find_node_ref(tree, id)
        .cloned()
        .ok_or_else(|| EditorError::not_found(id))?;

    if !contains_node(tree, anchor_id) {
        return Err(EditorError::not_found(anchor_id));
    }

    if contains_node(&subtree, anchor_id) {
        return Err(StructuralViolation::Cycle {
            id: id.to_string(),
            anchor_id: anchor_id.to_string(),
        }
        .into());
    }

    if already_in_place(tree, id, anchor_id, position) {
        return Ok(Arc::clone(tree));
    }

    let detached = delete_node_by_id(tree, id)?;
    place(&detached, subtree, anchor_id, position)
}

/// Whether moving `id` relative to `anchor_id` would put it back where it is
fn already_in_place(tree: &EditorNode, id: &str, anchor_id: &str, position: InsertPosition) -> bool {
    let Some(parent) = find_parent_by_id(tree, id) else {
        return false;
    };
    let siblings = parent.children();
    let Some(index) = siblings.iter().position(|child| child.id() == id) else {
        return false;
    };

    match position {
        InsertPosition::Append => parent.id() == anchor_id && index + 1 == siblings.len(),
        InsertPosition::Prepend => parent.id() == anchor_id && index == 0,
        InsertPosition::Before => siblings
            .get(index + 1)
            .is_some_and(|next| next.id() == anchor_id),
        InsertPosition::After => index
            .checked_sub(1)
            .and_then(|previous| siblings.get(previous))
            .is_some_and(|previous| previous.id() == anchor_id),
    }
}

/// Deep copy with a fresh id for every node in the subtree
pub fn clone_node(node: &EditorNode, ids: &mut IdGenerator) -> EditorNode {
    clone_with(node, &mut || ids.new_id())
}

fn clone_with(node: &EditorNode, fresh_id: &mut dyn FnMut() -> NodeId) -> EditorNode {
    let mut copy = node.clone();
    copy.set_id(fresh_id());
    for child in copy.children_mut().iter_mut() {
        let cloned = clone_with(&**child, fresh_id);
        *child = Arc::new(cloned);
    }
    copy
}

/// Clone `id` and insert the copy right after it. Generated ids skip every
/// id already in the tree; `new_id` names the copy's root explicitly.
/// Returns the new tree and the copy's id.
pub fn duplicate_node(
    tree: &NodeRef,
    id: &str,
    new_id: Option<&str>,
    ids: &mut IdGenerator,
) -> EditorResult<(NodeRef, NodeId)> {
    if tree.id() == id {
        return Err(StructuralViolation::RootOperation { operation: "duplicate" }.into());
    }

    let original = find_node_by_id(tree, id).ok_or_else(|| EditorError::not_found(id))?;
    let existing = collect_ids(tree);
    let mut copy = clone_with(original, &mut || {
        ids.new_id_where(|candidate| existing.contains(candidate))
    });

    if let Some(new_id) = new_id {
        copy.set_id(new_id);
    }

    let copy_id = copy.id().to_string();
    let new_tree = insert_node(tree, copy, id, InsertPosition::After)?;
    Ok((new_tree, copy_id))
}
