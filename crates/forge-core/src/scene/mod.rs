//! Scene graph: a forest of nodes with recursive lookup and editing
//!
//! Every node lives in exactly one list, either the root list or a group's
//! children. All operations either succeed completely or leave the graph as
//! it was.

mod grouping;
pub mod naming;

use std::collections::HashSet;

use glam::DMat4;
use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::node::{NodePatch, SceneNode};

/// Scene graph errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),
    #[error("Node is not a group: {0}")]
    NotAGroup(NodeId),
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),
}

/// The scene forest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    objects: Vec<SceneNode>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph from root nodes
    pub fn from_objects(objects: Vec<SceneNode>) -> Self {
        Self { objects }
    }

    /// Root nodes in order
    pub fn objects(&self) -> &[SceneNode] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<SceneNode> {
        self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        self.iter_depth_first().count()
    }

    /// Every node, parents before children, siblings in order
    pub fn iter_depth_first(&self) -> impl Iterator<Item = &SceneNode> {
        let mut stack: Vec<&SceneNode> = self.objects.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Some(children) = node.children() {
                stack.extend(children.iter().rev());
            }
            Some(node)
        })
    }

    /// Every node id, depth first
    pub fn ids(&self) -> Vec<NodeId> {
        self.iter_depth_first().map(SceneNode::id).collect()
    }

    /// Every node name
    pub fn names(&self) -> HashSet<String> {
        self.iter_depth_first().map(|n| n.name.clone()).collect()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        self.iter_depth_first().find(|n| n.id() == id)
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        find_in_mut(&mut self.objects, id)
    }

    /// First node whose name matches exactly
    pub fn find_by_name(&self, name: &str) -> Option<&SceneNode> {
        self.iter_depth_first().find(|n| n.name == name)
    }

    /// Parent group of a node; `None` for root nodes and unknown ids
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.locate(id).and_then(|(parent, _)| parent)
    }

    /// World matrix of a node's parent frame (identity for root nodes)
    pub fn parent_world(&self, id: NodeId) -> Option<DMat4> {
        fn walk(nodes: &[SceneNode], id: NodeId, parent: DMat4) -> Option<DMat4> {
            for node in nodes {
                if node.id() == id {
                    return Some(parent);
                }
                if let Some(children) = node.children() {
                    let world = parent * node.transform.to_mat4();
                    if let Some(found) = walk(children, id, world) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&self.objects, id, DMat4::IDENTITY)
    }

    /// Parent id and index within the containing list
    pub(crate) fn locate(&self, id: NodeId) -> Option<(Option<NodeId>, usize)> {
        fn walk(
            nodes: &[SceneNode],
            parent: Option<NodeId>,
            id: NodeId,
        ) -> Option<(Option<NodeId>, usize)> {
            if let Some(index) = nodes.iter().position(|n| n.id() == id) {
                return Some((parent, index));
            }
            nodes.iter().find_map(|n| {
                n.children()
                    .and_then(|children| walk(children, Some(n.id()), id))
            })
        }
        walk(&self.objects, None, id)
    }

    /// The list owned by `parent` (the root list for `None`)
    pub(crate) fn list_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<SceneNode>> {
        match parent {
            None => Some(&mut self.objects),
            Some(id) => self.find_mut(id)?.children_mut(),
        }
    }

    fn check_fresh(&self, node: &SceneNode) -> Result<(), GraphError> {
        let existing: HashSet<NodeId> = self.ids().into_iter().collect();
        let mut seen = HashSet::new();
        for id in node.subtree_ids() {
            if existing.contains(&id) || !seen.insert(id) {
                return Err(GraphError::DuplicateId(id));
            }
        }
        Ok(())
    }

    /// Append a node to the root list
    pub fn add(&mut self, node: SceneNode) -> Result<NodeId, GraphError> {
        self.check_fresh(&node)?;
        let id = node.id();
        self.objects.push(node);
        Ok(id)
    }

    /// Append a node to a group's children
    pub fn insert_into(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId, GraphError> {
        self.check_fresh(&node)?;
        let id = node.id();
        let group = self.find_mut(parent).ok_or(GraphError::NotFound(parent))?;
        let children = group.children_mut().ok_or(GraphError::NotAGroup(parent))?;
        children.push(node);
        Ok(id)
    }

    /// Apply a partial update to a node at any depth
    pub fn update(&mut self, id: NodeId, patch: &NodePatch) -> Result<(), GraphError> {
        let node = self.find_mut(id).ok_or(GraphError::NotFound(id))?;
        node.apply(patch);
        Ok(())
    }

    /// Remove a node (and its subtree) wherever it is nested
    pub fn delete(&mut self, id: NodeId) -> Result<SceneNode, GraphError> {
        let (parent, index) = self.locate(id).ok_or(GraphError::NotFound(id))?;
        let list = self.list_mut(parent).ok_or(GraphError::NotFound(id))?;
        Ok(list.remove(index))
    }

    /// Deep-copy a node with fresh ids, placing the copy right after it
    pub fn duplicate(&mut self, id: NodeId) -> Result<NodeId, GraphError> {
        let (parent, index) = self.locate(id).ok_or(GraphError::NotFound(id))?;
        let source = self.find(id).ok_or(GraphError::NotFound(id))?;
        let mut copy = source.fresh_copy();
        copy.name = naming::copy_name(&source.name, &self.names());
        let copy_id = copy.id();

        let list = self.list_mut(parent).ok_or(GraphError::NotFound(id))?;
        list.insert(index + 1, copy);
        Ok(copy_id)
    }

    /// Swap two boolean operands for their result, which takes A's slot
    pub fn replace_operands(
        &mut self,
        a: NodeId,
        b: NodeId,
        result: SceneNode,
    ) -> Result<NodeId, GraphError> {
        if a == b {
            return Err(GraphError::InvalidSelection(
                "boolean operands must be distinct".into(),
            ));
        }
        if !self.contains(b) {
            return Err(GraphError::NotFound(b));
        }
        if !self.contains(a) {
            return Err(GraphError::NotFound(a));
        }
        let mut next = self.clone();
        next.delete(b)?;
        next.check_fresh(&result)?;
        let (parent, index) = next.locate(a).ok_or(GraphError::NotFound(a))?;
        let result_id = result.id();
        let list = next.list_mut(parent).ok_or(GraphError::NotFound(a))?;
        list[index] = result;
        *self = next;
        Ok(result_id)
    }
}

fn find_in_mut(nodes: &mut [SceneNode], id: NodeId) -> Option<&mut SceneNode> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Some(children) = node.children_mut() {
            if let Some(found) = find_in_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}
