//! Group and ungroup
//!
//! Grouping only recenters positions: the group sits at the centroid of the
//! selected positions and each child keeps its rotation and scale. Ungrouping
//! bakes the group's full transform into every child.

use std::collections::HashSet;

use glam::DVec3;

use super::{GraphError, SceneGraph, naming};
use crate::id::NodeId;
use crate::node::{SceneNode, Shape};
use crate::transform::{Transform, centroid, rebase};

impl SceneGraph {
    /// Wrap sibling nodes in a new group, returning the group id
    pub fn group(&mut self, ids: &[NodeId]) -> Result<NodeId, GraphError> {
        let mut seen = HashSet::new();
        let selection: Vec<NodeId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if selection.len() < 2 {
            return Err(GraphError::InvalidSelection(
                "grouping needs at least two nodes".into(),
            ));
        }

        let mut parent = None;
        let mut indices = Vec::with_capacity(selection.len());
        for (i, &id) in selection.iter().enumerate() {
            let (node_parent, index) = self.locate(id).ok_or(GraphError::NotFound(id))?;
            if i > 0 && node_parent != parent {
                return Err(GraphError::InvalidSelection(
                    "grouped nodes must share a parent".into(),
                ));
            }
            parent = node_parent;
            indices.push(index);
        }

        let name = naming::indexed_name("Group", &self.names());
        let insert_at = indices[0];
        let list = self
            .list_mut(parent)
            .ok_or(GraphError::NotFound(selection[0]))?;

        // Children keep their relative list order
        let mut removal = indices.clone();
        removal.sort_unstable();
        let mut children: Vec<SceneNode> = removal
            .iter()
            .rev()
            .map(|&index| list.remove(index))
            .collect();
        children.reverse();

        let center = centroid(children.iter().map(|c| c.transform.position)).unwrap_or(DVec3::ZERO);
        for child in &mut children {
            child.transform.position -= center;
        }

        let group =
            SceneNode::group(name, children).with_transform(Transform::from_position(center));
        let group_id = group.id();
        // Removing earlier siblings shifts the first selected node's slot
        let shift = removal.iter().filter(|&&index| index < insert_at).count();
        list.insert(insert_at - shift, group);

        tracing::debug!("Grouped {} nodes into {}", selection.len(), group_id);
        Ok(group_id)
    }

    /// Replace a group with its children, baking the group transform into
    /// each of them. Returns the children's ids in order.
    pub fn ungroup(&mut self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let (parent, index) = self.locate(id).ok_or(GraphError::NotFound(id))?;
        let list = self.list_mut(parent).ok_or(GraphError::NotFound(id))?;
        if !list[index].is_group() {
            return Err(GraphError::NotAGroup(id));
        }

        let group = list.remove(index);
        let group_transform = group.transform;
        let Shape::Group { mut children } = group.shape else {
            return Err(GraphError::NotAGroup(id));
        };

        for child in &mut children {
            child.transform = rebase(&group_transform, &child.transform);
        }
        let child_ids: Vec<NodeId> = children.iter().map(SceneNode::id).collect();
        list.splice(index..index, children);

        tracing::debug!("Ungrouped {} into {} nodes", id, child_ids.len());
        Ok(child_ids)
    }
}
