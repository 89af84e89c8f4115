//! BSP tree over polygons
//!
//! Every traversal uses an explicit stack: trees built from tessellated
//! curved solids degenerate into long chains, and recursion would overflow
//! the smaller stacks of worker threads.

use crate::plane::{Plane, Split};
use crate::polygon::Polygon;

#[derive(Debug, Default)]
pub(crate) struct Node {
    plane: Option<Plane>,
    front: Option<Box<Node>>,
    back: Option<Box<Node>>,
    polygons: Vec<Polygon>,
}

impl Node {
    /// Build a tree from a polygon soup
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Convert solid space to empty space and empty space to solid space
    pub fn invert(&mut self) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            let Node {
                plane,
                front,
                back,
                polygons,
            } = node;

            for polygon in polygons.iter_mut() {
                polygon.flip();
            }
            if let Some(plane) = plane {
                plane.flip();
            }
            std::mem::swap(front, back);

            stack.extend(front.as_deref_mut());
            stack.extend(back.as_deref_mut());
        }
    }

    /// Remove every part of `polygons` that lies inside this tree
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut stack: Vec<(&Node, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polygons)) = stack.pop() {
            let Some(plane) = node.plane else {
                kept.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match plane.split(polygon) {
                    Split::CoplanarFront(p) | Split::Front(p) => front.push(p),
                    Split::CoplanarBack(p) | Split::Back(p) => back.push(p),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            match node.front.as_deref() {
                Some(child) if !front.is_empty() => stack.push((child, front)),
                Some(_) => {}
                None => kept.extend(front),
            }
            // Polygons behind a leaf are inside the solid and dropped
            if let Some(child) = node.back.as_deref() {
                if !back.is_empty() {
                    stack.push((child, back));
                }
            }
        }

        kept
    }

    /// Remove every part of this tree's polygons that lies inside `other`
    pub fn clip_to(&mut self, other: &Node) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
            stack.extend(node.front.as_deref_mut());
            stack.extend(node.back.as_deref_mut());
        }
    }

    /// Collect all polygons in the tree
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<&Node> = vec![self];
        while let Some(node) = stack.pop() {
            result.extend(node.polygons.iter().cloned());
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        result
    }

    /// Insert polygons into the tree, splitting them where needed
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }

        let mut stack: Vec<(&mut Node, Vec<Polygon>)> = vec![(self, polygons)];
        while let Some((node, polygons)) = stack.pop() {
            let Node {
                plane,
                front,
                back,
                polygons: coplanar,
            } = node;
            let plane = *plane.get_or_insert(polygons[0].plane);

            let mut front_list = Vec::new();
            let mut back_list = Vec::new();
            for polygon in polygons {
                match plane.split(polygon) {
                    Split::CoplanarFront(p) | Split::CoplanarBack(p) => coplanar.push(p),
                    Split::Front(p) => front_list.push(p),
                    Split::Back(p) => back_list.push(p),
                    Split::Spanning { front: f, back: b } => {
                        front_list.extend(f);
                        back_list.extend(b);
                    }
                }
            }

            if !front_list.is_empty() {
                let child = front.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), front_list));
            }
            if !back_list.is_empty() {
                let child = back.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), back_list));
            }
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Node>> = Vec::new();
        pending.extend(self.front.take());
        pending.extend(self.back.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.front.take());
            pending.extend(node.back.take());
        }
    }
}
