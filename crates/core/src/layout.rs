//! Layout seam
//!
//! The bubble does not solve layout itself. It describes its geometry as
//! constraints against a [`LayoutEngine`], which may be a real constraint
//! solver or the recording [`ConstraintGraph`] shipped here.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a view in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(pub Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edge of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Leading,
    Trailing,
}

impl Edge {
    /// Insets from trailing and bottom edges point inward, so they are negative
    pub fn inset(self, amount: f64) -> f64 {
        match self {
            Edge::Top | Edge::Leading => amount,
            Edge::Bottom | Edge::Trailing => -amount,
        }
    }
}

/// Position of a view relative to a sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Item sits below the sibling
    Below,
    /// Item sits after the sibling's trailing edge
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Priority at which a view refuses to grow past its content size
pub const PRIORITY_REQUIRED: u16 = 1000;

/// Handle to a constraint owned by a [`LayoutEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub usize);

/// Primitives a bubble needs from the host layout system
pub trait LayoutEngine {
    /// Make `child` a subview of `parent`
    fn add_child(&mut self, parent: ViewId, child: ViewId);

    /// Pin `item`'s `edge` to the same edge of `container`, offset by `constant`.
    /// The constraint starts inactive.
    fn attach(&mut self, item: ViewId, container: ViewId, edge: Edge, constant: f64) -> ConstraintId;

    /// Keep `spacing` between `item` and `sibling`. The constraint starts inactive.
    fn space(&mut self, item: ViewId, spacing: f64, relation: Relation, sibling: ViewId) -> ConstraintId;

    fn activate(&mut self, ids: &[ConstraintId]);

    /// Drop constraints. Their handles must not be used afterwards.
    fn remove_constraints(&mut self, ids: &[ConstraintId]);

    /// Take `child` out of its parent
    fn remove_child(&mut self, child: ViewId);

    fn set_constant(&mut self, id: ConstraintId, constant: f64);

    fn set_hugging_priority(&mut self, item: ViewId, axis: Axis, priority: u16);
}

/// Pin several edges of `item` inside `container` with the same inset and activate them
pub fn attach_sides<L: LayoutEngine + ?Sized>(
    layout: &mut L,
    item: ViewId,
    container: ViewId,
    edges: &[Edge],
    inset: f64,
) -> Vec<ConstraintId> {
    let ids: Vec<ConstraintId> = edges
        .iter()
        .map(|edge| layout.attach(item, container, *edge, edge.inset(inset)))
        .collect();
    layout.activate(&ids);
    ids
}

/// What a constraint relates its item to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintKind {
    Attach { container: ViewId, edge: Edge },
    Space { sibling: ViewId, relation: Relation },
}

/// A constraint as recorded by [`ConstraintGraph`]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub item: ViewId,
    pub kind: ConstraintKind,
    pub constant: f64,
    pub active: bool,
}

/// In-memory layout engine that records constraints without solving them
#[derive(Debug, Default)]
pub struct ConstraintGraph {
    constraints: BTreeMap<usize, Constraint>,
    next_id: usize,
    parents: HashMap<ViewId, ViewId>,
    hugging: HashMap<(ViewId, Axis), u16>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(&id.0)
    }

    pub fn constraints_for(&self, item: ViewId) -> impl Iterator<Item = &Constraint> {
        self.constraints.values().filter(move |c| c.item == item)
    }

    /// Children currently placed inside `parent`
    pub fn children_of(&self, parent: ViewId) -> impl Iterator<Item = ViewId> + '_ {
        self.parents
            .iter()
            .filter(move |(_, p)| **p == parent)
            .map(|(child, _)| *child)
    }

    /// Constant of the active constraint pinning `item` to `container` at `edge`
    pub fn attached_constant(&self, item: ViewId, container: ViewId, edge: Edge) -> Option<f64> {
        self.constraints_for(item)
            .find(|c| {
                c.active
                    && c.kind
                        == ConstraintKind::Attach {
                            container,
                            edge,
                        }
            })
            .map(|c| c.constant)
    }

    pub fn parent_of(&self, child: ViewId) -> Option<ViewId> {
        self.parents.get(&child).copied()
    }

    pub fn hugging_priority(&self, item: ViewId, axis: Axis) -> Option<u16> {
        self.hugging.get(&(item, axis)).copied()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    fn push(&mut self, item: ViewId, kind: ConstraintKind, constant: f64) -> ConstraintId {
        let id = self.next_id;
        self.next_id += 1;
        self.constraints.insert(
            id,
            Constraint {
                item,
                kind,
                constant,
                active: false,
            },
        );
        ConstraintId(id)
    }
}

impl LayoutEngine for ConstraintGraph {
    fn add_child(&mut self, parent: ViewId, child: ViewId) {
        self.parents.insert(child, parent);
    }

    fn attach(&mut self, item: ViewId, container: ViewId, edge: Edge, constant: f64) -> ConstraintId {
        self.push(item, ConstraintKind::Attach { container, edge }, constant)
    }

    fn space(&mut self, item: ViewId, spacing: f64, relation: Relation, sibling: ViewId) -> ConstraintId {
        self.push(item, ConstraintKind::Space { sibling, relation }, spacing)
    }

    fn activate(&mut self, ids: &[ConstraintId]) {
        for id in ids {
            if let Some(c) = self.constraints.get_mut(&id.0) {
                c.active = true;
            }
        }
    }

    fn remove_constraints(&mut self, ids: &[ConstraintId]) {
        for id in ids {
            self.constraints.remove(&id.0);
        }
    }

    fn remove_child(&mut self, child: ViewId) {
        self.parents.remove(&child);
        self.hugging.retain(|(item, _), _| *item != child);
    }

    fn set_constant(&mut self, id: ConstraintId, constant: f64) {
        match self.constraints.get_mut(&id.0) {
            Some(c) => c.constant = constant,
            None => tracing::warn!("set_constant on unknown constraint {:?}", id),
        }
    }

    fn set_hugging_priority(&mut self, item: ViewId, axis: Axis, priority: u16) {
        self.hugging.insert((item, axis), priority);
    }
}
