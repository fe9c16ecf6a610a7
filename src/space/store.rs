//! Thread-safe in-memory node storage.
//!
//! This is the reference object store backing the event engine. Every
//! address space starts out seeded with the Opaline base model: the Objects
//! folder, the reference-type hierarchy, and the base event type with its
//! four well-known property declarations.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::StoreError;
use crate::events::watcher::Watcher;
use crate::node::{Node, NodeClass, NodeId, Reference, ReferenceDirection};
use crate::value::Value;
use crate::wellknown;

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Backend(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct SpaceState {
    nodes: HashMap<NodeId, Node>,
    watchers: HashMap<NodeId, Vec<Arc<Watcher>>>,
}

impl SpaceState {
    fn insert(&mut self, node: Node) -> Result<(), StoreError> {
        if self.nodes.contains_key(&node.id) {
            return Err(StoreError::DuplicateNode(node.id));
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    /// Stores both halves of one edge: forward on the source, inverse on the
    /// target.
    fn link(&mut self, source: NodeId, kind: NodeId, target: NodeId) -> Result<(), StoreError> {
        if !self.nodes.contains_key(&target) {
            return Err(StoreError::NodeNotFound(target));
        }
        let Some(source_node) = self.nodes.get_mut(&source) else {
            return Err(StoreError::NodeNotFound(source));
        };
        source_node.references.push(Reference {
            kind,
            target,
            direction: ReferenceDirection::Forward,
        });
        let Some(target_node) = self.nodes.get_mut(&target) else {
            return Err(StoreError::NodeNotFound(target));
        };
        target_node.references.push(Reference {
            kind,
            target: source,
            direction: ReferenceDirection::Inverse,
        });
        Ok(())
    }

    /// Removes `root` together with the subtree it owns through forward
    /// references of the given aggregation kinds, then scrubs the mirror
    /// references held by surviving partners.
    fn remove_owned(&mut self, root: NodeId, owned_kinds: &HashSet<NodeId>) -> Result<(), StoreError> {
        if !self.nodes.contains_key(&root) {
            return Err(StoreError::NodeNotFound(root));
        }

        let mut doomed = Vec::new();
        let mut visited = HashSet::new();
        let mut work = VecDeque::new();
        visited.insert(root);
        work.push_back(root);
        while let Some(id) = work.pop_front() {
            doomed.push(id);
            if let Some(node) = self.nodes.get(&id) {
                for reference in &node.references {
                    if reference.direction == ReferenceDirection::Forward
                        && owned_kinds.contains(&reference.kind)
                        && visited.insert(reference.target)
                    {
                        work.push_back(reference.target);
                    }
                }
            }
        }

        let doomed_set: HashSet<NodeId> = doomed.iter().copied().collect();
        let mut partners = HashSet::new();
        for id in &doomed {
            if let Some(node) = self.nodes.get(id) {
                for reference in &node.references {
                    if !doomed_set.contains(&reference.target) {
                        partners.insert(reference.target);
                    }
                }
            }
        }

        for id in &doomed {
            self.nodes.remove(id);
            self.watchers.remove(id);
        }
        for partner in partners {
            if let Some(node) = self.nodes.get_mut(&partner) {
                node.references.retain(|r| !doomed_set.contains(&r.target));
            }
        }
        Ok(())
    }
}

/// Thread-safe in-memory address space.
///
/// All operations are synchronous; interior locking covers single calls
/// only, so callers needing cross-call consistency must serialize access
/// themselves (the event engine runs on one logical thread of control).
#[derive(Debug)]
pub struct AddressSpace {
    state: RwLock<SpaceState>,
}

impl AddressSpace {
    /// Creates an address space seeded with the Opaline base model.
    #[must_use]
    pub fn new() -> Self {
        let mut state = SpaceState::default();
        seed_base_model(&mut state);
        Self {
            state: RwLock::new(state),
        }
    }

    /// Number of nodes currently stored.
    ///
    /// # Errors
    /// `Backend` if the state lock is poisoned.
    pub fn node_count(&self) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("node_count"))?;
        Ok(state.nodes.len())
    }

    /// Returns true if a node with the given id exists.
    ///
    /// # Errors
    /// `Backend` if the state lock is poisoned.
    pub fn contains(&self, id: NodeId) -> Result<bool, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("contains"))?;
        Ok(state.nodes.contains_key(&id))
    }

    /// Returns an owned copy of the node, if present.
    ///
    /// # Errors
    /// `Backend` if the state lock is poisoned.
    pub fn node(&self, id: NodeId) -> Result<Option<Node>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("node"))?;
        Ok(state.nodes.get(&id).cloned())
    }

    /// Inserts a new node.
    ///
    /// # Errors
    /// `DuplicateNode` if the id is already taken.
    pub fn insert(&self, node: Node) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("insert"))?;
        state.insert(node)
    }

    /// Adds one typed edge between two existing nodes.
    ///
    /// # Errors
    /// `NodeNotFound` if either endpoint is missing.
    pub fn add_reference(
        &self,
        source: NodeId,
        kind: NodeId,
        target: NodeId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("add_reference"))?;
        state.link(source, kind, target)
    }

    /// Returns an owned snapshot of the references stored on a node, both
    /// halves, in insertion order.
    ///
    /// # Errors
    /// `NodeNotFound` if the node is missing.
    pub fn references(&self, id: NodeId) -> Result<Vec<Reference>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("references"))?;
        state
            .nodes
            .get(&id)
            .map(|node| node.references.clone())
            .ok_or(StoreError::NodeNotFound(id))
    }

    /// Reads the value attribute of a variable node. An unwritten variable
    /// reads as `Value::Null`.
    ///
    /// # Errors
    /// `NodeNotFound` / `NotAVariable` on a missing or non-variable target.
    pub fn read_value(&self, id: NodeId) -> Result<Value, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("read_value"))?;
        let node = state.nodes.get(&id).ok_or(StoreError::NodeNotFound(id))?;
        if node.node_class != NodeClass::Variable {
            return Err(StoreError::NotAVariable(id));
        }
        Ok(node.value.clone().unwrap_or(Value::Null))
    }

    /// Writes the value attribute of a variable node.
    ///
    /// # Errors
    /// `NodeNotFound` / `NotAVariable` on a missing or non-variable target.
    pub fn write_value(&self, id: NodeId, value: Value) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("write_value"))?;
        let node = state.nodes.get_mut(&id).ok_or(StoreError::NodeNotFound(id))?;
        if node.node_class != NodeClass::Variable {
            return Err(StoreError::NotAVariable(id));
        }
        node.value = Some(value);
        Ok(())
    }

    /// Creates a parentless, unreferenced instance of `type_id`.
    ///
    /// Property declarations found on the type and its supertype chain
    /// (through the aggregation subtype closure) are instantiated as fresh,
    /// unwritten variable nodes on the instance. Declarations on a subtype
    /// shadow same-named declarations further up the chain.
    ///
    /// # Errors
    /// `NodeNotFound` if the type is missing.
    pub fn instantiate(
        &self,
        type_id: NodeId,
        display_name: impl Into<String>,
    ) -> Result<NodeId, StoreError> {
        if !self.contains(type_id)? {
            return Err(StoreError::NodeNotFound(type_id));
        }
        let aggregation: HashSet<NodeId> = self
            .subtype_closure(wellknown::AGGREGATES)?
            .into_iter()
            .collect();

        let mut declared: Vec<(NodeId, Node)> = Vec::new();
        let mut seen = HashSet::new();
        for type_node in self.inverse_closure(type_id, &[wellknown::HAS_SUBTYPE])? {
            for reference in self.references(type_node)? {
                if reference.direction != ReferenceDirection::Forward
                    || !aggregation.contains(&reference.kind)
                {
                    continue;
                }
                let Some(declaration) = self.node(reference.target)? else {
                    continue;
                };
                if declaration.node_class != NodeClass::Variable {
                    continue;
                }
                if seen.insert(declaration.browse_name.clone()) {
                    declared.push((reference.kind, declaration));
                }
            }
        }

        let instance_id = NodeId::new();
        let mut state = self.state.write().map_err(|_| lock_err("instantiate"))?;
        state.insert(
            Node::object(instance_id, "")
                .with_display_name(display_name)
                .with_type_definition(type_id),
        )?;
        for (kind, declaration) in declared {
            let property_id = NodeId::new();
            state.insert(Node::variable(property_id, declaration.browse_name))?;
            state.link(instance_id, kind, property_id)?;
        }
        Ok(instance_id)
    }

    /// Deletes a node together with the property subtree it owns through
    /// aggregation references, scrubbing dangling mirror references.
    ///
    /// # Errors
    /// `NodeNotFound` if the node is missing.
    pub fn delete(&self, id: NodeId) -> Result<(), StoreError> {
        let aggregation: HashSet<NodeId> = self
            .subtype_closure(wellknown::AGGREGATES)?
            .into_iter()
            .collect();
        let mut state = self.state.write().map_err(|_| lock_err("delete"))?;
        state.remove_owned(id, &aggregation)
    }

    /// Registers a watcher on a node. Watchers are kept in registration
    /// order; fan-out visits them in that order.
    ///
    /// # Errors
    /// `NodeNotFound` if the node is missing.
    pub fn register_watcher(&self, node: NodeId, watcher: Arc<Watcher>) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("register_watcher"))?;
        if !state.nodes.contains_key(&node) {
            return Err(StoreError::NodeNotFound(node));
        }
        state.watchers.entry(node).or_default().push(watcher);
        Ok(())
    }

    /// Returns a snapshot of the watchers registered on a node, in
    /// registration order. Mutating registrations during fan-out cannot
    /// invalidate a snapshot already taken.
    ///
    /// # Errors
    /// `NodeNotFound` if the node is missing.
    pub fn watchers(&self, node: NodeId) -> Result<Vec<Arc<Watcher>>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("watchers"))?;
        if !state.nodes.contains_key(&node) {
            return Err(StoreError::NodeNotFound(node));
        }
        Ok(state.watchers.get(&node).cloned().unwrap_or_default())
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_base_model(state: &mut SpaceState) {
    let seeded = [
        Node::object(wellknown::OBJECTS_FOLDER, "Objects"),
        Node::reference_type(wellknown::HAS_SUBTYPE, "HasSubtype"),
        Node::reference_type(wellknown::AGGREGATES, "Aggregates"),
        Node::reference_type(wellknown::HAS_PROPERTY, "HasProperty"),
        Node::reference_type(wellknown::HAS_COMPONENT, "HasComponent"),
        Node::reference_type(wellknown::ORGANIZES, "Organizes"),
        Node::object_type(wellknown::BASE_EVENT_TYPE, "BaseEventType"),
    ];
    for node in seeded {
        state.insert(node).expect("base model node ids are distinct");
    }

    for subtype in [wellknown::HAS_PROPERTY, wellknown::HAS_COMPONENT] {
        state
            .link(wellknown::AGGREGATES, wellknown::HAS_SUBTYPE, subtype)
            .expect("base model reference types exist");
    }

    for name in wellknown::BASE_EVENT_PROPERTIES {
        let declaration = NodeId::new();
        state
            .insert(Node::variable(declaration, name))
            .expect("fresh declaration ids are unique");
        state
            .link(wellknown::BASE_EVENT_TYPE, wellknown::HAS_PROPERTY, declaration)
            .expect("base event type exists");
    }
}
