//! Relative-path resolution and graph closures.
//!
//! Both closure walks run over an explicit work queue with a visited set
//! keyed by node id. The address space does not guarantee that the subtype
//! or containment graphs are strict trees, so termination must not depend on
//! the model being well-formed.

use std::collections::{HashSet, VecDeque};

use crate::error::StoreError;
use crate::node::{NodeId, ReferenceDirection};
use crate::wellknown;

use super::store::AddressSpace;

impl AddressSpace {
    /// Resolves a relative browse path from `start`, following forward
    /// references of exactly `kind` at each hop. An empty path resolves to
    /// `start` itself.
    ///
    /// # Errors
    /// `PathNotResolved` on the first hop without a matching target;
    /// `NodeNotFound` if `start` is missing.
    pub fn resolve_relative_path(
        &self,
        start: NodeId,
        kind: NodeId,
        path: &[String],
    ) -> Result<NodeId, StoreError> {
        let mut current = start;
        for name in path {
            let mut next = None;
            for reference in self.references(current)? {
                if !reference.is_forward_of(kind) {
                    continue;
                }
                let Some(target) = self.node(reference.target)? else {
                    continue;
                };
                if target.browse_name == *name {
                    next = Some(target.id);
                    break;
                }
            }
            current = next.ok_or_else(|| StoreError::PathNotResolved {
                start: current,
                name: name.clone(),
            })?;
        }
        Ok(current)
    }

    /// Transitive closure of subtypes of `root` in discovery order, `root`
    /// included.
    ///
    /// # Errors
    /// Propagates backend errors; a missing node encountered mid-walk is
    /// skipped.
    pub fn subtype_closure(&self, root: NodeId) -> Result<Vec<NodeId>, StoreError> {
        self.directed_closure(root, &[wellknown::HAS_SUBTYPE], ReferenceDirection::Forward)
    }

    /// Closure over inverse references of the given kinds in discovery
    /// order, `start` included. With the containment kinds this yields the
    /// structural ancestor closure of `start`.
    ///
    /// # Errors
    /// Propagates backend errors; a missing node encountered mid-walk is
    /// skipped.
    pub fn inverse_closure(
        &self,
        start: NodeId,
        kinds: &[NodeId],
    ) -> Result<Vec<NodeId>, StoreError> {
        self.directed_closure(start, kinds, ReferenceDirection::Inverse)
    }

    /// True if `node` reaches `root` by repeatedly following inverse
    /// references of the given kinds (a node trivially reaches itself).
    /// Missing nodes are treated as unreachable.
    ///
    /// # Errors
    /// Propagates backend errors.
    pub fn is_in_tree(
        &self,
        node: NodeId,
        root: NodeId,
        kinds: &[NodeId],
    ) -> Result<bool, StoreError> {
        if !self.contains(node)? {
            return Ok(false);
        }

        let mut visited = HashSet::new();
        let mut work = VecDeque::new();
        visited.insert(node);
        work.push_back(node);
        while let Some(id) = work.pop_front() {
            if id == root {
                return Ok(true);
            }
            let references = match self.references(id) {
                Ok(references) => references,
                Err(StoreError::NodeNotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            for reference in references {
                if reference.direction == ReferenceDirection::Inverse
                    && kinds.contains(&reference.kind)
                    && visited.insert(reference.target)
                {
                    work.push_back(reference.target);
                }
            }
        }
        Ok(false)
    }

    fn directed_closure(
        &self,
        start: NodeId,
        kinds: &[NodeId],
        direction: ReferenceDirection,
    ) -> Result<Vec<NodeId>, StoreError> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut work = VecDeque::new();
        visited.insert(start);
        work.push_back(start);
        while let Some(id) = work.pop_front() {
            out.push(id);
            let references = match self.references(id) {
                Ok(references) => references,
                Err(StoreError::NodeNotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            for reference in references {
                if reference.direction == direction
                    && kinds.contains(&reference.kind)
                    && visited.insert(reference.target)
                {
                    work.push_back(reference.target);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn object(space: &AddressSpace, name: &str) -> NodeId {
        let id = NodeId::new();
        space.insert(Node::object(id, name)).unwrap();
        id
    }

    #[test]
    fn test_resolve_relative_path_single_hop() {
        let space = AddressSpace::new();
        let parent = object(&space, "Boiler");
        let child = NodeId::new();
        space.insert(Node::variable(child, "Pressure")).unwrap();
        space
            .add_reference(parent, wellknown::HAS_PROPERTY, child)
            .unwrap();

        let resolved = space
            .resolve_relative_path(parent, wellknown::HAS_PROPERTY, &["Pressure".to_string()])
            .unwrap();
        assert_eq!(resolved, child);
    }

    #[test]
    fn test_resolve_relative_path_is_kind_exact() {
        let space = AddressSpace::new();
        let parent = object(&space, "Boiler");
        let child = NodeId::new();
        space.insert(Node::variable(child, "Pressure")).unwrap();
        space
            .add_reference(parent, wellknown::HAS_COMPONENT, child)
            .unwrap();

        // a HasProperty lookup must not see a HasComponent edge
        let err = space
            .resolve_relative_path(parent, wellknown::HAS_PROPERTY, &["Pressure".to_string()])
            .unwrap_err();
        assert!(matches!(err, StoreError::PathNotResolved { .. }));
    }

    #[test]
    fn test_resolve_relative_path_multi_hop() {
        let space = AddressSpace::new();
        let root = object(&space, "Line");
        let mid = object(&space, "Drive");
        let leaf = NodeId::new();
        space.insert(Node::variable(leaf, "Speed")).unwrap();
        space.add_reference(root, wellknown::HAS_COMPONENT, mid).unwrap();
        space.add_reference(mid, wellknown::HAS_COMPONENT, leaf).unwrap();

        let resolved = space
            .resolve_relative_path(
                root,
                wellknown::HAS_COMPONENT,
                &["Drive".to_string(), "Speed".to_string()],
            )
            .unwrap();
        assert_eq!(resolved, leaf);
    }

    #[test]
    fn test_resolve_relative_path_empty_path_is_start() {
        let space = AddressSpace::new();
        let start = object(&space, "Boiler");
        let resolved = space
            .resolve_relative_path(start, wellknown::HAS_PROPERTY, &[])
            .unwrap();
        assert_eq!(resolved, start);
    }

    #[test]
    fn test_subtype_closure_discovers_base_model_kinds() {
        let space = AddressSpace::new();
        let closure = space.subtype_closure(wellknown::AGGREGATES).unwrap();
        assert_eq!(closure[0], wellknown::AGGREGATES);
        assert!(closure.contains(&wellknown::HAS_PROPERTY));
        assert!(closure.contains(&wellknown::HAS_COMPONENT));
        assert!(!closure.contains(&wellknown::ORGANIZES));
    }

    #[test]
    fn test_subtype_closure_terminates_on_cycle() {
        let space = AddressSpace::new();
        let a = object(&space, "A");
        let b = object(&space, "B");
        space.add_reference(a, wellknown::HAS_SUBTYPE, b).unwrap();
        space.add_reference(b, wellknown::HAS_SUBTYPE, a).unwrap();

        let closure = space.subtype_closure(a).unwrap();
        assert_eq!(closure.len(), 2);
        assert!(closure.contains(&a));
        assert!(closure.contains(&b));
    }

    #[test]
    fn test_inverse_closure_includes_start_and_ancestors() {
        let space = AddressSpace::new();
        let area = object(&space, "Area");
        let machine = object(&space, "Machine");
        space
            .add_reference(wellknown::OBJECTS_FOLDER, wellknown::ORGANIZES, area)
            .unwrap();
        space
            .add_reference(area, wellknown::HAS_COMPONENT, machine)
            .unwrap();

        let closure = space
            .inverse_closure(machine, &wellknown::CONTAINMENT)
            .unwrap();
        assert_eq!(closure[0], machine);
        assert!(closure.contains(&area));
        assert!(closure.contains(&wellknown::OBJECTS_FOLDER));
        assert_eq!(closure.len(), 3);
    }

    #[test]
    fn test_inverse_closure_terminates_on_cycle() {
        let space = AddressSpace::new();
        let a = object(&space, "A");
        let b = object(&space, "B");
        space.add_reference(a, wellknown::HAS_COMPONENT, b).unwrap();
        space.add_reference(b, wellknown::HAS_COMPONENT, a).unwrap();

        let closure = space.inverse_closure(a, &wellknown::CONTAINMENT).unwrap();
        assert_eq!(closure.len(), 2);
    }

    #[test]
    fn test_is_in_tree() {
        let space = AddressSpace::new();
        let area = object(&space, "Area");
        let machine = object(&space, "Machine");
        let stray = object(&space, "Stray");
        space
            .add_reference(wellknown::OBJECTS_FOLDER, wellknown::ORGANIZES, area)
            .unwrap();
        space
            .add_reference(area, wellknown::HAS_COMPONENT, machine)
            .unwrap();

        assert!(space
            .is_in_tree(machine, wellknown::OBJECTS_FOLDER, &wellknown::CONTAINMENT)
            .unwrap());
        assert!(!space
            .is_in_tree(stray, wellknown::OBJECTS_FOLDER, &wellknown::CONTAINMENT)
            .unwrap());
        assert!(!space
            .is_in_tree(NodeId::new(), wellknown::OBJECTS_FOLDER, &wellknown::CONTAINMENT)
            .unwrap());
    }

    #[test]
    fn test_is_in_tree_type_hierarchy() {
        let space = AddressSpace::new();
        let alarm = object(&space, "AlarmType");
        space
            .add_reference(wellknown::BASE_EVENT_TYPE, wellknown::HAS_SUBTYPE, alarm)
            .unwrap();

        assert!(space
            .is_in_tree(alarm, wellknown::BASE_EVENT_TYPE, &[wellknown::HAS_SUBTYPE])
            .unwrap());
        assert!(space
            .is_in_tree(
                wellknown::BASE_EVENT_TYPE,
                wellknown::BASE_EVENT_TYPE,
                &[wellknown::HAS_SUBTYPE]
            )
            .unwrap());
    }
}
