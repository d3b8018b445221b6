//! Electrical equivalence classes derived from the node table.

use std::collections::HashMap;

use crate::node::{NodeId, SpatialNode};

/// Spatial nodes currently bound to one net name, in ascending node order.
/// The first member stands in for the whole class wherever a single node is
/// needed, notably in `.external` directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetGroup {
    net: String,
    members: Vec<NodeId>,
}

impl NetGroup {
    pub fn net(&self) -> &str {
        &self.net
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Groups are created on their first member, so this never panics.
    pub fn representative(&self) -> NodeId {
        self.members[0]
    }
}

/// Group nodes by net name. Groups come out in first-encounter order of a
/// scan over the nodes in index order, which is also the order their
/// `.Equiv` lines are emitted in.
pub(crate) fn group_nodes(nodes: &[SpatialNode]) -> Vec<NetGroup> {
    let mut groups: Vec<NetGroup> = Vec::new();
    let mut index_by_net: HashMap<&str, usize> = HashMap::new();

    for (i, node) in nodes.iter().enumerate() {
        let id = NodeId::from_index(i);
        match index_by_net.get(node.net()) {
            Some(&slot) => groups[slot].members.push(id),
            None => {
                index_by_net.insert(node.net(), groups.len());
                groups.push(NetGroup {
                    net: node.net().to_string(),
                    members: vec![id],
                });
            }
        }
    }

    groups
}
