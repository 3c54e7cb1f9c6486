use crate::error::{EntwineError, Result};
use crate::node::{Node, NodeId, Value};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Arena of nodes. A `NodeId` is the unit of identity: two `Value::Ref`s
/// carrying the same id are the same node, which is how sharing and cycles
/// are expressed. Sequences are owned inline and have no identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: HashMap<NodeId, Node>,
    pub next_node_id: NodeId,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_node_id: 1,
        }
    }

    pub fn create(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;

        let node = Node {
            fields: HashMap::new(),
        };
        self.nodes.insert(id, node);
        id
    }

    pub fn set(&mut self, id: NodeId, key: &str, value: Value) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(EntwineError::NotFound(id));
        }
        Self::check_value(&value, &self.nodes)?;

        if let Some(node) = self.nodes.get_mut(&id) {
            node.fields.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn check_value(v: &Value, nodes: &HashMap<NodeId, Node>) -> Result<()> {
        match v {
            Value::Ref(rid) => {
                if !nodes.contains_key(rid) {
                    return Err(EntwineError::NotFound(*rid));
                }
            }
            Value::List(items) => {
                for item in items {
                    Self::check_value(item, nodes)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(EntwineError::NotFound(id))
    }

    pub fn field(&self, id: NodeId, key: &str) -> Option<&Value> {
        self.nodes.get(&id).and_then(|n| n.fields.get(key))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Structural equivalence of the subgraph rooted at `a` with the subgraph
    /// rooted at `b` in `other`. Compares shapes, not ids, so it holds across
    /// a round trip that re-numbers every node. A pair of nodes already under
    /// comparison counts as equal, which keeps cycles from recursing forever.
    pub fn equivalent(&self, a: NodeId, other: &Graph, b: NodeId) -> bool {
        let mut paired = HashSet::new();
        self.nodes_equivalent(a, other, b, &mut paired)
    }

    fn nodes_equivalent(
        &self,
        a: NodeId,
        other: &Graph,
        b: NodeId,
        paired: &mut HashSet<(NodeId, NodeId)>,
    ) -> bool {
        if !paired.insert((a, b)) {
            return true;
        }
        let (Some(na), Some(nb)) = (self.get(a), other.get(b)) else {
            return false;
        };
        if na.fields.len() != nb.fields.len() {
            return false;
        }
        for (key, va) in &na.fields {
            let Some(vb) = nb.fields.get(key) else {
                return false;
            };
            if !self.values_equivalent(va, other, vb, paired) {
                return false;
            }
        }
        true
    }

    fn values_equivalent(
        &self,
        a: &Value,
        other: &Graph,
        b: &Value,
        paired: &mut HashSet<(NodeId, NodeId)>,
    ) -> bool {
        match (a, b) {
            (Value::Ref(ra), Value::Ref(rb)) => self.nodes_equivalent(*ra, other, *rb, paired),
            (Value::List(la), Value::List(lb)) => {
                la.len() == lb.len()
                    && la
                        .iter()
                        .zip(lb.iter())
                        .all(|(va, vb)| self.values_equivalent(va, other, vb, paired))
            }
            _ => a == b,
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
