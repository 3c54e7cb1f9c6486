//! Graph to tree. Nodes referenced more than once are emitted once as a
//! defining record carrying an `id` field and as `{"ref": id}` tokens
//! everywhere else; nodes referenced exactly once are inlined with no id.
//! Sequences are inlined at every occurrence and never tagged.

use crate::error::{EntwineError, Result};
use crate::graph::Graph;
use crate::node::{NodeId, Value};
use serde_json::{Map, Value as JsonValue, json};
use std::collections::{HashMap, HashSet};

struct Encoder<'a> {
    graph: &'a Graph,
    visited: HashSet<NodeId>,
    defined: HashSet<NodeId>,
    ids: HashMap<NodeId, u64>,
    next_id: u64,
}

/// Encode the subgraph reachable from `root` into a cycle-free JSON tree.
///
/// Fails with `ReservedKeyConflict` if any reachable node has a field
/// literally named `id` or `ref`, and with `NotFound` if a `Value::Ref`
/// points outside the arena.
pub fn encode(graph: &Graph, root: NodeId) -> Result<JsonValue> {
    let mut enc = Encoder {
        graph,
        visited: HashSet::new(),
        defined: HashSet::new(),
        ids: HashMap::new(),
        next_id: 1,
    };

    // Two passes over the same deterministic traversal: the first discovers
    // which nodes are shared and numbers them lazily, the second emits the
    // tree knowing every id up front.
    enc.mark_node(root)?;
    enc.emit_node(root)
}

impl Encoder<'_> {
    fn mark_node(&mut self, id: NodeId) -> Result<()> {
        if self.visited.contains(&id) {
            // Second encounter: the node is shared. Ids are handed out in
            // the order sharing is discovered, not in visit order.
            if !self.ids.contains_key(&id) {
                self.ids.insert(id, self.next_id);
                self.next_id += 1;
            }
            return Ok(());
        }
        self.visited.insert(id);

        let node = self.graph.node(id)?;
        let mut keys: Vec<&String> = node.fields.keys().collect();
        keys.sort();
        for key in keys {
            if key == "id" || key == "ref" {
                return Err(EntwineError::ReservedKeyConflict(key.clone()));
            }
            if let Some(value) = node.fields.get(key) {
                self.mark_value(value)?;
            }
        }
        Ok(())
    }

    fn mark_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Ref(id) => self.mark_node(*id),
            Value::List(items) => {
                for item in items {
                    self.mark_value(item)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn emit_node(&mut self, id: NodeId) -> Result<JsonValue> {
        if self.defined.contains(&id) {
            let ref_id = self.ids.get(&id).copied().ok_or_else(|| {
                EntwineError::Invariant(format!("node {} re-emitted without an id", id))
            })?;
            return Ok(json!({ "ref": ref_id }));
        }
        self.defined.insert(id);

        let node = self.graph.node(id)?;
        let mut record = Map::new();
        if let Some(assigned) = self.ids.get(&id) {
            record.insert("id".to_string(), json!(*assigned));
        }

        let mut keys: Vec<&String> = node.fields.keys().collect();
        keys.sort();
        for key in keys {
            if let Some(value) = node.fields.get(key) {
                let emitted = self.emit_value(value)?;
                record.insert(key.clone(), emitted);
            }
        }
        Ok(JsonValue::Object(record))
    }

    fn emit_value(&mut self, value: &Value) -> Result<JsonValue> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Int(v) => Ok(json!(*v)),
            Value::Float(v) => Ok(json!(*v)),
            Value::Bool(v) => Ok(json!(*v)),
            Value::Str(v) => Ok(json!(v)),
            Value::Ref(id) => self.emit_node(*id),
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.emit_value(item)?);
                }
                Ok(JsonValue::Array(out))
            }
        }
    }
}
