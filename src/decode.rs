//! Tree to graph. Reference tokens resolve to the same arena node no matter
//! where they appear relative to their defining record: a token seen before
//! its definition materializes an empty placeholder node that the definition
//! later fills in place.

use crate::error::{EntwineError, Result};
use crate::graph::Graph;
use crate::node::{NodeId, Value};
use serde_json::{Map, Value as JsonValue};
use std::collections::{HashMap, HashSet};

struct Decoder {
    graph: Graph,
    by_id: HashMap<u64, NodeId>,
    incomplete: HashSet<u64>,
}

/// Decode a tree produced by [`crate::encode`] into a fresh graph, returning
/// the arena and the root node's id.
///
/// Fails with `DanglingReference` if any `ref` token names an id no defining
/// record carries, `DuplicateDefinition` if two records declare the same id,
/// and `InvalidTree` for shapes the wire format does not allow.
pub fn decode(tree: &JsonValue) -> Result<(Graph, NodeId)> {
    let JsonValue::Object(record) = tree else {
        return Err(EntwineError::InvalidTree(
            "root must be an object".to_string(),
        ));
    };

    let mut dec = Decoder {
        graph: Graph::new(),
        by_id: HashMap::new(),
        incomplete: HashSet::new(),
    };
    let root = dec.decode_record(record)?;

    if !dec.incomplete.is_empty() {
        let mut unresolved: Vec<u64> = dec.incomplete.iter().copied().collect();
        unresolved.sort_unstable();
        return Err(EntwineError::DanglingReference(unresolved));
    }
    Ok((dec.graph, root))
}

impl Decoder {
    fn decode_record(&mut self, record: &Map<String, JsonValue>) -> Result<NodeId> {
        if let Some(token) = record.get("ref") {
            if record.len() != 1 {
                return Err(EntwineError::InvalidTree(
                    "\"ref\" token must have no other fields".to_string(),
                ));
            }
            let target = positive_int(token, "ref")?;
            if let Some(&existing) = self.by_id.get(&target) {
                return Ok(existing);
            }
            // Forward reference: hand out an empty node now, fill it when
            // the defining record shows up.
            let placeholder = self.graph.create();
            self.by_id.insert(target, placeholder);
            self.incomplete.insert(target);
            return Ok(placeholder);
        }

        let declared = match record.get("id") {
            Some(v) => Some(positive_int(v, "id")?),
            None => None,
        };

        // Register the id before decoding fields so the record can
        // reference itself.
        let node_id = if let Some(k) = declared {
            if self.incomplete.remove(&k) {
                self.by_id.get(&k).copied().ok_or_else(|| {
                    EntwineError::Invariant(format!("incomplete id {} missing from id table", k))
                })?
            } else if self.by_id.contains_key(&k) {
                return Err(EntwineError::DuplicateDefinition(k));
            } else {
                let fresh = self.graph.create();
                self.by_id.insert(k, fresh);
                fresh
            }
        } else {
            self.graph.create()
        };

        let mut fields = HashMap::new();
        for (key, value) in record {
            if key == "id" {
                continue;
            }
            fields.insert(key.clone(), self.decode_value(value)?);
        }

        let node = self
            .graph
            .nodes
            .get_mut(&node_id)
            .ok_or(EntwineError::NotFound(node_id))?;
        node.fields = fields;
        Ok(node_id)
    }

    fn decode_value(&mut self, value: &JsonValue) -> Result<Value> {
        match value {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(EntwineError::InvalidTree(format!(
                        "unrepresentable number: {}",
                        n
                    )))
                }
            }
            JsonValue::String(s) => Ok(Value::Str(s.clone())),
            JsonValue::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.decode_value(item)?);
                }
                Ok(Value::List(out))
            }
            JsonValue::Object(record) => Ok(Value::Ref(self.decode_record(record)?)),
        }
    }
}

fn positive_int(value: &JsonValue, key: &str) -> Result<u64> {
    match value.as_u64() {
        Some(v) if v > 0 => Ok(v),
        _ => Err(EntwineError::InvalidTree(format!(
            "\"{}\" must be a positive integer, got {}",
            key, value
        ))),
    }
}
