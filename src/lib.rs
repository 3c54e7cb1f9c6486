pub mod decode;
pub mod encode;
pub mod error;
pub mod graph;
pub mod node;

pub use decode::decode;
pub use encode::encode;
pub use error::EntwineError;
pub use graph::Graph;
pub use node::{Node, NodeId, Value};

pub fn encode_to_string(graph: &Graph, root: NodeId) -> Result<String, EntwineError> {
    let tree = encode(graph, root)?;
    Ok(serde_json::to_string(&tree)?)
}

pub fn encode_to_string_pretty(graph: &Graph, root: NodeId) -> Result<String, EntwineError> {
    let tree = encode(graph, root)?;
    Ok(serde_json::to_string_pretty(&tree)?)
}

pub fn decode_from_str(data: &str) -> Result<(Graph, NodeId), EntwineError> {
    let tree: serde_json::Value = serde_json::from_str(data)?;
    decode(&tree)
}
