//! GraphStore - the authoritative in-memory workflow graph
//!
//! Sole owner of the node and edge collections. All changes go through the
//! mutators here (or the command layer on top of them); the view layer only
//! reads snapshots. Mutations are applied one at a time and either leave the
//! graph in a valid state or leave it unchanged.

use chrono::Utc;
use flowdeck_core::{
    ConfigPatch, Edge, GraphError, LabelTarget, Node, PolicyViolation, Position, StageConfig,
    StageType, Workflow,
};
use tracing::debug;
use uuid::Uuid;

use crate::policy;

/// Generates node ids that stay unique under rapid successive calls:
/// stage prefix + monotonic counter + wall-clock millisecond timestamp.
#[derive(Debug, Default)]
struct IdGen {
    counter: u64,
}

impl IdGen {
    fn next(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!(
            "{}_{}_{}",
            prefix,
            self.counter,
            Utc::now().timestamp_millis()
        )
    }
}

#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    ids: IdGen,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Read-only copy for the view layer, export, and execution.
    pub fn snapshot(&self) -> Workflow {
        Workflow {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Add a stage of the given type with stage-appropriate default config
    /// and label. Always succeeds; the generated id is unique within the
    /// graph even when calls land in the same millisecond.
    pub fn add_node(&mut self, stage_type: StageType, position: Position) -> Node {
        let node = Node {
            id: self.ids.next(stage_type.id_prefix()),
            stage: stage_type.default_config(),
            label: stage_type.display_name().to_string(),
            position: position.sanitized(),
        };
        debug!(id = %node.id, stage = %stage_type, "node added");
        self.nodes.push(node.clone());
        node
    }

    /// Remove a node and, atomically with it, every edge incident to it.
    /// No-op if the id is absent.
    pub fn remove_node(&mut self, id: &str) {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() < before {
            self.edges.retain(|e| e.source != id && e.target != id);
            debug!(id, "node removed");
        }
    }

    /// Connect two nodes, gated by the connection policy. On rejection the
    /// graph is unchanged and the violation is handed back to the caller.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        label: Option<String>,
    ) -> Result<Edge, PolicyViolation> {
        policy::can_connect(&self.nodes, &self.edges, source, target)?;
        let edge = Edge {
            id: format!("edge_{}", Uuid::new_v4().simple()),
            source: source.to_string(),
            target: target.to_string(),
            label,
        };
        debug!(id = %edge.id, source, target, "edge added");
        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// Remove an edge by id; no-op if absent.
    pub fn remove_edge(&mut self, id: &str) {
        self.edges.retain(|e| e.id != id);
    }

    /// Shallow-merge a config patch into a node. Unspecified fields keep
    /// their prior values; the patch tag must match the node's stage type.
    pub fn update_node_config(&mut self, id: &str, patch: ConfigPatch) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;

        match (&mut node.stage, patch) {
            (StageConfig::UserQuery { prompt }, ConfigPatch::UserQuery { prompt: p }) => {
                if let Some(p) = p {
                    *prompt = p;
                }
            }
            (
                StageConfig::KnowledgeBase {
                    document_id,
                    filename,
                },
                ConfigPatch::KnowledgeBase {
                    document_id: d,
                    filename: f,
                },
            ) => {
                if let Some(d) = d {
                    *document_id = Some(d);
                }
                if let Some(f) = f {
                    *filename = Some(f);
                }
            }
            (StageConfig::LlmEngine { model }, ConfigPatch::LlmEngine { model: m }) => {
                if let Some(m) = m {
                    *model = m;
                }
            }
            (StageConfig::Output { format }, ConfigPatch::Output { format: f }) => {
                if let Some(f) = f {
                    *format = f;
                }
            }
            (stage, patch) => {
                return Err(GraphError::ConfigMismatch {
                    id: id.to_string(),
                    patch: patch.stage_type(),
                    actual: stage.stage_type(),
                });
            }
        }
        Ok(())
    }

    /// Set the label of a node or an edge.
    pub fn rename_label(
        &mut self,
        target: LabelTarget,
        new_label: impl Into<String>,
    ) -> Result<(), GraphError> {
        match target {
            LabelTarget::Node(id) => {
                let node = self
                    .nodes
                    .iter_mut()
                    .find(|n| n.id == id)
                    .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
                node.label = new_label.into();
            }
            LabelTarget::Edge(id) => {
                let edge = self
                    .edges
                    .iter_mut()
                    .find(|e| e.id == id)
                    .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
                edge.label = Some(new_label.into());
            }
        }
        Ok(())
    }

    /// Wholesale replace of the graph contents, used by import and reset.
    /// Incoming data goes through the same sanitation as any other bulk
    /// ingest.
    pub fn replace_all(&mut self, mut workflow: Workflow) {
        workflow.sanitize();
        debug!(
            nodes = workflow.nodes.len(),
            edges = workflow.edges.len(),
            "graph replaced"
        );
        self.nodes = workflow.nodes;
        self.edges = workflow.edges;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}
