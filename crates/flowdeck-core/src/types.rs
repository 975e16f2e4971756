//! Core types for the flowdeck workflow graph

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The four fixed pipeline roles a node can play.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    UserQuery,
    KnowledgeBase,
    LlmEngine,
    Output,
}

impl StageType {
    /// All stage types, in pipeline order. The validator reports the first
    /// missing one in this order.
    pub const ALL: [StageType; 4] = [
        StageType::UserQuery,
        StageType::KnowledgeBase,
        StageType::LlmEngine,
        StageType::Output,
    ];

    /// Human-readable name, also the default label of a freshly added node.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::UserQuery => "User Query",
            Self::KnowledgeBase => "KnowledgeBase",
            Self::LlmEngine => "LLM Engine",
            Self::Output => "Output",
        }
    }

    /// Prefix used when generating node ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::UserQuery => "user_query",
            Self::KnowledgeBase => "knowledge_base",
            Self::LlmEngine => "llm_engine",
            Self::Output => "output",
        }
    }

    /// Stage-appropriate default configuration for a freshly added node.
    pub fn default_config(&self) -> StageConfig {
        match self {
            Self::UserQuery => StageConfig::UserQuery {
                prompt: String::new(),
            },
            Self::KnowledgeBase => StageConfig::KnowledgeBase {
                document_id: None,
                filename: None,
            },
            Self::LlmEngine => StageConfig::LlmEngine {
                model: ModelKind::default(),
            },
            Self::Output => StageConfig::Output {
                format: OutputFormat::default(),
            },
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Inference backend an LLM Engine stage runs against.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Gemini,
    OpenAi,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// How an Output stage presents the execution result.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Per-stage configuration, tagged by stage type. The wire shape of a node is
/// `{id, stage_type, config, label, position}`; this enum carries the
/// `stage_type`/`config` pair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "stage_type", content = "config", rename_all = "snake_case")]
pub enum StageConfig {
    UserQuery {
        #[serde(default)]
        prompt: String,
    },
    KnowledgeBase {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        document_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
    LlmEngine {
        #[serde(default)]
        model: ModelKind,
    },
    Output {
        #[serde(default)]
        format: OutputFormat,
    },
}

impl StageConfig {
    pub fn stage_type(&self) -> StageType {
        match self {
            Self::UserQuery { .. } => StageType::UserQuery,
            Self::KnowledgeBase { .. } => StageType::KnowledgeBase,
            Self::LlmEngine { .. } => StageType::LlmEngine,
            Self::Output { .. } => StageType::Output,
        }
    }
}

/// Shallow-merge patch for a node's configuration. Fields left `None` keep
/// their prior values; the patch variant must match the node's stage type.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigPatch {
    UserQuery {
        prompt: Option<String>,
    },
    KnowledgeBase {
        document_id: Option<String>,
        filename: Option<String>,
    },
    LlmEngine {
        model: Option<ModelKind>,
    },
    Output {
        format: Option<OutputFormat>,
    },
}

impl ConfigPatch {
    pub fn stage_type(&self) -> StageType {
        match self {
            Self::UserQuery { .. } => StageType::UserQuery,
            Self::KnowledgeBase { .. } => StageType::KnowledgeBase,
            Self::LlmEngine { .. } => StageType::LlmEngine,
            Self::Output { .. } => StageType::Output,
        }
    }
}

/// What a rename targets: a node's label or an edge's label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelTarget {
    Node(String),
    Edge(String),
}

/// Canvas coordinate. Purely presentational; always a well-formed pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }.sanitized()
    }

    /// Non-finite coordinates collapse to the origin.
    pub fn sanitized(self) -> Self {
        Self {
            x: if self.x.is_finite() { self.x } else { 0.0 },
            y: if self.y.is_finite() { self.y } else { 0.0 },
        }
    }
}

impl<'de> Deserialize<'de> for Position {
    /// Lenient by contract: a missing, null, or non-numeric coordinate pair
    /// becomes `(0.0, 0.0)` instead of failing the surrounding document.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let x = value
            .get("x")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        let y = value
            .get("y")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        Ok(Position { x, y }.sanitized())
    }
}

/// A pipeline stage placed on the canvas.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    #[serde(flatten)]
    pub stage: StageConfig,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: Position,
}

impl Node {
    pub fn stage_type(&self) -> StageType {
        self.stage.stage_type()
    }

    /// Label if set, id otherwise. Used in validation messages.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// A directed connection between two nodes of the same graph.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The full graph the user is editing; the unit of export, import, and
/// execution. Sequence order is insertion order and carries no meaning
/// beyond display.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Workflow {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Workflow {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Repair bulk-ingested data so the graph invariants hold: positions are
    /// sanitized, duplicate node/edge ids are dropped (first occurrence
    /// wins), and edges whose endpoints do not resolve are dropped.
    pub fn sanitize(&mut self) {
        let mut seen_nodes = HashSet::new();
        self.nodes.retain(|n| seen_nodes.insert(n.id.clone()));
        for node in &mut self.nodes {
            node.position = node.position.sanitized();
        }

        let node_ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut seen_edges = HashSet::new();
        self.edges.retain(|e| {
            node_ids.contains(e.source.as_str())
                && node_ids.contains(e.target.as_str())
                && seen_edges.insert(e.id.clone())
        });
    }
}
