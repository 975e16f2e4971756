//! Command layer - discrete mutations applied one at a time
//!
//! Gestures and transport responses become [`Command`] values consumed in
//! order by the store, so the state observed by any mutation is the result
//! of all prior mutations. A failed command leaves the graph unchanged.

use flowdeck_core::{
    ConfigPatch, Edge, GraphError, ImportError, LabelTarget, Node, PolicyViolation, Position,
    StageType,
};
use thiserror::Error;

use crate::serialize::import_workflow;
use crate::store::GraphStore;

#[derive(Clone, Debug)]
pub enum Command {
    AddStage {
        stage_type: StageType,
        position: Position,
    },
    RemoveStage {
        id: String,
    },
    Connect {
        source: String,
        target: String,
        label: Option<String>,
    },
    Disconnect {
        id: String,
    },
    UpdateConfig {
        id: String,
        patch: ConfigPatch,
    },
    Rename {
        target: LabelTarget,
        label: String,
    },
    Import {
        raw: Vec<u8>,
    },
    Reset,
}

/// What a successfully applied command did.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandEffect {
    StageAdded(Node),
    StageRemoved,
    Connected(Edge),
    Disconnected,
    ConfigUpdated,
    Renamed,
    /// The whole graph was replaced; any view-side selection is stale.
    Replaced,
    Cleared,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl GraphStore {
    /// Apply one command against the current graph.
    pub fn apply(&mut self, command: Command) -> Result<CommandEffect, CommandError> {
        match command {
            Command::AddStage {
                stage_type,
                position,
            } => Ok(CommandEffect::StageAdded(
                self.add_node(stage_type, position),
            )),
            Command::RemoveStage { id } => {
                self.remove_node(&id);
                Ok(CommandEffect::StageRemoved)
            }
            Command::Connect {
                source,
                target,
                label,
            } => Ok(CommandEffect::Connected(
                self.connect(&source, &target, label)?,
            )),
            Command::Disconnect { id } => {
                self.remove_edge(&id);
                Ok(CommandEffect::Disconnected)
            }
            Command::UpdateConfig { id, patch } => {
                self.update_node_config(&id, patch)?;
                Ok(CommandEffect::ConfigUpdated)
            }
            Command::Rename { target, label } => {
                self.rename_label(target, label)?;
                Ok(CommandEffect::Renamed)
            }
            Command::Import { raw } => {
                let workflow = import_workflow(&raw)?;
                self.replace_all(workflow);
                Ok(CommandEffect::Replaced)
            }
            Command::Reset => {
                self.clear();
                Ok(CommandEffect::Cleared)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_connect_through_commands() {
        let mut store = GraphStore::new();
        let q = match store
            .apply(Command::AddStage {
                stage_type: StageType::UserQuery,
                position: Position::default(),
            })
            .unwrap()
        {
            CommandEffect::StageAdded(n) => n,
            other => panic!("unexpected effect: {:?}", other),
        };
        let kb = match store
            .apply(Command::AddStage {
                stage_type: StageType::KnowledgeBase,
                position: Position::default(),
            })
            .unwrap()
        {
            CommandEffect::StageAdded(n) => n,
            other => panic!("unexpected effect: {:?}", other),
        };

        let effect = store
            .apply(Command::Connect {
                source: q.id.clone(),
                target: kb.id.clone(),
                label: None,
            })
            .unwrap();
        assert!(matches!(effect, CommandEffect::Connected(_)));
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn rejected_connect_surfaces_policy_violation() {
        let mut store = GraphStore::new();
        let q = store.add_node(StageType::UserQuery, Position::default());
        let err = store
            .apply(Command::Connect {
                source: q.id.clone(),
                target: q.id,
                label: None,
            })
            .unwrap_err();
        assert_eq!(err, CommandError::Policy(PolicyViolation::SelfLoop));
        assert!(store.edges().is_empty());
    }

    #[test]
    fn failed_import_preserves_current_graph() {
        let mut store = GraphStore::new();
        store.add_node(StageType::Output, Position::default());
        let before = store.snapshot();

        let err = store
            .apply(Command::Import {
                raw: b"{ broken".to_vec(),
            })
            .unwrap_err();
        assert!(matches!(err, CommandError::Import(_)));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = GraphStore::new();
        let a = store.add_node(StageType::UserQuery, Position::default());
        let b = store.add_node(StageType::KnowledgeBase, Position::default());
        store.connect(&a.id, &b.id, None).unwrap();

        store.apply(Command::Reset).unwrap();
        assert!(store.snapshot().is_empty());
    }
}
