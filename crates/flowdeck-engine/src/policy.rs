//! Connection policy - which edges may legally be added between two stages

use flowdeck_core::{Edge, Node, PolicyViolation, StageType};

/// Decide whether an edge from `source` to `target` may be added to the
/// current graph. Pure; evaluated against live state before every insert.
/// Rules, in precedence order:
///
/// 1. no self-loops
/// 2. both endpoints must resolve to existing nodes
/// 3. an Output stage never emits outgoing edges
/// 4. a User Query stage never receives incoming edges
/// 5. an Output stage accepts at most one incoming edge
pub fn can_connect(
    nodes: &[Node],
    edges: &[Edge],
    source: &str,
    target: &str,
) -> Result<(), PolicyViolation> {
    if source == target {
        return Err(PolicyViolation::SelfLoop);
    }

    let source_node = nodes
        .iter()
        .find(|n| n.id == source)
        .ok_or_else(|| PolicyViolation::UnknownEndpoint(source.to_string()))?;
    let target_node = nodes
        .iter()
        .find(|n| n.id == target)
        .ok_or_else(|| PolicyViolation::UnknownEndpoint(target.to_string()))?;

    if source_node.stage_type() == StageType::Output {
        return Err(PolicyViolation::OutputAsSource);
    }
    if target_node.stage_type() == StageType::UserQuery {
        return Err(PolicyViolation::UserQueryAsTarget);
    }
    if target_node.stage_type() == StageType::Output && edges.iter().any(|e| e.target == target) {
        return Err(PolicyViolation::OutputAlreadyFed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_core::Position;

    fn node(id: &str, stage_type: StageType) -> Node {
        Node {
            id: id.into(),
            stage: stage_type.default_config(),
            label: stage_type.display_name().into(),
            position: Position::default(),
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    #[test]
    fn rejects_self_loop() {
        let nodes = vec![node("a", StageType::KnowledgeBase)];
        assert_eq!(
            can_connect(&nodes, &[], "a", "a"),
            Err(PolicyViolation::SelfLoop)
        );
    }

    #[test]
    fn rejects_unknown_endpoints() {
        let nodes = vec![node("a", StageType::KnowledgeBase)];
        assert_eq!(
            can_connect(&nodes, &[], "a", "ghost"),
            Err(PolicyViolation::UnknownEndpoint("ghost".into()))
        );
        assert_eq!(
            can_connect(&nodes, &[], "ghost", "a"),
            Err(PolicyViolation::UnknownEndpoint("ghost".into()))
        );
    }

    #[test]
    fn rejects_output_as_source() {
        let nodes = vec![node("out", StageType::Output), node("llm", StageType::LlmEngine)];
        assert_eq!(
            can_connect(&nodes, &[], "out", "llm"),
            Err(PolicyViolation::OutputAsSource)
        );
    }

    #[test]
    fn rejects_user_query_as_target() {
        let nodes = vec![node("q", StageType::UserQuery), node("kb", StageType::KnowledgeBase)];
        assert_eq!(
            can_connect(&nodes, &[], "kb", "q"),
            Err(PolicyViolation::UserQueryAsTarget)
        );
    }

    #[test]
    fn rejects_second_incoming_edge_to_output() {
        let nodes = vec![
            node("llm", StageType::LlmEngine),
            node("kb", StageType::KnowledgeBase),
            node("out", StageType::Output),
        ];
        let edges = vec![edge("e1", "llm", "out")];
        assert_eq!(
            can_connect(&nodes, &edges, "kb", "out"),
            Err(PolicyViolation::OutputAlreadyFed)
        );
    }

    #[test]
    fn accepts_kb_to_llm() {
        let nodes = vec![node("kb", StageType::KnowledgeBase), node("llm", StageType::LlmEngine)];
        assert_eq!(can_connect(&nodes, &[], "kb", "llm"), Ok(()));
    }

    #[test]
    fn accepts_first_incoming_edge_to_output() {
        let nodes = vec![node("llm", StageType::LlmEngine), node("out", StageType::Output)];
        assert_eq!(can_connect(&nodes, &[], "llm", "out"), Ok(()));
    }

    #[test]
    fn policy_checks_labels_never() {
        // Stage rules bind to the stage type, not the user-editable label.
        let mut renamed = node("out", StageType::Output);
        renamed.label = "KnowledgeBase".into();
        let nodes = vec![renamed, node("llm", StageType::LlmEngine)];
        assert_eq!(
            can_connect(&nodes, &[], "out", "llm"),
            Err(PolicyViolation::OutputAsSource)
        );
    }
}
