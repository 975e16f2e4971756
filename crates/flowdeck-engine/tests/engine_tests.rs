//! End-to-end tests for flowdeck-engine: build, validate, export, import, run

use async_trait::async_trait;
use flowdeck_core::*;
use flowdeck_engine::*;
use std::sync::Arc;

/// Build the canonical four-stage chain:
/// User Query -> KnowledgeBase -> LLM Engine -> Output.
fn build_chain(store: &mut GraphStore) -> (Node, Node, Node, Node) {
    let q = store.add_node(StageType::UserQuery, Position::new(0.0, 0.0));
    let kb = store.add_node(StageType::KnowledgeBase, Position::new(200.0, 0.0));
    let llm = store.add_node(StageType::LlmEngine, Position::new(400.0, 0.0));
    let out = store.add_node(StageType::Output, Position::new(600.0, 0.0));

    store
        .update_node_config(
            &q.id,
            ConfigPatch::UserQuery {
                prompt: Some("Hi".into()),
            },
        )
        .unwrap();

    store.connect(&q.id, &kb.id, None).unwrap();
    store.connect(&kb.id, &llm.id, None).unwrap();
    store.connect(&llm.id, &out.id, None).unwrap();
    (q, kb, llm, out)
}

struct EchoRunner {
    result: &'static str,
}

#[async_trait]
impl WorkflowRunner for EchoRunner {
    async fn run_workflow(&self, workflow: &Workflow) -> Result<RunnerReply, RunnerFailure> {
        // The dispatch payload is exactly {nodes, edges}.
        assert_eq!(workflow.nodes.len(), 4);
        assert_eq!(workflow.edges.len(), 3);
        Ok(RunnerReply {
            result: Some(self.result.to_string()),
            message: Some("Workflow executed.".into()),
        })
    }
}

// ===========================================================================
// Build -> validate -> run
// ===========================================================================

#[tokio::test]
async fn full_pipeline_runs_and_surfaces_result_verbatim() {
    let mut store = GraphStore::new();
    build_chain(&mut store);

    let workflow = store.snapshot();
    assert_eq!(validate(&workflow), Ok(()));

    let dispatcher = ExecutionDispatcher::new(Arc::new(EchoRunner {
        result: "the answer from the backend",
    }));
    let outcome = dispatcher.run(&workflow).await.unwrap();
    assert_eq!(outcome.message, "the answer from the backend");
}

#[test]
fn isolated_output_is_still_a_validation_error() {
    // Connectivity applies uniformly: an Output node with no incident edges
    // fails validation; there is no exemption for Output.
    let mut store = GraphStore::new();
    let q = store.add_node(StageType::UserQuery, Position::default());
    let kb = store.add_node(StageType::KnowledgeBase, Position::default());
    let llm = store.add_node(StageType::LlmEngine, Position::default());
    store.add_node(StageType::Output, Position::default());

    store
        .update_node_config(
            &q.id,
            ConfigPatch::UserQuery {
                prompt: Some("Hi".into()),
            },
        )
        .unwrap();
    store.connect(&q.id, &kb.id, None).unwrap();
    store.connect(&kb.id, &llm.id, None).unwrap();

    let err = validate(&store.snapshot()).unwrap_err();
    assert_eq!(err, ValidationError::Disconnected("Output".into()));
}

// ===========================================================================
// Policy re-evaluates live state
// ===========================================================================

#[test]
fn output_slot_frees_up_when_feeding_node_removed() {
    let mut store = GraphStore::new();
    let (_q, kb, llm, out) = build_chain(&mut store);

    // Output already has its one incoming edge.
    assert_eq!(
        store.connect(&kb.id, &out.id, None),
        Err(PolicyViolation::OutputAlreadyFed)
    );

    // Removing the feeding node drops its edges; the slot is free again.
    store.remove_node(&llm.id);
    assert!(store.edges().iter().all(|e| e.target != out.id));
    assert!(store.connect(&kb.id, &out.id, None).is_ok());
}

// ===========================================================================
// Export / import
// ===========================================================================

#[test]
fn export_import_roundtrip_through_the_store() {
    let mut store = GraphStore::new();
    build_chain(&mut store);
    let original = store.snapshot();

    let doc = export_workflow(&original).unwrap();
    let imported = import_workflow(doc.as_bytes()).unwrap();
    assert_eq!(imported, original);

    // Import is a full replace.
    let mut other = GraphStore::new();
    other.add_node(StageType::Output, Position::default());
    other.replace_all(imported);
    assert_eq!(other.snapshot(), original);
}

#[test]
fn bad_import_leaves_store_byte_for_byte_unchanged() {
    let mut store = GraphStore::new();
    build_chain(&mut store);
    let before = store.snapshot();

    let err = store
        .apply(Command::Import {
            raw: b"{\"nodes\": [".to_vec(),
        })
        .unwrap_err();
    assert!(matches!(err, CommandError::Import(ImportError::Parse(_))));
    assert_eq!(store.snapshot(), before);
}

// ===========================================================================
// Error reporting stays actionable
// ===========================================================================

#[tokio::test]
async fn validation_failure_blocks_run_with_named_stage() {
    struct NeverRunner;

    #[async_trait]
    impl WorkflowRunner for NeverRunner {
        async fn run_workflow(&self, _: &Workflow) -> Result<RunnerReply, RunnerFailure> {
            panic!("runner must not be contacted for an invalid workflow");
        }
    }

    let mut store = GraphStore::new();
    store.add_node(StageType::UserQuery, Position::default());

    let dispatcher = ExecutionDispatcher::new(Arc::new(NeverRunner));
    let err = dispatcher.run(&store.snapshot()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing required stage: KnowledgeBase"
    );
}
