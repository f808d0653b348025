//! Integration tests for the DiagramContext API
//!
//! These tests drive the public API the way a diagram script does.

use std::{
    cell::RefCell,
    fs,
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
    thread,
};

use archdraw::{
    ArchdrawError, DiagramContext, ReferenceError, ScopeError,
    identifier::{ContextId, ElementId},
    render::{self, RenderBackend, graphviz::GraphvizBackend},
    semantic::{Diagram, Direction, ElementKind, Member},
    style::{Attributes, GraphStyle},
};

/// Backend that records what it was asked to render.
#[derive(Default)]
struct RecordingBackend {
    rendered: RefCell<Vec<(String, usize, usize)>>,
}

impl RenderBackend for RecordingBackend {
    fn render(&self, diagram: &Diagram, _output: &Path) -> Result<(), render::Error> {
        self.rendered.borrow_mut().push((
            diagram.title().to_string(),
            diagram.elements().len(),
            diagram.relationships().len(),
        ));
        Ok(())
    }
}

/// Backend that always fails, the way a missing Graphviz install does.
struct FailingBackend;

impl RenderBackend for FailingBackend {
    fn render(&self, _diagram: &Diagram, _output: &Path) -> Result<(), render::Error> {
        Err(render::Error::Render("dot exited with status 1".to_string()))
    }
}

// Only one context may be open per process, so tests that open one take turns
static CONTEXT_LOCK: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    CONTEXT_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `graph`, `node` and `edge` keywords that are not followed by an
/// attribute list, which Graphviz rejects.
fn bare_attribute_statements(dot: &str) -> Vec<&'static str> {
    let mut bare = Vec::new();
    for keyword in ["graph", "node", "edge"] {
        for (pos, _) in dot.match_indices(keyword) {
            let before = dot[..pos].chars().next_back();
            let rest = &dot[pos + keyword.len()..];
            let starts_word =
                before.is_none_or(|c| c.is_whitespace() || matches!(c, ';' | '{' | '}'));
            let ends_word = !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_');
            if starts_word && ends_word && !rest.trim_start().starts_with('[') {
                bare.push(keyword);
            }
        }
    }
    bare
}

fn open(title: &str) -> DiagramContext {
    DiagramContext::open(title, Direction::TopToBottom, GraphStyle::default())
        .expect("Failed to open context")
}

#[test]
fn test_boundary_with_server_and_root_storage() {
    let _serial = serial();
    let mut ctx = open("Writes");

    let (b1, e1) = {
        let mut b1 = ctx.push_boundary("B1", Attributes::new());
        let e1 = b1.create_element(ElementKind::Server, "S1", "", Attributes::new());
        (b1.id(), e1)
    };
    let e2 = ctx.create_element(ElementKind::Storage, "Store", "", Attributes::new());
    ctx.connect(e1, e2, "writes", Attributes::new())
        .expect("Failed to connect");

    let recorder = RecordingBackend::default();
    let diagram = ctx.close(&recorder, "writes.png").expect("Failed to close");

    assert_eq!(diagram.roots(), &[Member::Boundary(b1), Member::Element(e2)]);
    assert_eq!(
        diagram.boundary(b1).unwrap().children(),
        &[Member::Element(e1)]
    );
    assert_eq!(diagram.relationships().len(), 1);
    let writes = &diagram.relationships()[0];
    assert_eq!((writes.source(), writes.target()), (e1, e2));
    assert_eq!(writes.label(), "writes");
    assert_eq!(
        *recorder.rendered.borrow(),
        vec![("Writes".to_string(), 2, 1)]
    );
}

#[test]
fn test_nested_boundaries() {
    let _serial = serial();
    let mut ctx = open("Nested");

    let (outer, inner, deep) = {
        let mut outer = ctx.push_boundary("Local LLM Servers", Attributes::new());
        let (inner, deep) = {
            let mut inner = outer.push_boundary("Server 1", Attributes::new());
            let deep = inner.create_element(ElementKind::Server, "SQLCoder", "", Attributes::new());
            (inner.id(), deep)
        };
        (outer.id(), inner, deep)
    };

    let diagram = ctx.finish().unwrap();

    assert_eq!(diagram.element(deep).unwrap().parent(), Some(inner));
    assert_eq!(diagram.boundary(inner).unwrap().parent(), Some(outer));
    assert_eq!(diagram.boundary(outer).unwrap().parent(), None);
    assert_eq!(diagram.depth(inner), 1);
    let ancestors: Vec<_> = diagram.ancestors(inner).map(|b| b.id()).collect();
    assert_eq!(ancestors, vec![outer]);
}

#[test]
fn test_pop_without_open_boundary() {
    fn build(output: &Path) -> Result<Diagram, ArchdrawError> {
        let mut ctx = DiagramContext::open("Empty pop", Direction::default(), GraphStyle::default())?;
        ctx.create_element(ElementKind::Server, "S1", "", Attributes::new());
        ctx.pop_boundary()?;
        ctx.close(&GraphvizBackend::default(), output)
    }

    let _serial = serial();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("empty_pop.dot");

    let err = build(&output).unwrap_err();

    assert!(err.is_scope());
    assert!(matches!(
        err,
        ArchdrawError::Scope(ScopeError::EmptyBoundaryStack)
    ));
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    // The failed build released the active slot
    assert!(DiagramContext::open("After", Direction::default(), GraphStyle::default()).is_ok());
}

#[test]
fn test_connect_to_unknown_element() {
    let _serial = serial();
    let mut ctx = open("Unknown");
    let e1 = ctx.create_element(ElementKind::Server, "S1", "", Attributes::new());
    let foreign = ElementId::new(ContextId::next(), 0);

    let err = ctx
        .connect(e1, foreign, "x", Attributes::new())
        .unwrap_err();

    assert!(matches!(
        err,
        ArchdrawError::Reference(ReferenceError::UnknownElement { element, .. }) if element == foreign
    ));
    assert_eq!(ctx.relationship_count(), 0);
    assert_eq!(ctx.element_count(), 1);
}

#[test]
fn test_handle_from_closed_context_rejected() {
    let _serial = serial();
    let stale = {
        let mut first = open("First");
        let id = first.create_element(ElementKind::Generic, "Old", "", Attributes::new());
        first.finish().unwrap();
        id
    };

    let mut second = open("Second");
    let fresh = second.create_element(ElementKind::Generic, "New", "", Attributes::new());

    // Same index, different context
    assert_eq!(stale.index(), fresh.index());
    let err = second
        .connect(fresh, stale, "x", Attributes::new())
        .unwrap_err();
    assert!(err.is_reference());
}

#[test]
fn test_second_context_on_same_thread() {
    let _serial = serial();
    let _first = open("First");

    let err = DiagramContext::open("Second", Direction::default(), GraphStyle::default())
        .unwrap_err();

    assert!(matches!(err, ArchdrawError::Scope(ScopeError::ContextActive)));
}

#[test]
fn test_second_context_on_other_thread() {
    let _serial = serial();
    let first = open("First");

    let second = thread::spawn(|| {
        DiagramContext::open("Second", Direction::default(), GraphStyle::default())
            .map(|_| ())
            .map_err(|err| err.to_string())
    })
    .join()
    .unwrap();

    assert_eq!(
        second,
        Err("Scope error: a diagram context is already active".to_string())
    );

    drop(first);
    let reopened = thread::spawn(|| {
        DiagramContext::open("Third", Direction::default(), GraphStyle::default()).is_ok()
    })
    .join()
    .unwrap();
    assert!(reopened);
}

#[test]
fn test_close_with_open_boundaries() {
    let _serial = serial();
    let recorder = RecordingBackend::default();
    let mut ctx = open("Unbalanced");
    ctx.open_boundary("outer", Attributes::new());
    ctx.open_boundary("inner", Attributes::new());

    let err = ctx.close(&recorder, "unbalanced.png").unwrap_err();

    assert!(matches!(
        err,
        ArchdrawError::Scope(ScopeError::UnclosedBoundaries { open: 2, .. })
    ));
    assert!(recorder.rendered.borrow().is_empty());
}

#[test]
fn test_guard_released_on_early_return() {
    fn build(ctx: &mut DiagramContext, missing: ElementId) -> Result<(), ArchdrawError> {
        let mut layer = ctx.push_boundary("Integration Layer", Attributes::new());
        let rag = layer.create_element(ElementKind::Container, "RAG", "", Attributes::new());
        layer.connect(rag, missing, "x", Attributes::new())?;
        Ok(())
    }

    let _serial = serial();
    let mut ctx = open("Early return");
    let missing = ElementId::new(ctx.id(), 42);

    assert!(build(&mut ctx, missing).is_err());
    assert_eq!(ctx.depth(), 0);
    assert!(ctx.finish().is_ok());
}

#[test]
fn test_parallel_relationships_preserved() {
    let _serial = serial();
    let mut ctx = open("Load balancer");
    let lb = ctx.create_element(ElementKind::NetworkGateway, "LB", "", Attributes::new());
    let web = ctx.create_element(ElementKind::Container, "Web", "", Attributes::new());

    let ids: Vec<_> = (0..3)
        .map(|_| ctx.connect(lb, web, "Routes to", Attributes::new()).unwrap())
        .collect();

    let diagram = ctx.finish().unwrap();
    assert_eq!(diagram.relationships().len(), 3);
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|pair| pair[0] != pair[1]));
}

#[test]
fn test_chain_matches_flat_declarations() {
    fn labels(diagram: &Diagram) -> Vec<(usize, usize, String)> {
        diagram
            .relationships()
            .iter()
            .map(|r| (r.source().index(), r.target().index(), r.label().to_string()))
            .collect()
    }

    let _serial = serial();
    let chained = {
        let mut ctx = open("Chained");
        let a = ctx.create_element(ElementKind::Person, "A", "", Attributes::new());
        let b = ctx.create_element(ElementKind::Container, "B", "", Attributes::new());
        let c = ctx.create_element(ElementKind::Container, "C", "", Attributes::new());
        ctx.chain(a)
            .to(b, "first", Attributes::new())
            .unwrap()
            .to(c, "second", Attributes::new())
            .unwrap();
        ctx.finish().unwrap()
    };

    let flat = {
        let mut ctx = open("Flat");
        let a = ctx.create_element(ElementKind::Person, "A", "", Attributes::new());
        let b = ctx.create_element(ElementKind::Container, "B", "", Attributes::new());
        let c = ctx.create_element(ElementKind::Container, "C", "", Attributes::new());
        ctx.connect(a, b, "first", Attributes::new()).unwrap();
        ctx.connect(b, c, "second", Attributes::new()).unwrap();
        ctx.finish().unwrap()
    };

    assert_eq!(labels(&chained), labels(&flat));
}

#[test]
fn test_empty_diagram_is_rendered() {
    let _serial = serial();
    let recorder = RecordingBackend::default();
    let ctx = open("Nothing");

    let diagram = ctx.close(&recorder, "nothing.png").unwrap();

    assert!(diagram.is_empty());
    assert_eq!(recorder.rendered.borrow().len(), 1);
}

#[test]
fn test_empty_diagram_renders_valid_dot() {
    let _serial = serial();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("empty.dot");

    let diagram = open("Nothing")
        .close(&GraphvizBackend::default(), &output)
        .unwrap();

    assert!(diagram.is_empty());
    let dot = fs::read_to_string(&output).unwrap();
    assert!(dot.contains("digraph"));
    assert_eq!(bare_attribute_statements(&dot), Vec::<&str>::new());
}

#[test]
fn test_render_failure_surfaces_as_render_error() {
    let _serial = serial();
    let ctx = open("Broken");

    let err = ctx.close(&FailingBackend, "broken.png").unwrap_err();

    assert!(err.is_render());
    assert_eq!(err.to_string(), "Render error: dot exited with status 1");
}

#[test]
fn test_kind_defaults_and_overrides() {
    let _serial = serial();
    let mut ctx = open("Styles");
    let db = ctx.create_element(
        ElementKind::Database,
        "Neo4j",
        "",
        Attributes::new().with("fillcolor", "orange"),
    );
    let diagram = ctx.finish().unwrap();

    let style = diagram.element(db).unwrap().effective_style();
    assert_eq!(style.get("shape"), Some("cylinder"));
    assert_eq!(style.get("fillcolor"), Some("orange"));
}

#[test]
fn test_graphviz_dot_file_written() {
    let _serial = serial();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("architecture.dot");

    let mut ctx = open("PromptCraft");
    let user = ctx.create_element(ElementKind::Person, "User", "Prompt Engineer", Attributes::new());
    let app = ctx.with_boundary("Frontend", Attributes::new(), |ctx| {
        Ok::<_, ArchdrawError>(ctx.create_element(
            ElementKind::Container,
            "Next.js App",
            "React + TypeScript",
            Attributes::new(),
        ))
    })
    .unwrap();
    ctx.connect(user, app, "Accesses", Attributes::new()).unwrap();

    ctx.close(&GraphvizBackend::default(), &output).unwrap();

    let dot = fs::read_to_string(&output).unwrap();
    assert!(dot.contains("digraph"));
    assert!(dot.contains("cluster_b0"));
    assert!(dot.contains("Accesses"));
    assert!(dot.contains("Prompt Engineer"));
    assert_eq!(dot.matches("->").count(), 1);
    assert_eq!(bare_attribute_statements(&dot), Vec::<&str>::new());
}

mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Element,
        Push,
        Pop,
    }

    // ===================
    // Strategies
    // ===================

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Element), Just(Op::Push), Just(Op::Pop)]
    }

    fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
        prop::collection::vec(op_strategy(), 0..64)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every pop either closes the innermost open boundary or fails on an
    /// empty stack, and every element ends up under the boundary that was on
    /// top when it was created.
    fn check_containment_follows_stack(ops: &[Op]) -> Result<(), TestCaseError> {
        let _serial = serial();
        let mut ctx = open("Containment");
        let mut open_stack = Vec::new();
        let mut expected_parents = Vec::new();

        for op in ops {
            match op {
                Op::Element => {
                    let id = ctx.create_element(ElementKind::Generic, "n", "", Attributes::new());
                    expected_parents.push((id, open_stack.last().copied()));
                }
                Op::Push => {
                    let id = ctx.open_boundary("b", Attributes::new());
                    open_stack.push(id);
                }
                Op::Pop => match (ctx.pop_boundary(), open_stack.pop()) {
                    (Ok(closed), Some(expected)) => prop_assert_eq!(closed, expected),
                    (Err(err), None) => prop_assert!(err.is_scope()),
                    (result, expected) => {
                        prop_assert!(false, "pop returned {:?}, expected {:?}", result, expected)
                    }
                },
            }
            prop_assert_eq!(ctx.depth(), open_stack.len());
        }

        while ctx.depth() > 0 {
            ctx.pop_boundary().map_err(|err| TestCaseError::fail(err.to_string()))?;
        }
        let diagram = ctx
            .finish()
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        for (id, parent) in expected_parents {
            prop_assert_eq!(diagram.element(id).map(|e| e.parent()), Some(parent));
        }
        Ok(())
    }

    /// Each member appears exactly once in the containment forest.
    fn check_forest_members_unique(ops: &[Op]) -> Result<(), TestCaseError> {
        let _serial = serial();
        let mut ctx = open("Forest");
        for op in ops {
            match op {
                Op::Element => {
                    ctx.create_element(ElementKind::Generic, "n", "", Attributes::new());
                }
                Op::Push => {
                    ctx.open_boundary("b", Attributes::new());
                }
                Op::Pop => {
                    let _ = ctx.pop_boundary();
                }
            }
        }
        while ctx.pop_boundary().is_ok() {}
        let diagram = ctx
            .finish()
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let mut members: Vec<Member> = diagram.roots().to_vec();
        for boundary in diagram.boundaries() {
            members.extend_from_slice(boundary.children());
        }

        prop_assert_eq!(
            members.len(),
            diagram.elements().len() + diagram.boundaries().len()
        );
        let mut unique = members.clone();
        unique.sort_by_key(|member| match member {
            Member::Element(id) => (0, id.index()),
            Member::Boundary(id) => (1, id.index()),
        });
        unique.dedup();
        prop_assert_eq!(unique.len(), members.len());
        Ok(())
    }

    /// N connects between the same pair yield N relationships.
    fn check_parallel_edges_kept(count: usize) -> Result<(), TestCaseError> {
        let _serial = serial();
        let mut ctx = open("Parallel");
        let a = ctx.create_element(ElementKind::Server, "a", "", Attributes::new());
        let b = ctx.create_element(ElementKind::Server, "b", "", Attributes::new());

        for _ in 0..count {
            ctx.connect(a, b, "same", Attributes::new())
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
        }

        prop_assert_eq!(ctx.relationship_count(), count);
        Ok(())
    }

    proptest! {
        #[test]
        fn containment_follows_stack(ops in ops_strategy()) {
            check_containment_follows_stack(&ops)?;
        }

        #[test]
        fn forest_members_unique(ops in ops_strategy()) {
            check_forest_members_unique(&ops)?;
        }

        #[test]
        fn parallel_edges_kept(count in 0usize..32) {
            check_parallel_edges_kept(count)?;
        }
    }
}
