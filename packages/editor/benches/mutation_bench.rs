use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagecraft_editor::{traversal, EditSession, Mutation};
use serde_json::json;

/// A page with nested sections, a columns row, and tabs with pane content.
fn build_page() -> (EditSession, String) {
    let mut session = EditSession::new("bench-page");

    session
        .apply(Mutation::InsertAtEnd {
            kind: "navigation".to_string(),
        })
        .unwrap();

    for _ in 0..8 {
        session
            .apply(Mutation::InsertAtEnd {
                kind: "section".to_string(),
            })
            .unwrap();
        let section_id = session.selection().node_id().unwrap().to_string();
        for _ in 0..4 {
            session
                .apply(Mutation::InsertIntoContainer {
                    kind: "text".to_string(),
                    container_id: section_id.clone(),
                    slot_id: None,
                })
                .unwrap();
        }
    }

    session
        .apply(Mutation::InsertAtEnd {
            kind: "tabs".to_string(),
        })
        .unwrap();
    let tabs_id = session.selection().node_id().unwrap().to_string();
    session
        .apply(Mutation::InsertIntoContainer {
            kind: "hero".to_string(),
            container_id: tabs_id,
            slot_id: None,
        })
        .unwrap();

    // Deepest block in the page: the hero inside the tab pane.
    let deep_id = session.selection().node_id().unwrap().to_string();
    (session, deep_id)
}

fn locate_deep_node(c: &mut Criterion) {
    let (session, deep_id) = build_page();
    let roots = session.tree().to_vec();

    c.bench_function("locate_deep_node", |b| {
        b.iter(|| traversal::locate(black_box(&roots), black_box(&deep_id)))
    });
}

fn apply_payload_update(c: &mut Criterion) {
    let (mut session, deep_id) = build_page();

    c.bench_function("apply_payload_update", |b| {
        b.iter(|| {
            session
                .apply(Mutation::UpdatePayload {
                    node_id: deep_id.clone(),
                    patch: json!({ "heading": "Benchmark" }),
                })
                .unwrap()
        })
    });
}

fn duplicate_section(c: &mut Criterion) {
    let (session, _) = build_page();
    let section_id = session.tree()[1].id.clone();

    c.bench_function("duplicate_section", |b| {
        b.iter(|| {
            let mut scratch = EditSession::with_tree("bench-scratch", session.tree().to_vec());
            scratch
                .apply(Mutation::DuplicateNode {
                    node_id: section_id.clone(),
                })
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    locate_deep_node,
    apply_payload_update,
    duplicate_section
);
criterion_main!(benches);
