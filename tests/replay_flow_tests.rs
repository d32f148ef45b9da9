use pipe_draw_engine::app::host::{ElementKind, OperationOutcome};
use pipe_draw_engine::app::replay::parse_script;
use pipe_draw_engine::{run_script, ElementTag, SessionAction, ToolOptions, ToolPreset};

#[test]
fn test_pipe_chain_demo_builds_grouped_soft_pipe() {
    let script = parse_script(include_str!("../demos/pipe_chain.json"))
        .expect("Demo-Skript sollte parsebar sein");
    assert_eq!(script.tool, ToolPreset::Pipe);

    let report = run_script(&script, &ToolOptions::default()).expect("Replay sollte durchlaufen");

    assert!(report.errors.is_empty(), "Fehler: {:?}", report.errors);
    assert_eq!(report.host.committed_operations(), 1);

    let pipes: Vec<_> = report
        .host
        .elements()
        .iter()
        .filter(|e| matches!(e.kind, ElementKind::Pipe { .. }))
        .collect();
    assert_eq!(pipes.len(), 3);
    assert!(pipes.iter().all(|e| e.soft && e.parent.is_some()));

    let ends: Vec<_> = pipes
        .iter()
        .filter_map(|e| match &e.kind {
            ElementKind::Pipe { segment } => segment.end(),
            _ => None,
        })
        .collect();
    assert_eq!(ends[0], glam::DVec3::new(2.0, 0.0, 0.0));
    assert_eq!(ends[1], glam::DVec3::new(2.0, 0.0, 1.5));
    assert_eq!(ends[2], glam::DVec3::new(2.0, 4.0, 1.5));

    assert_eq!(report.actions.last(), Some(&SessionAction::Finished));
}

#[test]
fn test_curve_demo_keeps_committed_arc_after_cancel() {
    let script = parse_script(include_str!("../demos/curve_arc.json"))
        .expect("Demo-Skript sollte parsebar sein");

    let report = run_script(&script, &ToolOptions::default()).expect("Replay sollte durchlaufen");

    // ungültige Texteingabe wird protokolliert, das Replay läuft weiter
    assert_eq!(report.errors.len(), 1);

    let outcomes: Vec<_> = report
        .host
        .operations()
        .iter()
        .map(|op| op.outcome)
        .collect();
    assert_eq!(
        outcomes,
        vec![
            OperationOutcome::Committed,
            OperationOutcome::Committed,
            OperationOutcome::Aborted
        ]
    );

    let curve = report
        .host
        .elements_tagged(ElementTag::Curve)
        .next()
        .expect("Bogen sollte erhalten bleiben");
    match &curve.kind {
        ElementKind::Curve { points } => assert_eq!(points.len(), 101),
        other => panic!("Kurve erwartet, erhalten: {other:?}"),
    }

    let group = report
        .host
        .elements_tagged(ElementTag::Box)
        .next()
        .expect("Box-Gruppe sollte existieren");
    assert_eq!(group.layer.as_deref(), Some("Bauteile"));
    assert_eq!(report.actions.last(), Some(&SessionAction::Cancelled));
}

#[test]
fn test_report_serializes_to_json() {
    let script = parse_script(include_str!("../demos/pipe_chain.json"))
        .expect("Demo-Skript sollte parsebar sein");
    let report = run_script(&script, &ToolOptions::default()).expect("Replay sollte durchlaufen");

    let json = serde_json::to_value(&report).expect("Report sollte serialisierbar sein");

    let elements = json["host"]["elements"]
        .as_array()
        .expect("Element-Liste erwartet");
    assert_eq!(elements.len(), 4);
    assert!(elements.iter().any(|e| e["kind"] == "group"));
    assert_eq!(json["host"]["operations"][0]["outcome"], "committed");
}
