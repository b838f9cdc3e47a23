//! Relation modification workflows

use scenedoc_core::{ElementKind, ElementRef, Error, FrameValue, SetMode, Uid};
use scenedoc_document::{Document, RdfRole};

fn follows(doc: &mut Document, subject: Uid, object: Uid, frames: FrameValue, uid: Option<Uid>, mode: SetMode) -> Uid {
    doc.add_relation(
        "follows",
        "follows",
        &[ElementRef::object(subject)],
        &[ElementRef::object(object)],
        frames,
        uid,
        mode,
    )
    .unwrap()
}

#[test]
fn test_modify_static_relation() {
    let mut doc = Document::new();
    let car1 = doc.add_object("car1", "car", FrameValue::Static).unwrap();
    let car2 = doc.add_object("car2", "car", FrameValue::Static).unwrap();
    let car3 = doc.add_object("car3", "car", FrameValue::Static).unwrap();

    let rel = follows(&mut doc, car1, car2, FrameValue::Static, None, SetMode::Union);
    let relation = doc.get_relation(&rel).unwrap();
    assert_eq!(relation.rdf_subjects()[0], ElementRef::object(car1));
    assert_eq!(relation.rdf_objects(), &[ElementRef::object(car2)]);

    let same = follows(&mut doc, car1, car3, FrameValue::Static, Some(rel), SetMode::Replace);
    assert_eq!(same, rel);
    let relation = doc.get_relation(&rel).unwrap();
    assert_eq!(relation.rdf_subjects(), &[ElementRef::object(car1)]);
    assert_eq!(relation.rdf_objects(), &[ElementRef::object(car3)]);
    assert_eq!(doc.num_elements(ElementKind::Relation), 1);
}

#[test]
fn test_modify_framed_relation() {
    let mut doc = Document::new();
    let car1 = doc.add_object("car1", "car", FrameValue::Static).unwrap();
    let ped1 = doc.add_object("ped1", "ped", FrameValue::Interval(0, 10)).unwrap();
    let ped2 = doc.add_object("ped2", "ped", FrameValue::Interval(3, 7)).unwrap();

    let rel = follows(&mut doc, ped2, ped1, FrameValue::Interval(5, 6), None, SetMode::Union);
    assert_eq!(doc.get_relation(&rel).unwrap().rdf_objects(), &[ElementRef::object(ped1)]);
    assert!(doc.frame(5).unwrap().contains(ElementKind::Relation, &rel));

    follows(&mut doc, ped2, car1, FrameValue::Interval(5, 6), Some(rel), SetMode::Replace);
    let relation = doc.get_relation(&rel).unwrap();
    assert_eq!(relation.rdf_subjects(), &[ElementRef::object(ped2)]);
    assert_eq!(relation.rdf_objects(), &[ElementRef::object(car1)]);
    assert_eq!(relation.frame_intervals().to_pairs(), vec![(5, 6)]);
}

#[test]
fn test_relation_frames_replace_prunes_index() {
    let mut doc = Document::new();
    let a = doc.add_object("a", "#Car", FrameValue::Static).unwrap();
    let b = doc.add_object("b", "#Car", FrameValue::Static).unwrap();
    let rel = follows(&mut doc, a, b, FrameValue::Interval(0, 9), None, SetMode::Union);
    follows(&mut doc, a, b, FrameValue::Interval(4, 5), Some(rel), SetMode::Replace);

    assert_eq!(doc.frame_intervals().to_pairs(), vec![(4, 5)]);
    assert!(doc.frame(0).is_none());
    assert_eq!(doc.relation_has_frame_intervals(&rel), Some(true));
}

#[test]
fn test_references_across_kinds() {
    let mut doc = Document::new();
    let ped = doc.add_object("ped", "#Pedestrian", FrameValue::Interval(0, 3)).unwrap();
    let walk = doc.add_action("walk", "#Walking", FrameValue::Interval(0, 3)).unwrap();
    let rel = doc
        .add_relation_subject_object("performs", "#performs", ElementRef::object(ped), ElementRef::action(walk), FrameValue::Static)
        .unwrap();
    let ctx = doc.add_context("rain", "#Weather", FrameValue::Static).unwrap();
    doc.add_rdf(rel, RdfRole::Object, ElementRef::new(ElementKind::Context, ctx))
        .unwrap();

    let relation = doc.get_relation(&rel).unwrap();
    assert_eq!(relation.rdf_objects().len(), 2);
    assert!(relation.references(&ElementRef::new(ElementKind::Context, ctx)));
    assert_eq!(doc.relations_referencing(&ElementRef::action(walk)), vec![rel]);
}

#[test]
fn test_rejected_relation_changes_nothing() {
    let mut doc = Document::new();
    let a = doc.add_object("a", "#Car", FrameValue::Static).unwrap();
    let rel = doc
        .add_relation("r", "#isNear", &[ElementRef::object(a)], &[], FrameValue::Static, None, SetMode::Union)
        .unwrap();
    let before = doc.clone();

    let err = doc
        .add_relation("r", "#isNear", &[], &[ElementRef::object(99u64)], FrameValue::Frame(1), Some(rel), SetMode::Replace)
        .unwrap_err();
    assert!(matches!(err, Error::DanglingReference { .. }));

    let err = doc
        .add_rdf(rel, RdfRole::Subject, ElementRef::new(ElementKind::Event, 0u64))
        .unwrap_err();
    assert!(matches!(err, Error::DanglingReference { kind: ElementKind::Event, .. }));
    assert_eq!(doc, before);
}
