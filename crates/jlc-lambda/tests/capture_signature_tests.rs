use super::*;
use crate::test_fixtures::*;

fn signature_of(types: &[JType]) -> CaptureSignature {
    CaptureSignature::from_types(types)
}

#[test]
fn test_kind_order_matches_slot_order() {
    assert!(CaptureKind::Boolean < CaptureKind::Byte);
    assert!(CaptureKind::Double < CaptureKind::Reference);
    assert_eq!(CaptureKind::ALL.len(), CaptureKind::COUNT);
    for (index, kind) in CaptureKind::ALL.into_iter().enumerate() {
        assert_eq!(kind.index(), index);
    }
}

#[test]
fn test_kind_of_types() {
    assert_eq!(CaptureKind::of(&int()), CaptureKind::Int);
    assert_eq!(CaptureKind::of(&long()), CaptureKind::Long);
    assert_eq!(CaptureKind::of(&JType::string()), CaptureKind::Reference);
    assert_eq!(
        CaptureKind::of(&JType::array_of(int())),
        CaptureKind::Reference
    );
}

#[test]
#[should_panic(expected = "BUG")]
fn test_void_capture_panics() {
    let _ = CaptureKind::of(&JType::Void);
}

#[test]
fn test_counts_and_total() {
    let sig = signature_of(&[int(), JType::string(), int(), long()]);
    assert_eq!(sig.count(CaptureKind::Int), 2);
    assert_eq!(sig.count(CaptureKind::Long), 1);
    assert_eq!(sig.count(CaptureKind::Reference), 1);
    assert_eq!(sig.count(CaptureKind::Boolean), 0);
    assert_eq!(sig.total_count(), 4);
    assert!(!sig.is_empty());
}

#[test]
fn test_empty_signature() {
    let sig = CaptureSignature::of(&LambdaBuilder::runnable("p.A", "b").build());
    assert!(sig.is_empty());
    assert_eq!(sig.total_count(), 0);
    assert_eq!(sig, CaptureSignature::default());
    assert!(sig.field_types().is_empty());
}

#[test]
fn test_this_capture_counts_as_reference() {
    let lambda = LambdaBuilder::runnable("p.A", "b")
        .capture_this()
        .capture("x", int())
        .build();
    let sig = CaptureSignature::of(&lambda);
    assert_eq!(sig.count(CaptureKind::Reference), 1);
    assert_eq!(sig.count(CaptureKind::Int), 1);
}

#[test]
fn test_unique_id_depends_only_on_counts() {
    let a = signature_of(&[int(), JType::string()]);
    let b = signature_of(&[JType::class("p.Other"), int()]);
    let c = signature_of(&[int(), int()]);
    assert_eq!(a.unique_id(), b.unique_id());
    assert_ne!(a.unique_id(), c.unique_id());
    assert_eq!(a.unique_id().len(), CaptureKind::COUNT * 4);
}

#[test]
fn test_unique_id_is_unambiguous_for_large_counts() {
    let many_ints: Vec<JType> = (0..17).map(|_| int()).collect();
    let mut split = vec![int(); 1];
    split.extend((0..7).map(|_| long()));
    assert_ne!(
        signature_of(&many_ints).unique_id(),
        signature_of(&split).unique_id()
    );
}

#[test]
fn test_field_types_follow_slot_order() {
    let sig = signature_of(&[JType::string(), long(), boolean(), int()]);
    assert_eq!(
        sig.field_types(),
        vec![boolean(), int(), long(), JType::object()]
    );
}

#[test]
fn test_mapping_groups_by_kind_and_keeps_relative_order() {
    let lambda = LambdaBuilder::runnable("p.A", "b")
        .capture("s", JType::string())
        .capture("i", int())
        .capture("t", JType::string())
        .capture("j", int())
        .build();
    let sig = CaptureSignature::of(&lambda);
    // Slots: int, int, ref, ref
    assert_eq!(sig.create_mapping(&lambda).as_slice(), &[2, 0, 3, 1]);
}

#[test]
fn test_mapping_is_a_bijection() {
    let lambda = LambdaBuilder::runnable("p.A", "b")
        .capture_this()
        .capture("d", JType::Primitive(PrimitiveKind::Double))
        .capture("z", boolean())
        .capture("o", JType::object())
        .capture("c", JType::Primitive(PrimitiveKind::Char))
        .build();
    let sig = CaptureSignature::of(&lambda);
    let mut mapping = sig.create_mapping(&lambda).to_vec();
    assert_eq!(mapping.len(), sig.total_count());
    mapping.sort_unstable();
    assert_eq!(mapping, (0..sig.total_count()).collect::<Vec<_>>());
}

#[test]
fn test_mapped_slots_have_matching_field_kinds() {
    let lambda = LambdaBuilder::runnable("p.A", "b")
        .capture_this()
        .capture("n", long())
        .capture("s", JType::string())
        .build();
    let sig = CaptureSignature::of(&lambda);
    let field_types = sig.field_types();
    let mapping = sig.create_mapping(&lambda);
    for (ty, slot) in lambda.capture_types().iter().zip(mapping) {
        assert_eq!(
            CaptureKind::of(ty).field_type(),
            field_types[slot],
            "capture of type {ty} landed in slot {slot}"
        );
    }
}

#[test]
#[should_panic(expected = "different capture signature")]
fn test_mapping_for_foreign_lambda_panics() {
    let with_int = LambdaBuilder::runnable("p.A", "b")
        .capture("i", int())
        .build();
    let with_long = LambdaBuilder::runnable("p.A", "c")
        .capture("l", long())
        .build();
    let _ = CaptureSignature::of(&with_int).create_mapping(&with_long);
}
