use super::*;
use crate::test_fixtures::*;
use jlc_ir::JType;

fn collected(lambda: LambdaExpression) -> CollectedLambda {
    let interfaces = InterfaceSignature::of(&lambda, &*JDK).expect("resolves");
    CollectedLambda {
        capture: CaptureSignature::of(&lambda),
        interfaces,
        lambda: Arc::new(lambda),
    }
}

fn key(capture: &str, scope: &str) -> GroupKey {
    GroupKey {
        capture: capture.to_string(),
        interfaces: "Ljava/lang/Runnable;".to_string(),
        scope: scope.to_string(),
    }
}

#[test]
fn test_stable_id_display_and_order() {
    let a = StableId::new("p.A", "m()V", 2);
    let b = StableId::new("p.A", "m()V", 10);
    assert_eq!(a.to_string(), "p.A;;m()V;;2");
    // Ordinals compare numerically.
    assert!(a < b);
    assert!(StableId::new("p.A", "z()V", 0) < StableId::new("p.B", "a()V", 0));
}

#[test]
fn test_group_key_order_is_field_order() {
    assert!(key("0001", "p.Z") < key("0002", "p.A"));
    assert!(key("0001", "p.A") < key("0001", "p.B"));
}

#[test]
fn test_insert_is_idempotent_per_stable_id() {
    let collection = LambdaCollection::new();
    let id = StableId::new("p.A", "m()V", 0);
    let first = collected(LambdaBuilder::runnable("p.A", "first").build());
    let second = collected(LambdaBuilder::runnable("p.A", "second").build());

    collection.insert(key("k", "p.A"), id.clone(), first);
    collection.insert(key("k", "p.A"), id.clone(), second);

    assert_eq!(collection.group_count(), 1);
    assert_eq!(collection.lambda_count(), 1);
    assert!(collection.contains(&id));

    let groups = collection.into_groups(&LambdaOptions::default());
    assert_eq!(groups[0].members[0].lambda().body.signature.name, "first");
}

#[test]
fn test_into_groups_names_follow_sorted_keys() {
    let collection = LambdaCollection::new();
    collection.insert(
        key("b", "q.B"),
        StableId::new("q.B", "m()V", 0),
        collected(LambdaBuilder::runnable("q.B", "x").build()),
    );
    collection.insert(
        key("a", "p.A"),
        StableId::new("p.A", "m()V", 0),
        collected(LambdaBuilder::runnable("p.A", "y").build()),
    );

    let groups = collection.into_groups(&LambdaOptions::default());
    let names: Vec<&str> = groups.iter().map(|g| g.class_name.as_str()).collect();
    assert_eq!(names, vec!["p.-$Lambda$0", "q.-$Lambda$1"]);
    assert_eq!(groups[0].id, GroupId(0));
    assert_eq!(groups[1].id, GroupId(1));
}

#[test]
fn test_members_sorted_by_stable_id() {
    let collection = LambdaCollection::new();
    for ordinal in [3u32, 0, 11, 2] {
        collection.insert(
            key("k", "p.A"),
            StableId::new("p.A", "m()V", ordinal),
            collected(LambdaBuilder::runnable("p.A", &format!("b{ordinal}")).build()),
        );
    }
    let groups = collection.into_groups(&LambdaOptions::default());
    let ordinals: Vec<u32> = groups[0].members.iter().map(|m| m.id.ordinal).collect();
    assert_eq!(ordinals, vec![0, 2, 3, 11]);
    assert_eq!(
        groups[0].member_index(&StableId::new("p.A", "m()V", 3)),
        Some(2)
    );
    assert_eq!(groups[0].member_index(&StableId::new("p.A", "m()V", 1)), None);
}

#[test]
fn test_group_class_names_in_default_package() {
    assert_eq!(
        group_class_names(&["", "p"], "-$Lambda$"),
        vec!["-$Lambda$0".to_string(), "p.-$Lambda$1".to_string()]
    );
}

#[test]
fn test_custom_prefix() {
    assert_eq!(
        group_class_names(&["p"], "Grp$"),
        vec!["p.Grp$0".to_string()]
    );
}

#[test]
fn test_nested_type_uses_top_level_package() {
    let collection = LambdaCollection::new();
    collection.insert(
        key("k", "p.A"),
        StableId::new("p.A$Inner", "m()V", 0),
        collected(LambdaBuilder::runnable("p.A$Inner", "b").build()),
    );
    let groups = collection.into_groups(&LambdaOptions::default());
    assert_eq!(groups[0].class_name, "p.-$Lambda$0");
}

#[test]
fn test_id_type_boundaries() {
    let group_of = |size: usize| {
        let template = collected(LambdaBuilder::runnable("p.A", "b").build());
        LambdaGroup {
            id: GroupId(0),
            key: key("k", "p.A"),
            class_name: "p.-$Lambda$0".to_string(),
            capture: template.capture,
            members: (0..size)
                .map(|i| GroupMember {
                    id: StableId::new("p.A", "m()V", i as u32),
                    collected: template.clone(),
                })
                .collect(),
        }
    };

    assert!(!group_of(1).needs_id_field());
    assert!(group_of(2).needs_id_field());
    assert_eq!(group_of(128).id_type(), PrimitiveKind::Byte);
    assert_eq!(group_of(129).id_type(), PrimitiveKind::Short);
    assert_eq!(group_of(32_768).id_type(), PrimitiveKind::Short);
    assert_eq!(group_of(32_769).id_type(), PrimitiveKind::Int);
}

#[test]
fn test_capture_of_group_comes_from_members() {
    let collection = LambdaCollection::new();
    let lambda = LambdaBuilder::runnable("p.A", "b")
        .capture("s", JType::string())
        .build();
    let expected = CaptureSignature::of(&lambda);
    collection.insert(
        key(&expected.unique_id(), "p.A"),
        StableId::new("p.A", "m()V", 0),
        collected(lambda),
    );
    let groups = collection.into_groups(&LambdaOptions::default());
    assert_eq!(groups[0].capture, expected);
}
