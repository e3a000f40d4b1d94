use super::*;

#[test]
fn test_jdk_class_path_resolves_functional_interfaces() {
    let class_path = ClassPath::with_jdk();
    assert!(class_path.is_resolved("java.lang.Runnable"));
    assert!(class_path.is_resolved("java.util.Comparator"));
    assert!(!class_path.is_resolved("com.example.Missing"));
    assert_eq!(
        class_path.super_interfaces("java.util.function.UnaryOperator"),
        Some(&["java.util.function.Function".to_string()][..])
    );
    assert_eq!(class_path.super_interfaces("com.example.Missing"), None);
}

#[test]
fn test_program_interfaces_override_jdk_entries() {
    let program = Program {
        interfaces: vec![
            InterfaceDecl::new("p.Task", &["java.lang.Runnable"]),
            InterfaceDecl::new("java.lang.Runnable", &["java.io.Serializable"]),
        ],
        ..Program::default()
    };
    let class_path = ClassPath::for_program(&program);
    assert_eq!(
        class_path.super_interfaces("p.Task"),
        Some(&["java.lang.Runnable".to_string()][..])
    );
    assert_eq!(
        class_path.super_interfaces("java.lang.Runnable"),
        Some(&["java.io.Serializable".to_string()][..])
    );
}
