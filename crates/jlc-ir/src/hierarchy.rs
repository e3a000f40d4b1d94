//! Interface hierarchy lookup.
//!
//! The lambda pass only needs to know, for an interface name, which
//! interfaces it directly extends. Anything it cannot find is a phantom type:
//! referenced by the program but missing from the classpath.

use crate::program::{InterfaceDecl, Program};
use crate::types::{JType, MethodSignature};
use rustc_hash::FxHashMap;

/// Read-only view of the interface hierarchy, shared by parallel tasks.
pub trait TypeHierarchy: Sync {
    fn interface(&self, name: &str) -> Option<&InterfaceDecl>;

    /// Direct super-interfaces, or `None` when `name` is unresolved.
    fn super_interfaces(&self, name: &str) -> Option<&[String]> {
        self.interface(name).map(|i| i.super_interfaces.as_slice())
    }

    fn is_resolved(&self, name: &str) -> bool {
        self.interface(name).is_some()
    }
}

/// Interfaces visible to a compilation session, keyed by binary name.
#[derive(Clone, Debug, Default)]
pub struct ClassPath {
    interfaces: FxHashMap<String, InterfaceDecl>,
}

impl ClassPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classpath pre-populated with the JDK functional interfaces lambdas
    /// commonly target.
    pub fn with_jdk() -> Self {
        let mut class_path = Self::new();
        for interface in jdk_interfaces() {
            class_path.add(interface);
        }
        class_path
    }

    /// JDK interfaces plus everything the program declares.
    pub fn for_program(program: &Program) -> Self {
        let mut class_path = Self::with_jdk();
        for interface in &program.interfaces {
            class_path.add(interface.clone());
        }
        class_path
    }

    /// Register an interface; a later declaration replaces an earlier one.
    pub fn add(&mut self, interface: InterfaceDecl) {
        self.interfaces.insert(interface.name.clone(), interface);
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

impl TypeHierarchy for ClassPath {
    fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.get(name)
    }
}

fn jdk_interfaces() -> Vec<InterfaceDecl> {
    let object = JType::object;
    vec![
        InterfaceDecl::new("java.io.Serializable", &[]),
        InterfaceDecl::new("java.lang.Runnable", &[])
            .with_method(MethodSignature::new("run", vec![], JType::Void)),
        InterfaceDecl::new("java.lang.AutoCloseable", &[])
            .with_method(MethodSignature::new("close", vec![], JType::Void)),
        InterfaceDecl::new("java.io.Closeable", &["java.lang.AutoCloseable"])
            .with_method(MethodSignature::new("close", vec![], JType::Void)),
        InterfaceDecl::new("java.util.concurrent.Callable", &[])
            .with_method(MethodSignature::new("call", vec![], object())),
        InterfaceDecl::new("java.util.Comparator", &[]).with_method(MethodSignature::new(
            "compare",
            vec![object(), object()],
            JType::Primitive(crate::types::PrimitiveKind::Int),
        )),
        InterfaceDecl::new("java.util.function.Supplier", &[])
            .with_method(MethodSignature::new("get", vec![], object())),
        InterfaceDecl::new("java.util.function.Consumer", &[])
            .with_method(MethodSignature::new("accept", vec![object()], JType::Void)),
        InterfaceDecl::new("java.util.function.Function", &[])
            .with_method(MethodSignature::new("apply", vec![object()], object())),
        InterfaceDecl::new("java.util.function.Predicate", &[]).with_method(
            MethodSignature::new(
                "test",
                vec![object()],
                JType::Primitive(crate::types::PrimitiveKind::Boolean),
            ),
        ),
        InterfaceDecl::new("java.util.function.BiFunction", &[])
            .with_method(MethodSignature::new("apply", vec![object(), object()], object())),
        InterfaceDecl::new("java.util.function.UnaryOperator", &["java.util.function.Function"]),
        InterfaceDecl::new("java.util.function.BinaryOperator", &["java.util.function.BiFunction"]),
    ]
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
