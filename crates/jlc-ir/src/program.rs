//! Program, class and member declarations.

use crate::node::IrNode;
use crate::types::{JType, MethodSignature, package_of};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// JVM access and property flags for classes and members.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Modifiers: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const BRIDGE = 0x0040;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
    }
}

impl Modifiers {
    /// Source keywords in canonical order; synthetic/bridge have no keyword.
    pub fn keywords(self) -> Vec<&'static str> {
        [
            (Self::PUBLIC, "public"),
            (Self::PROTECTED, "protected"),
            (Self::PRIVATE, "private"),
            (Self::ABSTRACT, "abstract"),
            (Self::STATIC, "static"),
            (Self::FINAL, "final"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, keyword)| keyword)
        .collect()
    }
}

/// What a method declaration is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodKind {
    #[default]
    Method,
    Constructor,
    /// Static initializer (`<clinit>`).
    StaticInitializer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: JType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: JType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: JType,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: JType, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    pub return_type: JType,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub kind: MethodKind,
    #[serde(default)]
    pub body: Vec<IrNode>,
}

impl MethodDecl {
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";
    pub const STATIC_INITIALIZER_NAME: &'static str = "<clinit>";

    pub fn method(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: JType,
        modifiers: Modifiers,
        body: Vec<IrNode>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            modifiers,
            kind: MethodKind::Method,
            body,
        }
    }

    pub fn constructor(params: Vec<Param>, modifiers: Modifiers, body: Vec<IrNode>) -> Self {
        Self {
            name: Self::CONSTRUCTOR_NAME.to_string(),
            params,
            return_type: JType::Void,
            modifiers,
            kind: MethodKind::Constructor,
            body,
        }
    }

    pub fn static_initializer(body: Vec<IrNode>) -> Self {
        Self {
            name: Self::STATIC_INITIALIZER_NAME.to_string(),
            params: Vec::new(),
            return_type: JType::Void,
            modifiers: Modifiers::STATIC,
            kind: MethodKind::StaticInitializer,
            body,
        }
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(
            self.name.clone(),
            self.params.iter().map(|p| p.ty.clone()).collect(),
            self.return_type.clone(),
        )
    }
}

/// A class, either from source or synthesized by a pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDecl {
    /// Binary name with dots.
    pub name: String,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default = "default_super_class")]
    pub super_class: String,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

fn default_super_class() -> String {
    JType::OBJECT_CLASS.to_string()
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            source_file: None,
            super_class: default_super_class(),
            interfaces: Vec::new(),
            modifiers,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn package(&self) -> &str {
        package_of(&self.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods
            .iter()
            .filter(|m| m.kind == MethodKind::Constructor)
    }

    pub fn static_initializer(&self) -> Option<&MethodDecl> {
        self.methods
            .iter()
            .find(|m| m.kind == MethodKind::StaticInitializer)
    }
}

/// An interface known to the compiler, from source or from the classpath.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDecl {
    pub name: String,
    #[serde(default)]
    pub super_interfaces: Vec<String>,
    /// Abstract methods declared directly on this interface.
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>, super_interfaces: &[&str]) -> Self {
        Self {
            name: name.into(),
            super_interfaces: super_interfaces.iter().map(|s| (*s).to_string()).collect(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }
}

/// A compilation session's program.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Source classes whose method bodies may contain lambda sites.
    #[serde(default)]
    pub types: Vec<ClassDecl>,
    /// Interfaces declared by the program.
    #[serde(default)]
    pub interfaces: Vec<InterfaceDecl>,
    /// Classes synthesized by passes, to be emitted with the program.
    #[serde(default)]
    pub synthetic_types: Vec<ClassDecl>,
}

impl Program {
    pub fn find_type(&self, name: &str) -> Option<&ClassDecl> {
        self.types
            .iter()
            .chain(self.synthetic_types.iter())
            .find(|t| t.name == name)
    }

    /// Merge another program into this one (used when reading several inputs).
    pub fn extend(&mut self, other: Self) {
        self.types.extend(other.types);
        self.interfaces.extend(other.interfaces);
        self.synthetic_types.extend(other.synthetic_types);
    }

    pub fn method_count(&self) -> usize {
        self.types.iter().map(|t| t.methods.len()).sum()
    }
}
