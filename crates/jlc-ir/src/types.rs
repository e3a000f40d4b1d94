//! Java types and method signatures.
//!
//! Types are written the way Java source spells them (`int`, `java.lang.String`,
//! `long[]`) and serialize as those strings. Descriptors follow the JVM format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight JVM primitive kinds, in canonical capture-slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [Self; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    pub const fn java_name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    pub const fn descriptor(self) -> char {
        match self {
            Self::Boolean => 'Z',
            Self::Byte => 'B',
            Self::Char => 'C',
            Self::Short => 'S',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Float => 'F',
            Self::Double => 'D',
        }
    }

    fn from_java_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.java_name() == name)
    }
}

/// A resolved Java type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JType {
    Void,
    Primitive(PrimitiveKind),
    /// Class or interface, by binary name with dots (`java.util.Map$Entry`).
    Class(String),
    Array(Box<JType>),
}

impl JType {
    pub const OBJECT_CLASS: &'static str = "java.lang.Object";

    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    pub fn object() -> Self {
        Self::Class(Self::OBJECT_CLASS.to_string())
    }

    pub fn string() -> Self {
        Self::class("java.lang.String")
    }

    pub fn array_of(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    pub const fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Class(_) | Self::Array(_))
    }

    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Class(name) if name == Self::OBJECT_CLASS)
    }

    /// JVM field descriptor: `I`, `Ljava/lang/String;`, `[J`.
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }

    fn write_descriptor(&self, out: &mut String) {
        match self {
            Self::Void => out.push('V'),
            Self::Primitive(kind) => out.push(kind.descriptor()),
            Self::Class(name) => {
                out.push('L');
                out.push_str(&name.replace('.', "/"));
                out.push(';');
            }
            Self::Array(element) => {
                out.push('[');
                element.write_descriptor(out);
            }
        }
    }

    /// Java source spelling.
    pub fn java_name(&self) -> String {
        match self {
            Self::Void => "void".to_string(),
            Self::Primitive(kind) => kind.java_name().to_string(),
            Self::Class(name) => name.clone(),
            Self::Array(element) => format!("{}[]", element.java_name()),
        }
    }
}

impl fmt::Display for JType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.java_name())
    }
}

impl FromStr for JType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty type name".to_string());
        }
        if let Some(element) = s.strip_suffix("[]") {
            return Ok(Self::array_of(element.parse()?));
        }
        if s == "void" {
            return Ok(Self::Void);
        }
        if let Some(kind) = PrimitiveKind::from_java_name(s) {
            return Ok(Self::Primitive(kind));
        }
        if s.chars()
            .any(|c| !(c.is_alphanumeric() || matches!(c, '.' | '$' | '_' | '-')))
        {
            return Err(format!("invalid type name '{s}'"));
        }
        Ok(Self::Class(s.to_string()))
    }
}

impl TryFrom<String> for JType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JType> for String {
    fn from(value: JType) -> Self {
        value.java_name()
    }
}

/// Name, parameter types and return type of a method.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub name: String,
    #[serde(default)]
    pub params: Vec<JType>,
    pub return_type: JType,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, params: Vec<JType>, return_type: JType) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
        }
    }

    /// JVM method descriptor: `(ILjava/lang/String;)V`.
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for param in &self.params {
            out.push_str(&param.descriptor());
        }
        out.push(')');
        out.push_str(&self.return_type.descriptor());
        out
    }

    /// Name plus descriptor; two methods with the same key override each other.
    pub fn key(&self) -> String {
        format!("{}{}", self.name, self.descriptor())
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor())
    }
}

// =============================================================================
// Binary name helpers
// =============================================================================

/// Package of a binary class name; empty for the default package.
pub fn package_of(binary_name: &str) -> &str {
    binary_name
        .rfind('.')
        .map_or("", |dot| &binary_name[..dot])
}

/// Simple name (last segment) of a binary class name.
pub fn simple_name_of(binary_name: &str) -> &str {
    binary_name
        .rfind('.')
        .map_or(binary_name, |dot| &binary_name[dot + 1..])
}

/// Top-level enclosing type of a (possibly nested) binary class name.
///
/// `p.Outer$Inner$1` becomes `p.Outer`.
pub fn top_level_of(binary_name: &str) -> &str {
    let simple_start = binary_name.rfind('.').map_or(0, |dot| dot + 1);
    match binary_name[simple_start..].find('$') {
        Some(0) | None => binary_name,
        Some(offset) => &binary_name[..simple_start + offset],
    }
}

/// Join a package and a simple name into a binary name.
pub fn qualify(package: &str, simple_name: &str) -> String {
    if package.is_empty() {
        simple_name.to_string()
    } else {
        format!("{package}.{simple_name}")
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
