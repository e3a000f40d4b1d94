//! Java-like source printer for IR classes and method bodies.
//!
//! The output is for humans (debug dumps, `--print`, tests); it is not meant
//! to be fed back into a Java compiler. Synthetic names such as `-$Lambda$0`
//! are printed verbatim.

use crate::node::{IrNode, SwitchCase};
use crate::program::{ClassDecl, FieldDecl, MethodDecl, MethodKind, Modifiers};
use crate::types::simple_name_of;
use std::fmt::Write as _;

pub struct IrPrinter {
    output: String,
    indent_level: u32,
    indent_str: &'static str,
}

impl Default for IrPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl IrPrinter {
    pub const fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Render a single node (statement or expression) without indentation.
    pub fn emit_to_string(node: &IrNode) -> String {
        let mut printer = Self::new();
        printer.emit_node(node);
        printer.output
    }

    /// Render a whole class declaration, including its `package` line.
    pub fn print_class(class: &ClassDecl) -> String {
        let mut printer = Self::new();
        printer.emit_class(class);
        printer.output
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn emit_class(&mut self, class: &ClassDecl) {
        let package = class.package();
        if !package.is_empty() {
            let _ = writeln!(self.output, "package {package};");
            self.write_line();
        }
        if class.modifiers.contains(Modifiers::SYNTHETIC) {
            self.write("/* synthetic */ ");
        }
        self.write_modifiers(class.modifiers & !Modifiers::STATIC);
        self.write("class ");
        let simple_name = simple_name_of(&class.name);
        self.write(simple_name);
        if class.super_class != crate::types::JType::OBJECT_CLASS {
            self.write(" extends ");
            self.write(&class.super_class);
        }
        if !class.interfaces.is_empty() {
            self.write(" implements ");
            self.write(&class.interfaces.join(", "));
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();

        for field in &class.fields {
            self.emit_field(field);
        }
        for (i, method) in class.methods.iter().enumerate() {
            if i > 0 || !class.fields.is_empty() {
                self.write_line();
            }
            self.emit_method(simple_name, method);
        }

        self.decrease_indent();
        self.write("}");
        self.write_line();
    }

    fn emit_field(&mut self, field: &FieldDecl) {
        self.write_indent();
        self.write_modifiers(field.modifiers);
        let _ = write!(self.output, "{} {};", field.ty, field.name);
        self.write_line();
    }

    fn emit_method(&mut self, class_simple_name: &str, method: &MethodDecl) {
        self.write_indent();
        match method.kind {
            MethodKind::StaticInitializer => self.write("static"),
            MethodKind::Constructor => {
                self.write_modifiers(method.modifiers);
                self.write(class_simple_name);
                self.emit_param_list(method);
            }
            MethodKind::Method => {
                if method.modifiers.contains(Modifiers::BRIDGE) {
                    self.write("/* bridge */ ");
                }
                self.write_modifiers(method.modifiers);
                let _ = write!(self.output, "{} {}", method.return_type, method.name);
                self.emit_param_list(method);
            }
        }
        self.write(" ");
        self.emit_block(&method.body);
        self.write_line();
    }

    fn emit_param_list(&mut self, method: &MethodDecl) {
        self.write("(");
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            let _ = write!(self.output, "{} {}", param.ty, param.name);
        }
        self.write(")");
    }

    fn emit_block(&mut self, statements: &[IrNode]) {
        if statements.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for stmt in statements {
            self.write_indent();
            self.emit_statement(stmt);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_statement(&mut self, node: &IrNode) {
        match node {
            IrNode::ExpressionStatement(expr) => {
                self.emit_node(expr);
                self.write(";");
            }
            IrNode::LocalDecl {
                name,
                ty,
                initializer,
            } => {
                let _ = write!(self.output, "{ty} {name}");
                if let Some(init) = initializer {
                    self.write(" = ");
                    self.emit_node(init);
                }
                self.write(";");
            }
            IrNode::Return(expr) => {
                self.write("return");
                if let Some(expr) = expr {
                    self.write(" ");
                    self.emit_node(expr);
                }
                self.write(";");
            }
            IrNode::Throw(expr) => {
                self.write("throw ");
                self.emit_node(expr);
                self.write(";");
            }
            IrNode::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if (");
                self.emit_node(condition);
                self.write(") ");
                self.emit_branch(then_branch);
                if let Some(else_branch) = else_branch {
                    self.write(" else ");
                    self.emit_branch(else_branch);
                }
            }
            IrNode::Block(statements) => self.emit_block(statements),
            IrNode::Switch { expression, cases } => self.emit_switch(expression, cases),
            expr => {
                self.emit_node(expr);
                self.write(";");
            }
        }
    }

    fn emit_branch(&mut self, branch: &IrNode) {
        match branch {
            IrNode::Block(statements) => self.emit_block(statements),
            other => self.emit_block(std::slice::from_ref(other)),
        }
    }

    fn emit_switch(&mut self, expression: &IrNode, cases: &[SwitchCase]) {
        self.write("switch (");
        self.emit_node(expression);
        self.write(") {");
        self.write_line();
        self.increase_indent();
        for case in cases {
            self.write_indent();
            match case.label {
                Some(label) => {
                    let _ = write!(self.output, "case {label}:");
                }
                None => self.write("default:"),
            }
            self.write_line();
            self.increase_indent();
            for stmt in &case.statements {
                self.write_indent();
                self.emit_statement(stmt);
                self.write_line();
            }
            self.decrease_indent();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    /// Emit a node in expression position; statements fall back to statement form.
    pub fn emit_node(&mut self, node: &IrNode) {
        match node {
            IrNode::IntLiteral(value) => {
                let _ = write!(self.output, "{value}");
            }
            IrNode::StringLiteral(s) => self.emit_string_literal(s),
            IrNode::BooleanLiteral(b) => self.write(if *b { "true" } else { "false" }),
            IrNode::NullLiteral => self.write("null"),
            IrNode::Local(name) => self.write(name),
            IrNode::This => self.write("this"),
            IrNode::Field { object, name, .. } => {
                self.emit_node(object);
                self.write(".");
                self.write(name);
            }
            IrNode::StaticField { owner, name, .. } => {
                let _ = write!(self.output, "{owner}.{name}");
            }
            IrNode::Assign { target, value } => {
                self.emit_node(target);
                self.write(" = ");
                self.emit_node(value);
            }
            IrNode::Binary {
                left,
                operator,
                right,
            } => {
                self.emit_node(left);
                let _ = write!(self.output, " {operator} ");
                self.emit_node(right);
            }
            IrNode::Call {
                receiver,
                owner,
                method,
                arguments,
                ..
            } => {
                match receiver {
                    Some(receiver) => self.emit_operand(receiver),
                    None => self.write(owner),
                }
                self.write(".");
                self.write(&method.name);
                self.emit_arguments(arguments);
            }
            IrNode::SuperConstructorCall { arguments, .. } => {
                self.write("super");
                self.emit_arguments(arguments);
            }
            IrNode::New {
                class, arguments, ..
            } => {
                let _ = write!(self.output, "new {class}");
                self.emit_arguments(arguments);
            }
            IrNode::Cast { ty, expression } => {
                let _ = write!(self.output, "({ty}) ");
                self.emit_operand(expression);
            }
            IrNode::Lambda(lambda) => {
                let _ = write!(
                    self.output,
                    "<lambda {} -> {}.{}>",
                    lambda.interface, lambda.body.owner, lambda.body.signature.name
                );
            }
            stmt => self.emit_statement(stmt),
        }
    }

    /// Casts and binaries used as receivers or cast operands need parentheses.
    fn emit_operand(&mut self, node: &IrNode) {
        if matches!(
            node,
            IrNode::Cast { .. } | IrNode::Binary { .. } | IrNode::Assign { .. }
        ) {
            self.write("(");
            self.emit_node(node);
            self.write(")");
        } else {
            self.emit_node(node);
        }
    }

    fn emit_arguments(&mut self, arguments: &[IrNode]) {
        self.write("(");
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_node(arg);
        }
        self.write(")");
    }

    fn emit_string_literal(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(self.output, "\\u{:04X}", c as u32);
                }
                _ => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    fn write_modifiers(&mut self, modifiers: Modifiers) {
        for keyword in modifiers.keywords() {
            self.write(keyword);
            self.write(" ");
        }
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

#[cfg(test)]
#[path = "../tests/printer_tests.rs"]
mod tests;
