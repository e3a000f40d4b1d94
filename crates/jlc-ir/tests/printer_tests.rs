use super::*;
use crate::types::{JType, MethodSignature, PrimitiveKind};
use crate::node::CallKind;
use crate::program::Param;

#[test]
fn test_emit_expressions() {
    assert_eq!(IrPrinter::emit_to_string(&IrNode::int(42)), "42");
    assert_eq!(IrPrinter::emit_to_string(&IrNode::string("a\"b")), "\"a\\\"b\"");
    assert_eq!(
        IrPrinter::emit_to_string(&IrNode::this_field("p.C", "f$0", JType::object())),
        "this.f$0"
    );
    assert_eq!(
        IrPrinter::emit_to_string(&IrNode::cast(
            JType::Primitive(PrimitiveKind::Byte),
            IrNode::int(1)
        )),
        "(byte) 1"
    );
    let call = IrNode::call(
        IrNode::cast(JType::class("p.T"), IrNode::this_field("p.C", "f$0", JType::object())),
        "p.T",
        MethodSignature::new("m", vec![], JType::Void),
        vec![IrNode::local("x")],
        CallKind::Virtual,
    );
    assert_eq!(IrPrinter::emit_to_string(&call), "((p.T) this.f$0).m(x)");
}

#[test]
fn test_emit_switch_with_default() {
    let switch = IrNode::switch(
        IrNode::this_field("C", "$id", JType::Primitive(PrimitiveKind::Byte)),
        vec![
            SwitchCase::case(0, vec![IrNode::ret(None)]),
            SwitchCase::default(vec![IrNode::throw(IrNode::new_object(
                "java.lang.AssertionError",
                vec![],
                vec![],
            ))]),
        ],
    );
    let output = IrPrinter::emit_to_string(&switch);
    assert!(output.starts_with("switch (this.$id) {"), "{output}");
    assert!(output.contains("case 0:"), "{output}");
    assert!(output.contains("default:"), "{output}");
    assert!(
        output.contains("throw new java.lang.AssertionError();"),
        "{output}"
    );
}

#[test]
fn test_print_class() {
    let mut class = ClassDecl::new("p.-$Lambda$0", Modifiers::FINAL | Modifiers::SYNTHETIC);
    class.interfaces.push("java.lang.Runnable".to_string());
    class.fields.push(FieldDecl::new(
        "f$0",
        JType::Primitive(PrimitiveKind::Int),
        Modifiers::PRIVATE | Modifiers::FINAL,
    ));
    class.methods.push(MethodDecl::constructor(
        vec![Param::new("f$0", JType::Primitive(PrimitiveKind::Int))],
        Modifiers::empty(),
        vec![IrNode::expr_stmt(IrNode::assign(
            IrNode::this_field("p.-$Lambda$0", "f$0", JType::Primitive(PrimitiveKind::Int)),
            IrNode::local("f$0"),
        ))],
    ));
    let output = IrPrinter::print_class(&class);
    assert!(output.starts_with("package p;\n"), "{output}");
    assert!(
        output.contains("/* synthetic */ final class -$Lambda$0 implements java.lang.Runnable {"),
        "{output}"
    );
    assert!(output.contains("    private final int f$0;"), "{output}");
    assert!(output.contains("    -$Lambda$0(int f$0) {"), "{output}");
    assert!(output.contains("        this.f$0 = f$0;"), "{output}");
}
