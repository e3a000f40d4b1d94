use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const UNRESOLVED_LAMBDA_INTERFACE: u32 = 7001;
    pub const UNRESOLVED_LAMBDA_SUPER_INTERFACE: u32 = 7002;
    pub const DUPLICATE_TYPE_DECLARATION: u32 = 7003;
    pub const METHOD_BODY_TOO_DEEP: u32 = 7004;
    pub const VOID_LAMBDA_CAPTURE: u32 = 7005;
    pub const DUPLICATE_METHOD_DECLARATION: u32 = 7006;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_LAMBDA_INTERFACE,
        category: DiagnosticCategory::Error,
        message: "Lambda expression in '{0}' implements unresolved interface(s) {1}; the classpath is incomplete.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_LAMBDA_SUPER_INTERFACE,
        category: DiagnosticCategory::Error,
        message: "Lambda expression in '{0}' implements '{1}', whose super-interface(s) {2} cannot be resolved.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_TYPE_DECLARATION,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' is declared more than once in the program.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::METHOD_BODY_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: "Body of '{0}' is nested deeper than {1} levels; its lambda expressions cannot be grouped.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::VOID_LAMBDA_CAPTURE,
        category: DiagnosticCategory::Error,
        message: "Lambda expression in '{0}' captures '{1}' with type 'void'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_METHOD_DECLARATION,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' is declared more than once in '{1}'.",
    },
];
