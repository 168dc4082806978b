use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const LITERAL_TYPE_NOT_SUPPORTED: u32 = 9001;
    pub const OBJECT_LITERAL_TYPE_NOT_SUPPORTED: u32 = 9002;
    pub const ANONYMOUS_CLASS_EXPRESSION_NOT_SUPPORTED: u32 = 9003;
    pub const UNKNOWN_TYPE_KIND: u32 = 9004;
    pub const DUPLICATE_TYPE_DECLARATION: u32 = 9005;
    pub const INTERFACE_SHADOWED_BY_CLASS: u32 = 9006;
    pub const UNNAMED_TYPE_DECLARATION: u32 = 9007;
    pub const UNREFLECTABLE_DECLARATION: u32 = 9008;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const LITERAL_TYPE_NOT_SUPPORTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::LITERAL_TYPE_NOT_SUPPORTED,
        category: DiagnosticCategory::Warning,
        message: "Literal type '{0}' is not supported by reflection; '{1}' is left unserialized.",
    };
    pub const OBJECT_LITERAL_TYPE_NOT_SUPPORTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::OBJECT_LITERAL_TYPE_NOT_SUPPORTED,
        category: DiagnosticCategory::Warning,
        message: "Object literal types are not supported by reflection; '{0}' is left unserialized.",
    };
    pub const ANONYMOUS_CLASS_EXPRESSION_NOT_SUPPORTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::ANONYMOUS_CLASS_EXPRESSION_NOT_SUPPORTED,
        category: DiagnosticCategory::Warning,
        message: "Anonymous class expressions are not supported by reflection; '{0}' is left unserialized.",
    };
    pub const UNKNOWN_TYPE_KIND: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNKNOWN_TYPE_KIND,
        category: DiagnosticCategory::Warning,
        message: "Type '{0}' has a kind reflection does not know; '{1}' is left unserialized.",
    };
    pub const DUPLICATE_TYPE_DECLARATION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_TYPE_DECLARATION,
        category: DiagnosticCategory::Message,
        message: "Duplicate {0} declaration '{1}' in package '{2}'; only the first is registered.",
    };
    pub const INTERFACE_SHADOWED_BY_CLASS: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INTERFACE_SHADOWED_BY_CLASS,
        category: DiagnosticCategory::Message,
        message: "Interface '{0}' shares its name with a class in package '{1}'; only the class is addressable by name.",
    };
    pub const UNNAMED_TYPE_DECLARATION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNNAMED_TYPE_DECLARATION,
        category: DiagnosticCategory::Message,
        message: "Unnamed {0} declaration in package '{1}' is not registered by name.",
    };
    pub const UNREFLECTABLE_DECLARATION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNREFLECTABLE_DECLARATION,
        category: DiagnosticCategory::Warning,
        message: "Declaration '{0}' resolves to {1}, which reflection cannot emit; it is not registered by name.",
    };
}

/// A diagnostic produced while building reflection metadata.
///
/// `subject` names what the diagnostic is about (a type or member path such as
/// `file1.MyClass.union`); reflection works on checked types, so there is no
/// source span to point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub subject: String,
    pub message_text: String,
}

impl Diagnostic {
    pub fn from_message(
        message: &DiagnosticMessage,
        subject: impl Into<String>,
        args: &[&str],
    ) -> Self {
        Self {
            category: message.category,
            code: message.code,
            subject: subject.into(),
            message_text: format_message(message.message, args),
        }
    }

    pub const fn is_warning(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Warning)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let category = match self.category {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        write!(f, "{category} TSR{}: {}", self.code, self.message_text)
    }
}

/// Substitute `{n}` placeholders from `args` in one left-to-right pass, so
/// text coming from an argument is never itself substituted. Placeholders
/// without a matching argument are kept.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let argument = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((*args.get(index)?, close))
        });
        match argument {
            Some((arg, close)) => {
                result.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
