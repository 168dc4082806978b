//! Renders a metadata table as a self-registering script.
//!
//! The script allocates every slot up front (`_l[n]`), binds the intrinsic
//! singletons (`_type_number`, ...), publishes the package table under
//! `Reflection.$libs[library]`, then assigns the fields of each slot. Slot
//! references resolve to the pre-allocated objects, so forward references are
//! safe.

use super::writer::{NewLine, TextWriter};
use crate::table::MetadataTable;
use serde_json::{Map, Value};
use tsr_common::ident::is_safe_identifier;

pub struct ScriptRenderer {
    new_line: NewLine,
}

impl ScriptRenderer {
    pub const fn new(new_line: NewLine) -> Self {
        Self { new_line }
    }

    pub fn render(&self, table: &MetadataTable) -> serde_json::Result<String> {
        let mut w = TextWriter::new(self.new_line);
        w.line("/* Reflection metadata generated by tsr. */");
        w.line("(function (globalObj) {").indent();
        w.line("var Reflection = globalObj.Reflection || (globalObj.Reflection = { $libs: Object.create(null) });");

        w.line("var _l = [];");
        w.write(&format!(
            "for (var _cnt = 0; _cnt < {}; _cnt++) {{",
            table.slot_count
        ))
        .write_line()
        .indent()
        .line("_l[_cnt] = Object.create(null);")
        .dedent()
        .line("}");

        for kind in &table.intrinsics {
            w.write(&format!("var _type_{kind} = {{ kind: ")).write_string(kind.name());
            w.line(" };");
        }

        w.write("Reflection.$libs[")
            .write_string(&table.library)
            .line("] = {")
            .indent();
        for (package, types) in &table.packages {
            w.write_string(package).line(": {").indent();
            for (name, slot) in types {
                w.write_string(name).line(&format!(": _l[{}],", slot.0));
            }
            w.dedent().line("},");
        }
        w.dedent().line("};");

        w.line("var _t;");
        for node in &table.populations {
            w.line(&format!("_t = _l[{}];", node.slot.0));
            let Value::Object(fields) = serde_json::to_value(node)? else {
                continue;
            };
            for (field, value) in &fields {
                if field == "slot" {
                    continue;
                }
                w.write(&format!("_t.{field} = "));
                write_value(&mut w, value);
                w.line(";");
            }
        }

        w.dedent()
            .line("})(typeof globalThis !== 'undefined' ? globalThis : this);");
        Ok(w.finish())
    }
}

/// `{"slot": n}` and `{"intrinsic": k}` become `_l[n]` and `_type_k`.
fn type_ref_expression(map: &Map<String, Value>) -> Option<String> {
    if map.len() != 1 {
        return None;
    }
    match (map.get("slot"), map.get("intrinsic")) {
        (Some(Value::Number(slot)), _) => Some(format!("_l[{slot}]")),
        (_, Some(Value::String(kind))) => Some(format!("_type_{kind}")),
        _ => None,
    }
}

fn write_value(w: &mut TextWriter, value: &Value) {
    match value {
        Value::Null => {
            w.write("null");
        }
        Value::Bool(b) => {
            w.write(if *b { "true" } else { "false" });
        }
        Value::Number(n) => {
            w.write(&n.to_string());
        }
        Value::String(s) => {
            w.write_string(s);
        }
        Value::Array(items) if items.is_empty() => {
            w.write("[]");
        }
        Value::Array(items) => {
            w.line("[").indent();
            for item in items {
                write_value(w, item);
                w.line(",");
            }
            w.dedent().write("]");
        }
        Value::Object(map) => {
            if let Some(expression) = type_ref_expression(map) {
                w.write(&expression);
                return;
            }
            if map.is_empty() {
                w.write("{}");
                return;
            }
            w.line("{").indent();
            for (key, value) in map {
                if is_safe_identifier(key) {
                    w.write(key);
                } else {
                    w.write_string(key);
                }
                w.write(": ");
                write_value(w, value);
                w.line(",");
            }
            w.dedent().write("}");
        }
    }
}
