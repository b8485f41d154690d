// Program-level emission helpers: global variable declarations and function
// prototypes/signatures.

use std::collections::BTreeSet;

use model::{FunctionDecl, FunctionTable, Node, NodeKind};
use crate::Codegen;
use crate::names;

impl Codegen {
    /// One zero-initialised global per variable name, sorted by name.
    pub(crate) fn emit_globals(&self, program: &Node) -> String {
        let mut vars = BTreeSet::new();
        collect_variables(program, &mut vars);
        vars.iter()
            .map(|name| format!("long long {} = 0;\n", names::variable(name)))
            .collect()
    }

    pub(crate) fn emit_prototypes(&self, functions: &FunctionTable<'_>) -> String {
        functions
            .iter()
            .map(|decl| format!("{};\n", signature(decl)))
            .collect()
    }
}

/// `long long f_add(long long v_a, long long v_b)`
pub(crate) fn signature(decl: &FunctionDecl<'_>) -> String {
    let params = if decl.params.is_empty() {
        "void".to_string()
    } else {
        decl.params
            .iter()
            .map(|p| format!("long long {}", names::variable(p)))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("long long {}({})", names::function(decl.name), params)
}

/// Every `ID` used as a variable: assignment targets and reads, but not
/// callee or function names.
fn collect_variables<'a>(node: &'a Node, vars: &mut BTreeSet<&'a str>) {
    let skip = match node.kind {
        NodeKind::Id => {
            vars.extend(node.name());
            return;
        }
        NodeKind::Call | NodeKind::Function => 1,
        _ => 0,
    };
    for child in node.children.iter().skip(skip) {
        collect_variables(child, vars);
    }
}
