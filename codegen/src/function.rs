use model::{Node, NodeKind};
use crate::names;

/// Handles generation of C statements for a single function body (a user
/// function or `main`).
pub struct FunctionGenerator {
    pub(crate) out: String,
    pub(crate) indent: usize,
    pub(crate) next_temp: usize,
    /// User functions record the value of each executed ASSIGN/PRINT as
    /// their result; `main` does not.
    pub(crate) track_result: bool,
}

impl FunctionGenerator {
    pub fn new(track_result: bool) -> Self {
        Self {
            out: String::new(),
            indent: 1,
            next_temp: 0,
            track_result,
        }
    }

    /// Emit the statements of a body, one level inside the enclosing braces.
    pub fn gen_body<'n>(mut self, statements: impl IntoIterator<Item = &'n Node>) -> String {
        if self.track_result {
            self.line(format!("long long {} = 0;", names::RESULT));
        }
        for stmt in statements {
            self.gen_statement(stmt);
        }
        if self.track_result {
            self.line(format!("return {};", names::RESULT));
        } else {
            self.line("return 0;");
        }
        self.out
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub(crate) fn gen_statement(&mut self, node: &Node) {
        match node.kind {
            NodeKind::Assign => {
                let target = names::variable(node.children[0].name().unwrap_or_default());
                let value = self.gen_expr(&node.children[1]);
                self.line(format!("{target} = {value};"));
                if self.track_result {
                    self.line(format!("{} = {target};", names::RESULT));
                }
            }
            NodeKind::Print => {
                let value = self.gen_expr(&node.children[0]);
                if self.track_result {
                    self.line(format!("{} = rt_print({value});", names::RESULT));
                } else {
                    self.line(format!("rt_print({value});"));
                }
            }
            NodeKind::If => self.gen_if(node),
            NodeKind::While => self.gen_while(node),
            // Hoisted to a top-level C function; nothing runs at this position.
            NodeKind::Function => {}
            kind => unreachable!("{kind} in statement position of a shape-checked tree"),
        }
    }
}
