// Control flow code generation: if/else and while

use model::Node;
use crate::function::FunctionGenerator;

impl FunctionGenerator {
    pub(crate) fn gen_if(&mut self, node: &Node) {
        let cond = self.gen_expr(&node.children[0]);
        self.line(format!("if ({cond}) {{"));
        self.gen_block(&node.children[1]);
        if let Some(else_branch) = node.children.get(2) {
            self.line("} else {");
            self.gen_block(else_branch);
        }
        self.line("}");
    }

    /// The condition is re-evaluated at the top of every iteration, so its
    /// temporaries live inside the loop body.
    pub(crate) fn gen_while(&mut self, node: &Node) {
        self.line("for (;;) {");
        self.indent += 1;
        let cond = self.gen_expr(&node.children[0]);
        self.line(format!("if (!{cond}) break;"));
        self.gen_statement(&node.children[1]);
        self.indent -= 1;
        self.line("}");
    }

    fn gen_block(&mut self, stmt: &Node) {
        self.indent += 1;
        self.gen_statement(stmt);
        self.indent -= 1;
    }
}
