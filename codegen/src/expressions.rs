// Expression lowering. Every expression is flattened into `long long tN`
// temporaries in left-to-right evaluation order, so C's unspecified operand
// and argument evaluation order never matters. Literals stay inline.

use model::{Node, NodeKind, TokenKind};
use crate::function::FunctionGenerator;
use crate::names;

impl FunctionGenerator {
    /// Emit the lines computing `node` and return the C operand holding it.
    pub(crate) fn gen_expr(&mut self, node: &Node) -> String {
        match node.kind {
            NodeKind::Num => format!("{}LL", node.number().unwrap_or("0")),
            NodeKind::Id => {
                let var = names::variable(node.name().unwrap_or_default());
                self.temp(var)
            }
            NodeKind::BinOp => {
                let left = self.gen_expr(&node.children[0]);
                let right = self.gen_expr(&node.children[1]);
                let op = node.operator().unwrap_or(TokenKind::Plus);
                self.temp(binary(op, &left, &right))
            }
            NodeKind::Call => {
                let callee = names::function(node.children[0].name().unwrap_or_default());
                let args: Vec<String> = node.children[1..].iter().map(|arg| self.gen_expr(arg)).collect();
                self.temp(format!("{callee}({})", args.join(", ")))
            }
            kind => unreachable!("{kind} in expression position of a shape-checked tree"),
        }
    }

    fn temp(&mut self, value: String) -> String {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        self.line(format!("long long {name} = {value};"));
        name
    }
}

fn binary(op: TokenKind, left: &str, right: &str) -> String {
    let runtime = match op {
        TokenKind::Plus => "rt_add",
        TokenKind::Minus => "rt_sub",
        TokenKind::Mult => "rt_mul",
        TokenKind::Div => "rt_div",
        // Relational operators: C comparisons already yield 0 or 1.
        _ => {
            let symbol = op.symbol().unwrap_or("==");
            return format!("({left} {symbol} {right})");
        }
    };
    format!("{runtime}({left}, {right})")
}
