// Tree-walking execution state: globals, the call stack and the output sink.

use std::collections::HashMap;
use std::io::Write;

use model::{FunctionTable, Node, NodeKind, TokenKind};
use tracing::trace;

use crate::EvalError;

/// Where `print` sends its values.
pub(crate) trait Output {
    fn print(&mut self, value: i64) -> Result<(), EvalError>;
}

impl Output for Vec<i64> {
    fn print(&mut self, value: i64) -> Result<(), EvalError> {
        self.push(value);
        Ok(())
    }
}

pub(crate) struct LineWriter<W>(pub(crate) W);

impl<W: Write> Output for LineWriter<W> {
    fn print(&mut self, value: i64) -> Result<(), EvalError> {
        writeln!(self.0, "{value}")?;
        Ok(())
    }
}

/// Activation record of a user function call.
struct Frame<'a> {
    params: HashMap<&'a str, i64>,
    /// Value of the last ASSIGN or PRINT executed in this call.
    result: i64,
}

pub(crate) struct Machine<'a, O> {
    functions: FunctionTable<'a>,
    globals: HashMap<&'a str, i64>,
    frames: Vec<Frame<'a>>,
    steps: u64,
    step_limit: u64,
    call_depth_limit: usize,
    out: O,
}

impl<'a, O: Output> Machine<'a, O> {
    pub(crate) fn new(functions: FunctionTable<'a>, step_limit: u64, call_depth_limit: usize, out: O) -> Self {
        Self {
            functions,
            globals: HashMap::new(),
            frames: Vec::new(),
            steps: 0,
            step_limit,
            call_depth_limit,
            out,
        }
    }

    pub(crate) fn run(mut self, program: &'a Node) -> Result<O, EvalError> {
        for stmt in &program.children {
            self.exec(stmt)?;
        }
        trace!(steps = self.steps, "Program finished");
        Ok(self.out)
    }

    fn exec(&mut self, node: &'a Node) -> Result<(), EvalError> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(EvalError::StepLimitExceeded(self.step_limit));
        }

        match node.kind {
            NodeKind::Assign => {
                let value = self.eval(&node.children[1])?;
                self.store(node.children[0].name().unwrap_or_default(), value);
                self.record(value);
            }
            NodeKind::Print => {
                let value = self.eval(&node.children[0])?;
                self.out.print(value)?;
                self.record(value);
            }
            NodeKind::If => {
                if self.eval(&node.children[0])? != 0 {
                    self.exec(&node.children[1])?;
                } else if let Some(else_branch) = node.children.get(2) {
                    self.exec(else_branch)?;
                }
            }
            NodeKind::While => {
                while self.eval(&node.children[0])? != 0 {
                    self.exec(&node.children[1])?;
                }
            }
            // Declarations are hoisted into the function table up front.
            NodeKind::Function => {}
            kind => unreachable!("{kind} in statement position of a shape-checked tree"),
        }
        Ok(())
    }

    fn eval(&mut self, node: &'a Node) -> Result<i64, EvalError> {
        match node.kind {
            // Range was checked by `check_shape`.
            NodeKind::Num => Ok(node.number().and_then(|n| n.parse().ok()).unwrap_or(0)),
            NodeKind::Id => Ok(self.load(node.name().unwrap_or_default())),
            NodeKind::BinOp => {
                let left = self.eval(&node.children[0])?;
                let right = self.eval(&node.children[1])?;
                binary(node.operator().unwrap_or(TokenKind::Plus), left, right)
            }
            NodeKind::Call => {
                let callee = node.children[0].name().unwrap_or_default();
                let mut args = Vec::with_capacity(node.children.len() - 1);
                for arg in &node.children[1..] {
                    args.push(self.eval(arg)?);
                }
                self.call(callee, args)
            }
            kind => unreachable!("{kind} in expression position of a shape-checked tree"),
        }
    }

    fn call(&mut self, name: &str, args: Vec<i64>) -> Result<i64, EvalError> {
        let decl = self.functions.resolve(name, args.len())?;
        let params = decl.params.iter().copied().zip(args).collect();
        let body = decl.body;

        if self.frames.len() >= self.call_depth_limit {
            return Err(EvalError::CallDepthExceeded(self.call_depth_limit));
        }
        self.frames.push(Frame { params, result: 0 });
        let outcome = self.exec(body);
        let frame = self.frames.pop();
        outcome?;
        Ok(frame.map_or(0, |f| f.result))
    }

    /// Parameters of the innermost call shadow globals; nothing else is local.
    fn load(&self, name: &str) -> i64 {
        if let Some(&value) = self.frames.last().and_then(|f| f.params.get(name)) {
            return value;
        }
        self.globals.get(name).copied().unwrap_or(0)
    }

    fn store(&mut self, name: &'a str, value: i64) {
        if let Some(slot) = self.frames.last_mut().and_then(|f| f.params.get_mut(name)) {
            *slot = value;
            return;
        }
        self.globals.insert(name, value);
    }

    fn record(&mut self, value: i64) {
        if let Some(frame) = self.frames.last_mut() {
            frame.result = value;
        }
    }
}

/// Two's-complement wrapping arithmetic; comparisons yield 0 or 1.
pub(crate) fn binary(op: TokenKind, left: i64, right: i64) -> Result<i64, EvalError> {
    let value = match op {
        TokenKind::Plus => left.wrapping_add(right),
        TokenKind::Minus => left.wrapping_sub(right),
        TokenKind::Mult => left.wrapping_mul(right),
        TokenKind::Div => {
            if right == 0 {
                return Err(EvalError::DivisionByZero);
            }
            left.wrapping_div(right)
        }
        TokenKind::Eq => i64::from(left == right),
        TokenKind::Ne => i64::from(left != right),
        TokenKind::Lt => i64::from(left < right),
        TokenKind::Le => i64::from(left <= right),
        TokenKind::Gt => i64::from(left > right),
        TokenKind::Ge => i64::from(left >= right),
        op => unreachable!("{op} is not a binary operator"),
    };
    Ok(value)
}
