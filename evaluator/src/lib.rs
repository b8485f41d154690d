// Reference evaluator: runs a PROGRAM tree directly with the same semantics as
// the generated C. Used by `--interpret` and as the oracle for the end-to-end
// tests.

mod machine;

use std::io::Write;

use model::{FunctionError, FunctionTable, Node, ShapeError};
use tracing::debug;

use machine::{LineWriter, Machine};

pub const DEFAULT_STEP_LIMIT: u64 = 10_000_000;
pub const DEFAULT_CALL_DEPTH_LIMIT: usize = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error(transparent)]
    Function(#[from] FunctionError),
    #[error("program did not finish within {0} steps")]
    StepLimitExceeded(u64),
    #[error("call depth exceeded {0}")]
    CallDepthExceeded(usize),
    #[error("malformed tree: {0}")]
    MalformedTree(#[from] ShapeError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    step_limit: u64,
    call_depth_limit: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
            call_depth_limit: DEFAULT_CALL_DEPTH_LIMIT,
        }
    }

    /// Maximum number of statement executions before giving up.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn with_call_depth_limit(mut self, limit: usize) -> Self {
        self.call_depth_limit = limit;
        self
    }

    /// Run `program` and collect the printed values.
    pub fn run(&self, program: &Node) -> Result<Vec<i64>, EvalError> {
        self.execute(program, Vec::new())
    }

    /// Run `program`, writing each printed value on its own line as soon as
    /// it is printed.
    pub fn run_to<W: Write>(&self, program: &Node, out: W) -> Result<(), EvalError> {
        let LineWriter(mut out) = self.execute(program, LineWriter(out))?;
        out.flush()?;
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn execute<O: machine::Output>(&self, program: &Node, out: O) -> Result<O, EvalError> {
        program.check_shape()?;
        let functions = FunctionTable::build(program)?;
        functions.check_calls(program)?;
        debug!(step_limit = self.step_limit, functions = functions.len(), "Evaluating program");
        Machine::new(functions, self.step_limit, self.call_depth_limit, out).run(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexer::lex;
    use model::NodeKind;
    use parser::parse_tokens;

    fn parse(src: &str) -> Node {
        let tokens = lex(src).unwrap();
        parse_tokens(&tokens).unwrap()
    }

    fn run(src: &str) -> Result<Vec<i64>, EvalError> {
        Evaluator::new().run(&parse(src))
    }

    #[test]
    fn prints_in_order() {
        assert_eq!(run("x = 1 + 2 * 3;\nprint(x);\nprint(x - 10);").unwrap(), vec![7, -3]);
    }

    #[test]
    fn unassigned_variable_reads_zero() {
        assert_eq!(run("print(never);").unwrap(), vec![0]);
    }

    #[test]
    fn while_loop_counts() {
        let out = run("i = 0;\nwhile (i < 5) i = i + 1;\nprint(i);").unwrap();
        assert_eq!(out, vec![5]);
    }

    #[test]
    fn if_else_uses_truthiness() {
        assert_eq!(run("if (3) print(1); else print(2);").unwrap(), vec![1]);
        assert_eq!(run("if (0) print(1); else print(2);").unwrap(), vec![2]);
        assert_eq!(run("if (2 == 3) print(1);").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn function_returns_last_assignment() {
        let out = run("function add(a, b) s = a + b;\nprint(add(40, 2));").unwrap();
        assert_eq!(out, vec![42]);
    }

    #[test]
    fn function_returns_last_print() {
        let out = run("function show(v) print(v * 2);\nx = show(4);\nprint(x);").unwrap();
        assert_eq!(out, vec![8, 8]);
    }

    #[test]
    fn function_without_assignment_returns_zero() {
        let out = run("function nothing(a) if (a) print(a);\nprint(nothing(0));").unwrap();
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn recursion_through_globals() {
        let src = "function fib(n) if (n < 2) r = n; else r = fib(n - 1) + fib(n - 2);\nprint(fib(10));";
        assert_eq!(run(src).unwrap(), vec![55]);
    }

    #[test]
    fn parameters_shadow_globals_by_value() {
        let src = "a = 1;\nfunction bump(a) a = a + 100;\nprint(bump(5));\nprint(a);";
        assert_eq!(run(src).unwrap(), vec![105, 1]);
    }

    #[test]
    fn functions_are_hoisted() {
        let src = "print(later(3));\nif (0) function later(n) r = n * n;";
        assert_eq!(run(src).unwrap(), vec![9]);
    }

    #[test]
    fn arguments_evaluate_left_to_right() {
        let src = "function tick(v) print(v);\nfunction pair(a, b) r = a - b;\nprint(pair(tick(1), tick(2)));";
        assert_eq!(run(src).unwrap(), vec![1, 2, -1]);
    }

    #[test]
    fn division_by_zero_stops_after_earlier_output() {
        let mut out = Vec::new();
        let err = Evaluator::new().run_to(&parse("print(1);\nprint(1 / 0);\nprint(2);"), &mut out).unwrap_err();
        assert!(matches!(err, EvalError::DivisionByZero));
        assert_eq!(String::from_utf8(out).unwrap(), "1\n");
    }

    #[test]
    fn run_to_writes_lines() {
        let mut out = Vec::new();
        Evaluator::new().run_to(&parse("print(10);\nprint(0 - 3);"), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "10\n-3\n");
    }

    #[test]
    fn step_limit_stops_infinite_loop() {
        let err = Evaluator::new().with_step_limit(1_000).run(&parse("while (1) x = x + 1;")).unwrap_err();
        assert!(matches!(err, EvalError::StepLimitExceeded(1_000)));
    }

    #[test]
    fn call_depth_limit_stops_runaway_recursion() {
        let program = parse("function down(n) r = down(n + 1);\nprint(down(0));");
        let err = Evaluator::new().with_call_depth_limit(50).run(&program).unwrap_err();
        assert!(matches!(err, EvalError::CallDepthExceeded(50)));
    }

    #[test]
    fn call_errors_are_found_before_running() {
        let err = run("print(1);\nif (0) print(missing());").unwrap_err();
        assert!(matches!(err, EvalError::Function(FunctionError::Unknown(ref name)) if name == "missing"));

        let err = run("function f(a) r = a;\nprint(f());").unwrap_err();
        assert!(matches!(err, EvalError::Function(FunctionError::ArityMismatch { expected: 1, found: 0, .. })));
    }

    #[test]
    fn malformed_tree_is_rejected() {
        let bad = Node::program(vec![Node::with_children(NodeKind::While, vec![Node::num("1")])]);
        assert!(matches!(Evaluator::new().run(&bad), Err(EvalError::MalformedTree(_))));
    }
}
