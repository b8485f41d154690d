// Source identifiers are prefixed on the way into C so they can never clash
// with C keywords, libc symbols, the runtime (`rt_`) or temporaries (`tN`).

pub(crate) fn variable(name: &str) -> String {
    format!("v_{name}")
}

pub(crate) fn function(name: &str) -> String {
    format!("f_{name}")
}

/// Local that holds a function's result.
pub(crate) const RESULT: &str = "rt_last";
