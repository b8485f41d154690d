// C runtime prelude emitted at the top of every translation unit.
//
// All values are `long long`. Arithmetic wraps on overflow (done through
// unsigned arithmetic, which C defines), division truncates toward zero and
// aborts the program with exit status 2 when the divisor is zero.

pub const RUNTIME_PRELUDE: &str = r#"#include <limits.h>
#include <stdio.h>
#include <stdlib.h>

static long long rt_add(long long a, long long b) {
    return (long long)((unsigned long long)a + (unsigned long long)b);
}

static long long rt_sub(long long a, long long b) {
    return (long long)((unsigned long long)a - (unsigned long long)b);
}

static long long rt_mul(long long a, long long b) {
    return (long long)((unsigned long long)a * (unsigned long long)b);
}

static long long rt_div(long long a, long long b) {
    if (b == 0) {
        fflush(stdout);
        fputs("runtime error: division by zero\n", stderr);
        exit(2);
    }
    if (a == LLONG_MIN && b == -1) {
        return LLONG_MIN;
    }
    return a / b;
}

static long long rt_print(long long value) {
    printf("%lld\n", value);
    return value;
}
"#;

/// Exit status of a generated program that divided by zero.
pub const DIVISION_BY_ZERO_STATUS: i32 = 2;
