// Integer and float arithmetic semantics

use xlang::error::Error;
use xlang::interpreter::RuntimeError;
use xlang::semantic::errors::CompileErrorKind;

fn output(source: &str) -> Vec<String> {
    match xlang::run(source) {
        Ok(terminal) => terminal.get_output(),
        Err(e) => panic!("Execution failed: {}", e),
    }
}

#[test]
fn test_floor_division_and_modulo_constants() {
    let source = r#"
        func main() {
            print(7 / 2);
            print(-7 / 2);
            print(7 % -2);
            print(-7 % 2);
        }
    "#;
    assert_eq!(output(source), vec!["3", "-4", "-1", "1"]);
}

#[test]
fn test_floor_division_and_modulo_variables() {
    let source = r#"
        func main() {
            a: i32 = -7;
            b: i32 = 2;
            print(a / b);
            print(a % b);
            c: i32 = 7;
            d: i32 = -2;
            print(c / d);
            print(c % d);
        }
    "#;
    assert_eq!(output(source), vec!["-4", "1", "-4", "-1"]);
}

#[test]
fn test_precedence() {
    let source = r#"
        func main() {
            x: i32 = 2;
            print(1 + x * 3);
            print((1 + x) * 3);
            print(10 - 4 - 3);
            print(-x + 5);
        }
    "#;
    assert_eq!(output(source), vec!["7", "9", "3", "3"]);
}

#[test]
fn test_widening_in_mixed_expressions() {
    let source = r#"
        func main() {
            small: u8 = 200;
            wide: u32 = 100000;
            total: u64 = wide + small;
            print(total);
            signed: i16 = -300;
            mixed: i32 = signed + small;
            print(mixed);
        }
    "#;
    assert_eq!(output(source), vec!["100200", "-100"]);
}

#[test]
fn test_int_alias_is_i64() {
    let source = r#"
        func main() {
            big: int = 3000000000;
            print(big * 2);
            small: int = -5;
            print(small);
        }
    "#;
    assert_eq!(output(source), vec!["6000000000", "-5"]);
}

#[test]
fn test_integer_overflow_at_runtime() {
    let source = r#"
        func main() {
            x: u8 = 255;
            x = x + 1;
        }
    "#;
    match xlang::run(source) {
        Err(Error::Runtime(RuntimeError::IntegerOverflow { ty, .. })) => assert_eq!(ty, "u8"),
        other => panic!("Expected overflow, got {:?}", other.map(|t| t.get_output())),
    }
}

#[test]
fn test_unsigned_underflow_at_runtime() {
    let source = r#"
        func main() {
            x: u32 = 0;
            y: u32 = x - 1;
        }
    "#;
    assert!(matches!(
        xlang::run(source),
        Err(Error::Runtime(RuntimeError::IntegerOverflow { .. }))
    ));
}

#[test]
fn test_division_by_zero_at_runtime() {
    let source = r#"
        func main() {
            zero: i32 = 0;
            print(10 / zero);
        }
    "#;
    assert!(matches!(
        xlang::run(source),
        Err(Error::Runtime(RuntimeError::DivisionByZero { .. }))
    ));

    let source = r#"
        func main() {
            zero: f32 = 0.0;
            print(1.0 % zero);
        }
    "#;
    assert!(matches!(
        xlang::run(source),
        Err(Error::Runtime(RuntimeError::DivisionByZero { .. }))
    ));
}

#[test]
fn test_constant_division_by_zero_is_compile_error() {
    let source = r#"
        func main() {
            print(1 / 0);
        }
    "#;
    match xlang::compile(source) {
        Err(Error::Compile(e)) => assert_eq!(e.kind, CompileErrorKind::DivisionByZero),
        other => panic!("Expected compile error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_float_arithmetic() {
    let source = r#"
        func main() {
            f: f32 = 1.5;
            print(f * 2.0);
            print(f / 2.0);
            print(-f);
            print(7.5 % 2.0);
            print(f > 1.0);
        }
    "#;
    assert_eq!(output(source), vec!["3.0", "0.75", "-1.5", "1.5", "true"]);
}

#[test]
fn test_comparisons() {
    let source = r#"
        func main() {
            print(3 < 5);
            print(-3 >= -2);
            print('a' < 'b');
            print("apple" < "banana");
            print("x" == "x");
            a: u8 = 5;
            b: i64 = 5;
            print(a == b);
            print(not (a != b));
        }
    "#;
    assert_eq!(
        output(source),
        vec!["true", "false", "true", "true", "true", "true", "true"]
    );
}

#[test]
fn test_negating_minimum_overflows() {
    let source = r#"
        func main() {
            x: i8 = -128;
            y: i8 = -x;
        }
    "#;
    assert!(matches!(
        xlang::run(source),
        Err(Error::Runtime(RuntimeError::IntegerOverflow { .. }))
    ));
}
