// Integration tests for running xlang programs

use xlang::error::Error;
use xlang::interpreter::{Interpreter, RuntimeError};

fn output(source: &str) -> Vec<String> {
    match xlang::run(source) {
        Ok(terminal) => terminal.get_output(),
        Err(e) => panic!("Execution failed: {}", e),
    }
}

/// Run to completion or failure, returning both the printed lines and the outcome
fn run_partial(source: &str) -> (Vec<String>, Result<(), Error>) {
    let program = xlang::compile(source).expect("Validation failed");
    let mut interpreter = Interpreter::new(&program);
    let result = interpreter.run();
    (interpreter.terminal().get_output(), result)
}

#[test]
fn test_hello() {
    let source = r#"
        func main() {
            print("Hello, world");
        }
    "#;
    assert_eq!(output(source), vec!["Hello, world"]);
}

#[test]
fn test_function_call() {
    let source = r#"
        func add(a: i32, b: i32): i32 {
            return a + b;
        }

        func main() {
            result: i32 = add(3, 4);
            print(result);
        }
    "#;
    assert_eq!(output(source), vec!["7"]);
}

#[test]
fn test_recursion() {
    let source = r#"
        func fact(n: u64): u64 {
            if (n <= 1) {
                return 1;
            }
            return n * fact(n - 1);
        }

        func main() {
            print(fact(10));
        }
    "#;
    assert_eq!(output(source), vec!["3628800"]);
}

#[test]
fn test_loop_with_break_and_continue() {
    let source = r#"
        func main() {
            i: i32 = 0;
            total: i32 = 0;
            loop {
                i = i + 1;
                if (i > 10) {
                    break;
                }
                if (i % 2 == 0) {
                    continue;
                }
                total = total + i;
            }
            print(total);
            print(i);
        }
    "#;
    assert_eq!(output(source), vec!["25", "11"]);
}

#[test]
fn test_loop_body_variables_are_fresh_each_iteration() {
    let source = r#"
        func main() {
            n: i32 = 0;
            loop {
                x: i32;
                x = x + n;
                print(x);
                n = n + 1;
                if (n == 3) {
                    break;
                }
            }
        }
    "#;
    assert_eq!(output(source), vec!["0", "1", "2"]);
}

#[test]
fn test_return_from_inside_loop() {
    let source = r#"
        func first_over(limit: i32): i32 {
            i: i32 = 0;
            loop {
                if (i * i > limit) {
                    return i;
                }
                i = i + 1;
            }
        }

        func main() {
            print(first_over(50));
        }
    "#;
    assert_eq!(output(source), vec!["8"]);
}

#[test]
fn test_if_elif_else() {
    let source = r#"
        func classify(n: i32): string {
            if (n < 0) {
                return "negative";
            } elif (n == 0) {
                return "zero";
            } else {
                return "positive";
            }
        }

        func main() {
            print(classify(-5));
            print(classify(0));
            print(classify(12));
        }
    "#;
    assert_eq!(output(source), vec!["negative", "zero", "positive"]);
}

#[test]
fn test_struct_value_and_reference_parameters() {
    let source = r#"
        struct Point {
            x: i32,
            y: i32
        }

        func move_copy(p: Point) {
            p.x = 100;
        }

        func move_ref(p: *Point) {
            p.x = 100;
        }

        func main() {
            p: Point = Point { x: 1, y: 2 };
            move_copy(p);
            print(p.x);
            move_ref(p);
            print(p.x);
            print(p);
        }
    "#;
    assert_eq!(output(source), vec!["1", "100", "Point { x: 100, y: 2 }"]);
}

#[test]
fn test_reference_parameter_primitive() {
    let source = r#"
        func bump(n: *i32) {
            n = n + 1;
        }

        func main() {
            counter: i32 = 41;
            bump(counter);
            print(counter);
        }
    "#;
    assert_eq!(output(source), vec!["42"]);
}

#[test]
fn test_struct_defaults() {
    let source = r#"
        enum Mode { Fast, Slow }

        struct Config {
            size: i32 = 10,
            name: string,
            mode: Mode = Mode.Slow
        }

        func main() {
            c: Config;
            print(c.size);
            print(c.name.length());
            print(c.mode);
            d: Config = Config { name: "d" };
            print(d);
        }
    "#;
    assert_eq!(
        output(source),
        vec!["10", "0", "Mode.Slow", "Config { mode: Mode.Slow, name: d, size: 10 }"]
    );
}

#[test]
fn test_nested_struct_assignment_copies() {
    let source = r#"
        struct Inner { v: i32 }
        struct Outer { inner: Inner }

        func main() {
            a: Outer;
            b: Outer = a;
            b.inner.v = 5;
            print(a.inner.v);
            print(b.inner.v);
        }
    "#;
    assert_eq!(output(source), vec!["0", "5"]);
}

#[test]
fn test_enums() {
    let source = r#"
        enum Color { Red, Green, Blue }

        func name(c: Color): string {
            if (c == Color.Red) {
                return "red";
            } elif (c != Color.Blue) {
                return "green";
            }
            return "blue";
        }

        func main() {
            c: Color = Color.Green;
            print(name(c));
            print(name(Color.Blue));
            print(c);
        }
    "#;
    assert_eq!(output(source), vec!["green", "blue", "Color.Green"]);
}

#[test]
fn test_arrays() {
    let source = r#"
        func sum(values: [i32]): i64 {
            total: i64 = 0;
            i: u32 = 0;
            loop {
                if (i >= values.length()) {
                    break;
                }
                total = total + values[i];
                i = i + 1;
            }
            return total;
        }

        func main() {
            values: [i32];
            values.append(5);
            values.append(-3);
            values.append(10);
            values[1] = 3;
            print(values.length());
            print(values);
            print(sum(values));
        }
    "#;
    assert_eq!(output(source), vec!["3", "[5, 3, 10]", "18"]);
}

#[test]
fn test_array_of_structs() {
    let source = r#"
        struct Item { count: u8 }

        func fill(items: *[Item]) {
            items.append(Item { count: 1 });
            items.append(Item { count: 2 });
        }

        func main() {
            items: [Item];
            fill(items);
            items[1].count = 7;
            print(items[0].count + items[1].count);
        }
    "#;
    assert_eq!(output(source), vec!["8"]);
}

#[test]
fn test_value_parameter_array_is_copied() {
    let source = r#"
        func grow(values: [i32]) {
            values.append(1);
            print(values.length());
        }

        func main() {
            values: [i32];
            grow(values);
            print(values.length());
        }
    "#;
    assert_eq!(output(source), vec!["1", "0"]);
}

#[test]
fn test_string_methods_and_indexing() {
    let source = r#"
        func main() {
            s: string = "Hello";
            print(s.toUpperCase());
            print(s.toLowerCase());
            print(s.length());
            print(s[1]);
            print(s[0].int());
            print(s + ", there");
            c: char = 'x';
            print(c.int());
        }
    "#;
    assert_eq!(
        output(source),
        vec!["HELLO", "hello", "5", "e", "72", "Hello, there", "120"]
    );
}

#[test]
fn test_typed_print_builtins() {
    let source = r#"
        func main() {
            prints("text");
            printi(-12);
            printf(2.5);
            printb(not true);
        }
    "#;
    assert_eq!(output(source), vec!["text", "-12", "2.5", "false"]);
}

#[test]
fn test_assert_failure() {
    let source = r#"
        func main() {
            print("before");
            assert(1 == 1);
            assert(false);
            print("after");
        }
    "#;
    let (lines, result) = run_partial(source);
    assert_eq!(lines, vec!["before"]);
    match result {
        Err(Error::Assertion(failure)) => assert_eq!(failure.location.line, 5),
        other => panic!("Expected assertion failure, got {:?}", other),
    }
}

#[test]
fn test_index_out_of_bounds() {
    let source = r#"
        func main() {
            values: [i32];
            values.append(1);
            print(values[1]);
        }
    "#;
    let (_, result) = run_partial(source);
    assert!(matches!(
        result,
        Err(Error::Runtime(RuntimeError::IndexOutOfBounds { index: 1, len: 1, .. }))
    ));
}

#[test]
fn test_string_index_out_of_bounds() {
    let source = r#"
        func main() {
            s: string = "ab";
            c: char = s[5];
        }
    "#;
    let (_, result) = run_partial(source);
    assert!(matches!(
        result,
        Err(Error::Runtime(RuntimeError::IndexOutOfBounds { index: 5, len: 2, .. }))
    ));
}

#[test]
fn test_missing_return_value() {
    let source = r#"
        func maybe(flag: bool): i32 {
            if (flag) {
                return 1;
            }
        }

        func main() {
            print(maybe(true));
            print(maybe(false));
        }
    "#;
    let (lines, result) = run_partial(source);
    assert_eq!(lines, vec!["1"]);
    assert!(matches!(
        result,
        Err(Error::Runtime(RuntimeError::MissingReturnValue { .. }))
    ));
}

#[test]
fn test_no_main() {
    let source = "func helper() { }";
    assert!(matches!(
        xlang::run(source),
        Err(Error::Runtime(RuntimeError::NoMainFunction))
    ));
}

#[test]
fn test_main_with_parameters_is_rejected() {
    let source = "func main(x: i32) { }";
    assert!(matches!(
        xlang::run(source),
        Err(Error::Runtime(RuntimeError::InvalidMainSignature { .. }))
    ));
}

#[test]
fn test_return_in_main_ends_execution() {
    let source = r#"
        func main() {
            print(1);
            return;
            print(2);
        }
    "#;
    assert_eq!(output(source), vec!["1"]);
}

#[test]
fn test_deep_recursion_overflows() {
    let source = r#"
        func down(n: i64): i64 {
            return down(n + 1);
        }

        func main() {
            print(down(0));
        }
    "#;

    // Runs on the default test thread stack
    let result = xlang::run(source);

    match result {
        Err(Error::Runtime(RuntimeError::StackOverflow { function, limit, .. })) => {
            assert_eq!(function, "down");
            assert_eq!(limit, xlang::interpreter::constants::MAX_CALL_DEPTH);
        }
        other => panic!("Expected stack overflow, got {:?}", other),
    }
}
