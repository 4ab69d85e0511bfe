//! Rendering errors against their source with ariadne

use crate::error::Error;
use crate::parser::ast::SourceLocation;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};

/// Process exit status for each kind of failure
pub fn exit_code(error: &Error) -> u8 {
    match error {
        Error::Parse(_) | Error::Compile(_) => 1,
        Error::Runtime(_) => 2,
        Error::Assertion(_) => 3,
        Error::Internal(_) => 101,
    }
}

fn title(error: &Error) -> String {
    match error {
        Error::Parse(_) => "Parse error".to_string(),
        Error::Compile(e) => e.kind.to_string(),
        Error::Runtime(_) => "Runtime error".to_string(),
        Error::Assertion(_) => "Assertion failed".to_string(),
        Error::Internal(_) => "Internal compiler error".to_string(),
    }
}

fn message(error: &Error) -> String {
    match error {
        Error::Parse(e) => e.message.clone(),
        Error::Compile(e) => e.message.clone(),
        Error::Internal(e) => e.message.clone(),
        other => other.to_string(),
    }
}

/// Char offset of a 1-based line/column position, clamped to the source.
fn char_offset(source: &str, location: SourceLocation) -> usize {
    let mut offset = 0;
    for (index, line) in source.split('\n').enumerate() {
        let length = line.chars().count();
        if index + 1 == location.line {
            return offset + location.column.saturating_sub(1).min(length);
        }
        offset += length + 1;
    }
    source.chars().count()
}

/// Render `error` as a report over `source`
pub fn render(error: &Error, file_name: &str, source: &str, color: bool) -> String {
    let config = Config::default().with_color(color);

    let report = match error.location() {
        Some(location) => {
            let start = char_offset(source, location);
            let span = (file_name, start..start + 1);
            let mut builder = Report::build(ReportKind::Error, span.clone())
                .with_config(config)
                .with_message(title(error))
                .with_label(
                    Label::new(span)
                        .with_message(message(error))
                        .with_color(Color::Red),
                );
            if let Error::Compile(e) = error {
                if let Some(function) = &e.function {
                    builder = builder.with_note(format!(
                        "in function '{}' defined at {}",
                        function.name, function.location
                    ));
                }
            }
            builder.finish()
        }
        None => Report::build(ReportKind::Error, (file_name, 0..0))
            .with_config(config)
            .with_message(format!("{}: {}", title(error), message(error)))
            .finish(),
    };

    let mut buffer = Vec::new();
    match report.write((file_name, Source::from(source)), &mut buffer) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::RuntimeError;

    #[test]
    fn test_char_offset() {
        let source = "ab\ncdé\nf";
        assert_eq!(char_offset(source, SourceLocation::new(1, 1)), 0);
        assert_eq!(char_offset(source, SourceLocation::new(2, 2)), 4);
        assert_eq!(char_offset(source, SourceLocation::new(3, 1)), 7);
        assert_eq!(char_offset(source, SourceLocation::new(9, 1)), 8);
    }

    #[test]
    fn test_render_compile_error_names_function() {
        let source = "func main() {\n    x: i32 = \"no\";\n}\n";
        let error = crate::compile(source).unwrap_err();
        let rendered = render(&error, "test.x", source, false);
        assert!(rendered.contains("Type error"), "{}", rendered);
        assert!(rendered.contains("in function 'main'"), "{}", rendered);
        assert_eq!(exit_code(&error), 1);
    }

    #[test]
    fn test_render_without_location() {
        let error = Error::Runtime(RuntimeError::NoMainFunction);
        let rendered = render(&error, "test.x", "", false);
        assert!(rendered.contains("No main() function found"), "{}", rendered);
        assert_eq!(exit_code(&error), 2);
    }
}
