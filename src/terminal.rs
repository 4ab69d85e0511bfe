// Output sink for the print builtins

use crate::parser::ast::SourceLocation;

/// A line of program output with the position of the call that printed it
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalLine {
    pub text: String,
    pub location: SourceLocation,
}

/// Records everything the program prints. With `echo` set, lines are also
/// written to stdout as they are produced.
#[derive(Debug, Clone, Default)]
pub struct Terminal {
    pub lines: Vec<TerminalLine>,
    echo: bool,
}

impl Terminal {
    pub fn new(echo: bool) -> Self {
        Terminal {
            lines: Vec::new(),
            echo,
        }
    }

    /// Print one line
    pub fn print_line(&mut self, text: String, location: SourceLocation) {
        if self.echo {
            println!("{}", text);
        }
        self.lines.push(TerminalLine { text, location });
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.text.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_lines_in_order() {
        let mut terminal = Terminal::new(false);
        terminal.print_line("a".to_string(), SourceLocation::new(1, 1));
        terminal.print_line("b".to_string(), SourceLocation::new(2, 1));
        assert_eq!(terminal.get_output(), vec!["a", "b"]);
        assert_eq!(terminal.lines[1].location.line, 2);
    }
}
