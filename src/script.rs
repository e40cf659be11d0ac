use crate::error::ScriptError;

/// One line of an array script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New { name: String, capacity: isize },
    Insert { name: String, value: String, index: isize },
    Append { name: String, value: String },
    Remove { name: String, value: String },
    IndexOf { name: String, value: String },
    Read { name: String, index: isize },
    Pop { name: String, index: isize },
    Clear { name: String },
    Copy { from: String, to: String },
    Extend { name: String, other: String },
    Reverse { name: String },
    Print { name: String },
    Drop { name: String },
}

peg::parser!(pub grammar parser() for str {
    use super::Command;

    pub rule script() -> Vec<Command>
        = blank_line()* cmds:(c:command() end_of_line() blank_line()* { c })* ws() comment()?
        { cmds }

    rule command() -> Command
        = ws() c:(new() / insert() / append() / remove() / index_of() / read() / pop()
                  / clear() / copy() / extend() / reverse() / print() / drop()) { c }

    rule new() -> Command
        = "new" sp() name:name() sp() capacity:integer() { Command::New { name, capacity } }

    rule insert() -> Command
        = "insert" sp() name:name() sp() value:value() sp() index:integer()
        { Command::Insert { name, value, index } }

    rule append() -> Command
        = "append" sp() name:name() sp() value:value() { Command::Append { name, value } }

    rule remove() -> Command
        = "remove" sp() name:name() sp() value:value() { Command::Remove { name, value } }

    rule index_of() -> Command
        = "index" sp() name:name() sp() value:value() { Command::IndexOf { name, value } }

    rule read() -> Command
        = "read" sp() name:name() sp() index:integer() { Command::Read { name, index } }

    rule pop() -> Command
        = "pop" sp() name:name() sp() index:integer() { Command::Pop { name, index } }

    rule clear() -> Command
        = "clear" sp() name:name() { Command::Clear { name } }

    rule copy() -> Command
        = "copy" sp() from:name() sp() to:name() { Command::Copy { from, to } }

    rule extend() -> Command
        = "extend" sp() name:name() sp() other:name() { Command::Extend { name, other } }

    rule reverse() -> Command
        = "reverse" sp() name:name() { Command::Reverse { name } }

    rule print() -> Command
        = "print" sp() name:name() { Command::Print { name } }

    rule drop() -> Command
        = "drop" sp() name:name() { Command::Drop { name } }

    rule name() -> String
        = quiet!{ n:$(['a'..='z' | 'A'..='Z' | '_'] ['a'..='z' | 'A'..='Z' | '0'..='9' | '_']*)
        { n.to_string() } }
        / expected!("array name")

    rule value() -> String
        = "\"" s:$((!['"' | '\n' | '\r'] [_])*) "\"" { s.to_string() }
        / s:$((![' ' | '\t' | '\n' | '\r' | '"' | '#'] [_])+) { s.to_string() }

    rule integer() -> isize
        = quiet!{ n:$("-"? ['0'..='9']+) {? n.parse().or(Err("integer")) } }
        / expected!("integer")

    rule end_of_line() = ws() comment()? (newline() / ![_])
    rule blank_line() = ws() comment()? newline()
    rule comment() = "#" (!['\n' | '\r'] [_])*
    rule newline() = "\r"? "\n"
    rule ws() = quiet!{[' ' | '\t']*}
    rule sp() = quiet!{[' ' | '\t']+}
});

/// Parses a whole script into commands.
pub fn parse(source: &str) -> Result<Vec<Command>, ScriptError> {
    parser::script(source).map_err(|e| ScriptError::Parse {
        line: e.location.line,
        column: e.location.column,
        expected: e.expected.to_string(),
    })
}
