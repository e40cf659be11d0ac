use std::collections::HashMap;
use std::io::Write;

use tracing::{debug, info};

use crate::array::StringArray;
use crate::error::{ArrayError, ArrayResult, ScriptError};
use crate::script::{self, Command};

/// The walkthrough run by `arrays --demo`.
pub const DEMO_SCRIPT: &str = r#"# build [STRING2,STRING3,STRING1,STRING4] from a one-slot array
new arr 1
insert arr STRING1 0
append arr STRING4
insert arr STRING2 0
insert arr STRING3 1
print arr
remove arr STRING3
print arr

# copies are independent
copy arr arr_dup
print arr_dup
clear arr_dup
print arr_dup
print arr

copy arr arr_2
extend arr arr_2
print arr

index arr STRING1
index arr STRING3

# the first two pops are out of range
pop arr -8
pop arr 10
pop arr 3
pop arr 4
pop arr 0
pop arr -1
insert arr STRING2 1
print arr

reverse arr
print arr

drop arr_2
drop arr_dup
drop arr
"#;

/// Runs commands against a set of named arrays and writes results to `out`.
///
/// Container errors are written as `error: ...` lines and the run continues with the
/// array unchanged. Everything in [`ScriptError`] stops the run.
pub struct Session<W: Write> {
    arrays: HashMap<String, StringArray>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        Self {
            arrays: HashMap::new(),
            out,
        }
    }

    /// Parses and runs a whole script.
    pub fn run(&mut self, source: &str) -> Result<(), ScriptError> {
        let commands = script::parse(source)?;
        info!(commands = commands.len(), "running script");
        for command in commands {
            self.execute(command)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<(), ScriptError> {
        debug!(?command, "executing");
        match self.apply(command)? {
            Ok(Some(line)) => writeln!(self.out, "{}", line)?,
            Ok(None) => {}
            Err(err) => writeln!(self.out, "error: {}", err)?,
        }
        Ok(())
    }

    pub fn array(&self, name: &str) -> Option<&StringArray> {
        self.arrays.get(name)
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Outer error aborts the run, inner error is reported and skipped.
    fn apply(&mut self, command: Command) -> Result<ArrayResult<Option<String>>, ScriptError> {
        let outcome = match command {
            Command::New { name, capacity } => {
                if self.arrays.contains_key(&name) {
                    return Err(ScriptError::DuplicateArray(name));
                }
                match create(capacity) {
                    Ok(arr) => {
                        self.arrays.insert(name, arr);
                        Ok(None)
                    }
                    Err(err) => Err(err),
                }
            }
            Command::Insert { name, value, index } => {
                let arr = self.get_mut(&name)?;
                match usize::try_from(index) {
                    Ok(index) => arr.insert(&value, index).map(|_| None),
                    Err(_) => Err(negative_index(index, arr)),
                }
            }
            Command::Append { name, value } => self.get_mut(&name)?.append(&value).map(|_| None),
            Command::Remove { name, value } => {
                self.get_mut(&name)?.remove(&value);
                Ok(None)
            }
            Command::IndexOf { name, value } => {
                let position = self.get(&name)?.index_of(&value);
                Ok(Some(position.map_or(-1, |i| i as isize).to_string()))
            }
            Command::Read { name, index } => {
                let arr = self.get(&name)?;
                match usize::try_from(index) {
                    Ok(index) => arr.read(index).map(|value| Some(value.to_string())),
                    Err(_) => Err(negative_index(index, arr)),
                }
            }
            Command::Pop { name, index } => self.get_mut(&name)?.pop(index).map(Some),
            Command::Clear { name } => self.get_mut(&name)?.clear().map(|_| None),
            Command::Copy { from, to } => {
                if self.arrays.contains_key(&to) {
                    return Err(ScriptError::DuplicateArray(to));
                }
                let copy = self.get(&from)?.copy();
                self.arrays.insert(to, copy);
                Ok(None)
            }
            Command::Extend { name, other } => {
                // `extend a a` is allowed, so take a snapshot of the source first.
                let source = self.get(&other)?.copy();
                self.get_mut(&name)?.extend(&source).map(|_| None)
            }
            Command::Reverse { name } => {
                self.get_mut(&name)?.reverse();
                Ok(None)
            }
            Command::Print { name } => Ok(Some(self.get(&name)?.to_string())),
            Command::Drop { name } => {
                self.arrays
                    .remove(&name)
                    .ok_or(ScriptError::UnknownArray(name))?;
                Ok(None)
            }
        };
        Ok(outcome)
    }

    fn get(&self, name: &str) -> Result<&StringArray, ScriptError> {
        self.arrays
            .get(name)
            .ok_or_else(|| ScriptError::UnknownArray(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut StringArray, ScriptError> {
        self.arrays
            .get_mut(name)
            .ok_or_else(|| ScriptError::UnknownArray(name.to_string()))
    }
}

fn create(capacity: isize) -> ArrayResult<StringArray> {
    match usize::try_from(capacity) {
        Ok(capacity) => StringArray::new(capacity),
        Err(_) => Err(ArrayError::InvalidCapacity { requested: capacity }),
    }
}

fn negative_index(index: isize, arr: &StringArray) -> ArrayError {
    ArrayError::IndexOutOfRange {
        index,
        count: arr.len(),
    }
}
