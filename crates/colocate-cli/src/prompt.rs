//! Console interaction, behind a trait so the resolver can be driven by a
//! scripted prompter in tests.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

pub(crate) trait Prompter {
    /// Shows `message` and reads one line. `Ok(None)` means end of input.
    fn ask(&mut self, message: &str) -> io::Result<Option<String>>;

    /// Writes one line of output for the operator.
    fn tell(&mut self, message: &str) -> io::Result<()>;
}

pub(crate) struct ConsolePrompter {
    stdin: StdinLock<'static>,
    stdout: Stdout,
}

impl ConsolePrompter {
    pub(crate) fn new() -> Self {
        Self {
            stdin: io::stdin().lock(),
            stdout: io::stdout(),
        }
    }
}

impl Prompter for ConsolePrompter {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.stdout, "{message}")?;
        self.stdout.flush()?;
        let mut line = String::new();
        if self.stdin.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn tell(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.stdout, "{message}")
    }
}
