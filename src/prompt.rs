//! Interactive yes/no confirmation for destructive commands.

use std::io::{BufRead, Write};

use crate::{Error, Result};

pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Scripted answers (tests, non-interactive callers).
impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}

/// Prompt on stderr, read one line from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{prompt}").map_err(Error::Prompt)?;
        stderr.flush().map_err(Error::Prompt)?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(Error::Prompt)?;
        Ok(is_affirmative(&line))
    }
}

/// `y` or `yes`, any case. End of input counts as no.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
