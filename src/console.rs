use std::io::{BufRead, Write};

use crate::error::InputError;

/// Width of the dashed separator printed between sections.
pub const SEPARATOR_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// Console – line-oriented prompt/answer I/O
// ---------------------------------------------------------------------------

/// Blocking prompt/answer console over any reader and writer, so the whole
/// interactive flow can run against in-memory buffers.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer for report output.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn separator(&mut self) -> std::io::Result<()> {
        writeln!(self.output, "{}", "-".repeat(SEPARATOR_WIDTH))
    }

    /// Print `prompt` and read one trimmed line. End of input is an error.
    pub fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        writeln!(self.output, "{prompt}")?;
        write!(self.output, " ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer, showing `retry` after each
    /// rejected answer.
    pub fn ask_until<T>(
        &mut self,
        prompt: &str,
        retry: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<T, InputError> {
        let mut answer = self.ask(prompt)?;
        loop {
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    log::debug!("rejected input: {err}");
                    answer = self.ask(retry)?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Yes/no question; only `yes` or `y` count as agreement.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, InputError> {
        let answer = self.ask(prompt)?;
        Ok(is_affirmative(&answer))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}
