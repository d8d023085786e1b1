//! Interactive prompts. Prompts go to the `out` writer (stderr in the
//! binary); answers come from a buffered reader so input of any length is
//! read whole.

use crate::error::{Error, InputSnafu, PromptSnafu};
use snafu::ResultExt;
use std::io::{BufRead, Read, Write};

pub struct Prompter<R, W> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self { reader, out }
    }

    /// Prints `prompt` and returns the next line, trimmed. End of input
    /// yields an empty string.
    pub fn line(&mut self, prompt: &str) -> Result<String, Error> {
        self.say(prompt)?;
        let mut line = String::new();
        self.reader.read_line(&mut line).context(InputSnafu)?;
        Ok(line.trim().to_string())
    }

    /// Prints `prompt` and returns everything up to end of input, untouched.
    pub fn until_eof(&mut self, prompt: &str) -> Result<String, Error> {
        self.say(prompt)?;
        let mut content = String::new();
        self.reader
            .read_to_string(&mut content)
            .context(InputSnafu)?;
        Ok(content)
    }

    pub fn say(&mut self, text: &str) -> Result<(), Error> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
            .context(PromptSnafu)
    }
}
