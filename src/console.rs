//! Line-oriented prompts over any reader/writer pair.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Prints `prompt` and reads one line. Returns `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Yes/no question; only `y` (any case) counts as yes.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(matches!(self.ask(prompt)?, Some(answer) if answer.trim().eq_ignore_ascii_case("y")))
    }

    /// Asks for an index below `len` until one is given. `q` or end of input
    /// returns `None`.
    pub fn pick_index(&mut self, prompt: &str, len: usize) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if answer == "q" {
                return Ok(None);
            }

            match answer.parse::<usize>() {
                Ok(index) if index < len => return Ok(Some(index)),
                Ok(_) => self.say("That challenge does not exist.")?,
                Err(_) => self.say("That input is not a number!")?,
            }
        }
    }
}
