//! Input names from arguments or stdin.

use std::io::{self, BufRead, Lines};

/// Trimmed name, or `None` for a blank entry.
fn clean(raw: &str) -> Option<String> {
    let name = raw.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Names given on the command line, cleaned like stdin lines.
pub fn from_args(args: &[String]) -> impl Iterator<Item = String> + '_ {
    args.iter().filter_map(|arg| clean(arg))
}

/// One name per line. Iteration ends at the first read error, which is
/// kept for [`NameLines::finish`].
pub struct NameLines<R> {
    lines: Lines<R>,
    line: usize,
    error: Option<io::Error>,
}

impl<R: BufRead> NameLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            error: None,
        }
    }

    /// Surface a read error that cut the input short.
    pub fn finish(self) -> anyhow::Result<()> {
        match self.error {
            Some(e) => Err(anyhow::Error::from(e)
                .context(format!("Failed to read name on input line {}", self.line))),
            None => Ok(()),
        }
    }
}

impl<R: BufRead> Iterator for NameLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        loop {
            let line = self.lines.next()?;
            self.line += 1;
            match line {
                Ok(line) => {
                    if let Some(name) = clean(&line) {
                        return Some(name);
                    }
                }
                Err(e) => {
                    tracing::warn!(line = self.line, error = %e, "Stopped reading input");
                    self.error = Some(e);
                    return None;
                }
            }
        }
    }
}
