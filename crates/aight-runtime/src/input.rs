//! Line-oriented interactive input.

use std::io::Write;

use aight_core::Confirmation;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct LineInput<R> {
    lines: Lines<R>,
}

impl LineInput<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines() }
    }

    /// Next line without its terminator; `None` at end of input.
    pub async fn next_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    /// Print `question` (no newline) and read the answer.
    pub async fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{question}")?;
        stdout.flush()?;
        self.next_line().await
    }
}

/// `y`/`yes` accept, `n`/`no` reject, empty or `s`/`skip` leaves undecided.
pub fn parse_confirmation(answer: &str) -> Option<Confirmation> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Confirmation::Accepted),
        "n" | "no" => Some(Confirmation::Rejected),
        "" | "s" | "skip" => Some(Confirmation::Undecided),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_answers() {
        assert_eq!(parse_confirmation(" Y "), Some(Confirmation::Accepted));
        assert_eq!(parse_confirmation("no"), Some(Confirmation::Rejected));
        assert_eq!(parse_confirmation(""), Some(Confirmation::Undecided));
        assert_eq!(parse_confirmation("maybe"), None);
    }

    #[tokio::test]
    async fn reads_lines_until_eof() {
        let mut input = LineInput::new(&b"first\r\nsecond\n"[..]);
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(input.next_line().await.unwrap(), None);
    }
}
