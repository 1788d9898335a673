//! Interactive keep/overwrite/cancel prompt.
//!
//! Reads one line at a time until a recognized answer arrives. End of input
//! resolves to [`PromptDecision::Cancel`], including a final line that is
//! cut off before its newline, so a detached caller never hangs or crashes
//! and never overwrites on a partial answer. Read faults propagate.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::error::SysgreetError;

/// The user's answer to the overwrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDecision {
    Keep,
    Overwrite,
    Cancel,
}

impl PromptDecision {
    /// Match a normalized answer: single letter or full word.
    fn from_answer(answer: &str) -> Option<Self> {
        match answer {
            "k" | "keep" => Some(PromptDecision::Keep),
            "o" | "overwrite" => Some(PromptDecision::Overwrite),
            "c" | "cancel" => Some(PromptDecision::Cancel),
            _ => None,
        }
    }
}

/// Ask whether to keep or overwrite the config at `path`.
///
/// The menu and notices go to `output`; answers are read from `input`. Empty
/// lines re-prompt silently, unrecognized answers print an "Invalid
/// selection" notice first. There is no retry bound.
pub fn ask_overwrite<R, W>(
    input: &mut R,
    output: &mut W,
    path: &Path,
) -> Result<PromptDecision, SysgreetError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let stream = Path::new("<prompt>");
    let notice = |e: std::io::Error| SysgreetError::io("write", stream, e);

    writeln!(
        output,
        "sysgreet bootstrap: configuration already exists at {}",
        path.display()
    )
    .map_err(notice)?;
    writeln!(output, "Choose an option:").map_err(notice)?;
    writeln!(output, "  [K]eep existing config").map_err(notice)?;
    writeln!(
        output,
        "  [O]verwrite with defaults (backup will be created)"
    )
    .map_err(notice)?;
    writeln!(output, "  [C]ancel and exit").map_err(notice)?;

    let mut line = String::new();
    loop {
        write!(output, "Selection [K/O/C]: ").map_err(notice)?;
        output.flush().map_err(notice)?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| SysgreetError::io("read", stream, e))?;
        if read == 0 || !line.ends_with('\n') {
            tracing::debug!("prompt input closed without an answer; cancelling");
            return Ok(PromptDecision::Cancel);
        }

        let answer = line.trim().to_lowercase();
        if let Some(decision) = PromptDecision::from_answer(&answer) {
            return Ok(decision);
        }
        if !answer.is_empty() {
            writeln!(output, "Invalid selection. Please choose K, O, or C.").map_err(notice)?;
        }
    }
}
