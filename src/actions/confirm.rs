//! Yes/no confirmation prompts.
//!
//! Only `y` or `yes` (any case, surrounding whitespace ignored) counts as
//! consent. Anything else, including an empty line, EOF or a read error,
//! is a refusal.

use std::io::{BufRead, Write};

/// Whether an answer line means "yes".
///
/// # Example
///
/// ```
/// use dupfinder::actions::is_affirmative;
///
/// assert!(is_affirmative(" YES\n"));
/// assert!(!is_affirmative(""));
/// ```
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Write `prompt` to `output`, read one line from `input`.
///
/// Returns `true` only for an affirmative answer.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> bool {
    if let Err(e) = write!(output, "{} [y/N] ", prompt).and_then(|()| output.flush()) {
        log::debug!("Failed to write prompt: {}", e);
    }

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => {
            log::debug!("EOF at prompt, treating as no");
            false
        }
        Ok(_) => is_affirmative(&line),
        Err(e) => {
            log::warn!("Failed to read answer: {}", e);
            false
        }
    }
}
