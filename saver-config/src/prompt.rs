//! Interactive entity-count prompt. Invalid input re-prompts; it never
//! defaults silently and never panics.

use crate::{MAX_ENTITIES, MIN_ENTITIES};
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed before a valid entity count was entered")]
    Eof,
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Read an entity count in `[MIN_ENTITIES, MAX_ENTITIES]` from `input`,
/// re-prompting on empty, non-numeric or out-of-range lines. Only EOF or an
/// I/O failure ends the loop with an error.
pub fn prompt_entity_count<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<usize, PromptError> {
    loop {
        write!(
            output,
            "Enter the number of entities ({MIN_ENTITIES}-{MAX_ENTITIES}): "
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            writeln!(output, "Error: no value entered.")?;
            continue;
        }

        match trimmed.parse::<usize>() {
            Ok(n) if (MIN_ENTITIES..=MAX_ENTITIES).contains(&n) => return Ok(n),
            _ => writeln!(
                output,
                "Error: enter a number between {MIN_ENTITIES} and {MAX_ENTITIES}."
            )?,
        }
    }
}
