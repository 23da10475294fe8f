//! Interactive prompts

use std::io::{self, Write};

use crate::error::Result;

/// Ask a yes/no question. Anything other than `y` or `Y` is a no.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}
