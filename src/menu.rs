//! Interactive console menu for picking what to generate.
//!
//! Every question has a default picked by an empty answer; unknown letters
//! also get the default.

use std::io::{BufRead, Write};

use crate::concepts::GenerationMode;
use crate::error::MenuError;
use crate::prompt::ArtStyle;

/// Built-in themes, in menu order.
pub const THEMES: [&str; 4] = [
    "Evolving monsters",
    "Weird creatures",
    "Cute animals",
    "Cute dinosaurs",
];

const LETTERS: [char; 6] = ['a', 'b', 'c', 'd', 'e', 'f'];

fn read_line<R: BufRead>(input: &mut R) -> Result<String, MenuError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<String, MenuError> {
    write!(output, "{question}")?;
    output.flush()?;
    Ok(read_line(input)?.to_ascii_lowercase())
}

/// Position of a menu letter, `a` for an empty answer.
fn choice(answer: &str, options: usize) -> usize {
    let mut chars = answer.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => LETTERS[..options]
            .iter()
            .position(|candidate| *candidate == letter)
            .unwrap_or(0),
        _ => 0,
    }
}

/// Asks for the generation mode.
pub fn select_mode<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<GenerationMode, MenuError> {
    writeln!(output, "\n1. Generation mode:")?;
    writeln!(output, "   a) Evolution (20 creatures x 5 stages)")?;
    writeln!(output, "   b) Thematic (70 independent cards)")?;
    writeln!(output, "   c) Hybrid (evolution + thematic)")?;
    let answer = ask(input, output, "Select mode (a/b/c) [a]: ")?;
    Ok(match choice(&answer, 3) {
        1 => GenerationMode::Thematic,
        2 => GenerationMode::Hybrid,
        _ => GenerationMode::Evolution,
    })
}

/// Asks for a theme, either one of [`THEMES`] or free text.
pub fn select_theme<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<String, MenuError> {
    writeln!(output, "\n2. Theme:")?;
    for (letter, theme) in LETTERS.iter().zip(THEMES) {
        writeln!(output, "   {letter}) {theme}")?;
    }
    writeln!(output, "   e) Custom theme")?;
    let answer = ask(input, output, "Select theme (a/b/c/d/e) [a]: ")?;
    if answer == "e" {
        write!(output, "Enter custom theme: ")?;
        output.flush()?;
        let theme = read_line(input)?;
        if theme.is_empty() {
            return Err(MenuError::EmptyTheme);
        }
        return Ok(theme);
    }
    Ok(THEMES[choice(&answer, THEMES.len())].to_string())
}

/// Asks for an art style.
pub fn select_style<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<ArtStyle, MenuError> {
    writeln!(output, "\n3. Art style:")?;
    for (letter, style) in LETTERS.iter().zip(ArtStyle::ALL) {
        writeln!(output, "   {letter}) {style}")?;
    }
    let answer = ask(input, output, "Select style (a/b/c/d/e/f) [a]: ")?;
    Ok(ArtStyle::ALL[choice(&answer, ArtStyle::ALL.len())])
}

/// Asks whether to go ahead; anything but yes cancels.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool, MenuError> {
    let answer = ask(input, output, "\nStart generation? (yes/no) [yes]: ")?;
    Ok(matches!(answer.as_str(), "" | "y" | "yes"))
}
