//! Infrastructure implementation of the `UserPrompt` port.

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Context, Result};

use crate::application::ports::UserPrompt;

/// Reads answers from the terminal, or from piped stdin when there is no TTY.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn ask(&self, question: &str) -> Result<String> {
        if std::io::stdin().is_terminal() {
            let prompt = question.trim_end().trim_end_matches(':');
            return dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .context("reading answer from terminal");
        }

        let mut stderr = std::io::stderr();
        write!(stderr, "{question}").context("writing prompt")?;
        stderr.flush().context("writing prompt")?;
        read_answer(&mut std::io::stdin().lock())
    }
}

/// Read a single line; end of input is an empty answer.
fn read_answer(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line).context("reading answer")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
