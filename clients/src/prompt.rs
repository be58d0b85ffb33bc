//! Interactive confirmations.

use std::io::{self, BufRead, Write};

use taxo_model::{Confirmations, ConstraintId};

/// Asks the operator on `output` and reads a `y`/`n` answer from `input`.
/// Anything other than `y` or `yes` declines, including end of input.
#[derive(Debug)]
pub struct PromptConfirmations<R, W> {
    input: R,
    output: W,
}

impl PromptConfirmations<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr and reads answers from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptConfirmations<R, W> {
    /// Wraps an input and an output stream.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str, listed: &[ConstraintId]) -> bool {
        let ids: Vec<String> = listed.iter().map(|k| format!("#{}", k.index())).collect();
        let written = if ids.is_empty() {
            write!(self.output, "{question} [y/N] ")
        } else {
            write!(self.output, "{question} ({}) [y/N] ", ids.join(", "))
        };
        if written.and_then(|()| self.output.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

impl<R: BufRead, W: Write> Confirmations for PromptConfirmations<R, W> {
    fn confirm_concept_move(&mut self, invalidated: &[ConstraintId]) -> bool {
        if invalidated.is_empty() {
            self.ask("Move concept?", invalidated)
        } else {
            let question = format!(
                "Moving invalidates {} constraint(s). Move anyway?",
                invalidated.len()
            );
            self.ask(&question, invalidated)
        }
    }

    fn confirm_constraint_addition(&mut self, conflicts: &[ConstraintId]) -> bool {
        let question = format!(
            "The constraint conflicts with {} existing constraint(s). Add anyway?",
            conflicts.len()
        );
        self.ask(&question, conflicts)
    }
}
