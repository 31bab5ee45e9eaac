//! Per-invocation context: behavior flags, terminal streams, and the command
//! runner. Constructed once in `main` and passed to whatever needs to prompt
//! or execute; tests build one over in-memory buffers.

use crate::exec::CommandRunner;
use crate::resolve::Action;
use crossterm::style::Stylize;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags {
    /// When false every prompt declines and nothing is executed.
    pub interactive: bool,
    /// Install exact matches without asking.
    pub auto_install_exact: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            interactive: true,
            auto_install_exact: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Ran,
    /// Approved, but the command failed; the failure was reported.
    Failed,
    Declined,
}

impl ActionOutcome {
    pub fn approved(self) -> bool {
        !matches!(self, ActionOutcome::Declined)
    }
}

pub struct Session<'a> {
    flags: Flags,
    input: Box<dyn BufRead + 'a>,
    output: Box<dyn Write + 'a>,
    errors: Box<dyn Write + 'a>,
    runner: Box<dyn CommandRunner + 'a>,
}

impl<'a> Session<'a> {
    pub fn new(
        flags: Flags,
        input: impl BufRead + 'a,
        output: impl Write + 'a,
        errors: impl Write + 'a,
        runner: impl CommandRunner + 'a,
    ) -> Self {
        Self {
            flags,
            input: Box::new(input),
            output: Box::new(output),
            errors: Box::new(errors),
            runner: Box::new(runner),
        }
    }

    /// Session over the process's own stdin, stdout and stderr.
    pub fn stdio(flags: Flags, runner: impl CommandRunner + 'a) -> Self {
        Self::new(flags, io::stdin().lock(), io::stdout(), io::stderr(), runner)
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Print one line of user-facing output.
    pub fn say(&mut self, line: impl Display) {
        let _ = writeln!(self.output, "{line}");
    }

    /// Print an error to the error stream.
    pub fn report(&mut self, err: impl Display) {
        let _ = self.output.flush();
        let _ = writeln!(self.errors, "{}{err}", "Error: ".red());
    }

    /// Ask a yes/no question. Declines when non-interactive, on empty input,
    /// and at end of input; re-asks on unrecognized answers.
    pub fn prompt_bool(&mut self, prompt: &str) -> bool {
        if !self.flags.interactive {
            return false;
        }
        loop {
            self.show_prompt(&format!("{} (y/N) > ", prompt.underlined()));
            let Some(answer) = self.read_line() else {
                return false;
            };
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" => return true,
                "" | "n" | "no" | "false" => return false,
                _ => continue,
            }
        }
    }

    /// Ask for a number in `1..=upper`. Empty input, end of input and
    /// out-of-range numbers (however large) decline; non-numeric input re-asks.
    pub fn prompt_index(&mut self, prompt: &str, upper: usize) -> Option<usize> {
        if !self.flags.interactive {
            return None;
        }
        loop {
            self.show_prompt(&format!("{}: ", prompt.underlined()));
            let answer = self.read_line()?;
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<usize>() {
                Ok(choice) if (1..=upper).contains(&choice) => return Some(choice),
                Ok(_) => return None,
                Err(_) if answer.bytes().all(|b| b.is_ascii_digit()) => return None,
                Err(_) => continue,
            }
        }
    }

    /// Offer `action`, asking first when it needs confirmation, and run it if
    /// approved. Execution failures are reported here.
    pub fn run_action(&mut self, action: &Action) -> ActionOutcome {
        if !self.flags.interactive {
            return ActionOutcome::Declined;
        }
        let command = action.command();
        if action.needs_confirmation() {
            let question = format!("{} with {}?", action.prompt(), command.as_str().yellow());
            if !self.prompt_bool(&question) {
                return ActionOutcome::Declined;
            }
        }
        self.execute(&command)
    }

    fn execute(&mut self, command: &str) -> ActionOutcome {
        let _ = self.output.flush();
        match self.runner.run(command) {
            Ok(()) => ActionOutcome::Ran,
            Err(err) => {
                self.report(format!("An error occurred while trying to run {command}"));
                self.report(err);
                ActionOutcome::Failed
            }
        }
    }

    fn show_prompt(&mut self, prompt: &str) {
        let _ = write!(self.output, "{prompt}");
        let _ = self.output.flush();
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}
