//! Console prompts and colored output for the interactive commands.

use std::io::{self, BufRead, Write};

use owo_colors::OwoColorize;

use crate::cli::AppContext;
use crate::core::diff::DiffReport;
use crate::core::edit::{Decision, EditError, Prompter};

/// Interactive prompter reading choices from stdin.
pub struct ConsolePrompter {
    color: bool,
}

impl ConsolePrompter {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            color: !ctx.no_color,
        }
    }

    fn print_diff(&self, diff: &DiffReport) {
        for line in &diff.lines {
            if !self.color {
                println!("{line}");
            } else if line.starts_with('+') {
                println!("{}", line.green());
            } else if line.starts_with('-') {
                println!("{}", line.red());
            } else {
                println!("{line}");
            }
        }
    }

    fn warn(&self, message: &str) {
        if self.color {
            println!("{}", message.red());
        } else {
            println!("{message}");
        }
    }

    /// Read one trimmed line; None on EOF or a read error.
    fn read_line(&self) -> Option<String> {
        let mut buf = String::new();
        match io::stdin().lock().read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf.trim().to_owned()),
        }
    }

    fn ask(&self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        let _ = io::stdout().flush();
        self.read_line()
    }
}

impl Prompter for ConsolePrompter {
    fn decide(&mut self, diff: &DiffReport) -> Decision {
        self.warn("You're going to apply the following diff:");
        self.print_diff(diff);

        println!();
        println!("What to do now?");
        println!("[1] Apply");
        println!("[2] Edit");
        println!("[3] Cancel");
        // EOF cancels; anything unrecognized re-prompts.
        loop {
            match self.ask("Choice: ").as_deref() {
                Some("1") => return Decision::Apply,
                Some("2") => return Decision::EditAgain,
                Some("3") | None => return Decision::Cancel,
                Some(_) => continue,
            }
        }
    }

    fn confirm_retry(&mut self, error: &EditError) -> bool {
        self.warn(&error.to_string());
        loop {
            match self
                .ask("Try again? [y/n]: ")
                .as_deref()
                .map(str::to_ascii_lowercase)
                .as_deref()
            {
                Some("y") | Some("yes") => return true,
                Some("n") | Some("no") | None => return false,
                Some(_) => continue,
            }
        }
    }
}

/// Print a green status line, honoring `--no-color` and `--quiet`.
pub fn print_success(ctx: &AppContext, message: &str) {
    if ctx.quiet {
        return;
    }
    if ctx.no_color {
        println!("{message}");
    } else {
        println!("{}", message.green());
    }
}
