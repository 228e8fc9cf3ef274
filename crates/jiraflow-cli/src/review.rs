//! Interactive review gate

use async_trait::async_trait;
use console::style;
use jiraflow_core::models::Ticket;
use jiraflow_engine::{ReviewDecision, ReviewGate};
use std::io::{self, BufRead, Write};

/// How many plan lines to show before pointing at the saved file
const PREVIEW_LINES: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Approve,
    Reject,
    Modify,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_lowercase().as_str() {
        "a" | "approve" | "y" | "yes" => Some(Choice::Approve),
        "r" | "reject" | "n" | "no" => Some(Choice::Reject),
        "m" | "modify" => Some(Choice::Modify),
        _ => None,
    }
}

/// Gate that prompts the operator on the terminal.
pub struct InteractiveGate;

#[async_trait]
impl ReviewGate for InteractiveGate {
    async fn review(
        &self,
        ticket: &Ticket,
        test_plan: &str,
    ) -> io::Result<ReviewDecision> {
        let ticket_key = ticket.key.clone();
        let plan = test_plan.to_string();

        tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            let mut lines = stdin.lock().lines();
            prompt_loop(&ticket_key, &plan, &mut lines)
        })
        .await
        .map_err(|e| io::Error::other(e.to_string()))?
    }
}

fn prompt_loop(
    ticket_key: &str,
    test_plan: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> io::Result<ReviewDecision> {
    let mut stdout = io::stdout();

    writeln!(
        stdout,
        "\n{}",
        style(format!("Review the test plan for {}", ticket_key)).bold()
    )?;
    writeln!(stdout, "{}", "-".repeat(60))?;
    for line in test_plan.lines().take(PREVIEW_LINES) {
        writeln!(stdout, "{}", line)?;
    }
    if test_plan.lines().count() > PREVIEW_LINES {
        writeln!(stdout, "{}", style("... (truncated)").dim())?;
    }
    writeln!(stdout, "{}", "-".repeat(60))?;

    loop {
        write!(
            stdout,
            "{} ",
            style("Approve, Reject, or Modify? [a/r/m]:").cyan().bold()
        )?;
        stdout.flush()?;

        let answer = next_line(lines)?;
        match parse_choice(&answer) {
            Some(Choice::Approve) => return Ok(ReviewDecision::Approved),
            Some(Choice::Reject) => {
                write!(stdout, "{} ", style("Reason:").cyan())?;
                stdout.flush()?;
                let reason = next_line(lines)?;
                return Ok(ReviewDecision::Rejected {
                    reason: reason.trim().to_string(),
                });
            }
            Some(Choice::Modify) => {
                write!(stdout, "{} ", style("Notes for the implementation:").cyan())?;
                stdout.flush()?;
                let notes = next_line(lines)?;
                return Ok(ReviewDecision::Modified {
                    notes: notes.trim().to_string(),
                });
            }
            None => {
                writeln!(stdout, "Please answer 'a', 'r', or 'm'.")?;
            }
        }
    }
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<String> {
    match lines.next() {
        Some(line) => line,
        None => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed during review",
        )),
    }
}
