//! Prompt construction for the generative pipeline stages

use jiraflow_core::models::Ticket;

/// Output rules appended to every generative prompt. Assistants that open
/// with meta-commentary get their preamble stripped, but asking up front
/// keeps the artifacts clean.
const OUTPUT_RULES: &str = "
OUTPUT RULES:
- Output the document content directly, starting with its markdown header.
- Do not open with meta-commentary such as 'Here is...' or 'I will...'.
- Do not wrap the document in a code fence.
- Do not summarize what the document contains; be the document.";

/// Shared ticket context block
fn ticket_block(ticket: &Ticket) -> String {
    let mut block = format!(
        "# Ticket\n\nKey: {}\nType: {}\nStatus: {}\nSummary: {}\n",
        ticket.key, ticket.issue_type, ticket.status, ticket.summary
    );

    if !ticket.components.is_empty() {
        block.push_str(&format!("Components: {}\n", ticket.components.join(", ")));
    }
    if !ticket.fix_versions.is_empty() {
        block.push_str(&format!(
            "Fix versions: {}\n",
            ticket.fix_versions.join(", ")
        ));
    }

    if let Some(ref description) = ticket.description {
        block.push_str(&format!("\n## Description\n\n{}\n", description));
    }

    if let Some(ref testing) = ticket.testing {
        block.push_str("\n## Acceptance Scenarios\n");
        for scenario in &testing.scenarios {
            block.push_str(&format!(
                "\n### {}\n- Given: {}\n- When: {}\n- Then: {}\n",
                scenario.name, scenario.given, scenario.when, scenario.then
            ));
        }
        if let Some(ref notes) = testing.notes {
            block.push_str(&format!("\nNotes: {}\n", notes));
        }
    }

    block
}

/// Prompt for the analysis stage
pub fn analysis_prompt(ticket: &Ticket) -> String {
    format!(
        "You are analyzing a JIRA ticket to prepare for test planning.\n\n{}\n\
# Your Task\n\n\
Write an analysis document with these sections:\n\n\
# Ticket Analysis\n\n\
## Feature Summary\n[What the change does and which components it touches]\n\n\
## Risk Areas\n[Behaviors most likely to regress]\n\n\
## Test Surface\n[Interfaces, resources, and environments a test plan must cover]\n\n\
Ground every statement in the ticket content above. If information is\n\
missing, say what is missing instead of guessing.\n{}",
        ticket_block(ticket),
        OUTPUT_RULES
    )
}

/// Prompt for the test-plan stage
pub fn test_plan_prompt(ticket: &Ticket, analysis: &str) -> String {
    format!(
        "You are writing a test plan for a JIRA ticket.\n\n{}\n\
# Prior Analysis\n\n{}\n\n\
# Your Task\n\n\
Write a test plan with these sections:\n\n\
# Test Plan\n\n\
## Environment\n[Required clusters, versions, and fixtures]\n\n\
## Test Cases\n[Numbered cases; each with steps and expected results,\n\
covering every acceptance scenario on the ticket]\n\n\
## Edge Cases\n[Failure modes and boundary conditions worth exercising]\n\n\
Every acceptance scenario above must map to at least one test case.\n{}",
        ticket_block(ticket),
        analysis.trim(),
        OUTPUT_RULES
    )
}

/// Prompt for the implementation stage
pub fn implementation_prompt(
    ticket: &Ticket,
    test_plan: &str,
    review_notes: Option<&str>,
) -> String {
    let notes_block = match review_notes {
        Some(notes) => format!(
            "\n# Reviewer Notes\n\nThe test plan was approved with modifications:\n{}\n",
            notes
        ),
        None => String::new(),
    };

    format!(
        "You are implementing automated test cases from an approved test plan.\n\n{}\n\
# Approved Test Plan\n\n{}\n{}\n\
# Your Task\n\n\
Write an implementation document:\n\n\
# Test Implementation\n\n\
## Automation Outline\n[Test files and helpers to create, per test case]\n\n\
## Test Code\n[Concrete test code skeletons for each case in the plan]\n\n\
## Execution\n[How to run the suite and interpret results]\n{}",
        ticket_block(ticket),
        test_plan.trim(),
        notes_block,
        OUTPUT_RULES
    )
}

/// Prompt for the quality-review stage
pub fn quality_prompt(ticket: &Ticket, test_plan: &str, implementation: &str) -> String {
    format!(
        "You are reviewing generated test artifacts for completeness.\n\n{}\n\
# Test Plan\n\n{}\n\n\
# Implementation\n\n{}\n\n\
# Your Task\n\n\
Write a quality review:\n\n\
# Quality Review\n\n\
## Coverage\n[Which acceptance scenarios are covered, and by which cases]\n\n\
## Gaps\n[Scenarios or edge cases the artifacts miss]\n\n\
## Verdict\n[One of: ready, ready-with-gaps, needs-rework, with reasoning]\n{}",
        ticket_block(ticket),
        test_plan.trim(),
        implementation.trim(),
        OUTPUT_RULES
    )
}
