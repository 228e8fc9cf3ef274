//! Terminal output helpers

use console::style;
use jiraflow_core::models::StageId;
use jiraflow_engine::{EngineEvent, StageEventType};

pub fn error_prefix() -> String {
    style("[ERROR]").red().bold().to_string()
}

pub fn warning_prefix() -> String {
    style("[WARNING]").yellow().bold().to_string()
}

fn stage_position(stage: StageId) -> String {
    format!("[{}/{}]", stage.position() + 1, StageId::all().len())
}

/// One progress line per engine event
pub fn render_event(event: &EngineEvent) -> String {
    match event {
        EngineEvent::Stage(stage_event) => {
            let position = stage_position(stage_event.stage);
            let name = stage_event.stage.display_name();
            match &stage_event.event_type {
                StageEventType::Started => format!("{} {} ...", position, name),
                StageEventType::Completed { detail } => match detail {
                    Some(detail) => format!("{} {} done ({})", position, name, detail),
                    None => format!("{} {} done", position, name),
                },
                StageEventType::Failed { detail } => {
                    format!("{} {} {} failed: {}", error_prefix(), position, name, detail)
                }
                StageEventType::Skipped { reason } => {
                    format!("{} {} skipped ({})", position, name, reason)
                }
            }
        }
        EngineEvent::Validation(validation) => {
            format!("        validation: {}", validation.summary)
        }
        EngineEvent::Feedback(feedback) => {
            format!("        review verdict: {}", feedback.verdict.as_str())
        }
    }
}
