//! JiraFlow Engine
//!
//! The workflow pipeline: stage sequencing, workflow state management,
//! validation checks, feedback recording, and event broadcasting.

pub mod event_manager;
pub mod events;
pub mod feedback;
pub mod pipeline;
pub mod review;
pub mod stages;
pub mod validation;
pub mod workflow;

pub use event_manager::EventManager;
pub use events::{EngineEvent, FeedbackEvent, StageEvent, StageEventType, ValidationEvent};
pub use feedback::FeedbackManager;
pub use pipeline::{Pipeline, PipelineError, PipelineOptions, PipelineSummary};
pub use review::{AutoApproveGate, ReviewDecision, ReviewGate};
pub use stages::{Stage, StageContext, StageError, StageOutcome};
pub use validation::ValidationEngine;
pub use workflow::{WorkflowManager, WorkflowManagerError};
