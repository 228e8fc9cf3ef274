pub mod config;
pub mod feedback;
pub mod report;
pub mod ticket;
pub mod validation;
pub mod workflow;

pub use config::{AssistantConfig, RepoTarget, TeamConfig};
pub use feedback::{FeedbackRecord, ReviewVerdict};
pub use report::AnalysisArtifact;
pub use ticket::{Scenario, TestingSpecification, Ticket};
pub use validation::{CheckOutcome, ValidationCheck, ValidationReport};
pub use workflow::{StageId, StageRecord, StageStatus, WorkflowState};
