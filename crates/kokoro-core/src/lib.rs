pub mod backend;
pub mod collector;
pub mod flow;
pub mod report;

pub use backend::AssessmentBackend;
pub use collector::ResponseCollector;
pub use flow::FlowController;
pub use flow::Step;
pub use flow::error::FlowError;
pub use flow::policy::SubmissionPolicy;
