pub mod access_gate;
pub mod course_service;
pub mod enrollment_service;
pub mod notification_service;
pub mod progress_aggregator;
pub mod progress_service;
pub mod scoring_engine;
pub mod test_service;

pub use access_gate::AccessGate;
pub use course_service::CourseService;
pub use enrollment_service::EnrollmentService;
pub use notification_service::NotificationService;
pub use progress_aggregator::ProgressAggregator;
pub use progress_service::ProgressService;
pub use scoring_engine::{ScoreResult, ScoringEngine};
pub use test_service::TestService;
