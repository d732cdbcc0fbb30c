pub mod answers;
pub mod connector;
pub mod field;
pub mod submission;
pub mod transcript;

pub use answers::{AnswerMap, AnswerValue};
pub use connector::{connector_catalog, Connector, ConnectorState, ConnectorStatus};
pub use field::{FieldKind, FieldSpec, ValidationError, Validator};
pub use submission::{normalize_role, EnvContext, Role, SubmissionRecord};
pub use transcript::{render_transcript, Speaker, TranscriptEntry};
