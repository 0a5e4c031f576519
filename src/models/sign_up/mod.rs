pub mod server_errors;
pub mod state;
pub mod types;

pub use server_errors::{ServerFieldErrors, MAX_STORED_REASON_CHARS};
pub use state::{FormState, SubmitOutcome, SubmitPhase, PASSWORD_MISMATCH};
pub use types::*;
