//! Session domain module

mod acquisition_session;

pub use acquisition_session::{
    AcquisitionSession, Completion, SessionPhase, Submission, SubmissionRejected,
    SubmissionTicket, SubmitTrigger,
};
