pub mod extract_service;
pub mod poll_service;
pub mod record_formatter;
pub mod submit_service;

pub use extract_service::{extract_record, ExtractService};
pub use poll_service::{PollLoop, PollState, PollSummary, StatusSource};
pub use record_formatter::{csv_escape, format_record_json, format_record_line, HEADER_ROW};
pub use submit_service::SubmitService;
