mod init;
mod macros;
mod trace_id;

pub use init::init_logger;
pub use macros::{child_span, feed_span, root_span};
pub use trace_id::TraceId;
