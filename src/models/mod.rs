mod arg_value;
mod exception_record;
mod request_snapshot;
mod stack_frame;

pub use arg_value::*;
pub use exception_record::*;
pub use request_snapshot::*;
pub use stack_frame::*;
