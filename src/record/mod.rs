mod record;
mod value;

pub use record::Record;
pub use value::{RecordType, Value};
