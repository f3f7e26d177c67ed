//! Value objects - immutable types that represent domain concepts

mod field_value;
mod snowflake;

pub use field_value::FieldValue;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError, MAX_WORKER_ID};
