mod common;
pub use self::common::Query;
mod list;
pub use self::list::{ListQuery, PAGE_SIZE};
