//! Terminal front end
pub mod task_list;
