//! Data models for the TaskAgent API

pub mod task;

pub use task::{NewTask, TaskDraft, TaskInput, TaskUpdate, TaskView};
