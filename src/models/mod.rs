pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskPriority, TaskQuery, TaskStatus, TaskUpdate};
pub use user::{User, UserProfile};
