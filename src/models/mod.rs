pub mod task;
pub mod user;

pub use task::{CompletionInput, Pagination, Task, TaskInput, TaskPriority, TaskRow};
pub use user::{NewUser, User, UserProfile};
