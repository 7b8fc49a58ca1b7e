pub mod task;
pub mod team;
pub mod user;

pub use task::{Task, TaskFields, TaskPriority, TaskStatus, TaskType};
pub use team::{Team, TeamDetails, TeamFields};
pub use user::{NewUser, User, UserFields};
