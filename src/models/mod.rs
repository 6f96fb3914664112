pub mod note;
pub mod project;
pub mod task;
pub mod token;
pub mod user;

pub use note::{Note, NoteInput};
pub use project::{Project, ProjectInput};
pub use task::{Task, TaskInput, TaskStatus, TaskStatusInput};
pub use token::Token;
pub use user::{User, UserProfile};
