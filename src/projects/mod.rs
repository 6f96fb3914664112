pub mod guard;

pub use guard::{authorize, load_project, Access};
