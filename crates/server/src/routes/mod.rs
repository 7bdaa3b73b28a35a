pub mod articles;
pub mod page;
pub mod summarize;
pub mod system;
