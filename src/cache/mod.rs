pub mod instance;
pub mod scheduler;
pub mod template;
