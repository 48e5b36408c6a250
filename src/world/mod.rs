pub mod clock;
pub mod demo;
pub mod position;
pub mod services;
