pub mod application;
pub mod document;
pub mod job;
pub mod profile;
