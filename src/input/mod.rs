//! Input processing module
//! Turns resume and job-description files into the plain text the engine consumes

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
