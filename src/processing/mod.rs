//! Text processing and analysis module

pub mod aggregator;
pub mod analyzer;
pub mod ats_matcher;
pub mod entity_extractor;
pub mod model;
pub mod readability;
pub mod sentiment;
pub mod skill_gap;
pub mod text_processor;
