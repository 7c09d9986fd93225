//! Business services for accredify-api

pub mod compliance;
pub mod csv_importer;
pub mod frequency_analyzer;
pub mod gemini_client;
pub mod task_feed;
