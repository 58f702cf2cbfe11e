// Ingestion types: the records the scraping layer hands to the core.

pub mod completeness;
pub mod raw;
