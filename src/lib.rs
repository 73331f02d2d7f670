pub mod api; // HTTP surface: router, endpoints, error mapping
pub mod config;
pub mod pipeline; // Session → upload → text resolution → field parsing
