pub mod ingest;
pub mod metadata;
pub mod origin;
pub mod playlist;
