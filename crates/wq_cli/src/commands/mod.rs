pub mod check;
pub mod describe;
pub mod ingest;
pub mod run;
pub mod validate;
