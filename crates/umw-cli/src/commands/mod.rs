pub mod dispatch;
pub mod ingest;
pub mod normalize;
pub mod profile;
pub mod query;
pub mod rebuild;
pub mod replay;
pub mod report;
pub mod schema;
pub mod shared;
