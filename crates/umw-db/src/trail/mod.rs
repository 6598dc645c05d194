//! JSONL ingest trail writer and replayer.
//!
//! Every accepted ingest is appended to `{trail_dir}/{batch}.jsonl` with the
//! raw candidate and its identity hint. The profile store is rebuildable by
//! replaying the trail through the ingest pipeline.

pub mod replayer;
pub mod writer;
