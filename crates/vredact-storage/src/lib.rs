//! S3-compatible blob store client for published HLS artifacts.
//!
//! The low-level client wraps `aws-sdk-s3` against an S3-compatible
//! endpoint (R2 style). The publish module layers the job-level
//! operations on top: prefix-scoped upload with content types, playlist
//! overwrite, fetch for reprocessing and bulk deletion.

pub mod client;
pub mod error;
pub mod publish;

pub use client::{BlobClient, BlobConfig};
pub use error::{StorageError, StorageResult};
pub use publish::join_key;
