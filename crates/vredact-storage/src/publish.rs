//! Job-level publish operations.

use std::path::PathBuf;

use tracing::info;

use vredact_models::{ArtifactKind, PublishedArtifactMap};

use crate::client::BlobClient;
use crate::error::{StorageError, StorageResult};

/// Join a job prefix and a local artifact name into an object key.
///
/// Keys are `/`-joined path strings; neither part may be empty, absolute
/// or contain parent references.
pub fn join_key(prefix: &str, name: &str) -> StorageResult<String> {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return Err(StorageError::invalid_key("empty prefix"));
    }
    if name.is_empty() || name.starts_with('/') {
        return Err(StorageError::invalid_key(format!(
            "bad artifact name: {:?}",
            name
        )));
    }
    for part in prefix.split('/').chain(name.split('/')) {
        if part == ".." || part.is_empty() {
            return Err(StorageError::invalid_key(format!(
                "bad key component in {}/{}",
                prefix, name
            )));
        }
    }
    Ok(format!("{}/{}", prefix, name))
}

impl BlobClient {
    /// Upload a set of local artifacts under a job prefix.
    ///
    /// Content type is chosen per artifact kind. One attempt per object;
    /// a failure aborts the pass and leaves already-uploaded objects in
    /// place (no rollback). Returns the name → URL map for the rewrite
    /// step.
    pub async fn publish_artifacts(
        &self,
        prefix: &str,
        artifacts: &[(String, PathBuf)],
    ) -> StorageResult<PublishedArtifactMap> {
        let mut map = PublishedArtifactMap::new();

        for (name, path) in artifacts {
            let key = join_key(prefix, name)?;
            let content_type = ArtifactKind::from_name(name).content_type();
            self.upload_file(path, &key, content_type).await?;
            map.insert(name.clone(), self.public_url(&key));
        }

        info!(
            prefix = %prefix,
            count = artifacts.len(),
            "Published artifacts"
        );
        Ok(map)
    }

    /// Overwrite a playlist under the job prefix with rewritten content.
    ///
    /// Used by the second publish phase: the playlist keys are fixed, so
    /// the raw document uploaded in phase 1 is replaced in place.
    pub async fn overwrite_playlist(
        &self,
        prefix: &str,
        name: &str,
        content: String,
    ) -> StorageResult<String> {
        let key = join_key(prefix, name)?;
        self.upload_bytes(
            content.into_bytes(),
            &key,
            ArtifactKind::Playlist.content_type(),
        )
        .await?;
        Ok(self.public_url(&key))
    }

    /// Resolve a published locator back to its object key.
    ///
    /// Inverse of `public_url`: strips the public base (or endpoint +
    /// bucket). A bare key passes through; an absolute URL under a
    /// foreign base is rejected rather than mangled into a bogus key.
    pub fn key_for_locator(&self, locator: &str) -> StorageResult<String> {
        let url = self.public_url("");
        let base = url.trim_end_matches('/');
        if let Some(rest) = locator.strip_prefix(base) {
            return Ok(rest.trim_start_matches('/').to_string());
        }
        if locator.contains("://") {
            return Err(StorageError::invalid_key(format!(
                "locator {} is outside the configured base {}",
                locator, base
            )));
        }
        Ok(locator.trim_start_matches('/').to_string())
    }

    /// Delete every object under a prefix. Returns the number deleted.
    ///
    /// Not transactional with any following upload: a concurrent reader
    /// may observe an empty or partially-populated prefix until the next
    /// publish pass completes.
    pub async fn delete_prefix(&self, prefix: &str) -> StorageResult<u32> {
        let prefix = format!("{}/", prefix.trim_matches('/'));
        let keys = self.list_keys(&prefix).await?;

        if keys.is_empty() {
            info!(prefix = %prefix, "No objects to delete");
            return Ok(0);
        }

        self.delete_objects(&keys).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BlobConfig;

    #[test]
    fn test_join_key_basic() {
        assert_eq!(
            join_key("vods/abc", "segment_000.ts").unwrap(),
            "vods/abc/segment_000.ts"
        );
        // Leading/trailing slashes on the prefix are tolerated.
        assert_eq!(
            join_key("/vods/abc/", "output.m3u8").unwrap(),
            "vods/abc/output.m3u8"
        );
    }

    #[test]
    fn test_join_key_rejects_bad_parts() {
        assert!(join_key("", "a.ts").is_err());
        assert!(join_key("vods", "").is_err());
        assert!(join_key("vods", "/abs.ts").is_err());
        assert!(join_key("vods/../other", "a.ts").is_err());
        assert!(join_key("vods", "../a.ts").is_err());
    }

    #[test]
    fn test_key_for_locator_round_trip() {
        let config = BlobConfig {
            endpoint_url: "https://acct.r2.example.com".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "hunter2".to_string(),
            bucket_name: "vods".to_string(),
            region: "auto".to_string(),
            public_base_url: Some("https://cdn.example.com".to_string()),
        };
        let client = BlobClient::new(config);

        let key = "vods/abc/output.m3u8";
        let url = client.public_url(key);
        assert_eq!(client.key_for_locator(&url).unwrap(), key);
        // Raw keys pass through.
        assert_eq!(client.key_for_locator(key).unwrap(), key);
    }

    #[test]
    fn test_key_for_locator_rejects_foreign_url() {
        let config = BlobConfig {
            endpoint_url: "https://acct.r2.example.com".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "hunter2".to_string(),
            bucket_name: "vods".to_string(),
            region: "auto".to_string(),
            public_base_url: Some("https://cdn.example.com".to_string()),
        };
        let client = BlobClient::new(config);

        let err = client
            .key_for_locator("https://other.example.net/vods/abc/output.m3u8")
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
