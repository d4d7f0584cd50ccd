//! Kernel bundle manifest verification.
//!
//! A kernel bundle is a directory of binary SPK/LSK files accompanied by a
//! manifest JSON listing the expected SHA-256 of each file. Verification
//! happens once, at process start; a checksum mismatch or missing file is
//! a fatal startup condition (never "just a warning").

use std::collections::BTreeMap;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::EngineError;

/// `{ files: { relative_path: sha256_hex, ... } }`.
#[derive(Debug, Clone, Default)]
pub struct KernelManifest {
    pub files: BTreeMap<String, String>,
}

/// Parse a manifest from its JSON text content.
///
/// The format is a single object whose `files` key maps relative paths to
/// lowercase hex SHA-256 digests, e.g. `{"files": {"de442s.bsp": "ab12..."}}`.
/// Parsed with a minimal hand-rolled reader rather than pulling in a JSON
/// crate here, since `dhruv_core` otherwise has zero serialization
/// dependencies; `dhruv_server` is where a real `serde_json` manifest
/// loader lives for the HTTP-facing configuration path.
pub fn parse_manifest(content: &str) -> Result<KernelManifest, String> {
    let files_key = content
        .find("\"files\"")
        .ok_or_else(|| "manifest missing \"files\" key".to_string())?;
    let after_key = &content[files_key + "\"files\"".len()..];
    let open = after_key
        .find('{')
        .ok_or_else(|| "manifest \"files\" value is not an object".to_string())?;
    let close = after_key
        .find('}')
        .ok_or_else(|| "manifest \"files\" object unterminated".to_string())?;
    let body = &after_key[open + 1..close];

    let mut files = BTreeMap::new();
    for entry in body.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let mut parts = entry.splitn(2, ':');
        let key = parts
            .next()
            .ok_or_else(|| format!("malformed manifest entry: {entry}"))?
            .trim()
            .trim_matches('"');
        let value = parts
            .next()
            .ok_or_else(|| format!("malformed manifest entry: {entry}"))?
            .trim()
            .trim_matches('"');
        files.insert(key.to_string(), value.to_lowercase());
    }

    Ok(KernelManifest { files })
}

/// Verify every file listed in `manifest` exists under `bundle_dir` and
/// matches its expected SHA-256 digest. Fails on the first mismatch or
/// missing file.
pub fn verify_bundle(bundle_dir: &Path, manifest: &KernelManifest) -> Result<(), EngineError> {
    for (rel_path, expected_hex) in &manifest.files {
        let path = bundle_dir.join(rel_path);
        if !path.exists() {
            return Err(EngineError::MissingFile {
                file: rel_path.clone(),
            });
        }

        let bytes = std::fs::read(&path).map_err(|_| EngineError::MissingFile {
            file: rel_path.clone(),
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let actual_hex = hex_encode(&hasher.finalize());

        if &actual_hex != expected_hex {
            return Err(EngineError::ChecksumMismatch {
                file: rel_path.clone(),
            });
        }
    }
    Ok(())
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

/// Which bundle tag should be attributed to a given instant, per the
/// `EphemerisConfig.policy` choices `auto | de440 | de441`.
///
/// `auto` selects the short-range, high-precision `de440` bundle when the
/// instant falls within its declared coverage window, and falls back to
/// the long-range `de441` bundle otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlePolicy {
    Auto,
    De440,
    De441,
}

impl BundlePolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "de440" => Some(Self::De440),
            "de441" => Some(Self::De441),
            _ => None,
        }
    }
}

/// Resolve the bundle tag reported in provenance for `epoch_tdb_jd`, given
/// the high-precision bundle's coverage window `[de440_start_jd, de440_end_jd]`.
pub fn bundle_tag_for_policy(
    policy: BundlePolicy,
    epoch_tdb_jd: f64,
    de440_start_jd: f64,
    de440_end_jd: f64,
) -> &'static str {
    match policy {
        BundlePolicy::De440 => "de440",
        BundlePolicy::De441 => "de441",
        BundlePolicy::Auto => {
            if (de440_start_jd..=de440_end_jd).contains(&epoch_tdb_jd) {
                "de440"
            } else {
                "de441"
            }
        }
    }
}
