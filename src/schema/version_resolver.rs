//! Binds a logical `(family, type)` pair to a concrete ISO 20022 schema
//! version and namespace URI (C7). The only shared mutable state in the
//! engine lives here: a lazily-populated, process-wide cache of which
//! versions are available for a given family/type prefix, discovered by
//! scanning an XSD directory once and reused thereafter.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseError, Result};

/// Default schema version used when the caller does not pin one, keyed by
/// `"<family>.<type>"` (e.g. `"pain.001"`, `"camt.053"`).
fn default_version(prefix: &str) -> Option<&'static str> {
    match prefix {
        "pain.001" => Some("12"),
        "pain.002" => Some("10"),
        "pain.008" => Some("08"),
        "camt.053" => Some("08"),
        "camt.052" => Some("08"),
        "camt.054" => Some("08"),
        _ => None,
    }
}

/// Builds the namespace URI for `family.type` at `version` (falling back to
/// the family/type default when `version` is `None`).
pub fn resolve_namespace(family: &str, message_type: &str, version: Option<&str>) -> Result<String> {
    let prefix = format!("{family}.{message_type}");
    let version = match version {
        Some(v) => v.to_string(),
        None => default_version(&prefix)
            .ok_or_else(|| ParseError::UnknownType(prefix.clone()))?
            .to_string(),
    };
    Ok(format!(
        "urn:iso:std:iso:20022:tech:xsd:{prefix}.001.{version}"
    ))
}

type VersionCache = HashMap<String, HashMap<String, Vec<String>>>;

/// Cache key is the scanned directory's path; the value maps a family
/// prefix (`"pain"`, `"camt"`) to the message-type → available-versions
/// table discovered there.
static XSD_CACHE: Lazy<Mutex<VersionCache>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Scans `dir` for filenames matching `^<prefix>\.(\d{3})\.001\.(\d{2})\.xsd$`,
/// returning the versions available per message-type number. Results are
/// cached per `(dir, prefix)`; a second call with the same arguments does
/// not touch the filesystem again.
pub fn available_versions(dir: &Path, prefix: &str) -> Result<HashMap<String, Vec<String>>> {
    let cache_key = dir.to_string_lossy().to_string();

    {
        let cache = XSD_CACHE.lock().expect("xsd cache poisoned");
        if let Some(by_prefix) = cache.get(&cache_key) {
            if let Some(versions) = by_prefix.get(prefix) {
                return Ok(rebuild_type_map(versions));
            }
        }
    }

    tracing::debug!(dir = %dir.display(), prefix, "scanning XSD directory");

    let pattern = format!(r"^{}\.(\d{{3}})\.001\.(\d{{2}})\.xsd$", regex::escape(prefix));
    let re = Regex::new(&pattern).map_err(|e| ParseError::Lex(e.to_string()))?;

    let mut by_type: HashMap<String, Vec<String>> = HashMap::new();
    let entries = fs::read_dir(dir)
        .map_err(|e| ParseError::Lex(format!("reading XSD directory {}: {e}", dir.display())))?;
    for entry in entries {
        let entry = entry.map_err(|e| ParseError::Lex(e.to_string()))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(caps) = re.captures(name) {
            let msg_type = caps[1].to_string();
            let version = caps[2].to_string();
            by_type.entry(msg_type).or_default().push(version);
        }
    }
    for versions in by_type.values_mut() {
        versions.sort();
    }

    let mut cache = XSD_CACHE.lock().expect("xsd cache poisoned");
    let by_prefix = cache.entry(cache_key).or_default();
    let flattened: Vec<String> = by_type
        .iter()
        .flat_map(|(t, vs)| vs.iter().map(move |v| format!("{t}:{v}")))
        .collect();
    by_prefix.insert(prefix.to_string(), flattened);

    Ok(by_type)
}

fn rebuild_type_map(flattened: &[String]) -> HashMap<String, Vec<String>> {
    let mut by_type: HashMap<String, Vec<String>> = HashMap::new();
    for entry in flattened {
        if let Some((t, v)) = entry.split_once(':') {
            by_type.entry(t.to_string()).or_default().push(v.to_string());
        }
    }
    for versions in by_type.values_mut() {
        versions.sort();
    }
    by_type
}

/// Picks the version to validate against for `message_type`: an exact match
/// on `requested` if it is available, otherwise the greatest available
/// version for that type. Returns `None` if the type has no discovered
/// versions at all.
pub fn select_version(
    available: &HashMap<String, Vec<String>>,
    message_type: &str,
    requested: Option<&str>,
) -> Option<String> {
    let versions = available.get(message_type)?;
    if let Some(requested) = requested {
        if versions.iter().any(|v| v == requested) {
            return Some(requested.to_string());
        }
    }
    versions.iter().max().cloned()
}

/// Test hook (§5): clears every cached directory scan. Not exposed for
/// production use beyond tests that need a clean cache between fixtures.
pub fn clear_all_caches() {
    XSD_CACHE.lock().expect("xsd cache poisoned").clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn resolves_default_namespace_when_version_omitted() {
        let uri = resolve_namespace("pain", "001", None).unwrap();
        assert_eq!(uri, "urn:iso:std:iso:20022:tech:xsd:pain.001.001.12");
    }

    #[test]
    fn resolves_explicit_version() {
        let uri = resolve_namespace("camt", "053", Some("02")).unwrap();
        assert_eq!(uri, "urn:iso:std:iso:20022:tech:xsd:camt.053.001.02");
    }

    #[test]
    fn unknown_type_without_default_is_an_error() {
        assert!(resolve_namespace("pain", "999", None).is_err());
    }

    #[test]
    fn scans_xsd_directory_and_caches_result() {
        clear_all_caches();
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("pain.001.001.09.xsd")).unwrap();
        File::create(dir.path().join("pain.001.001.03.xsd")).unwrap();
        File::create(dir.path().join("pain.002.001.10.xsd")).unwrap();
        File::create(dir.path().join("not-an-xsd.txt")).unwrap();

        let versions = available_versions(dir.path(), "pain").unwrap();
        assert_eq!(versions["001"], vec!["03".to_string(), "09".to_string()]);
        assert_eq!(versions["002"], vec!["10".to_string()]);

        // Second call must hit the cache, not the filesystem; removing the
        // directory's contents does not change the (now-cached) result.
        fs::remove_file(dir.path().join("pain.001.001.09.xsd")).unwrap();
        let cached = available_versions(dir.path(), "pain").unwrap();
        assert_eq!(cached["001"], vec!["03".to_string(), "09".to_string()]);
    }

    #[test]
    fn selects_exact_version_when_available_else_greatest() {
        let mut available = HashMap::new();
        available.insert("001".to_string(), vec!["03".to_string(), "09".to_string()]);

        assert_eq!(
            select_version(&available, "001", Some("03")),
            Some("03".to_string())
        );
        assert_eq!(
            select_version(&available, "001", Some("99")),
            Some("09".to_string())
        );
        assert_eq!(select_version(&available, "001", None), Some("09".to_string()));
        assert_eq!(select_version(&available, "999", None), None);
    }
}
