//! Reading HTTP Archive documents.
//!
//! Only `log.entries` is required; everything else in the document is left
//! alone for the field descriptors to pick from.

use crate::error::ProcessingError;
use crate::path::resolve;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Source name used for stdin
pub const STDIN_NAME: &str = "-";

/// Parse HAR text into a JSON tree
pub fn parse_har(text: &str, source_name: &str) -> Result<Value, ProcessingError> {
    serde_json::from_str(text).map_err(|e| ProcessingError::InputParse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// Read and parse a HAR file; `-` reads stdin.
pub fn read_har(path: &Path) -> Result<Value, ProcessingError> {
    let source_name = path.display().to_string();
    let text = if source_name == STDIN_NAME {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    tracing::debug!(source = %source_name, bytes = text.len(), "read HAR input");
    parse_har(&text, &source_name)
}

/// The `log.entries` array of a parsed document
pub fn entries<'a>(document: &'a Value, source_name: &str) -> Result<&'a [Value], ProcessingError> {
    resolve(document, "log.entries")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ProcessingError::MissingEntries {
            source_name: source_name.to_string(),
        })
}

/// File name component of the input, used to name the output file
pub fn base_name(path: &Path) -> String {
    if path == Path::new(STDIN_NAME) {
        return "stdin".to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_har_entries() {
        let har = r#"{
            "log": {
                "version": "1.2",
                "entries": [
                    {"request": {"url": "https://x.test/a.js"}, "_resourceType": "script"},
                    {"request": {"url": "https://x.test/b.css"}, "_resourceType": "stylesheet"}
                ]
            }
        }"#;
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(har.as_bytes()).unwrap();
        f.flush().unwrap();

        let document = read_har(f.path()).unwrap();
        let list = entries(&document, "test").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1]["_resourceType"], "stylesheet");
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_har("{\"log\": ", "broken.har").unwrap_err();
        match err {
            ProcessingError::InputParse { source_name, .. } => assert_eq!(source_name, "broken.har"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_entries_must_be_array() {
        let document = parse_har(r#"{"log": {"entries": {}}}"#, "odd.har").unwrap();
        assert!(matches!(
            entries(&document, "odd.har"),
            Err(ProcessingError::MissingEntries { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_har(Path::new("/nonexistent/capture.har")).unwrap_err();
        assert!(matches!(err, ProcessingError::IoError(_)));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("captures/site.har")), "site.har");
        assert_eq!(base_name(Path::new("-")), "stdin");
    }
}
