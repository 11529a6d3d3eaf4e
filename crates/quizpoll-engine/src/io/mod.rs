use crate::parsing::{StructuredRecord, split_items};
use crate::pipeline::RawInput;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions picked up when scanning a question directory.
pub const QUESTION_EXTENSIONS: [&str; 4] = ["gift", "txt", "json", "jsonl"];

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid question directory: {0}")]
    InvalidQuestionDir(String),
}

/// Read a question file and split it into raw pipeline items.
///
/// `.json` holds one record or an array of records and `.jsonl` one record per
/// line. Anything else is GIFT text.
pub fn load_items(path: &Path) -> Result<Vec<RawInput>, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(IoError::Io)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            let value: serde_json::Value =
                serde_json::from_str(&content).map_err(|source| IoError::InvalidJson {
                    path: path.to_path_buf(),
                    source,
                })?;
            let values = match value {
                serde_json::Value::Array(values) => values,
                single => vec![single],
            };
            Ok(values.into_iter().map(json_item).collect())
        }
        Some("jsonl") => Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(RawInput::from)
            .collect()),
        _ => Ok(split_items(&content)
            .into_iter()
            .map(RawInput::Text)
            .collect()),
    }
}

/// Records that do not decode are passed on as text so the pipeline reports
/// them per item instead of failing the whole file.
fn json_item(value: serde_json::Value) -> RawInput {
    match serde_json::from_value::<StructuredRecord>(value.clone()) {
        Ok(record) => RawInput::Structured(record),
        Err(_) => RawInput::Text(value.to_string()),
    }
}

/// Scan for question files in a directory, recursively and sorted
pub fn scan_question_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !dir.exists() || !dir.is_dir() {
        return Err(IoError::InvalidQuestionDir(format!(
            "question directory not found: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    scan_directory_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension().and_then(|ext| ext.to_str())
            && QUESTION_EXTENSIONS.contains(&ext)
        {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_question_dir};

    #[test]
    fn test_load_gift_file() {
        let dir = create_test_question_dir();
        let path = create_test_file(
            &dir,
            "tema1.gift",
            "$CATEGORY: $course$/Tema 1\n\n::P1::¿Uno?{=1~2}\n\n::P2::¿Dos?{~1=2}\n",
        );

        let items = load_items(&path).unwrap();

        assert_eq!(
            items,
            vec![
                RawInput::from("::P1::¿Uno?{=1~2}"),
                RawInput::from("::P2::¿Dos?{~1=2}"),
            ]
        );
    }

    #[test]
    fn test_load_json_array() {
        let dir = create_test_question_dir();
        let path = create_test_file(
            &dir,
            "preguntas.json",
            r#"[{"question": "Q", "options": ["a", "b"]}, {"sin": "pregunta"}]"#,
        );

        let items = load_items(&path).unwrap();

        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], RawInput::Structured(_)));
        assert_eq!(items[1], RawInput::from(r#"{"sin":"pregunta"}"#));
    }

    #[test]
    fn test_load_single_json_record() {
        let dir = create_test_question_dir();
        let path = create_test_file(&dir, "una.json", r#"{"text": "Q", "choices": ["a", "b"]}"#);

        let items = load_items(&path).unwrap();

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], RawInput::Structured(_)));
    }

    #[test]
    fn test_load_jsonl_skips_blank_lines() {
        let dir = create_test_question_dir();
        let path = create_test_file(
            &dir,
            "lote.jsonl",
            "{\"question\": \"A\", \"options\": [\"a\", \"b\"]}\n\n{\"question\": \"B\", \"options\": [\"c\", \"d\"]}\n",
        );

        assert_eq!(load_items(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_json_file() {
        let dir = create_test_question_dir();
        let path = create_test_file(&dir, "roto.json", "[{\"question\": ");

        let result = load_items(&path);
        assert!(matches!(result, Err(IoError::InvalidJson { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_items(Path::new("/nonexistent/preguntas.gift"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_scan_nested_directories() {
        // Given a question directory with nested structure
        let dir = create_test_question_dir();
        create_test_file(&dir, "b.gift", "Q{=a~b}");
        create_test_file(&dir, "a.json", "{}");
        create_test_file(&dir, "notas.md", "# no");
        let sub_dir = dir.path().join("tema2");
        std::fs::create_dir(&sub_dir).unwrap();
        std::fs::write(sub_dir.join("c.jsonl"), "").unwrap();

        // When scanning for files
        let files = scan_question_files(dir.path()).unwrap();

        // Then only question files are found, sorted
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("b.gift"),
                PathBuf::from("tema2/c.jsonl"),
            ]
        );
    }

    #[test]
    fn test_handle_invalid_question_directory() {
        let result = scan_question_files(Path::new("/this/path/does/not/exist"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("question directory")
        );
    }
}
