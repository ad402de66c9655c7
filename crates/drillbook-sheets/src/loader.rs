//! Question bank loading by path.

use std::path::Path;

use anyhow::{Context, Result};
use drillbook_core::builder::build_bank;
use drillbook_core::classify::Classifier;
use drillbook_core::model::QuestionBank;
use drillbook_core::parser::parse_bank;

use crate::workbook::{read_workbook, WORKBOOK_EXTENSIONS};

/// Returns `true` if `path` has an extension drillbook can load.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "toml" || WORKBOOK_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Load a single bank file, dispatching on its extension.
///
/// The bank id is the file stem.
pub fn load_bank(path: &Path, classifier: &Classifier) -> Result<QuestionBank> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ext == "toml" {
        return parse_bank(path, classifier);
    }
    if !WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        anyhow::bail!("unsupported question bank format: {}", path.display());
    }

    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("bank path has no file name: {}", path.display()))?;
    let sheets = read_workbook(path)?;
    let bank = build_bank(id, &sheets, classifier);

    if bank.skipped_rows > 0 {
        tracing::warn!(
            "{}: skipped {} row(s) without question text",
            path.display(),
            bank.skipped_rows
        );
    }
    if bank.is_empty() {
        tracing::warn!("{}: no questions found", path.display());
    }
    Ok(bank)
}

/// Load every supported bank under a directory, recursively.
///
/// Files that fail to load are skipped with a warning. Banks are returned
/// sorted by path.
pub fn load_bank_directory(dir: &Path, classifier: &Classifier) -> Result<Vec<QuestionBank>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut banks = Vec::new();
    for path in paths {
        if path.is_dir() {
            banks.extend(load_bank_directory(&path, classifier)?);
        } else if is_supported(&path) {
            match load_bank(&path, classifier) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(banks)
}

/// Load a file as one bank, or a directory as many.
pub fn load_banks(path: &Path, classifier: &Classifier) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path, classifier)
    } else {
        Ok(vec![load_bank(path, classifier)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drillbook_core::model::QuestionType;

    const GEO: &str = r#"
[[questions]]
question = "Capital of France?"
answer = "A"
options = "A. Paris\nB. London\nC. Rome"
"#;

    const CHEM: &str = r#"
[[questions]]
question = "水的化学式是____"
answer = "H2O"
"#;

    #[test]
    fn supported_extensions() {
        assert!(is_supported(Path::new("a.toml")));
        assert!(is_supported(Path::new("a.XLSX")));
        assert!(is_supported(Path::new("dir/a.ods")));
        assert!(!is_supported(Path::new("a.csv")));
        assert!(!is_supported(Path::new("README")));
    }

    #[test]
    fn load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo.toml");
        std::fs::write(&path, GEO).unwrap();

        let bank = load_bank(&path, &Classifier::default()).unwrap();
        assert_eq!(bank.id, "geo");
        assert_eq!(bank.questions[0].question_type, QuestionType::SingleChoice);
    }

    #[test]
    fn unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.csv");
        std::fs::write(&path, "question,answer\n").unwrap();
        let err = load_bank(&path, &Classifier::default()).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("geo.toml"), GEO).unwrap();
        std::fs::create_dir(dir.path().join("science")).unwrap();
        std::fs::write(dir.path().join("science").join("chem.toml"), CHEM).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_banks(dir.path(), &Classifier::default()).unwrap();
        let ids: Vec<_> = banks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["geo", "chem"]);
    }

    #[test]
    fn not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo.toml");
        std::fs::write(&path, GEO).unwrap();
        assert!(load_bank_directory(&path, &Classifier::default()).is_err());
    }
}
