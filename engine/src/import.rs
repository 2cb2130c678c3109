//! Batch import of Pathbuilder exports.

use std::collections::HashSet;

use serde::de::IgnoredAny;
use tracing::{info, warn};

use crate::build::parse_export_as;
use crate::derive::{DerivedCharacter, derive_character_as};
use crate::error::EngineError;
use crate::store::CharacterStore;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportFailure {
    /// 1-based position of the document in the batch.
    pub document: usize,
    pub error: EngineError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<DerivedCharacter>,
    /// Names skipped because a character with that name already existed.
    pub duplicates: Vec<String>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Split pasted text into export documents. Text that is one JSON value
/// (pretty-printed or not) is one document; otherwise every line starting
/// with `{` is a document.
pub fn split_documents(text: &str) -> Vec<&str> {
    let whole = text.trim();
    if serde_json::from_str::<IgnoredAny>(whole).is_ok() {
        return vec![whole];
    }
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .collect();
    if lines.is_empty() { vec![whole] } else { lines }
}

/// Parse and derive every document in `text`. A bad document is recorded
/// and skipped; it never stops the rest of the batch. Names already in
/// `existing`, or seen earlier in this batch, are skipped as duplicates.
pub fn import_documents(text: &str, existing: &[DerivedCharacter]) -> ImportReport {
    let mut seen: HashSet<String> = existing.iter().map(|c| c.name.clone()).collect();
    let mut report = ImportReport::default();

    for (idx, doc) in split_documents(text).into_iter().enumerate() {
        let document = idx + 1;
        let label = format!("document {document}");
        let derived =
            parse_export_as(doc, &label).and_then(|export| derive_character_as(&export, &label));
        match derived {
            Ok(character) => {
                if seen.insert(character.name.clone()) {
                    report.imported.push(character);
                } else {
                    warn!(name = %character.name, "skipping duplicate character");
                    report.duplicates.push(character.name);
                }
            }
            Err(error) => {
                warn!(document, %error, "import failed");
                report.failures.push(ImportFailure { document, error });
            }
        }
    }

    info!(
        imported = report.imported.len(),
        duplicates = report.duplicates.len(),
        failed = report.failures.len(),
        "import finished"
    );
    report
}

/// Import against a store's current contents and add what was imported.
pub fn import_into<S: CharacterStore + ?Sized>(store: &mut S, text: &str) -> ImportReport {
    let report = import_documents(text, &store.get_all());
    for character in &report.imported {
        store.add(character.clone());
    }
    report
}
