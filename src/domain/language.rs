//! Per-turn language detection.
//!
//! The agent mirrors the language of the user's latest input. The supported
//! set is a contract constant: English and Dutch, with English as the
//! fallback for anything else. Detection is deterministic so turns are
//! replayable in tests.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Language used for all composed text in one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Dutch,
}

static DUTCH_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "de", "het", "een", "en", "van", "naar", "met", "voor", "maak", "maken", "grafiek",
        "staafdiagram", "lijngrafiek", "wijzig", "verander", "stijl", "kleur", "sla", "opslaan",
        "voorkeur", "standaard", "als", "nieuwe", "toevoegen", "voeg", "toe", "gegevens", "niet",
        "alsjeblieft", "graag", "mijn",
    ]
    .into_iter()
    .collect()
});

static ENGLISH_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "of", "to", "with", "for", "make", "create", "chart", "graph",
        "change", "style", "save", "as", "new", "add", "append", "data", "please", "my", "default",
        "preference", "set",
    ]
    .into_iter()
    .collect()
});

impl Language {
    /// Detect the language of a single turn of user input.
    ///
    /// Counts marker-word hits per language over lowercase word tokens.
    /// Dutch wins only on a strict majority; ties and unknown text fall back
    /// to English.
    pub fn detect(text: &str) -> Language {
        let mut dutch = 0usize;
        let mut english = 0usize;

        for word in text
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
        {
            let lower = word.to_lowercase();
            if DUTCH_MARKERS.contains(lower.as_str()) {
                dutch += 1;
            }
            if ENGLISH_MARKERS.contains(lower.as_str()) {
                english += 1;
            }
        }

        if dutch > english {
            Language::Dutch
        } else {
            Language::English
        }
    }
}
