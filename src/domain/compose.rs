//! Response composer.
//!
//! Builds the single user-facing string for each turn, mirroring the
//! language detected from the user's latest input. The supported set is
//! {English, Dutch}; anything else falls back to English upstream.

use std::path::Path;

use crate::ports::extraction::ExtractionError;
use crate::ports::renderer::RenderError;

use super::errors::TurnError;
use super::intent::PreferenceUpdate;
use super::language::Language;
use super::session::MissingParam;

/// Success message; always includes the absolute output path.
pub fn success(language: Language, path: &Path) -> String {
    match language {
        Language::English => format!("Chart saved: {}", path.display()),
        Language::Dutch => format!("Grafiek opgeslagen: {}", path.display()),
    }
}

/// One combined clarification question naming every missing item.
pub fn clarification(language: Language, missing: &[MissingParam]) -> String {
    let items = join_names(language, missing);
    match language {
        Language::English => format!(
            "I still need the {items} for this chart. Which would you like?"
        ),
        Language::Dutch => format!(
            "Ik heb nog de {items} nodig voor deze grafiek. Welke wil je gebruiken?"
        ),
    }
}

/// Direct-mode error naming each missing item and the flag that supplies it.
pub fn direct_failure(language: Language, missing: &[MissingParam]) -> String {
    let items = missing
        .iter()
        .map(|m| match language {
            Language::English => format!("{} (supply with {})", m.name(), m.flag()),
            Language::Dutch => format!("{} (geef op met {})", dutch_name(*m), m.flag()),
        })
        .collect::<Vec<_>>()
        .join(", ");
    match language {
        Language::English => format!("Missing required parameters: {items}."),
        Language::Dutch => format!("Ontbrekende verplichte parameters: {items}."),
    }
}

/// Rejection for off-topic requests, explaining the system's scope.
pub fn rejection(language: Language) -> String {
    match language {
        Language::English => {
            "I can only help you create charts. Please ask me to make a bar or line chart."
                .to_string()
        }
        Language::Dutch => {
            "Ik kan alleen grafieken maken. Vraag me om een staaf- of lijngrafiek.".to_string()
        }
    }
}

/// Confirmation after an explicit default-preference write.
pub fn preference_saved(language: Language, update: &PreferenceUpdate) -> String {
    let value = update.value_token();
    match language {
        Language::English => {
            format!("Default {} set to {value}.", update.target_name())
        }
        Language::Dutch => {
            let target = match update {
                PreferenceUpdate::Style(_) => "stijl",
                PreferenceUpdate::Format(_) => "formaat",
            };
            format!("Standaard {target} ingesteld op {value}.")
        }
    }
}

/// Reply when the preference store refused the write.
pub fn preference_save_failed(language: Language) -> String {
    match language {
        Language::English => {
            "I couldn't save that preference; your settings are unchanged.".to_string()
        }
        Language::Dutch => {
            "Ik kon die voorkeur niet opslaan; je instellingen zijn ongewijzigd.".to_string()
        }
    }
}

/// Reply when the user asked for a preference write the agent could not read.
pub fn preference_not_understood(language: Language) -> String {
    match language {
        Language::English => {
            "I couldn't tell which preference to set. Try \"set my default style to fd\"."
                .to_string()
        }
        Language::Dutch => {
            "Ik kon niet bepalen welke voorkeur je wilt instellen. Probeer \
             \"stel mijn standaard stijl in op fd\"."
                .to_string()
        }
    }
}

/// User-facing text for a fatal turn error.
pub fn turn_failure(language: Language, error: &TurnError) -> String {
    match error {
        TurnError::AmbiguousParameters { missing } => direct_failure(language, missing),
        TurnError::DataExtraction(extraction) => extraction_failure(language, extraction),
        TurnError::Render(render) => render_failure(language, render),
    }
}

fn extraction_failure(language: Language, error: &ExtractionError) -> String {
    match (language, error) {
        (Language::English, ExtractionError::NotFound { resource }) => {
            format!("I couldn't find the data source {resource}.")
        }
        (Language::English, ExtractionError::NoValidData { resource }) => {
            format!("I couldn't find any usable data in {resource}.")
        }
        (Language::English, ExtractionError::BadFormat { resource, detail }) => {
            format!("I couldn't read {resource} as a spreadsheet: {detail}.")
        }
        (Language::English, ExtractionError::NoInlineData) => {
            "I couldn't find any data points in your message. \
             Try something like \"A=10, B=20\"."
                .to_string()
        }
        (Language::Dutch, ExtractionError::NotFound { resource }) => {
            format!("Ik kan de gegevensbron {resource} niet vinden.")
        }
        (Language::Dutch, ExtractionError::NoValidData { resource }) => {
            format!("Geen bruikbare gegevens gevonden in {resource}.")
        }
        (Language::Dutch, ExtractionError::BadFormat { resource, detail }) => {
            format!("Kan {resource} niet lezen als spreadsheet: {detail}.")
        }
        (Language::Dutch, ExtractionError::NoInlineData) => {
            "Ik zie geen datapunten in je bericht. Probeer bijvoorbeeld \"A=10, B=20\"."
                .to_string()
        }
    }
}

fn render_failure(language: Language, error: &RenderError) -> String {
    match language {
        Language::English => {
            format!("Chart generation failed: {error}. No file was produced.")
        }
        Language::Dutch => {
            format!("Het genereren van de grafiek is mislukt: {error}. Er is geen bestand gemaakt.")
        }
    }
}

/// REPL banner; shown before any turn exists, so English.
pub fn welcome() -> String {
    "Welcome to Chart Agent! I can help you create bar and line charts.\n\
     Type 'exit' or 'quit' to leave."
        .to_string()
}

/// REPL sign-off in the last detected language.
pub fn goodbye(language: Language) -> String {
    match language {
        Language::English => "Goodbye!".to_string(),
        Language::Dutch => "Tot ziens!".to_string(),
    }
}

fn join_names(language: Language, missing: &[MissingParam]) -> String {
    let describe = |m: &MissingParam| match language {
        Language::English => match m {
            MissingParam::Type => "chart type (bar or line)",
            MissingParam::Style => "style (fd or bnr)",
        },
        Language::Dutch => match m {
            MissingParam::Type => "grafiektype (bar of line)",
            MissingParam::Style => "stijl (fd of bnr)",
        },
    };
    let and = match language {
        Language::English => " and the ",
        Language::Dutch => " en de ",
    };
    missing
        .iter()
        .map(describe)
        .collect::<Vec<_>>()
        .join(and)
}

fn dutch_name(param: MissingParam) -> &'static str {
    match param {
        MissingParam::Type => "grafiektype",
        MissingParam::Style => "stijl",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::BrandStyle;
    use std::path::PathBuf;

    #[test]
    fn test_success_includes_path() {
        let path = PathBuf::from("/out/chart.png");

        assert!(success(Language::English, &path).contains("/out/chart.png"));
        assert!(success(Language::Dutch, &path).contains("/out/chart.png"));
    }

    #[test]
    fn test_clarification_names_every_missing_item() {
        let text = clarification(
            Language::English,
            &[MissingParam::Type, MissingParam::Style],
        );

        assert!(text.contains("chart type"));
        assert!(text.contains("style"));
        // One combined question, not two.
        assert_eq!(text.matches('?').count(), 1);
    }

    #[test]
    fn test_direct_failure_names_flags() {
        let text = direct_failure(Language::English, &[MissingParam::Type]);

        assert!(text.contains("chart type"));
        assert!(text.contains("--type <bar|line>"));
    }

    #[test]
    fn test_dutch_clarification() {
        let text = clarification(Language::Dutch, &[MissingParam::Style]);

        assert!(text.contains("stijl"));
        assert!(text.contains("nodig"));
    }

    #[test]
    fn test_preference_saved_mentions_target_and_value() {
        let text = preference_saved(
            Language::English,
            &PreferenceUpdate::Style(BrandStyle::Bnr),
        );

        assert!(text.contains("style"));
        assert!(text.contains("bnr"));
    }

    #[test]
    fn test_extraction_failure_names_resource() {
        let error = TurnError::from(ExtractionError::NotFound {
            resource: "missing.xlsx".into(),
        });

        let text = turn_failure(Language::English, &error);

        assert!(text.contains("missing.xlsx"));
    }

    #[test]
    fn test_render_failure_claims_no_file() {
        let error = TurnError::from(RenderError::Backend("surface error".into()));

        let text = turn_failure(Language::English, &error);

        assert!(text.contains("No file was produced"));
    }
}
