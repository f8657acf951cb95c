//! Language detection for the tech-stack answer.

use whatlang::Lang;

/// Code used when detection fails.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Name used for any code outside the table.
pub const DEFAULT_LANGUAGE_NAME: &str = "English";

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
];

/// Classifies free text into a language code.
pub trait LanguageDetector: Send + Sync {
    /// ISO 639-1 code where one exists, or `None` if detection failed.
    fn detect(&self, text: &str) -> Option<String>;
}

/// Detector backed by `whatlang` trigram models.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        // Short comma-separated stacks rarely carry enough trigrams to classify.
        if !info.is_reliable() {
            tracing::debug!(
                guess = ?info.lang(),
                confidence = info.confidence(),
                "Unreliable language guess"
            );
            return None;
        }
        let code = match info.lang() {
            Lang::Eng => "en",
            Lang::Hin => "hi",
            Lang::Spa => "es",
            Lang::Fra => "fr",
            Lang::Deu => "de",
            other => other.code(),
        };
        Some(code.to_string())
    }
}

/// Human-readable name for a language code.
pub fn language_name(code: &str) -> &'static str {
    LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(DEFAULT_LANGUAGE_NAME)
}

/// Detect the language of `text` and return its name.
pub fn resolve_language(detector: &dyn LanguageDetector, text: &str) -> &'static str {
    let code = detector.detect(text).unwrap_or_else(|| {
        tracing::debug!("Language detection failed, defaulting to {DEFAULT_LANGUAGE_CODE}");
        DEFAULT_LANGUAGE_CODE.to_string()
    });
    language_name(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl LanguageDetector for Fixed {
        fn detect(&self, _text: &str) -> Option<String> {
            self.0.map(String::from)
        }
    }

    #[test]
    fn table_lookup() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("hi"), "Hindi");
        assert_eq!(language_name("es"), "Spanish");
        assert_eq!(language_name("fr"), "French");
        assert_eq!(language_name("de"), "German");
        assert_eq!(language_name("it"), "English");
        assert_eq!(language_name(""), "English");
    }

    #[test]
    fn failed_detection_resolves_to_english() {
        assert_eq!(resolve_language(&Fixed(None), "Python"), "English");
    }

    #[test]
    fn detected_code_resolves_through_table() {
        assert_eq!(resolve_language(&Fixed(Some("fr")), "x"), "French");
        assert_eq!(resolve_language(&Fixed(Some("jpn")), "x"), "English");
    }

    #[test]
    fn whatlang_detects_long_spanish_text() {
        let text = "Trabajo con bases de datos relacionales y desarrollo de servicios \
                    web en el servidor desde hace varios años, principalmente con Python.";
        assert_eq!(WhatlangDetector.detect(text).as_deref(), Some("es"));
    }

    #[test]
    fn short_tech_stacks_resolve_to_english() {
        for stack in ["Kotlin, Android", "Vue, Laravel, PHP", "Pandas, NumPy, Scikit-learn"] {
            assert_eq!(resolve_language(&WhatlangDetector, stack), "English", "{stack}");
        }
    }

    #[test]
    fn whatlang_maps_to_two_letter_codes() {
        let text = "I have been building backend services and distributed systems \
                    for several years, mostly with Rust and Go.";
        assert_eq!(WhatlangDetector.detect(text).as_deref(), Some("en"));
    }
}
