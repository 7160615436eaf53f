//! Model variant identity and the supported-language table.

use std::fmt;

/// The Chatterbox model variants this pipeline knows how to drive.
///
/// The variant determines the calling convention of the underlying model
/// (only [`Multilingual`](ModelVariant::Multilingual) takes a language id)
/// and its rough memory footprint class (Turbo is the smallest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelVariant {
    /// Fastest and smallest; supports paralinguistic tags like `[laugh]`.
    Turbo,
    /// 23-language model; requires a language id per request.
    Multilingual,
    /// The original English-only model.
    Standard,
}

impl ModelVariant {
    /// All variants, in the order they are presented to users.
    pub const ALL: [ModelVariant; 3] = [
        ModelVariant::Turbo,
        ModelVariant::Multilingual,
        ModelVariant::Standard,
    ];

    /// Whether `generate` calls for this variant take a language id.
    pub fn uses_language_id(self) -> bool {
        matches!(self, ModelVariant::Multilingual)
    }

    /// Whether inline tags like `[laugh]`, `[chuckle]` and `[cough]` are
    /// rendered as paralinguistic sounds rather than read out literally.
    pub fn supports_paralinguistic_tags(self) -> bool {
        matches!(self, ModelVariant::Turbo)
    }

    /// Display label matching the upstream model names.
    pub fn label(self) -> &'static str {
        match self {
            ModelVariant::Turbo => "Chatterbox-Turbo",
            ModelVariant::Multilingual => "Chatterbox-Multilingual",
            ModelVariant::Standard => "Chatterbox",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Language id used when a multilingual request does not specify one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Languages supported by the multilingual variant, as `(name, id)` pairs.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("Arabic", "ar"),
    ("Danish", "da"),
    ("German", "de"),
    ("Greek", "el"),
    ("English", "en"),
    ("Spanish", "es"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("Hebrew", "he"),
    ("Hindi", "hi"),
    ("Italian", "it"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Malay", "ms"),
    ("Dutch", "nl"),
    ("Norwegian", "no"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Russian", "ru"),
    ("Swedish", "sv"),
    ("Swahili", "sw"),
    ("Turkish", "tr"),
    ("Chinese", "zh"),
];

/// True if `id` is one of the language ids in [`SUPPORTED_LANGUAGES`].
pub fn is_supported_language(id: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|&(_, code)| code == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_multilingual_takes_a_language_id() {
        assert!(ModelVariant::Multilingual.uses_language_id());
        assert!(!ModelVariant::Turbo.uses_language_id());
        assert!(!ModelVariant::Standard.uses_language_id());
    }

    #[test]
    fn language_table_contains_default() {
        assert!(is_supported_language(DEFAULT_LANGUAGE));
        assert!(is_supported_language("fr"));
        assert!(!is_supported_language("tlh"));
    }
}
