use std::fmt;

/// Languages the API can localize text into.
///
/// Korean and Chinese are only understood by the v2 API; the v1 API
/// silently falls back to English for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    English,
    Spanish,
    German,
    French,
    Korean,
    Chinese,
}

impl Language {
    /// The two-letter code used in query parameters and cache keys.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::German => "de",
            Language::French => "fr",
            Language::Korean => "ko",
            Language::Chinese => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_is_english() {
        assert_eq!(Language::default(), Language::English);
        assert_eq!(Language::default().code(), "en");
    }

    #[test]
    fn codes_render_in_keys() {
        assert_eq!(format!("items.{}.68", Language::French), "items.fr.68");
    }
}
