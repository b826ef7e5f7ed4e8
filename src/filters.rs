use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort order selected in the list toolbar.
///
/// `None` keeps whatever order the catalog returns. The string forms are the
/// values carried by the `sort` location parameter.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    None,
    RatingDesc,
    RatingAsc,
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::None => "",
            SortBy::RatingDesc => "rating_desc",
            SortBy::RatingAsc => "rating_asc",
            SortBy::DateDesc => "date_desc",
            SortBy::DateAsc => "date_asc",
            SortBy::TitleAsc => "title_asc",
            SortBy::TitleDesc => "title_desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortBy::None => "Popularity",
            SortBy::RatingDesc => "Rating (high → low)",
            SortBy::RatingAsc => "Rating (low → high)",
            SortBy::DateDesc => "Release date (newest)",
            SortBy::DateAsc => "Release date (oldest)",
            SortBy::TitleAsc => "Title (A → Z)",
            SortBy::TitleDesc => "Title (Z → A)",
        }
    }

    /// The discover endpoint's native `sort_by` value.
    pub fn discover_key(&self) -> Option<&'static str> {
        match self {
            SortBy::None => None,
            SortBy::RatingDesc => Some("vote_average.desc"),
            SortBy::RatingAsc => Some("vote_average.asc"),
            SortBy::DateDesc => Some("primary_release_date.desc"),
            SortBy::DateAsc => Some("primary_release_date.asc"),
            SortBy::TitleAsc => Some("original_title.asc"),
            SortBy::TitleDesc => Some("original_title.desc"),
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self, SortBy::TitleAsc | SortBy::TitleDesc)
    }

    pub fn all() -> &'static [SortBy] {
        &[
            SortBy::None,
            SortBy::RatingDesc,
            SortBy::RatingAsc,
            SortBy::DateDesc,
            SortBy::DateAsc,
            SortBy::TitleAsc,
            SortBy::TitleDesc,
        ]
    }

    pub fn next(&self) -> SortBy {
        cycle(Self::all(), self)
    }
}

/// Original-language filter.
///
/// `Arabic` and `English` can be pushed down to the discover endpoint; `Other`
/// (anything that is neither) and `All` only exist client-side.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[serde(rename = "")]
    All,
    #[serde(rename = "ar")]
    Arabic,
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "other")]
    Other,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::All => "",
            Language::Arabic => "ar",
            Language::English => "en",
            Language::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::All => "All",
            Language::Arabic => "Arabic",
            Language::English => "English",
            Language::Other => "Other",
        }
    }

    /// Value for `with_original_language`, when the server can apply it.
    pub fn native_filter(&self) -> Option<&'static str> {
        match self {
            Language::Arabic => Some("ar"),
            Language::English => Some("en"),
            Language::All | Language::Other => None,
        }
    }

    /// Whether an item with the given original language passes this filter.
    pub fn accepts(&self, original_language: Option<&str>) -> bool {
        match self {
            Language::All => true,
            Language::Arabic | Language::English => original_language == Some(self.as_str()),
            Language::Other => matches!(original_language, Some(l) if !l.is_empty() && l != "ar" && l != "en"),
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::All, Language::Arabic, Language::English, Language::Other]
    }

    pub fn next(&self) -> Language {
        cycle(Self::all(), self)
    }
}

/// How "view details" behaves: push a new location, or open an overlay.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Navigate,
    Popup,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Navigate => "navigate",
            ViewMode::Popup => "popup",
        }
    }

    pub fn toggle(&self) -> ViewMode {
        match self {
            ViewMode::Navigate => ViewMode::Popup,
            ViewMode::Popup => ViewMode::Navigate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for SortBy {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::all()
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownValue { kind: "sort", value: s.to_string() })
    }
}

impl FromStr for Language {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::all()
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownValue { kind: "lang", value: s.to_string() })
    }
}

impl FromStr for ViewMode {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "navigate" => Ok(ViewMode::Navigate),
            "popup" => Ok(ViewMode::Popup),
            _ => Err(UnknownValue { kind: "view", value: s.to_string() }),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: &T) -> T {
    let idx = all.iter().position(|v| v == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_roundtrip() {
        for sort in SortBy::all() {
            assert_eq!(sort.as_str().parse::<SortBy>().unwrap(), *sort);
        }
        assert!("popularity".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_empty_lang_means_all() {
        assert_eq!("".parse::<Language>().unwrap(), Language::All);
        assert_eq!("other".parse::<Language>().unwrap(), Language::Other);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_discover_sort_mapping() {
        assert_eq!(SortBy::RatingDesc.discover_key(), Some("vote_average.desc"));
        assert_eq!(SortBy::DateAsc.discover_key(), Some("primary_release_date.asc"));
        assert_eq!(SortBy::TitleDesc.discover_key(), Some("original_title.desc"));
        assert_eq!(SortBy::None.discover_key(), None);
    }

    #[test]
    fn test_language_accepts() {
        assert!(Language::All.accepts(None));
        assert!(Language::English.accepts(Some("en")));
        assert!(!Language::English.accepts(Some("ar")));
        assert!(Language::Other.accepts(Some("ja")));
        assert!(!Language::Other.accepts(Some("en")));
        // Unknown language never counts as "other"
        assert!(!Language::Other.accepts(None));
    }

    #[test]
    fn test_native_filter_only_for_ar_en() {
        assert_eq!(Language::Arabic.native_filter(), Some("ar"));
        assert_eq!(Language::Other.native_filter(), None);
        assert_eq!(Language::All.native_filter(), None);
    }

    #[test]
    fn test_serde_uses_location_values() {
        assert_eq!(serde_json::to_string(&Language::All).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&SortBy::TitleAsc).unwrap(), "\"title_asc\"");
        assert_eq!(serde_json::to_string(&ViewMode::Popup).unwrap(), "\"popup\"");
    }
}
