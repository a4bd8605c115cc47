//! Locale categories and the minimal `C` locale.
//!
//! The library runs byte-oriented and locale-independent, so the only
//! locale it will ever install is the minimal one. The category vocabulary
//! is still exposed so callers can name what they are (not) changing.

/// Locale category, selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    All,
    Collate,
    Ctype,
    Monetary,
    Numeric,
    Time,
}

impl Category {
    /// Look up a category by name. The conventional default is `all`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Category> {
        match name {
            "all" => Some(Category::All),
            "collate" => Some(Category::Collate),
            "ctype" => Some(Category::Ctype),
            "monetary" => Some(Category::Monetary),
            "numeric" => Some(Category::Numeric),
            "time" => Some(Category::Time),
            _ => None,
        }
    }

    /// The name this category is selected by.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Collate => "collate",
            Category::Ctype => "ctype",
            Category::Monetary => "monetary",
            Category::Numeric => "numeric",
            Category::Time => "time",
        }
    }
}

/// Canonical name of the minimal locale.
pub const C_LOCALE: &str = "C";

/// Returns `true` if `name` selects the minimal `C` locale.
///
/// `C`, `POSIX`, and the empty string (the implementation default) all do.
#[must_use]
pub fn is_c_locale(name: &str) -> bool {
    matches!(name, "C" | "POSIX" | "")
}
