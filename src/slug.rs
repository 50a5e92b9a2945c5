// src/slug.rs
//! Slug derivation for notes.
//!
//! Titles are often written in Russian, so Cyrillic letters are
//! transliterated to Latin before anything else is stripped.

use crate::error::{NotesError, Result};

pub const MAX_SLUG_LENGTH: usize = 100;

/// Latin spelling of a lowercase Cyrillic letter, `None` for anything else.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // Ukrainian
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}

/// Convert a title to a URL-safe slug
///
/// - `&` reads as "and"
/// - Cyrillic is transliterated, other non-ASCII letters are dropped
/// - Punctuation is removed
/// - Runs of whitespace and hyphens become a single hyphen
/// - Result is lowercase with no leading/trailing hyphens
///
/// May return an empty string when the title has nothing to keep.
pub fn slugify(title: &str) -> String {
    let title = title.replace("&amp;", " and ").replace('&', " and ");

    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
            continue;
        }

        for lc in c.to_lowercase() {
            if let Some(latin) = transliterate(lc) {
                push_piece(&mut slug, &mut pending_hyphen, latin);
            } else if lc.is_ascii_alphanumeric() || lc == '_' {
                let mut buf = [0; 4];
                push_piece(&mut slug, &mut pending_hyphen, lc.encode_utf8(&mut buf));
            }
        }
    }

    slug
}

fn push_piece(slug: &mut String, pending_hyphen: &mut bool, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if *pending_hyphen && !slug.is_empty() {
        slug.push('-');
    }
    *pending_hyphen = false;
    slug.push_str(piece);
}

/// Cut a slug down to at most `max_chars` characters.
pub fn truncate(slug: &str, max_chars: usize) -> String {
    slug.chars().take(max_chars).collect()
}

/// The slug a note will be stored under.
///
/// A supplied non-blank slug is used as given; otherwise it is derived from
/// the title. Either way the result must be a valid slug.
pub fn resolve(supplied: Option<&str>, title: &str) -> Result<String> {
    let slug = match supplied.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            let derived = truncate(&slugify(title), MAX_SLUG_LENGTH);
            if derived.is_empty() {
                return Err(NotesError::validation(
                    "slug",
                    "cannot derive a slug from the title, enter one",
                ));
            }
            derived
        }
    };

    if slug.chars().count() > MAX_SLUG_LENGTH {
        return Err(NotesError::validation(
            "slug",
            format!("at most {} characters", MAX_SLUG_LENGTH),
        ));
    }
    if !is_valid_slug(&slug) {
        return Err(NotesError::validation(
            "slug",
            "only latin letters, digits, hyphens and underscores",
        ));
    }
    Ok(slug)
}

/// Whether `slug` can be used as a URL path segment: `[A-Za-z0-9_-]+`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Use PostgreSQL"), "use-postgresql");
    }

    #[test]
    fn test_slugify_cyrillic() {
        assert_eq!(slugify("Заголовок"), "zagolovok");
        assert_eq!(slugify("Новый заголовок"), "novyj-zagolovok");
        assert_eq!(slugify("Щука и ёж"), "schuka-i-yozh");
        assert_eq!(slugify("Объявление"), "obyavlenie");
    }

    #[test]
    fn test_slugify_special_chars() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("API v2.0 (beta)"), "api-v20-beta");
        assert_eq!(slugify("Tom & Jerry"), "tom-and-jerry");
    }

    #[test]
    fn test_slugify_consecutive_separators() {
        assert_eq!(slugify("Hello   World"), "hello-world");
        assert_eq!(slugify("---test---"), "test");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn test_slugify_keeps_digits_and_underscores() {
        assert_eq!(slugify("1996"), "1996");
        assert_eq!(slugify("snake_case Title"), "snake_case-title");
    }

    #[test]
    fn test_slugify_nothing_left() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Заголовок"), slugify("Заголовок"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 100), "ab");
    }

    #[test]
    fn test_resolve_prefers_supplied_slug() {
        assert_eq!(resolve(Some("1996"), "Заголовок").unwrap(), "1996");
        assert_eq!(resolve(Some(" 1996 "), "Заголовок").unwrap(), "1996");
    }

    #[test]
    fn test_resolve_derives_from_title() {
        assert_eq!(resolve(None, "Заголовок").unwrap(), "zagolovok");
        assert_eq!(resolve(Some(""), "Заголовок").unwrap(), "zagolovok");
    }

    #[test]
    fn test_resolve_truncates_derived_slug() {
        let title = "a".repeat(150);
        assert_eq!(resolve(None, &title).unwrap().len(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn test_resolve_rejects_bad_slugs() {
        assert!(matches!(
            resolve(None, "!!!"),
            Err(NotesError::Validation { field, .. }) if field == "slug"
        ));
        assert!(resolve(Some("has space"), "x").is_err());
        assert!(resolve(Some(&"a".repeat(101)), "x").is_err());
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("1996"));
        assert!(is_valid_slug("zagolovok-2_b"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug("заголовок"));
        assert!(!is_valid_slug("a/b"));
    }
}
