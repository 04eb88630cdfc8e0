//! Slug derivation
//!
//! A slug is the URL-safe, lowercase, hyphenated form of a product title.
//! It is recomputed whenever the title changes and is unique per product
//! (enforced by a unique index on the product table).

/// Derive a slug from a title
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.trim().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lc in c.to_lowercase() {
                slug.push(lc);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Oak Dining Table"), "oak-dining-table");
    }

    #[test]
    fn collapses_runs_of_separators() {
        assert_eq!(slugify("  Chair --  Deluxe!  "), "chair-deluxe");
        assert_eq!(slugify("A/B (C)"), "a-b-c");
    }

    #[test]
    fn strips_leading_and_trailing_punctuation() {
        assert_eq!(slugify("!!Sale!!"), "sale");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(slugify("Fauteuil Été"), "fauteuil-été");
    }
}
