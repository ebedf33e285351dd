//! Domain and wire-format types for authors and quotes.
//!
//! Row shapes (`Author`, `Quote`) belong to the store layer. The wire
//! types (`AuthorJson`, `QuoteJson`) are an explicit, deliberate contract:
//! every field is listed by hand and stringified, a quote embeds its full
//! author, and `author_id` never appears in output.

use serde::Serialize;

/// Maximum length of an author name.
pub const MAX_NAME_LEN: usize = 32;

/// Maximum length of a quote's text.
pub const MAX_TEXT_LEN: usize = 255;

/// An author row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// A quote row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: i64,
    pub author_id: i64,
    pub text: String,
    pub rating: i64,
}

/// A quote joined with its author — the unit every quote read returns.
#[derive(Debug, Clone)]
pub struct QuoteRecord {
    pub quote: Quote,
    pub author: Author,
}

// ── Wire format ─────────────────────────────────────────────────────────

/// Serialized author. All values are strings, including `id`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorJson {
    pub id: String,
    pub name: String,
}

/// Serialized quote with its author embedded.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteJson {
    pub id: String,
    pub text: String,
    pub rating: String,
    pub author: AuthorJson,
}

impl Author {
    pub fn to_json(&self) -> AuthorJson {
        AuthorJson {
            id: self.id.to_string(),
            name: self.name.clone(),
        }
    }
}

impl QuoteRecord {
    pub fn to_json(&self) -> QuoteJson {
        QuoteJson {
            id: self.quote.id.to_string(),
            text: self.quote.text.clone(),
            rating: self.quote.rating.to_string(),
            author: self.author.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_json_stringifies_id() {
        let author = Author {
            id: 7,
            name: "Seneca".into(),
        };
        let json = serde_json::to_value(author.to_json()).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["name"], "Seneca");
    }

    #[test]
    fn quote_json_embeds_author_and_drops_author_id() {
        let record = QuoteRecord {
            quote: Quote {
                id: 3,
                author_id: 7,
                text: "Luck is what happens when preparation meets opportunity.".into(),
                rating: 5,
            },
            author: Author {
                id: 7,
                name: "Seneca".into(),
            },
        };
        let json = serde_json::to_value(record.to_json()).unwrap();
        assert_eq!(json["id"], "3");
        assert_eq!(json["rating"], "5");
        assert_eq!(json["author"]["id"], "7");
        assert_eq!(json["author"]["name"], "Seneca");
        assert!(json.get("author_id").is_none());
    }
}
