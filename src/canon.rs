//! Canonical book list and chapter request validation.

use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    Old,
    New,
}

impl std::str::FromStr for Testament {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "old" | "ot" => Ok(Self::Old),
            "new" | "nt" => Ok(Self::New),
            other => Err(ReaderError::InvalidRequest(format!("unknown testament: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Book {
    pub name: &'static str,
    pub testament: Testament,
    pub chapters: u32,
}

/// The 66 books in canonical order.
pub static BOOKS: &[Book] = &[
    Book { name: "Genesis", testament: Testament::Old, chapters: 50 },
    Book { name: "Exodus", testament: Testament::Old, chapters: 40 },
    Book { name: "Leviticus", testament: Testament::Old, chapters: 27 },
    Book { name: "Numbers", testament: Testament::Old, chapters: 36 },
    Book { name: "Deuteronomy", testament: Testament::Old, chapters: 34 },
    Book { name: "Joshua", testament: Testament::Old, chapters: 24 },
    Book { name: "Judges", testament: Testament::Old, chapters: 21 },
    Book { name: "Ruth", testament: Testament::Old, chapters: 4 },
    Book { name: "1 Samuel", testament: Testament::Old, chapters: 31 },
    Book { name: "2 Samuel", testament: Testament::Old, chapters: 24 },
    Book { name: "1 Kings", testament: Testament::Old, chapters: 22 },
    Book { name: "2 Kings", testament: Testament::Old, chapters: 25 },
    Book { name: "1 Chronicles", testament: Testament::Old, chapters: 29 },
    Book { name: "2 Chronicles", testament: Testament::Old, chapters: 36 },
    Book { name: "Ezra", testament: Testament::Old, chapters: 10 },
    Book { name: "Nehemiah", testament: Testament::Old, chapters: 13 },
    Book { name: "Esther", testament: Testament::Old, chapters: 10 },
    Book { name: "Job", testament: Testament::Old, chapters: 42 },
    Book { name: "Psalms", testament: Testament::Old, chapters: 150 },
    Book { name: "Proverbs", testament: Testament::Old, chapters: 31 },
    Book { name: "Ecclesiastes", testament: Testament::Old, chapters: 12 },
    Book { name: "Song of Solomon", testament: Testament::Old, chapters: 8 },
    Book { name: "Isaiah", testament: Testament::Old, chapters: 66 },
    Book { name: "Jeremiah", testament: Testament::Old, chapters: 52 },
    Book { name: "Lamentations", testament: Testament::Old, chapters: 5 },
    Book { name: "Ezekiel", testament: Testament::Old, chapters: 48 },
    Book { name: "Daniel", testament: Testament::Old, chapters: 12 },
    Book { name: "Hosea", testament: Testament::Old, chapters: 14 },
    Book { name: "Joel", testament: Testament::Old, chapters: 3 },
    Book { name: "Amos", testament: Testament::Old, chapters: 9 },
    Book { name: "Obadiah", testament: Testament::Old, chapters: 1 },
    Book { name: "Jonah", testament: Testament::Old, chapters: 4 },
    Book { name: "Micah", testament: Testament::Old, chapters: 7 },
    Book { name: "Nahum", testament: Testament::Old, chapters: 3 },
    Book { name: "Habakkuk", testament: Testament::Old, chapters: 3 },
    Book { name: "Zephaniah", testament: Testament::Old, chapters: 3 },
    Book { name: "Haggai", testament: Testament::Old, chapters: 2 },
    Book { name: "Zechariah", testament: Testament::Old, chapters: 14 },
    Book { name: "Malachi", testament: Testament::Old, chapters: 4 },
    Book { name: "Matthew", testament: Testament::New, chapters: 28 },
    Book { name: "Mark", testament: Testament::New, chapters: 16 },
    Book { name: "Luke", testament: Testament::New, chapters: 24 },
    Book { name: "John", testament: Testament::New, chapters: 21 },
    Book { name: "Acts", testament: Testament::New, chapters: 28 },
    Book { name: "Romans", testament: Testament::New, chapters: 16 },
    Book { name: "1 Corinthians", testament: Testament::New, chapters: 16 },
    Book { name: "2 Corinthians", testament: Testament::New, chapters: 13 },
    Book { name: "Galatians", testament: Testament::New, chapters: 6 },
    Book { name: "Ephesians", testament: Testament::New, chapters: 6 },
    Book { name: "Philippians", testament: Testament::New, chapters: 4 },
    Book { name: "Colossians", testament: Testament::New, chapters: 4 },
    Book { name: "1 Thessalonians", testament: Testament::New, chapters: 5 },
    Book { name: "2 Thessalonians", testament: Testament::New, chapters: 3 },
    Book { name: "1 Timothy", testament: Testament::New, chapters: 6 },
    Book { name: "2 Timothy", testament: Testament::New, chapters: 4 },
    Book { name: "Titus", testament: Testament::New, chapters: 3 },
    Book { name: "Philemon", testament: Testament::New, chapters: 1 },
    Book { name: "Hebrews", testament: Testament::New, chapters: 13 },
    Book { name: "James", testament: Testament::New, chapters: 5 },
    Book { name: "1 Peter", testament: Testament::New, chapters: 5 },
    Book { name: "2 Peter", testament: Testament::New, chapters: 3 },
    Book { name: "1 John", testament: Testament::New, chapters: 5 },
    Book { name: "2 John", testament: Testament::New, chapters: 1 },
    Book { name: "3 John", testament: Testament::New, chapters: 1 },
    Book { name: "Jude", testament: Testament::New, chapters: 1 },
    Book { name: "Revelation", testament: Testament::New, chapters: 22 },
];

/// Look up a book by name. Exact match wins, then ASCII case-insensitive.
pub fn find_book(name: &str) -> Option<&'static Book> {
    let name = name.trim();
    BOOKS
        .iter()
        .find(|b| b.name == name)
        .or_else(|| BOOKS.iter().find(|b| b.name.eq_ignore_ascii_case(name)))
}

pub fn books(testament: Option<Testament>) -> impl Iterator<Item = &'static Book> {
    BOOKS
        .iter()
        .filter(move |b| testament.map_or(true, |t| b.testament == t))
}

/// A validated (book, chapter) pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRequest {
    book: &'static Book,
    chapter: u32,
}

impl ChapterRequest {
    pub fn new(book_name: &str, chapter: u32) -> Result<Self> {
        let book = find_book(book_name)
            .ok_or_else(|| ReaderError::InvalidRequest(format!("unknown book: {book_name}")))?;
        if chapter == 0 || chapter > book.chapters {
            return Err(ReaderError::InvalidRequest(format!(
                "{} has chapters 1..={}, got {chapter}",
                book.name, book.chapters
            )));
        }
        Ok(Self { book, chapter })
    }

    /// Canonical spelling of the book name.
    pub fn book_name(&self) -> &'static str {
        self.book.name
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }
}

impl std::fmt::Display for ChapterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.book.name, self.chapter)
    }
}
