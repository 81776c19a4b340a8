// src/models/problem.rs

//! Problem record and difficulty rating.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Difficulty rating of a problem.
///
/// The feed stores this as free text. Decoding is deliberately
/// asymmetric: only "easy" and "hard" (case-insensitive) are
/// recognized, everything else collapses to `Medium`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Decode a raw feed value.
    pub fn from_feed(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    /// Numeric rank for sorting, hardest highest.
    pub fn rank(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        write!(f, "{s}")
    }
}

/// One problem entry from the archive feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemRecord {
    /// Unique identifier within a sync cycle, numeric in practice
    pub id: String,

    /// Display title
    pub title: String,

    /// Difficulty rating
    pub difficulty: Difficulty,

    /// Lower-cased tags split from a comma-delimited field
    pub tags: Vec<String>,

    /// Problem statement in source markup (LaTeX)
    pub formula: String,

    /// Hint text
    pub hint: String,

    /// Optional external solution reference, unvalidated
    pub solution_link: String,

    /// Publication date as dd/mm/yy or dd/mm/yyyy text
    pub date: String,

    /// Whether the record belongs to the curated top-10 subset
    pub is_featured: bool,

    /// Final answer, may be empty
    pub answer: String,

    /// Optional generation prompt
    pub prompt: String,

    /// Optional author reflections
    pub reflection: String,
}

impl ProblemRecord {
    /// Numeric view of the id for ordering. Non-numeric ids rank as 0.
    pub fn numeric_id(&self) -> i64 {
        self.id.trim().parse().unwrap_or(0)
    }

    /// Parse the date field into a unix timestamp for ranking.
    ///
    /// Accepts dd/mm/yy and dd/mm/yyyy; two-digit years mean 2000+yy.
    /// Anything malformed ranks as the epoch so it sorts before every
    /// real date.
    pub fn date_timestamp(&self) -> i64 {
        parse_feed_date(&self.date).unwrap_or(0)
    }

    /// The single hardcoded record shown when the feeds are
    /// unreachable and nothing was ever cached.
    pub fn fallback() -> Self {
        Self {
            id: "1".to_string(),
            title: "Valentine's Special Integral".to_string(),
            difficulty: Difficulty::Hard,
            tags: vec!["parametric".to_string(), "heart".to_string()],
            formula: "x(t)=16\\sin^3t, y(t)=13\\cos t-5\\cos(2t)-2\\cos(3t)-\\cos(4t)"
                .to_string(),
            hint: "You can kill terms using orthogonality.".to_string(),
            solution_link:
                "https://drive.google.com/file/d/1RNlNYd9zXBQHPpe9VYz1Zv35BuAwNTnO/view?usp=sharing"
                    .to_string(),
            date: "14/02/26".to_string(),
            is_featured: true,
            answer: "565.49".to_string(),
            prompt: String::new(),
            reflection: String::new(),
        }
    }
}

fn parse_feed_date(raw: &str) -> Option<i64> {
    let mut parts = raw.split('/');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year: i32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let year = if year < 100 { 2000 + year } else { year };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_date(date: &str) -> ProblemRecord {
        ProblemRecord {
            date: date.to_string(),
            ..ProblemRecord::fallback()
        }
    }

    #[test]
    fn test_difficulty_decode() {
        assert_eq!(Difficulty::from_feed("easy"), Difficulty::Easy);
        assert_eq!(Difficulty::from_feed("HARD"), Difficulty::Hard);
        assert_eq!(Difficulty::from_feed(" Easy "), Difficulty::Easy);
        // Everything else is Medium, including blanks and typos
        assert_eq!(Difficulty::from_feed(""), Difficulty::Medium);
        assert_eq!(Difficulty::from_feed("medium"), Difficulty::Medium);
        assert_eq!(Difficulty::from_feed("brutal"), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_rank_order() {
        assert!(Difficulty::Hard.rank() > Difficulty::Medium.rank());
        assert!(Difficulty::Medium.rank() > Difficulty::Easy.rank());
    }

    #[test]
    fn test_numeric_id() {
        let mut record = ProblemRecord::fallback();
        record.id = "42".to_string();
        assert_eq!(record.numeric_id(), 42);

        record.id = "bonus".to_string();
        assert_eq!(record.numeric_id(), 0);
    }

    #[test]
    fn test_date_two_digit_year() {
        let record = record_with_date("01/01/24");
        let explicit = record_with_date("01/01/2024");
        assert_eq!(record.date_timestamp(), explicit.date_timestamp());
        assert!(record.date_timestamp() > 0);
    }

    #[test]
    fn test_date_leap_day() {
        let record = record_with_date("29/02/24");
        assert!(record.date_timestamp() > 0);
    }

    #[test]
    fn test_date_malformed_ranks_as_epoch() {
        assert_eq!(record_with_date("").date_timestamp(), 0);
        assert_eq!(record_with_date("not a date").date_timestamp(), 0);
        assert_eq!(record_with_date("31/02/24").date_timestamp(), 0);
        assert_eq!(record_with_date("1/2").date_timestamp(), 0);
        assert_eq!(record_with_date("1/2/3/4").date_timestamp(), 0);
    }

    #[test]
    fn test_empty_date_sorts_before_valid() {
        let empty = record_with_date("");
        let valid = record_with_date("02/01/24");
        assert!(empty.date_timestamp() < valid.date_timestamp());
    }
}
