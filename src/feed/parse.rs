// src/feed/parse.rs

//! Header-driven CSV decoding for both feeds.
//!
//! Column lookup goes through the header row, so column order in the
//! spreadsheet does not matter. A missing column means the field
//! defaults for every row; it is never a hard failure. The only rows
//! rejected outright are those without an ID or a QUESTION.

use csv::{ReaderBuilder, StringRecord};

use crate::error::Result;
use crate::models::{Difficulty, ProblemRecord, SiteMetadata};

/// Column positions for the problem feed, resolved from the header row.
struct ProblemColumns {
    id: Option<usize>,
    title: Option<usize>,
    difficulty: Option<usize>,
    tags: Option<usize>,
    question: Option<usize>,
    hint: Option<usize>,
    solution: Option<usize>,
    date: Option<usize>,
    top10: Option<usize>,
    answer: Option<usize>,
    prompt: Option<usize>,
    thoughts: Option<usize>,
}

impl ProblemColumns {
    fn detect(headers: &StringRecord) -> Self {
        Self {
            id: position(headers, "ID"),
            title: position(headers, "TITLE"),
            difficulty: position(headers, "DIFFICULTY"),
            tags: position(headers, "TAGS"),
            question: position(headers, "QUESTION"),
            hint: position(headers, "HINT"),
            solution: position(headers, "SOLUTION"),
            date: position(headers, "DATE"),
            top10: position(headers, "TOP10"),
            answer: position(headers, "ANSWER"),
            prompt: position(headers, "PROMPT"),
            thoughts: position(headers, "THOUGHTS"),
        }
    }
}

fn position(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// Read a field by resolved column, empty when the column or cell is
/// absent (ragged rows degrade the same way as missing columns).
fn field<'a>(row: &'a StringRecord, column: Option<usize>) -> &'a str {
    column.and_then(|i| row.get(i)).unwrap_or("")
}

fn field_or<'a>(row: &'a StringRecord, column: Option<usize>, default: &'a str) -> &'a str {
    let value = field(row, column);
    if value.is_empty() { default } else { value }
}

/// Parse the problem feed into valid records.
///
/// Rows missing ID or QUESTION are dropped; every other field degrades
/// to its documented default.
pub fn parse_problems(raw: &str) -> Result<Vec<ProblemRecord>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());
    let columns = ProblemColumns::detect(&reader.headers()?.clone());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;

        let id = field(&row, columns.id);
        let formula = field(&row, columns.question);
        if id.is_empty() || formula.is_empty() {
            continue;
        }

        let tags = split_tags(field(&row, columns.tags));
        let is_featured = field(&row, columns.top10).trim().eq_ignore_ascii_case("true");

        records.push(ProblemRecord {
            id: id.to_string(),
            title: field_or(&row, columns.title, "Untitled").to_string(),
            difficulty: Difficulty::from_feed(field(&row, columns.difficulty)),
            tags,
            formula: formula.to_string(),
            hint: field_or(&row, columns.hint, "No hint available.").to_string(),
            solution_link: field(&row, columns.solution).to_string(),
            date: field(&row, columns.date).to_string(),
            is_featured,
            answer: field(&row, columns.answer).to_string(),
            prompt: field(&row, columns.prompt).to_string(),
            reflection: field(&row, columns.thoughts).to_string(),
        });
    }

    Ok(records)
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse the metadata feed. Only the first data row counts; extra rows
/// are ignored (singleton semantics). No rows yields empty metadata.
pub fn parse_metadata(raw: &str) -> Result<SiteMetadata> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());
    let headers = reader.headers()?.clone();

    let quote = position(&headers, "QUOTE");
    let about = position(&headers, "ABOUT");
    let welcome = position(&headers, "WELCOME");
    let contact = position(&headers, "CONTACT");
    let github = position(&headers, "GITHUB");
    let credits = position(&headers, "CREDITS");

    let Some(first) = reader.records().next() else {
        return Ok(SiteMetadata::default());
    };
    let first = first?;

    Ok(SiteMetadata {
        quote: field(&first, quote).to_string(),
        about: field(&first, about).to_string(),
        welcome_text: field(&first, welcome).to_string(),
        contact: field(&first, contact).to_string(),
        github: field(&first, github).to_string(),
        credits: field(&first, credits).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEM_HEADER: &str = "ID,TITLE,DIFFICULTY,TAGS,QUESTION,HINT,SOLUTION,DATE,TOP10,ANSWER,PROMPT,THOUGHTS";

    #[test]
    fn test_parse_valid_rows() {
        let csv = format!(
            "{PROBLEM_HEADER}\n\
             1,Gaussian,easy,\"classic, gaussian\",\\int e^{{-x^2}}dx,Square it,,01/01/24,true,1.77,,\n\
             2,Cubic,hard,,x^3,,,02/01/24,false,,,"
        );

        let records = parse_problems(&csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].difficulty, Difficulty::Easy);
        assert_eq!(records[0].tags, vec!["classic", "gaussian"]);
        assert!(records[0].is_featured);
        assert_eq!(records[1].difficulty, Difficulty::Hard);
        assert!(!records[1].is_featured);
    }

    #[test]
    fn test_drops_rows_without_id_or_question() {
        let csv = format!(
            "{PROBLEM_HEADER}\n\
             ,Missing Id,easy,,x^2,,,,,,,\n\
             3,Missing Question,easy,,,,,,,,,\n\
             4,Kept,easy,,x^4,,,,,,,"
        );

        let records = parse_problems(&csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "4");
    }

    #[test]
    fn test_missing_fields_default() {
        let csv = format!("{PROBLEM_HEADER}\n5,,,,x^5,,,,,,,");

        let records = parse_problems(&csv).unwrap();
        let record = &records[0];
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.difficulty, Difficulty::Medium);
        assert!(record.tags.is_empty());
        assert_eq!(record.hint, "No hint available.");
        assert_eq!(record.solution_link, "");
        assert_eq!(record.date, "");
        assert!(!record.is_featured);
    }

    #[test]
    fn test_missing_column_defaults_every_row() {
        // No DIFFICULTY or TAGS column at all
        let csv = "ID,QUESTION,TOP10\n6,x^6,TRUE";

        let records = parse_problems(csv).unwrap();
        assert_eq!(records[0].difficulty, Difficulty::Medium);
        assert!(records[0].tags.is_empty());
        assert!(records[0].is_featured);
    }

    #[test]
    fn test_ragged_row_degrades_to_defaults() {
        let csv = format!("{PROBLEM_HEADER}\n7,Short Row,medium,,x^7");

        let records = parse_problems(&csv).unwrap();
        assert_eq!(records[0].hint, "No hint available.");
        assert!(!records[0].is_featured);
    }

    #[test]
    fn test_top10_case_insensitive_exact() {
        let csv = format!(
            "{PROBLEM_HEADER}\n\
             8,A,easy,,x,,,,TRUE,,,\n\
             9,B,easy,,x,,,,True,,,\n\
             10,C,easy,,x,,,,yes,,,\n\
             11,D,easy,,x,,,,,,,"
        );

        let records = parse_problems(&csv).unwrap();
        let featured: Vec<_> = records.iter().filter(|r| r.is_featured).collect();
        assert_eq!(featured.len(), 2);
        assert_eq!(featured[0].id, "8");
        assert_eq!(featured[1].id, "9");
    }

    #[test]
    fn test_tags_trimmed_and_lowercased() {
        let csv = format!("{PROBLEM_HEADER}\n12,T,easy,\" Trig , SUBSTITUTION ,\",x,,,,,,,");

        let records = parse_problems(&csv).unwrap();
        assert_eq!(records[0].tags, vec!["trig", "substitution"]);
    }

    #[test]
    fn test_parse_metadata_first_row_wins() {
        let csv = "QUOTE,ABOUT,WELCOME,CONTACT,GITHUB,CREDITS\n\
                   First quote,About text,Hello,,,\n\
                   Second quote,ignored,ignored,,,";

        let meta = parse_metadata(csv).unwrap();
        assert_eq!(meta.quote, "First quote");
        assert_eq!(meta.welcome_text, "Hello");
        assert_eq!(meta.contact, "");
    }

    #[test]
    fn test_parse_metadata_no_rows() {
        let meta = parse_metadata("QUOTE,ABOUT,WELCOME\n").unwrap();
        assert_eq!(meta, SiteMetadata::default());
    }
}
