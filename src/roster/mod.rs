//! Parsing of uploaded roster files.
//!
//! A roster is a CSV file with a header row. Column order does not matter and
//! header names are matched case-insensitively, so exports from most school
//! information systems work as-is:
//!
//! ```text
//! Student ID,Full Name,Email Address
//! 1001,Ada Lovelace,ada@example.com
//! 1002,Alan Turing,alan@example.com
//! ```

use std::collections::HashSet;

use crate::classroom::Student;
use crate::error::RosterError;

const ID_HEADERS: &[&str] = &["id", "studentid", "userid"];
const NAME_HEADERS: &[&str] = &["name", "fullname", "studentname"];
const EMAIL_HEADERS: &[&str] = &["email", "emailaddress"];

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    name: usize,
    email: usize,
}

/// Normalize a header cell: strip a BOM, whitespace, separators and case.
fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

fn find_column(
    headers: &[String],
    candidates: &[&str],
    name: &'static str,
) -> Result<usize, RosterError> {
    headers
        .iter()
        .position(|h| candidates.contains(&h.as_str()))
        .ok_or(RosterError::MissingColumn(name))
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, RosterError> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

    Ok(Columns {
        id: find_column(&normalized, ID_HEADERS, "id")?,
        name: find_column(&normalized, NAME_HEADERS, "name")?,
        email: find_column(&normalized, EMAIL_HEADERS, "email")?,
    })
}

/// Parse an uploaded roster for `course_id`.
///
/// Every returned student carries `course_id`. Blank rows are skipped; a row
/// with a blank id, a repeated id, or no rows at all is an error.
pub fn parse_roster(course_id: &str, data: &[u8]) -> Result<Vec<Student>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let columns = resolve_columns(reader.headers()?)?;

    let mut students = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |index: usize| record.get(index).unwrap_or("").to_string();

        let id = field(columns.id);
        if id.is_empty() {
            return Err(RosterError::MissingField { line, field: "id" });
        }
        if !seen.insert(id.clone()) {
            return Err(RosterError::DuplicateStudent { line, id });
        }

        students.push(Student {
            id,
            name: field(columns.name),
            email: field(columns.email),
            course_id: course_id.to_string(),
        });
    }

    if students.is_empty() {
        return Err(RosterError::Empty);
    }

    Ok(students)
}
