//! Spreadsheet export of a course and its roster.

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::classroom::{Course, Student};
use crate::error::ExportError;

/// MIME type of an `.xlsx` workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const COURSE_SHEET: &str = "Course";
const STUDENTS_SHEET: &str = "Students";
const STUDENT_HEADERS: [&str; 3] = ["ID", "Name", "Email"];

/// Build an XLSX workbook describing `course` and `students`.
///
/// The `Course` sheet holds one label/value row per course attribute; the
/// `Students` sheet holds a header row followed by one row per student.
pub fn build_course_workbook(course: &Course, students: &[Student]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    write_course_sheet(workbook.add_worksheet(), course, &bold)?;
    write_students_sheet(workbook.add_worksheet(), students, &bold)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_course_sheet(sheet: &mut Worksheet, course: &Course, bold: &Format) -> Result<(), ExportError> {
    sheet.set_name(COURSE_SHEET)?;

    let rows = [
        ("Course ID", course.id.as_str()),
        ("Name", course.name.as_str()),
        ("Section", course.section.as_deref().unwrap_or("")),
        ("Room", course.room.as_deref().unwrap_or("")),
        ("Status", course.status.as_str()),
        ("Owner ID", course.owner_id.as_str()),
    ];

    for (row, (label, value)) in (0u32..).zip(rows) {
        sheet.write_string_with_format(row, 0, label, bold)?;
        sheet.write_string(row, 1, value)?;
    }

    sheet.set_column_width(0, 14)?;
    sheet.set_column_width(1, 40)?;
    Ok(())
}

fn write_students_sheet(
    sheet: &mut Worksheet,
    students: &[Student],
    bold: &Format,
) -> Result<(), ExportError> {
    sheet.set_name(STUDENTS_SHEET)?;

    for (col, header) in (0u16..).zip(STUDENT_HEADERS) {
        sheet.write_string_with_format(0, col, header, bold)?;
    }

    for (row, student) in (1u32..).zip(students) {
        sheet.write_string(row, 0, &student.id)?;
        sheet.write_string(row, 1, &student.name)?;
        sheet.write_string(row, 2, &student.email)?;
    }

    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 30)?;
    sheet.set_column_width(2, 36)?;
    Ok(())
}

/// Turn a course name into a safe attachment file name, without extension.
///
/// Characters outside `[A-Za-z0-9 _-]` become `_`, surrounding whitespace is
/// dropped, and an empty result falls back to `course`.
pub fn export_file_stem(course_name: &str) -> String {
    let stem: String = course_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = stem.trim();
    if stem.is_empty() {
        "course".to_string()
    } else {
        stem.to_string()
    }
}
