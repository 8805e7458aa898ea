//! CSV import parsing.
//!
//! Each importable entity has a fixed set of required column headers. A file
//! missing any of them is rejected outright; individual rows with empty or
//! malformed required values are reported as [`RowError`]s so the valid rows
//! can still be imported.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::guard::validate_guard_type;
use crate::roles::{is_valid_role, ROLE_PROFESSOR};
use crate::schedule::{validate_weekday, TimeRange};
use crate::validation::validate_email;

/// Entity kinds accepted by `POST /api/import/csv?entity=...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportEntity {
    Professors,
    Students,
    Groups,
    Classrooms,
    Subjects,
    Schedules,
    Guards,
}

impl ImportEntity {
    pub const ALL: [ImportEntity; 7] = [
        ImportEntity::Professors,
        ImportEntity::Students,
        ImportEntity::Groups,
        ImportEntity::Classrooms,
        ImportEntity::Subjects,
        ImportEntity::Schedules,
        ImportEntity::Guards,
    ];

    pub fn required_headers(self) -> &'static [&'static str] {
        match self {
            ImportEntity::Professors => &["name", "surname", "email"],
            ImportEntity::Students => &["name", "surname"],
            ImportEntity::Groups => &["name"],
            ImportEntity::Classrooms => &["name"],
            ImportEntity::Subjects => &["code", "name"],
            ImportEntity::Schedules => &[
                "professor_email",
                "weekday",
                "start_time",
                "end_time",
                "subject_code",
            ],
            ImportEntity::Guards => &["date", "start_time", "end_time", "guard_type"],
        }
    }

    pub fn optional_headers(self) -> &'static [&'static str] {
        match self {
            ImportEntity::Professors => &["role"],
            ImportEntity::Students => &["email", "group"],
            ImportEntity::Groups => &["level"],
            ImportEntity::Classrooms => &["capacity", "building"],
            ImportEntity::Subjects => &[],
            ImportEntity::Schedules => &["group", "room"],
            ImportEntity::Guards => &["location", "notes"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessorRecord {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    /// Group name, resolved to an id by the caller.
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub name: String,
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassroomRecord {
    pub name: String,
    pub capacity: Option<i32>,
    pub building: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRecord {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    /// Professor email, resolved to an id by the caller.
    pub professor_email: String,
    pub weekday: i16,
    pub range: TimeRange,
    pub subject_code: String,
    pub group: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRecord {
    pub date: NaiveDate,
    pub range: TimeRange,
    pub guard_type: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRecord {
    Professor(ProfessorRecord),
    Student(StudentRecord),
    Group(GroupRecord),
    Classroom(ClassroomRecord),
    Subject(SubjectRecord),
    Schedule(ScheduleRecord),
    Guard(GuardRecord),
}

/// A row that could not be parsed or imported. `row` is the line number in
/// the file (the header is line 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: u64,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ParsedImport {
    pub entity: ImportEntity,
    /// Valid records paired with their line number.
    pub records: Vec<(u64, ImportRecord)>,
    pub errors: Vec<RowError>,
}

impl ParsedImport {
    pub fn total_rows(&self) -> usize {
        self.records.len() + self.errors.len()
    }
}

/// Parse `data` as a CSV file for `entity`.
///
/// Returns [`CoreError::Validation`] if the header line is unreadable or a
/// required column is missing.
pub fn parse_import(entity: ImportEntity, data: &[u8]) -> Result<ParsedImport, CoreError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| CoreError::validation(format!("Could not read CSV header: {e}")))?
        .clone();
    let index = header_index(&headers);

    let missing: Vec<&str> = entity
        .required_headers()
        .iter()
        .copied()
        .filter(|h| !index.contains_key(*h))
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::validation(format!(
            "Missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut parsed = ParsedImport {
        entity,
        records: Vec::new(),
        errors: Vec::new(),
    };

    for (i, result) in reader.records().enumerate() {
        // Fallback line number assumes one line per record.
        let fallback_line = i as u64 + 2;
        match result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |p| p.line());
                let row = Row {
                    record: &record,
                    index: &index,
                };
                match parse_row(entity, &row) {
                    Ok(rec) => parsed.records.push((line, rec)),
                    Err(message) => parsed.errors.push(RowError { row: line, message }),
                }
            }
            Err(e) => parsed.errors.push(RowError {
                row: e.position().map_or(fallback_line, |p| p.line()),
                message: format!("Malformed CSV row: {e}"),
            }),
        }
    }

    Ok(parsed)
}

fn header_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let normalized = h.trim_start_matches('\u{feff}').trim().to_lowercase();
            (normalized, i)
        })
        .collect()
}

struct Row<'a> {
    record: &'a StringRecord,
    index: &'a HashMap<String, usize>,
}

impl Row<'_> {
    fn optional(&self, header: &str) -> Option<String> {
        self.index
            .get(header)
            .and_then(|i| self.record.get(*i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn required(&self, header: &str) -> Result<String, String> {
        self.optional(header)
            .ok_or_else(|| format!("Missing value for required column '{header}'"))
    }
}

fn parse_row(entity: ImportEntity, row: &Row<'_>) -> Result<ImportRecord, String> {
    let record = match entity {
        ImportEntity::Professors => {
            let email = row.required("email")?.to_lowercase();
            validate_email(&email).map_err(|e| e.to_string())?;
            let role = row
                .optional("role")
                .map(|r| r.to_lowercase())
                .unwrap_or_else(|| ROLE_PROFESSOR.to_string());
            if !is_valid_role(&role) {
                return Err(format!("Unknown role '{role}'"));
            }
            ImportRecord::Professor(ProfessorRecord {
                name: row.required("name")?,
                surname: row.required("surname")?,
                email,
                role,
            })
        }
        ImportEntity::Students => {
            let email = row.optional("email").map(|e| e.to_lowercase());
            if let Some(email) = &email {
                validate_email(email).map_err(|e| e.to_string())?;
            }
            ImportRecord::Student(StudentRecord {
                name: row.required("name")?,
                surname: row.required("surname")?,
                email,
                group: row.optional("group"),
            })
        }
        ImportEntity::Groups => ImportRecord::Group(GroupRecord {
            name: row.required("name")?,
            level: row.optional("level"),
        }),
        ImportEntity::Classrooms => {
            let capacity = row
                .optional("capacity")
                .map(|c| {
                    c.parse::<i32>()
                        .ok()
                        .filter(|n| *n >= 0)
                        .ok_or_else(|| format!("Invalid capacity '{c}'"))
                })
                .transpose()?;
            ImportRecord::Classroom(ClassroomRecord {
                name: row.required("name")?,
                capacity,
                building: row.optional("building"),
            })
        }
        ImportEntity::Subjects => ImportRecord::Subject(SubjectRecord {
            code: row.required("code")?.to_uppercase(),
            name: row.required("name")?,
        }),
        ImportEntity::Schedules => {
            let weekday = parse_weekday(&row.required("weekday")?)?;
            let range = parse_range(&row.required("start_time")?, &row.required("end_time")?)?;
            ImportRecord::Schedule(ScheduleRecord {
                professor_email: row.required("professor_email")?.to_lowercase(),
                weekday,
                range,
                subject_code: row.required("subject_code")?.to_uppercase(),
                group: row.optional("group"),
                room: row.optional("room"),
            })
        }
        ImportEntity::Guards => {
            let date = parse_date(&row.required("date")?)?;
            let range = parse_range(&row.required("start_time")?, &row.required("end_time")?)?;
            let guard_type = row.required("guard_type")?.to_lowercase();
            validate_guard_type(&guard_type).map_err(|e| e.to_string())?;
            ImportRecord::Guard(GuardRecord {
                date,
                range,
                guard_type,
                location: row.optional("location"),
                notes: row.optional("notes"),
            })
        }
    };
    Ok(record)
}

/// Accepts ISO numbers (1 = Monday) and Catalan or English day names.
pub fn parse_weekday(value: &str) -> Result<i16, String> {
    let lower = value.trim().to_lowercase();
    let weekday = match lower.as_str() {
        "dilluns" | "monday" | "mon" | "dl" => 1,
        "dimarts" | "tuesday" | "tue" | "dt" => 2,
        "dimecres" | "wednesday" | "wed" | "dc" => 3,
        "dijous" | "thursday" | "thu" | "dj" => 4,
        "divendres" | "friday" | "fri" | "dv" => 5,
        other => other
            .parse::<i16>()
            .map_err(|_| format!("Invalid weekday '{value}'"))?,
    };
    validate_weekday(weekday).map_err(|e| e.to_string())?;
    Ok(weekday)
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let v = value.trim();
    NaiveTime::parse_from_str(v, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(v, "%H:%M:%S"))
        .map_err(|_| format!("Invalid time '{value}', expected HH:MM"))
}

/// Accepts `YYYY-MM-DD` and `DD/MM/YYYY`.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let v = value.trim();
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(v, "%d/%m/%Y"))
        .map_err(|_| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

fn parse_range(start: &str, end: &str) -> Result<TimeRange, String> {
    TimeRange::new(parse_time(start)?, parse_time(end)?).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn professors_import() {
        let csv = "name,surname,email,role\n\
                   Marta,Puig,Marta.Puig@escola.cat,coordinator\n\
                   Joan,Vila,joan.vila@escola.cat,\n";
        let parsed = parse_import(ImportEntity::Professors, csv.as_bytes()).unwrap();
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.records.len(), 2);
        assert_matches!(
            &parsed.records[0].1,
            ImportRecord::Professor(p) if p.email == "marta.puig@escola.cat" && p.role == "coordinator"
        );
        assert_matches!(
            &parsed.records[1].1,
            ImportRecord::Professor(p) if p.role == ROLE_PROFESSOR
        );
    }

    #[test]
    fn missing_required_header_rejects_file() {
        let csv = "name,email\nMarta,marta@escola.cat\n";
        let err = parse_import(ImportEntity::Professors, csv.as_bytes()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("surname"));
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_tolerant() {
        let csv = "\u{feff}Code , NAME\nmat,Matemàtiques\n";
        let parsed = parse_import(ImportEntity::Subjects, csv.as_bytes()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_matches!(&parsed.records[0].1, ImportRecord::Subject(s) if s.code == "MAT");
    }

    #[test]
    fn empty_required_value_reported_per_row() {
        let csv = "name,surname,email\n\
                   Marta,Puig,marta@escola.cat\n\
                   Joan,,joan@escola.cat\n\
                   Anna,Soler,not-an-email\n";
        let parsed = parse_import(ImportEntity::Professors, csv.as_bytes()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].row, 3);
        assert!(parsed.errors[0].message.contains("surname"));
        assert_eq!(parsed.errors[1].row, 4);
        assert_eq!(parsed.total_rows(), 3);
    }

    #[test]
    fn schedules_accept_day_names() {
        let csv = "professor_email,weekday,start_time,end_time,subject_code,group\n\
                   marta@escola.cat,dimarts,10:00,11:00,g,1r ESO A\n\
                   marta@escola.cat,3,08:00:00,09:00,mat,\n";
        let parsed = parse_import(ImportEntity::Schedules, csv.as_bytes()).unwrap();
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_matches!(
            &parsed.records[0].1,
            ImportRecord::Schedule(s) if s.weekday == 2 && s.subject_code == "G" && s.group.as_deref() == Some("1r ESO A")
        );
        assert_matches!(&parsed.records[1].1, ImportRecord::Schedule(s) if s.weekday == 3 && s.group.is_none());
    }

    #[test]
    fn schedule_rejects_weekend_and_inverted_hours() {
        let csv = "professor_email,weekday,start_time,end_time,subject_code\n\
                   marta@escola.cat,6,10:00,11:00,MAT\n\
                   marta@escola.cat,1,11:00,10:00,MAT\n";
        let parsed = parse_import(ImportEntity::Schedules, csv.as_bytes()).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.errors.len(), 2);
    }

    #[test]
    fn guards_accept_both_date_formats() {
        let csv = "date,start_time,end_time,guard_type,location\n\
                   2025-03-10,11:00,11:30,pati,Pati nord\n\
                   11/03/2025,11:00,11:30,Biblioteca,\n\
                   2025-03-12,11:00,11:30,gimnas,\n";
        let parsed = parse_import(ImportEntity::Guards, csv.as_bytes()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_matches!(
            &parsed.records[1].1,
            ImportRecord::Guard(g) if g.date == NaiveDate::from_ymd_opt(2025, 3, 11).unwrap() && g.guard_type == "biblioteca"
        );
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].message.contains("gimnas"));
    }

    #[test]
    fn classroom_capacity_must_be_a_number() {
        let csv = "name,capacity\nA1,30\nA2,molts\nA3,\n";
        let parsed = parse_import(ImportEntity::Classrooms, csv.as_bytes()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_matches!(&parsed.records[1].1, ImportRecord::Classroom(c) if c.capacity.is_none());
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let parsed = parse_import(ImportEntity::Groups, b"name,level\n").unwrap();
        assert_eq!(parsed.total_rows(), 0);
    }
}
