//! Contact record builder
//!
//! Produces a vCard 3.0 block from an [`Employee`]. Output is a pure function
//! of the input: same employee, same bytes.

use crate::Employee;

/// Separator between designation, faculty and school on the TITLE line
pub const TITLE_SEPARATOR: &str = " | ";

/// Structured name as written on the `N:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub given: String,
    pub family: String,
}

/// Split a display name into given and family parts
///
/// The last space-separated token is the family name and everything before it
/// is the given name. A single token is all given name.
pub fn split_name(name: &str) -> NameParts {
    match name.rsplit_once(' ') {
        Some((given, family)) => NameParts {
            given: given.to_string(),
            family: family.to_string(),
        },
        None => NameParts {
            given: name.to_string(),
            family: String::new(),
        },
    }
}

/// Non-empty designation, faculty and school joined by `" | "`
pub fn title_line(employee: &Employee) -> String {
    [&employee.designation, &employee.faculty, &employee.school]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(TITLE_SEPARATOR)
}

/// Build the contact record for an employee
///
/// Missing fields render as empty values, never as placeholders.
pub fn build(employee: &Employee) -> String {
    let NameParts { given, family } = split_name(&employee.name);

    [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{};{};;;", family, given),
        format!("FN:{}", employee.name),
        format!("TITLE:{}", title_line(employee)),
        format!("EMAIL:{}", employee.email),
        format!("TEL;TYPE=CELL:{}", employee.mobile.as_deref().unwrap_or("")),
        "END:VCARD".to_string(),
    ]
    .join("\n")
}

/// Archive/download-safe form of a display name (spaces and slashes to `_`)
pub fn safe_name(name: &str) -> String {
    name.replace([' ', '/'], "_")
}

/// Standard fields read back out of a contact record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedContact {
    pub family: String,
    pub given: String,
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
}

/// Parse the fields [`build`] writes
///
/// Returns `None` when the text is not wrapped in BEGIN/END:VCARD.
pub fn parse(record: &str) -> Option<ParsedContact> {
    let mut lines = record.lines();
    if lines.next()? != "BEGIN:VCARD" {
        return None;
    }

    let mut parsed = ParsedContact::default();
    let mut closed = false;

    for line in lines {
        if line == "END:VCARD" {
            closed = true;
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key {
            "N" => {
                let mut parts = value.split(';');
                parsed.family = parts.next().unwrap_or_default().to_string();
                parsed.given = parts.next().unwrap_or_default().to_string();
            }
            "FN" => parsed.full_name = value.to_string(),
            "TITLE" => parsed.title = value.to_string(),
            "EMAIL" => parsed.email = value.to_string(),
            k if k.starts_with("TEL") => parsed.phone = value.to_string(),
            _ => {}
        }
    }

    closed.then_some(parsed)
}
