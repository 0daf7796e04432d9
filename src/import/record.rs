use rand::Rng;
use thiserror::Error;

use crate::import::timeslot::parse_timeslot;
use crate::import::tokenizer::LineFields;
use crate::models::NewSubject;

pub const DEFAULT_CREDITS: i32 = 3;

pub const COLOR_PALETTE: [&str; 10] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6",
    "#1abc9c", "#34495e", "#e67e22", "#95a5a6", "#f1c40f",
];

// Column widths of the subjects table.
const MAX_CODE_LEN: usize = 20;
const MAX_NAME_LEN: usize = 200;
const MAX_PROFESSOR_LEN: usize = 100;
const MAX_ROOM_LEN: usize = 50;
const MAX_WEEKS_LEN: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("subject code is empty")]
    EmptyCode,

    #[error("{field} is {len} characters long, limit is {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Credits are taken only from a plain run of ASCII digits. Signs, decimals,
/// blanks and values that overflow fall back to [`DEFAULT_CREDITS`].
pub fn parse_credits(raw: &str) -> i32 {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_CREDITS;
    }
    raw.parse().unwrap_or(DEFAULT_CREDITS)
}

pub fn pick_color<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    COLOR_PALETTE[rng.gen_range(0..COLOR_PALETTE.len())]
}

/// Builds a complete subject from one tokenized line.
pub fn build_subject<R: Rng + ?Sized>(
    fields: &LineFields<'_>,
    semester: &str,
    rng: &mut R,
) -> Result<NewSubject, RecordError> {
    let slot = parse_timeslot(fields.timeslot);

    if let (Some(start), Some(end)) = (slot.startperiod, slot.endperiod) {
        if start > end {
            tracing::debug!("{}: start period {} is after end period {}", fields.code, start, end);
        }
    }

    let subject = NewSubject {
        code: fields.code.to_string(),
        name: fields.name.to_string(),
        credits: parse_credits(fields.credits),
        professor: fields.professor.to_string(),
        startperiod: slot.startperiod,
        endperiod: slot.endperiod,
        day: slot.day,
        room: slot.room,
        color: pick_color(rng).to_string(),
        semester: semester.to_string(),
        weeks: fields.weeks.to_string(),
    };

    validate(&subject)?;
    Ok(subject)
}

/// Rejects an empty code and fields wider than their column. Unlike the
/// earlier importer, a line with an empty code is an error, not a subject.
fn validate(subject: &NewSubject) -> Result<(), RecordError> {
    if subject.code.is_empty() {
        return Err(RecordError::EmptyCode);
    }

    let limits = [
        ("code", subject.code.as_str(), MAX_CODE_LEN),
        ("name", subject.name.as_str(), MAX_NAME_LEN),
        ("professor", subject.professor.as_str(), MAX_PROFESSOR_LEN),
        ("room", subject.room.as_str(), MAX_ROOM_LEN),
        ("weeks", subject.weeks.as_str(), MAX_WEEKS_LEN),
    ];
    for (field, value, max) in limits {
        let len = value.chars().count();
        if len > max {
            return Err(RecordError::TooLong { field, len, max });
        }
    }

    Ok(())
}
