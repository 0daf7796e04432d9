/// Field separator of the import format. Backticks never occur in the
/// subject names or room labels of the source data.
pub const DELIMITER: char = '`';

/// Number of positional fields a subject line must carry.
pub const FIELD_COUNT: usize = 6;

/// The six positional fields of one subject line, each trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFields<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub credits: &'a str,
    pub professor: &'a str,
    pub timeslot: &'a str,
    pub weeks: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tokenized<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// Fewer than [`FIELD_COUNT`] fields.
    Malformed { fields: usize },
    Fields(LineFields<'a>),
}

/// Splits file contents into lines, ending a line at `\r\n`, `\r` or `\n`.
/// A terminator at the very end does not start an extra empty line.
pub fn split_lines(contents: &str) -> Vec<&str> {
    if contents.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<&str> = contents
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\r', '\n']))
        .collect();
    if contents.ends_with(['\r', '\n']) {
        lines.pop();
    }
    lines
}

/// Splits one raw line into its positional fields.
///
/// Anything after the sixth field is ignored.
pub fn tokenize(line: &str) -> Tokenized<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Tokenized::Blank;
    }

    let parts: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if parts.len() < FIELD_COUNT {
        return Tokenized::Malformed { fields: parts.len() };
    }

    Tokenized::Fields(LineFields {
        code: parts[0],
        name: parts[1],
        credits: parts[2],
        professor: parts[3],
        timeslot: parts[4],
        weeks: parts[5],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_six_fields_and_trims_them() {
        let tokens = tokenize("  CS101 ` Intro to CS`3`Dr. Nguyen`Thứ 2: 6-8,P1`1-16 \r\n");

        assert_eq!(
            tokens,
            Tokenized::Fields(LineFields {
                code: "CS101",
                name: "Intro to CS",
                credits: "3",
                professor: "Dr. Nguyen",
                timeslot: "Thứ 2: 6-8,P1",
                weeks: "1-16",
            })
        );
    }

    #[test]
    fn split_lines_accepts_every_line_ending() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\rb\r"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\n\r\nb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\n\rb"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn blank_lines_are_not_malformed() {
        assert_eq!(tokenize(""), Tokenized::Blank);
        assert_eq!(tokenize(" \t "), Tokenized::Blank);
    }

    #[test]
    fn short_lines_are_malformed() {
        assert_eq!(
            tokenize("CS101`Intro`3`Dr. X`Thứ 2: 1-2,A1"),
            Tokenized::Malformed { fields: 5 }
        );
        assert_eq!(tokenize("just some text"), Tokenized::Malformed { fields: 1 });
    }

    #[test]
    fn extra_fields_are_dropped() {
        match tokenize("A`B`3`C`D`1-16`extra`more") {
            Tokenized::Fields(fields) => assert_eq!(fields.weeks, "1-16"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_fields_still_count() {
        match tokenize("A`````") {
            Tokenized::Fields(fields) => {
                assert_eq!(fields.code, "A");
                assert_eq!(fields.name, "");
                assert_eq!(fields.weeks, "");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
