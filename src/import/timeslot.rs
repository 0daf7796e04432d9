//! Parser for the weekly timeslot descriptor, e.g. `"Thứ 5: 8-9,B108"`.

/// Day labels and their day codes. Matching is substring containment and
/// the first hit wins, so a label must never sit below a label it contains.
pub const DAY_TABLE: [(&str, i32); 7] = [
    ("Thứ 2", 1),
    ("Thứ 3", 2),
    ("Thứ 4", 3),
    ("Thứ 5", 4),
    ("Thứ 6", 5),
    ("Thứ 7", 6),
    ("Chủ Nhật", 7),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeslot {
    pub day: Option<i32>,
    pub startperiod: Option<i32>,
    pub endperiod: Option<i32>,
    pub room: String,
}

/// Best-effort parse of `"<day>: <start>-<end>,<room>"`.
///
/// Never fails: any part that cannot be understood is left unset.
pub fn parse_timeslot(descriptor: &str) -> Timeslot {
    let Some((day_part, rest)) = descriptor.split_once(':') else {
        return Timeslot::default();
    };

    let day = match_day(day_part);

    let (time_part, room) = match rest.split_once(',') {
        Some((time, room)) => (time, room.trim().to_string()),
        None => (rest, String::new()),
    };

    let (startperiod, endperiod) = match parse_period_range(time_part.trim()) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    Timeslot {
        day,
        startperiod,
        endperiod,
        room,
    }
}

pub fn match_day(day_part: &str) -> Option<i32> {
    DAY_TABLE
        .iter()
        .find(|(label, _)| day_part.contains(label))
        .map(|&(_, code)| code)
}

/// `"6-8"` -> `(6, 8)`. Both sides must parse or neither is used.
fn parse_period_range(time_part: &str) -> Option<(i32, i32)> {
    let (start, end) = time_part.split_once('-')?;
    let start = start.trim().parse().ok()?;
    let end = end.trim().parse().ok()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_descriptor() {
        assert_eq!(
            parse_timeslot("Thứ 5: 8-9,B108"),
            Timeslot {
                day: Some(4),
                startperiod: Some(8),
                endperiod: Some(9),
                room: "B108".to_string(),
            }
        );
    }

    #[test]
    fn every_day_label_maps_to_its_code() {
        for (label, code) in DAY_TABLE {
            let slot = parse_timeslot(&format!("{}: 1-2,A1", label));
            assert_eq!(slot.day, Some(code), "label {}", label);
        }
    }

    #[test]
    fn no_colon_leaves_everything_unset() {
        assert_eq!(parse_timeslot("NoColonHere"), Timeslot::default());
        assert_eq!(parse_timeslot(""), Timeslot::default());
    }

    #[test]
    fn unknown_day_keeps_time_and_room() {
        let slot = parse_timeslot("Monday: 1-3,C2");
        assert_eq!(slot.day, None);
        assert_eq!(slot.startperiod, Some(1));
        assert_eq!(slot.endperiod, Some(3));
        assert_eq!(slot.room, "C2");
    }

    #[test]
    fn missing_comma_means_no_room() {
        let slot = parse_timeslot("Thứ 2: 6-8");
        assert_eq!(slot.startperiod, Some(6));
        assert_eq!(slot.endperiod, Some(8));
        assert_eq!(slot.room, "");
    }

    #[test]
    fn malformed_range_unsets_both_periods() {
        for descriptor in ["Thứ 3: 6,P1", "Thứ 3: 6-x,P1", "Thứ 3: -8,P1", "Thứ 3: a-b,P1"] {
            let slot = parse_timeslot(descriptor);
            assert_eq!(slot.day, Some(2), "{}", descriptor);
            assert_eq!((slot.startperiod, slot.endperiod), (None, None), "{}", descriptor);
            assert_eq!(slot.room, "P1");
        }
    }

    #[test]
    fn room_keeps_later_commas() {
        let slot = parse_timeslot("Chủ Nhật:  10 - 12 , Hall A, wing 2 ");
        assert_eq!(slot.day, Some(7));
        assert_eq!(slot.startperiod, Some(10));
        assert_eq!(slot.endperiod, Some(12));
        assert_eq!(slot.room, "Hall A, wing 2");
    }

    #[test]
    fn reversed_range_is_kept_as_given() {
        let slot = parse_timeslot("Thứ 6: 9-3,D4");
        assert_eq!(slot.startperiod, Some(9));
        assert_eq!(slot.endperiod, Some(3));
    }
}
