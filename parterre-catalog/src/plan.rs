//! Seating-plan generator. The helpers encode how French theatre rows are
//! numbered (even seats descending house-left, odd ascending house-right,
//! alternating numbers in centre blocks, `bis` fold-outs at block edges),
//! so which seats exist is derived, never hand-listed.

use crate::seat::{Seat, SeatAttributes, SectionKind};

/// A seat before it is assigned a row and section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatSpec {
    pub num: u32,
    pub attrs: SeatAttributes,
}

pub fn seat(num: u32) -> SeatSpec {
    SeatSpec {
        num,
        attrs: SeatAttributes::NONE,
    }
}

pub fn seat_with(num: u32, attrs: SeatAttributes) -> SeatSpec {
    SeatSpec { num, attrs }
}

/// Centre-block numbering: starts at the highest even number, walks down to
/// 1, then back up the odd side. `alternate_nums(5)` is `4, 2, 1, 3, 5`.
pub fn alternate_nums(num_seats: u32) -> Vec<u32> {
    let mut nums = Vec::with_capacity(num_seats as usize);
    let mut current = if num_seats % 2 == 0 {
        num_seats as i64
    } else {
        num_seats as i64 - 1
    };

    let mut delta = -2;
    for _ in 0..num_seats {
        nums.push(current as u32);
        current += delta;
        if current <= 0 {
            current = 1;
            delta = 2;
        }
    }
    nums
}

pub fn nums_decreasing(from: u32, min: u32) -> Vec<u32> {
    let mut nums = Vec::new();
    let mut i = from as i64;
    while i >= min as i64 {
        nums.push(i as u32);
        i -= 2;
    }
    nums
}

pub fn nums_increasing(from: u32, max: u32) -> Vec<u32> {
    let mut nums = Vec::new();
    let mut i = from;
    while i <= max {
        nums.push(i);
        i += 2;
    }
    nums
}

pub fn alternate_seats(num_seats: u32) -> Vec<SeatSpec> {
    alternate_nums(num_seats).into_iter().map(seat).collect()
}

pub fn seats_decreasing(from: u32, min: u32, attrs: SeatAttributes) -> Vec<SeatSpec> {
    nums_decreasing(from, min)
        .into_iter()
        .map(|num| seat_with(num, attrs))
        .collect()
}

pub fn seats_increasing(from: u32, max: u32, attrs: SeatAttributes) -> Vec<SeatSpec> {
    nums_increasing(from, max)
        .into_iter()
        .map(|num| seat_with(num, attrs))
        .collect()
}

/// Prepends a `bis` fold-out reusing the first seat's number.
pub fn add_bis_at_start(mut seats: Vec<SeatSpec>, attrs: SeatAttributes) -> Vec<SeatSpec> {
    let num = seats.first().map(|s| s.num).unwrap_or(1);
    let bis = SeatSpec {
        num,
        attrs: SeatAttributes {
            is_bis: true,
            ..attrs
        },
    };
    seats.insert(0, bis);
    seats
}

/// Appends a `bis` fold-out reusing the last seat's number.
pub fn add_bis_at_end(mut seats: Vec<SeatSpec>, attrs: SeatAttributes) -> Vec<SeatSpec> {
    let num = seats.last().map(|s| s.num).unwrap_or(1);
    seats.push(SeatSpec {
        num,
        attrs: SeatAttributes {
            is_bis: true,
            ..attrs
        },
    });
    seats
}

#[derive(Debug, Clone)]
pub struct RowPlan {
    pub letter: &'static str,
    pub seats: Vec<SeatSpec>,
}

/// A row assembled from seat groups, house-left to house-right.
pub fn row(letter: &'static str, groups: Vec<Vec<SeatSpec>>) -> RowPlan {
    RowPlan {
        letter,
        seats: groups.into_iter().flatten().collect(),
    }
}

#[derive(Debug, Clone)]
pub struct SectionPlan {
    pub kind: SectionKind,
    pub rows: Vec<RowPlan>,
}

pub fn section(kind: SectionKind, rows: Vec<RowPlan>) -> SectionPlan {
    SectionPlan { kind, rows }
}

impl SectionPlan {
    /// Materializes the section into identified seats, row by row.
    pub fn seats(&self) -> Vec<Seat> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.seats.iter().map(|spec| Seat {
                    id: Seat::compose_id(self.kind, row.letter, spec.num, spec.attrs.is_bis),
                    num: spec.num,
                    row: row.letter.to_string(),
                    section: self.kind,
                    is_bis: spec.attrs.is_bis,
                    is_security: spec.attrs.is_security,
                    has_restricted_view: spec.attrs.has_restricted_view,
                    is_wheelchair_accessible: spec.attrs.is_wheelchair_accessible,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternate_nums() {
        assert_eq!(alternate_nums(5), vec![4, 2, 1, 3, 5]);
        assert_eq!(alternate_nums(6), vec![6, 4, 2, 1, 3, 5]);
        assert_eq!(
            alternate_nums(13),
            vec![12, 10, 8, 6, 4, 2, 1, 3, 5, 7, 9, 11, 13]
        );
    }

    #[test]
    fn test_directional_nums() {
        assert_eq!(nums_decreasing(24, 18), vec![24, 22, 20, 18]);
        assert_eq!(nums_increasing(19, 25), vec![19, 21, 23, 25]);
        // min above start yields nothing
        assert!(nums_decreasing(4, 6).is_empty());
    }

    #[test]
    fn test_bis_seats_reuse_edge_numbers() {
        let seats = add_bis_at_start(
            add_bis_at_end(alternate_seats(4), SeatAttributes::NONE),
            SeatAttributes::NONE,
        );
        // alternate(4) = 4,2,1,3 -> bis 4 at start, bis 3 at end
        assert_eq!(seats.first().map(|s| (s.num, s.attrs.is_bis)), Some((4, true)));
        assert_eq!(seats.last().map(|s| (s.num, s.attrs.is_bis)), Some((3, true)));
        assert_eq!(seats.len(), 6);
    }

    #[test]
    fn test_section_materialization() {
        let plan = section(
            SectionKind::Orchestra,
            vec![row("C", vec![seats_decreasing(14, 12, SeatAttributes::NONE)])],
        );
        let seats = plan.seats();
        assert_eq!(seats.len(), 2);
        assert_eq!(seats[0].id, "ORCHESTRA|C|14");
        assert_eq!(seats[1].id, "ORCHESTRA|C|12");
        assert_eq!(seats[0].row, "C");
    }
}
