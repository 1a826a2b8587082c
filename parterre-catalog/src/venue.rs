//! Grand Théâtre seating plan. Row data mirrors the house's numbering
//! sheets: even numbers descend house-left, odd ascend house-right, with an
//! alternating centre block and `bis` fold-outs at block edges. Security
//! seats sit behind the third-gallery balustrade and are never sold.

use crate::plan::{
    add_bis_at_end, add_bis_at_start, alternate_seats, row, seat, section, seats_decreasing,
    seats_increasing, RowPlan, SeatSpec, SectionPlan,
};
use crate::seat::{SeatAttributes, SectionKind};

const NONE: SeatAttributes = SeatAttributes::NONE;
const RESTRICTED: SeatAttributes = SeatAttributes::RESTRICTED_VIEW;
const SECURITY: SeatAttributes = SeatAttributes::SECURITY;

fn orchestra_row_with_bis(
    letter: &'static str,
    before: Vec<SeatSpec>,
    after: Vec<SeatSpec>,
) -> RowPlan {
    row(
        letter,
        vec![
            before,
            add_bis_at_start(add_bis_at_end(alternate_seats(13), NONE), NONE),
            after,
        ],
    )
}

fn orchestra_row_without_bis(
    letter: &'static str,
    before: Vec<SeatSpec>,
    after: Vec<SeatSpec>,
) -> RowPlan {
    row(letter, vec![before, alternate_seats(14), after])
}

fn orchestra() -> SectionPlan {
    // Front row E keeps its aisle ends clear for wheelchair positions.
    let mut row_e_centre = alternate_seats(14);
    for spec in row_e_centre.iter_mut() {
        if spec.num >= 13 {
            spec.attrs.is_wheelchair_accessible = true;
        }
    }

    section(
        SectionKind::Orchestra,
        vec![
            row(
                "Q",
                vec![add_bis_at_start(
                    add_bis_at_end(alternate_seats(10), NONE),
                    NONE,
                )],
            ),
            row("P", vec![alternate_seats(13)]),
            row(
                "O",
                vec![alternate_seats(13)
                    .into_iter()
                    .filter(|spec| spec.num != 12)
                    .collect()],
            ),
            orchestra_row_with_bis(
                "N",
                seats_decreasing(22, 16, NONE),
                seats_increasing(15, 21, NONE),
            ),
            orchestra_row_without_bis(
                "M",
                add_bis_at_end(seats_decreasing(26, 16, NONE), NONE),
                add_bis_at_start(seats_increasing(15, 25, NONE), NONE),
            ),
            orchestra_row_with_bis(
                "L",
                add_bis_at_end(seats_decreasing(26, 16, NONE), NONE),
                add_bis_at_start(seats_increasing(15, 25, NONE), NONE),
            ),
            orchestra_row_without_bis(
                "K",
                add_bis_at_end(seats_decreasing(26, 16, NONE), NONE),
                add_bis_at_start(seats_increasing(15, 25, NONE), NONE),
            ),
            orchestra_row_with_bis(
                "J",
                add_bis_at_end(seats_decreasing(26, 16, NONE), NONE),
                add_bis_at_start(seats_increasing(15, 25, NONE), NONE),
            ),
            orchestra_row_without_bis(
                "I",
                add_bis_at_end(seats_decreasing(24, 16, NONE), NONE),
                add_bis_at_start(seats_increasing(15, 23, NONE), NONE),
            ),
            orchestra_row_with_bis(
                "H",
                add_bis_at_end(seats_decreasing(22, 16, NONE), NONE),
                add_bis_at_start(seats_increasing(15, 21, NONE), NONE),
            ),
            orchestra_row_without_bis(
                "G",
                add_bis_at_end(seats_decreasing(20, 16, NONE), NONE),
                add_bis_at_start(seats_increasing(15, 19, NONE), NONE),
            ),
            orchestra_row_with_bis(
                "F",
                add_bis_at_start(seats_decreasing(18, 16, NONE), NONE),
                add_bis_at_end(seats_increasing(15, 17, NONE), NONE),
            ),
            RowPlan {
                letter: "E",
                seats: row_e_centre,
            },
        ],
    )
}

fn first_gallery() -> SectionPlan {
    section(
        SectionKind::FirstGallery,
        vec![
            row(
                "D",
                vec![
                    seats_decreasing(32, 28, NONE),
                    seats_decreasing(26, 22, NONE),
                    seats_decreasing(20, 18, NONE),
                    vec![seat(16)],
                    add_bis_at_start(add_bis_at_end(alternate_seats(14), NONE), NONE),
                    vec![seat(15)],
                    seats_increasing(17, 19, NONE),
                    seats_increasing(21, 25, NONE),
                    seats_increasing(27, 31, NONE),
                ],
            ),
            row(
                "C",
                vec![
                    seats_decreasing(36, 18, NONE),
                    add_bis_at_end(vec![seat(16)], NONE),
                    add_bis_at_start(add_bis_at_end(alternate_seats(12), NONE), NONE),
                    add_bis_at_start(vec![seat(15)], NONE),
                    add_bis_at_end(seats_increasing(17, 35, NONE), NONE),
                ],
            ),
            row(
                "B",
                vec![
                    seats_decreasing(38, 18, NONE),
                    add_bis_at_end(vec![seat(16)], NONE),
                    alternate_seats(11),
                    add_bis_at_start(vec![seat(15)], NONE),
                    seats_increasing(17, 37, NONE),
                ],
            ),
            row(
                "A",
                vec![
                    add_bis_at_start(seats_decreasing(40, 38, RESTRICTED), RESTRICTED),
                    seats_decreasing(36, 16, NONE),
                    alternate_seats(11),
                    seats_increasing(15, 35, NONE),
                    add_bis_at_end(seats_increasing(37, 39, RESTRICTED), RESTRICTED),
                ],
            ),
        ],
    )
}

fn second_gallery() -> SectionPlan {
    section(
        SectionKind::SecondGallery,
        vec![
            row(
                "C",
                vec![
                    seats_decreasing(24, 22, NONE),
                    seats_decreasing(20, 18, NONE),
                    vec![seat(16)],
                    alternate_seats(14),
                    vec![seat(15)],
                    seats_increasing(17, 19, NONE),
                    seats_increasing(21, 23, NONE),
                ],
            ),
            row(
                "B",
                vec![
                    seats_decreasing(38, 16, NONE),
                    alternate_seats(13),
                    seats_increasing(15, 37, NONE),
                ],
            ),
            row(
                "A",
                vec![
                    seats_decreasing(42, 38, RESTRICTED),
                    seats_decreasing(36, 20, NONE),
                    seats_decreasing(18, 16, NONE),
                    alternate_seats(13),
                    seats_increasing(15, 17, NONE),
                    seats_increasing(19, 35, NONE),
                    seats_increasing(37, 41, RESTRICTED),
                ],
            ),
        ],
    )
}

fn third_gallery() -> SectionPlan {
    section(
        SectionKind::ThirdGallery,
        vec![
            row(
                "F",
                vec![
                    seats_decreasing(24, 18, NONE),
                    seats_decreasing(16, 8, NONE),
                    seats_increasing(9, 17, NONE),
                    seats_increasing(19, 25, NONE),
                ],
            ),
            row(
                "E",
                vec![
                    seats_decreasing(26, 18, NONE),
                    seats_decreasing(16, 8, NONE),
                    seats_increasing(9, 17, NONE),
                    seats_increasing(19, 27, NONE),
                ],
            ),
            row(
                "D",
                vec![
                    seats_decreasing(30, 18, NONE),
                    seats_decreasing(16, 8, NONE),
                    seats_increasing(9, 17, NONE),
                    seats_increasing(19, 31, NONE),
                ],
            ),
            row(
                "C",
                vec![
                    seats_decreasing(34, 18, NONE),
                    seats_decreasing(16, 6, NONE),
                    alternate_seats(5),
                    seats_increasing(7, 17, NONE),
                    seats_increasing(19, 35, NONE),
                ],
            ),
            row(
                "B",
                vec![
                    seats_decreasing(38, 18, RESTRICTED),
                    alternate_seats(14),
                    seats_increasing(19, 39, RESTRICTED),
                ],
            ),
            row(
                "A",
                vec![
                    seats_decreasing(40, 36, SECURITY),
                    seats_decreasing(34, 18, NONE),
                    alternate_seats(12),
                    seats_increasing(19, 35, NONE),
                    seats_increasing(37, 41, SECURITY),
                ],
            ),
        ],
    )
}

/// The full house, orchestra to third gallery.
pub fn grand_theatre_sections() -> Vec<SectionPlan> {
    vec![
        orchestra(),
        first_gallery(),
        second_gallery(),
        third_gallery(),
    ]
}
