use std::collections::HashMap;

use crate::plan::SectionPlan;
use crate::seat::Seat;
use crate::show::Show;

/// Read-only view over shows and the house geometry. Built once at startup
/// and shared by reference; the only failure mode is not-found.
pub struct Catalog {
    shows: Vec<Show>,
    show_index: HashMap<String, usize>,
    seats: Vec<Seat>,
    seat_index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(shows: Vec<Show>, sections: &[SectionPlan]) -> Self {
        let seats: Vec<Seat> = sections.iter().flat_map(|plan| plan.seats()).collect();

        let show_index = shows
            .iter()
            .enumerate()
            .map(|(i, show)| (show.id.clone(), i))
            .collect();
        let seat_index = seats
            .iter()
            .enumerate()
            .map(|(i, seat)| (seat.id.clone(), i))
            .collect();

        Self {
            shows,
            show_index,
            seats,
            seat_index,
        }
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn show(&self, show_id: &str) -> Result<&Show, CatalogError> {
        self.show_index
            .get(show_id)
            .map(|&i| &self.shows[i])
            .ok_or_else(|| CatalogError::ShowNotFound(show_id.to_string()))
    }

    /// The seat inventory of a show, in deterministic house order. The
    /// geometry is shared, so only the show id needs validating.
    pub fn list_seats(&self, show_id: &str) -> Result<&[Seat], CatalogError> {
        self.show(show_id)?;
        Ok(&self.seats)
    }

    pub fn seat(&self, seat_id: &str) -> Result<&Seat, CatalogError> {
        self.seat_index
            .get(seat_id)
            .map(|&i| &self.seats[i])
            .ok_or_else(|| CatalogError::SeatNotFound(seat_id.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("show not found: {0}")]
    ShowNotFound(String),

    #[error("seat not found: {0}")]
    SeatNotFound(String),
}
