use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionKind {
    Orchestra,
    FirstGallery,
    SecondGallery,
    ThirdGallery,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Orchestra => "ORCHESTRA",
            SectionKind::FirstGallery => "FIRST_GALLERY",
            SectionKind::SecondGallery => "SECOND_GALLERY",
            SectionKind::ThirdGallery => "THIRD_GALLERY",
        }
    }

    /// Display title, as printed on tickets.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Orchestra => "Orchestre",
            SectionKind::FirstGallery => "Première galerie",
            SectionKind::SecondGallery => "Deuxième galerie",
            SectionKind::ThirdGallery => "Troisième galerie",
        }
    }
}

/// Static attributes a seat carries in the seating plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeatAttributes {
    pub is_bis: bool,
    pub is_security: bool,
    pub has_restricted_view: bool,
    pub is_wheelchair_accessible: bool,
}

impl SeatAttributes {
    pub const NONE: Self = Self {
        is_bis: false,
        is_security: false,
        has_restricted_view: false,
        is_wheelchair_accessible: false,
    };

    pub const RESTRICTED_VIEW: Self = Self {
        is_bis: false,
        is_security: false,
        has_restricted_view: true,
        is_wheelchair_accessible: false,
    };

    pub const WHEELCHAIR: Self = Self {
        is_bis: false,
        is_security: false,
        has_restricted_view: false,
        is_wheelchair_accessible: true,
    };

    /// Kept clear for evacuation; never sellable to customers.
    pub const SECURITY: Self = Self {
        is_bis: false,
        is_security: true,
        has_restricted_view: false,
        is_wheelchair_accessible: false,
    };
}

/// One physical seat of the venue. The geometry is shared by every show;
/// a seat only becomes show-scoped when paired with a show id in a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seat {
    /// Deterministic identity, `SECTION|ROW|NUM` plus `|bis` for fold-out
    /// seats. Stable across runs by construction.
    pub id: String,
    pub num: u32,
    pub row: String,
    pub section: SectionKind,
    pub is_bis: bool,
    pub is_security: bool,
    pub has_restricted_view: bool,
    pub is_wheelchair_accessible: bool,
}

impl Seat {
    pub fn compose_id(section: SectionKind, row: &str, num: u32, is_bis: bool) -> String {
        if is_bis {
            format!("{}|{}|{}|bis", section.as_str(), row, num)
        } else {
            format!("{}|{}|{}", section.as_str(), row, num)
        }
    }

    /// Human form, e.g. `C12` or `C12 bis`.
    pub fn label(&self) -> String {
        if self.is_bis {
            format!("{}{} bis", self.row, self.num)
        } else {
            format!("{}{}", self.row, self.num)
        }
    }
}
