use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A performance. Shows are fixed by configuration, never created or
/// destroyed at runtime; every show reuses the same house geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
}

impl Show {
    /// Human form, as printed on tickets and payment line items.
    pub fn label(&self) -> String {
        format!("{} - {}", self.title, self.date.format("%d/%m/%Y %H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_show_label() {
        let show = Show {
            id: "SHOW_1".to_string(),
            title: "La Nuit des Etoiles".to_string(),
            date: Utc.with_ymd_and_hms(2026, 9, 18, 20, 30, 0).unwrap(),
        };
        assert_eq!(show.label(), "La Nuit des Etoiles - 18/09/2026 20:30");
    }
}
