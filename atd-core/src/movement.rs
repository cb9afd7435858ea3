//! Movement type selection and the column pair it resolves to.

use crate::{error::InvalidFilterError, schema::ColumnPair};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which IFR movements to count.
///
/// The dashboard shows two switches, Arrival and Departure, both on by
/// default. Both switches on and both switches off each mean "show totals".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Movement {
    Arrival,
    Departure,
    #[default]
    Both,
}

impl Movement {
    /// Interpret the list of switch values sent by the UI.
    ///
    /// Exactly one of Arrival/Departure selects that movement. An empty list,
    /// both values, or an explicit "Both" resolves to [`Movement::Both`].
    pub fn from_selection<S: AsRef<str>>(values: &[S]) -> Result<Self, InvalidFilterError> {
        let mut arrival = false;
        let mut departure = false;
        for value in values {
            match value.as_ref().parse::<Movement>()? {
                Movement::Arrival => arrival = true,
                Movement::Departure => departure = true,
                Movement::Both => {
                    arrival = true;
                    departure = true;
                }
            }
        }
        Ok(match (arrival, departure) {
            (true, false) => Movement::Arrival,
            (false, true) => Movement::Departure,
            _ => Movement::Both,
        })
    }

    /// The (NM, airport) columns aggregated for this movement.
    pub fn columns(&self) -> ColumnPair {
        match self {
            Movement::Arrival => ColumnPair::ARRIVALS,
            Movement::Departure => ColumnPair::DEPARTURES,
            Movement::Both => ColumnPair::TOTAL,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Movement::Arrival => "Arrival",
            Movement::Departure => "Departure",
            Movement::Both => "Both",
        }
    }
}

/// Map a movement selection to the data-source columns to aggregate.
pub fn resolve_columns(movement: Movement) -> ColumnPair {
    movement.columns()
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Movement {
    type Err = InvalidFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrival" | "arrivals" | "arr" => Ok(Movement::Arrival),
            "departure" | "departures" | "dep" => Ok(Movement::Departure),
            "both" | "total" | "all" => Ok(Movement::Both),
            _ => Err(InvalidFilterError::UnknownMovement(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FlightColumn;

    #[test]
    fn test_single_switch_selects_movement() {
        assert_eq!(Movement::from_selection(&["Arrival"]).unwrap(), Movement::Arrival);
        assert_eq!(Movement::from_selection(&["Departure"]).unwrap(), Movement::Departure);
        assert_eq!(resolve_columns(Movement::Arrival), ColumnPair::ARRIVALS);
        assert_eq!(resolve_columns(Movement::Departure).nm, FlightColumn::NmDepartures);
        assert_eq!(
            resolve_columns(Movement::Departure).airport,
            FlightColumn::AirportDepartures
        );
    }

    #[test]
    fn test_empty_selection_equals_both() {
        let empty: [&str; 0] = [];
        let none = Movement::from_selection(&empty).unwrap();
        let both = Movement::from_selection(&["Arrival", "Departure"]).unwrap();
        assert_eq!(none, Movement::Both);
        assert_eq!(both, Movement::Both);
        assert_eq!(resolve_columns(none), resolve_columns(both));
        assert_eq!(resolve_columns(Movement::Both), ColumnPair::TOTAL);
        assert_eq!(Movement::default(), Movement::Both);
    }

    #[test]
    fn test_repeated_switch_value() {
        assert_eq!(
            Movement::from_selection(&["Arrival", "Arrival"]).unwrap(),
            Movement::Arrival
        );
    }

    #[test]
    fn test_unknown_movement_rejected() {
        assert_eq!(
            Movement::from_selection(&["Overflight"]),
            Err(InvalidFilterError::UnknownMovement("Overflight".to_string()))
        );
        assert!("dep".parse::<Movement>().is_ok());
        assert_eq!("TOTAL".parse::<Movement>().unwrap(), Movement::Both);
    }
}
