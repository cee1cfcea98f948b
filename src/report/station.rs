use std::fmt;

use super::mode;
use crate::data::model::TripDataset;

/// Most popular stations and start/end combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: String,
    pub end_station: String,
    pub route: (String, String),
}

impl StationStats {
    pub fn compute(dataset: &TripDataset) -> Option<Self> {
        let trips = &dataset.trips;
        let start = mode(trips.iter().map(|t| t.start_station.as_str()))?;
        let end = mode(trips.iter().map(|t| t.end_station.as_str()))?;
        let (from, to) = mode(
            trips
                .iter()
                .map(|t| (t.start_station.as_str(), t.end_station.as_str())),
        )?;

        Some(StationStats {
            start_station: start.to_string(),
            end_station: end.to_string(),
            route: (from.to_string(), to.to_string()),
        })
    }
}

impl fmt::Display for StationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The most common Start Station is {}.", self.start_station)?;
        writeln!(f, "The most common End Station is {}.", self.end_station)?;
        write!(
            f,
            "The most common Start End combination is {} and {}.",
            self.route.0, self.route.1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{parse_timestamp, City, Trip};

    fn ride(from: &str, to: &str) -> Trip {
        Trip {
            start_time: parse_timestamp("2017-01-01 00:00:00").unwrap(),
            end_time: None,
            duration_secs: 1.0,
            start_station: from.into(),
            end_station: to.into(),
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    #[test]
    fn reports_top_stations_and_route() {
        let trips = vec![
            ride("Lake", "Pier"),
            ride("Lake", "Pier"),
            ride("Lake", "Zoo"),
            ride("Loop", "Park"),
            ride("Loop", "Park"),
            ride("Loop", "Park"),
            ride("Lake", "Pier"),
            ride("Lake", "Pier"),
            ride("Museum", "Pier"),
        ];
        let ds = TripDataset::new(City::Washington, trips, []);
        let stats = StationStats::compute(&ds).unwrap();
        assert_eq!(stats.start_station, "Lake");
        assert_eq!(stats.end_station, "Pier");
        assert_eq!(stats.route, ("Lake".to_string(), "Pier".to_string()));

        let text = stats.to_string();
        assert!(text.contains("combination is Lake and Pier."));
    }

    #[test]
    fn combination_can_differ_from_top_stations() {
        let trips = vec![
            ride("A", "X"),
            ride("A", "Y"),
            ride("A", "Z"),
            ride("B", "W"),
            ride("B", "W"),
            ride("C", "X"),
        ];
        let ds = TripDataset::new(City::Chicago, trips, []);
        let stats = StationStats::compute(&ds).unwrap();
        assert_eq!(stats.start_station, "A");
        assert_eq!(stats.end_station, "W");
        assert_eq!(stats.route, ("B".to_string(), "W".to_string()));
    }

    #[test]
    fn empty_table_has_no_stats() {
        let ds = TripDataset::new(City::Chicago, Vec::new(), []);
        assert!(StationStats::compute(&ds).is_none());
    }
}
