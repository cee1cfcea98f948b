use std::fmt;

use crate::data::model::TripDataset;

/// Total and average trip length, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationStats {
    pub total_secs: f64,
    pub mean_secs: f64,
}

impl DurationStats {
    pub fn compute(dataset: &TripDataset) -> Option<Self> {
        if dataset.is_empty() {
            return None;
        }
        let total_secs: f64 = dataset.trips.iter().map(|t| t.duration_secs).sum();
        Some(DurationStats {
            total_secs,
            mean_secs: total_secs / dataset.len() as f64,
        })
    }
}

/// A span split into whole hours, minutes and seconds (fractions dropped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    pub fn from_secs(secs: f64) -> Self {
        let whole = secs.max(0.0) as u64;
        Hms {
            hours: whole / 3600,
            minutes: whole % 3600 / 60,
            seconds: whole % 60,
        }
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hours, {} minutes and {} seconds",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl fmt::Display for DurationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total travel time was {}.", Hms::from_secs(self.total_secs))?;
        write!(f, "Average travel time was {}.", Hms::from_secs(self.mean_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{parse_timestamp, City, Trip};

    fn lasting(secs: f64) -> Trip {
        Trip {
            start_time: parse_timestamp("2017-01-01 00:00:00").unwrap(),
            end_time: None,
            duration_secs: secs,
            start_station: "A".into(),
            end_station: "B".into(),
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    #[test]
    fn hms_truncates_fractions() {
        assert_eq!(
            Hms::from_secs(3725.9),
            Hms {
                hours: 1,
                minutes: 2,
                seconds: 5
            }
        );
        assert_eq!(Hms::from_secs(59.99).to_string(), "0 hours, 0 minutes and 59 seconds");
        assert_eq!(Hms::from_secs(90_061.0).hours, 25);
    }

    #[test]
    fn total_and_mean() {
        let ds = TripDataset::new(
            City::Washington,
            vec![lasting(100.5), lasting(200.0), lasting(300.5)],
            [],
        );
        let stats = DurationStats::compute(&ds).unwrap();
        assert!((stats.total_secs - 601.0).abs() < 1e-9);
        assert!((stats.mean_secs - 601.0 / 3.0).abs() < 1e-9);

        let text = stats.to_string();
        assert!(text.contains("Total travel time was 0 hours, 10 minutes and 1 seconds."));
        assert!(text.contains("Average travel time was 0 hours, 3 minutes and 20 seconds."));
    }

    #[test]
    fn empty_table_has_no_stats() {
        let ds = TripDataset::new(City::Chicago, Vec::new(), []);
        assert_eq!(DurationStats::compute(&ds), None);
    }
}
