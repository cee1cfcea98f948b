use std::fmt;

use super::mode;
use crate::data::model::{Day, Month, Trip, TripDataset};

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub month: Month,
    pub day: Day,
    pub hour: u32,
}

impl TimeStats {
    pub fn compute(dataset: &TripDataset) -> Option<Self> {
        let trips = &dataset.trips;
        Some(TimeStats {
            month: mode(trips.iter().map(Trip::month))?,
            day: mode(trips.iter().map(Trip::day))?,
            hour: mode(trips.iter().map(Trip::hour))?,
        })
    }
}

impl fmt::Display for TimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The most common month is {}.", self.month)?;
        writeln!(f, "The most common day of the week is {}.", self.day)?;
        write!(f, "The most common start hour is {}:00.", self.hour)
    }
}
