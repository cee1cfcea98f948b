use super::model::{Day, Month, Selection, Trip, TripDataset};

// ---------------------------------------------------------------------------
// Filter predicate: month and day-of-week equality
// ---------------------------------------------------------------------------

/// Equality filters on the derived calendar fields. `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TripFilter {
    pub month: Option<Month>,
    pub day: Option<Day>,
}

impl From<&Selection> for TripFilter {
    fn from(sel: &Selection) -> Self {
        TripFilter {
            month: sel.month,
            day: sel.day,
        }
    }
}

impl TripFilter {
    /// A trip passes when every active filter equals its derived field.
    pub fn matches(&self, trip: &Trip) -> bool {
        self.month.map_or(true, |m| trip.month() == m) && self.day.map_or(true, |d| trip.day() == d)
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.day.is_none()
    }

    /// Keep only the trips that pass, preserving their original order.
    pub fn apply(&self, mut dataset: TripDataset) -> TripDataset {
        if self.is_empty() {
            return dataset;
        }
        let before = dataset.len();
        dataset.trips.retain(|trip| self.matches(trip));
        log::info!(
            "{} filter {:?} kept {} of {before} trips",
            dataset.city,
            self,
            dataset.len()
        );
        dataset
    }
}
