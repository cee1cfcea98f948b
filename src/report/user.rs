use std::fmt;

use super::{mode, value_counts};
use crate::data::model::TripDataset;

/// Rider breakdown: user types always, demographics where recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    /// `None` when the city's data has no gender column.
    pub genders: Option<Vec<(String, usize)>>,
    /// `None` when the city's data has no birth-year column.
    pub birth_years: Option<BirthYears>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYears {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

impl UserStats {
    pub fn compute(dataset: &TripDataset) -> Option<Self> {
        if dataset.is_empty() {
            return None;
        }
        let trips = &dataset.trips;
        let count_strings = |values: Vec<&str>| -> Vec<(String, usize)> {
            value_counts(values)
                .into_iter()
                .map(|(v, n)| (v.to_string(), n))
                .collect()
        };

        let user_types = count_strings(trips.iter().filter_map(|t| t.user_type.as_deref()).collect());

        let genders = dataset
            .has_gender
            .then(|| count_strings(trips.iter().filter_map(|t| t.gender.as_deref()).collect()));

        let birth_years = if dataset.has_birth_year {
            let years: Vec<i32> = trips.iter().filter_map(|t| t.birth_year).collect();
            match (years.iter().min(), years.iter().max(), mode(years.iter())) {
                (Some(&earliest), Some(&most_recent), Some(&most_common)) => Some(BirthYears {
                    earliest,
                    most_recent,
                    most_common,
                }),
                _ => None,
            }
        } else {
            None
        };

        Some(UserStats {
            user_types,
            genders,
            birth_years,
        })
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[(String, usize)]) -> fmt::Result {
    if counts.is_empty() {
        return writeln!(f, "  (no values recorded)");
    }
    for (value, n) in counts {
        writeln!(f, "  {value:<12} {n}")?;
    }
    Ok(())
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Counts of user types:")?;
        write_counts(f, &self.user_types)?;
        writeln!(f)?;

        match &self.genders {
            Some(genders) => {
                writeln!(f, "Counts of user gender:")?;
                write_counts(f, genders)?;
            }
            None => writeln!(
                f,
                "Gender counts: gender is not recorded in the selected data set."
            )?,
        }
        writeln!(f)?;

        match &self.birth_years {
            Some(years) => write!(
                f,
                "The oldest user was born in {}.\n\
                 The youngest user was born in {}.\n\
                 The most common birth year of users was {}.",
                years.earliest, years.most_recent, years.most_common
            ),
            None => write!(
                f,
                "User age: birth year is not recorded in the selected data set."
            ),
        }
    }
}
