use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::error::InputError;

// ---------------------------------------------------------------------------
// City – the three fixed datasets
// ---------------------------------------------------------------------------

/// A city with a known trip dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// File name without extension, e.g. `new_york_city`.
    pub fn file_stem(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new_york_city",
            City::Washington => "washington",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    /// Whether this city's dataset records rider gender and birth year.
    pub fn has_demographics(self) -> bool {
        !matches!(self, City::Washington)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let words: Vec<&str> = normalized.split_whitespace().collect();
        match words.join(" ").as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new york" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(InputError::UnknownCity(s.trim().to_string())),
        }
    }
}

/// Lowercase the input and keep its first three characters, so that
/// `"June"`, `"jun"` and `" JUNE "` all reduce to `"jun"`.
fn abbreviate(s: &str) -> String {
    s.trim().to_lowercase().chars().take(3).collect()
}

// ---------------------------------------------------------------------------
// Month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    pub fn abbrev(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = abbreviate(s);
        Month::ALL
            .into_iter()
            .find(|m| m.abbrev().eq_ignore_ascii_case(&short))
            .ok_or_else(|| InputError::UnknownMonth(s.trim().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Day of week
// ---------------------------------------------------------------------------

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn abbrev(self) -> &'static str {
        &self.name()[..3]
    }
}

impl From<Weekday> for Day {
    fn from(w: Weekday) -> Self {
        Day::ALL[w.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = abbreviate(s);
        Day::ALL
            .into_iter()
            .find(|d| d.abbrev().eq_ignore_ascii_case(&short))
            .ok_or_else(|| InputError::UnknownDay(s.trim().to_string()))
    }
}

/// Parse a month filter, where `"all"` means no filter.
pub fn parse_month_filter(s: &str) -> Result<Option<Month>, InputError> {
    if abbreviate(s) == "all" {
        return Ok(None);
    }
    s.parse().map(Some)
}

/// Parse a day-of-week filter, where `"all"` means no filter.
pub fn parse_day_filter(s: &str) -> Result<Option<Day>, InputError> {
    if abbreviate(s) == "all" {
        return Ok(None);
    }
    s.parse().map(Some)
}

// ---------------------------------------------------------------------------
// Selection – what the user asked for
// ---------------------------------------------------------------------------

/// One validated city/month/day choice. `None` means "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub city: City,
    pub month: Option<Month>,
    pub day: Option<Day>,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " City: {}", self.city)?;
        match self.month {
            Some(m) => writeln!(f, " Month: {m}")?,
            None => writeln!(f, " Month: all")?,
        }
        match self.day {
            Some(d) => write!(f, " Day: {d}"),
            None => write!(f, " Day: all"),
        }
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell as read from any source format
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, before it is mapped onto a [`Trip`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Null,
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text form of the cell, `None` for null or blank values.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Null => return None,
            CellValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Timestamp(ts) => Some(*ts),
            CellValue::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse `YYYY-MM-DD HH:MM:SS`, with optional fractional seconds, a `T`
/// separator, or no seconds at all.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// Column names shared by every source format
// ---------------------------------------------------------------------------

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

pub const REQUIRED_COLUMNS: [&str; 4] = [START_TIME, TRIP_DURATION, START_STATION, END_STATION];

// ---------------------------------------------------------------------------
// Trip – one row of the dataset
// ---------------------------------------------------------------------------

/// A single bikeshare trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Trip length in seconds; Washington records fractional seconds.
    pub duration_secs: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl Trip {
    /// Build a trip from one row of named cells.
    pub fn from_cells(cells: &BTreeMap<String, CellValue>) -> Result<Trip> {
        static NULL: CellValue = CellValue::Null;
        let cell = |name: &str| cells.get(name).unwrap_or(&NULL);

        let start_time = cell(START_TIME)
            .as_timestamp()
            .with_context(|| format!("invalid '{START_TIME}': {}", cell(START_TIME)))?;
        let end_time = match cell(END_TIME) {
            CellValue::Null => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            value => Some(
                value
                    .as_timestamp()
                    .with_context(|| format!("invalid '{END_TIME}': {value}"))?,
            ),
        };
        let duration_secs = cell(TRIP_DURATION)
            .as_f64()
            .filter(|d| d.is_finite())
            .with_context(|| format!("invalid '{TRIP_DURATION}': {}", cell(TRIP_DURATION)))?;
        if duration_secs < 0.0 {
            bail!("negative '{TRIP_DURATION}': {duration_secs}");
        }
        let start_station = cell(START_STATION)
            .as_text()
            .with_context(|| format!("missing '{START_STATION}'"))?;
        let end_station = cell(END_STATION)
            .as_text()
            .with_context(|| format!("missing '{END_STATION}'"))?;

        // Birth years are often stored as floats ("1992.0") because of blanks.
        let birth_year = match cell(BIRTH_YEAR) {
            CellValue::Null => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            value => {
                let year = value
                    .as_f64()
                    .filter(|y| y.is_finite())
                    .with_context(|| format!("invalid '{BIRTH_YEAR}': {value}"))?;
                Some(year as i32)
            }
        };

        Ok(Trip {
            start_time,
            end_time,
            duration_secs,
            start_station,
            end_station,
            user_type: cell(USER_TYPE).as_text(),
            gender: cell(GENDER).as_text(),
            birth_year,
        })
    }

    pub fn month(&self) -> Month {
        // chrono months are always 1..=12
        Month::ALL[self.start_time.month0() as usize]
    }

    pub fn day(&self) -> Day {
        self.start_time.weekday().into()
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

// ---------------------------------------------------------------------------
// TripDataset – the complete loaded table for one city
// ---------------------------------------------------------------------------

/// All trips for one city, plus which optional columns were present.
#[derive(Debug, Clone)]
pub struct TripDataset {
    pub city: City,
    pub trips: Vec<Trip>,
    /// True only if the city carries demographics and the column was found.
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl TripDataset {
    /// Build a dataset, deciding demographic availability from the city and
    /// the column names actually present in the source.
    pub fn new<'a>(
        city: City,
        trips: Vec<Trip>,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let (mut has_gender, mut has_birth_year) = (false, false);
        for col in columns {
            has_gender |= col == GENDER;
            has_birth_year |= col == BIRTH_YEAR;
        }
        TripDataset {
            city,
            trips,
            has_gender: has_gender && city.has_demographics(),
            has_birth_year: has_birth_year && city.has_demographics(),
        }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}
