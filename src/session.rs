use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use crate::console::Console;
use crate::data::filter::TripFilter;
use crate::data::loader;
use crate::input::collect_selection;
use crate::pager::page_raw_data;
use crate::report;

// ---------------------------------------------------------------------------
// Session loop
// ---------------------------------------------------------------------------

/// One interactive run of the explorer: select, load, page, report, repeat.
pub struct Session<R, W> {
    console: Console<R, W>,
    data_dir: PathBuf,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(console: Console<R, W>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            console,
            data_dir: data_dir.into(),
        }
    }

    /// Loop until the user declines to restart.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.explore_once()?;
            if !self
                .console
                .confirm("\nWould you like to restart? Enter yes or no.")?
            {
                return Ok(());
            }
        }
    }

    /// A single selection → load → page → report pass. Load failures are
    /// shown to the user rather than ending the session.
    fn explore_once(&mut self) -> Result<()> {
        let selection = collect_selection(&mut self.console)?;

        let dataset = match loader::load_city(&self.data_dir, selection.city) {
            Ok(dataset) => TripFilter::from(&selection).apply(dataset),
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                writeln!(self.console.out(), "\nSorry, the data could not be loaded: {e:#}")?;
                return Ok(());
            }
        };

        page_raw_data(&mut self.console, &dataset)?;
        report::print_all(self.console.out(), &dataset)?;
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.console.into_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use std::io::Cursor;
    use std::path::Path;

    const CHICAGO_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-06-02 17:00:00,2017-06-02 17:10:00,600,Canal St & Adams St,Clinton St & Madison St,Subscriber,Male,1988.0
2,2017-06-09 17:30:00,2017-06-09 17:40:00,600,Canal St & Adams St,Clinton St & Madison St,Subscriber,Female,1990.0
3,2017-01-03 08:00:00,2017-01-03 08:10:00,600,Lake Shore Dr & Monroe St,Streeter Dr & Grand Ave,Customer,,
";

    const WASHINGTON_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1,2017-03-04 12:00:00,2017-03-04 12:30:00,1800.5,Lincoln Memorial,Jefferson Dr & 14th St SW,Customer
";

    fn run_session(data_dir: &Path, input: &str) -> (Result<()>, String) {
        let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let mut session = Session::new(console, data_dir);
        let result = session.run();
        (result, String::from_utf8(session.into_output()).unwrap())
    }

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chicago.csv"), CHICAGO_CSV).unwrap();
        std::fs::write(dir.path().join("washington.csv"), WASHINGTON_CSV).unwrap();
        dir
    }

    #[test]
    fn chicago_june_reports_only_june_trips() {
        let dir = data_dir();
        let (result, out) = run_session(dir.path(), "chicago\njun\nall\nno\nno\n");
        result.unwrap();

        assert!(out.contains("The most common month is June."));
        assert!(out.contains("The most common day of the week is Friday."));
        assert!(out.contains("The most common start hour is 17:00."));
        assert!(out.contains("combination is Canal St & Adams St and Clinton St & Madison St."));
        assert!(!out.contains("Customer"));
        assert!(out.contains("The oldest user was born in 1988."));
    }

    #[test]
    fn washington_skips_demographics_and_restarts() {
        let dir = data_dir();
        let input = "washington\nall\nall\nyes\nno\nyes\nwashington\nmar\nsat\nno\nno\n";
        let (result, out) = run_session(dir.path(), input);
        result.unwrap();

        assert_eq!(out.matches("Hello! Let's explore").count(), 2);
        assert!(out.contains("Displaying rows 0 to 0."));
        assert_eq!(out.matches("gender is not recorded").count(), 2);
        assert!(!out.contains("oldest user"));
        assert!(out.contains("0 hours, 30 minutes and 0 seconds"));
    }

    #[test]
    fn missing_dataset_is_reported_and_session_continues() {
        let dir = data_dir();
        let input = "new york city\nall\nall\nyes\nchicago\nall\nmon\nno\nno\n";
        let (result, out) = run_session(dir.path(), input);
        result.unwrap();

        assert!(out.contains("Sorry, the data could not be loaded"));
        assert!(out.contains("new_york_city.csv"));
        // Chicago has no Monday trips in the fixture.
        assert!(out.contains("No trips match the selected filters."));
    }

    #[test]
    fn closed_input_ends_with_error() {
        let dir = data_dir();
        let (result, _) = run_session(dir.path(), "chicago\n");
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::Closed)
        ));
    }
}
