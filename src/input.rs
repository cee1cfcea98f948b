use std::io::{BufRead, Write};

use crate::console::Console;
use crate::data::model::{parse_day_filter, parse_month_filter, City, Selection};
use crate::error::InputError;

/// Ask for city, month and day until each answer is valid, then echo the
/// choice back.
pub fn collect_selection<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Result<Selection, InputError> {
    writeln!(console.out(), "Hello! Let's explore some US bikeshare data!")?;

    let cities = City::ALL.map(City::name).join(", ");
    let city = console.ask_until(
        &format!("Which city would you like to see? Please type one of: {cities}."),
        &format!("Oops! Please choose one of {cities} and check your input for typos."),
        |s| s.parse::<City>(),
    )?;

    let month = console.ask_until(
        "Please select a month (january to december). You can also type \"all\" to see statistics for every month in the data set.",
        "Oops! Please choose a month from january to december, or \"all\" if you do not want to filter by month.",
        parse_month_filter,
    )?;

    let day = console.ask_until(
        "What day are you interested in? Type mon, tue, wed, thu, fri, sat or sun for a specific day or \"all\" if you do not want to filter by day.",
        "Oops! Please choose a day of the week, or \"all\" if you do not want to filter by day.",
        parse_day_filter,
    )?;

    let selection = Selection { city, month, day };
    console.separator()?;
    writeln!(console.out(), "Great! You made the following choices:\n{selection}")?;
    log::debug!("selection: {selection:?}");
    Ok(selection)
}
