mod layout;
pub(crate) use self::layout::{LayoutContext, MonthOutline};
use std::iter::successors;
use time::{Date, Month};

/// Number of rows in the grid, one per day of the week
pub(crate) const DAYS_IN_WEEK: u8 = 7;

/// Maximum number of week-columns drawn for a year
pub(crate) const WEEK_COLUMNS: u32 = 53;

pub(crate) trait DateExt {
    /// Day of the week, 0 for Sunday through 6 for Saturday
    fn day_of_week(&self) -> u8;

    /// 0-based week of the year.  Weeks begin on Sunday, and week 0 is the
    /// (possibly partial) week containing January 1.
    fn week_of_year(&self) -> u8;

    /// The date formatted as `YYYY-MM-DD`
    fn iso_date(&self) -> String;
}

impl DateExt for Date {
    fn day_of_week(&self) -> u8 {
        self.weekday().number_days_from_sunday()
    }

    fn week_of_year(&self) -> u8 {
        self.sunday_based_week()
    }

    fn iso_date(&self) -> String {
        let (year, month, day) = (self.year(), u8::from(self.month()), self.day());
        format!("{year:04}-{month:02}-{day:02}")
    }
}

/// Returns every day of `year` in order.  Years that cannot be represented
/// produce no days.
pub(crate) fn year_grid(year: i32) -> impl Iterator<Item = Date> {
    let start = Date::from_calendar_date(year, Month::January, 1).ok();
    successors(start, |d| d.next_day()).take_while(move |d| d.year() == year)
}

/// Returns the first day of each month of `year`
pub(crate) fn months(year: i32) -> impl Iterator<Item = Date> {
    successors(Some(Month::January), |&m| (m != Month::December).then_some(m.next()))
        .filter_map(move |m| Date::from_calendar_date(year, m, 1).ok())
}

pub(crate) fn last_day_of_month(date: Date) -> Date {
    successors(Some(date), |d| d.next_day())
        .take_while(|d| d.month() == date.month())
        .last()
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_2015_bounds() {
        let jan1 = date!(2015 - 01 - 01);
        assert_eq!(jan1.day_of_week(), 4);
        assert_eq!(jan1.week_of_year(), 0);
        let dec31 = date!(2015 - 12 - 31);
        assert_eq!(dec31.day_of_week(), 4);
        assert_eq!(dec31.week_of_year(), 52);
        assert_eq!(year_grid(2015).count(), 365);
    }

    #[test]
    fn test_first_sunday_starts_week_one() {
        assert_eq!(date!(2015 - 01 - 03).week_of_year(), 0);
        assert_eq!(date!(2015 - 01 - 04).week_of_year(), 1);
        assert_eq!(date!(2017 - 01 - 01).week_of_year(), 1);
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(date!(2015 - 03 - 07).iso_date(), "2015-03-07");
        let early = Date::from_calendar_date(987, Month::November, 3).unwrap();
        assert_eq!(early.iso_date(), "0987-11-03");
    }

    #[test]
    fn test_year_grid_lengths() {
        for year in 1999..=2030 {
            let leap = time::util::is_leap_year(year);
            let days = year_grid(year).collect::<Vec<_>>();
            assert_eq!(days.len(), if leap { 366 } else { 365 }, "year {year}");
            assert!(days.iter().all(|d| d.year() == year));
            assert!(days.windows(2).all(|w| w[0].next_day() == Some(w[1])));
        }
    }

    #[test]
    fn test_year_grid_out_of_range() {
        assert_eq!(year_grid(100_000).count(), 0);
        assert_eq!(months(100_000).count(), 0);
    }

    #[test]
    fn test_months() {
        let firsts = months(2016).collect::<Vec<_>>();
        assert_eq!(firsts.len(), 12);
        assert_eq!(firsts.first(), Some(&date!(2016 - 01 - 01)));
        assert_eq!(firsts.last(), Some(&date!(2016 - 12 - 01)));
        assert!(firsts.iter().all(|d| d.day() == 1));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date!(2016 - 02 - 01)), date!(2016 - 02 - 29));
        assert_eq!(last_day_of_month(date!(2015 - 02 - 10)), date!(2015 - 02 - 28));
        assert_eq!(last_day_of_month(date!(2015 - 12 - 01)), date!(2015 - 12 - 31));
        assert_eq!(last_day_of_month(date!(2015 - 04 - 30)), date!(2015 - 04 - 30));
    }
}
