use chrono::{Datelike, Local, NaiveDate, Weekday};
use strum_macros::{Display, EnumIter, FromRepr, IntoStaticStr};

/// Calendar month as printed on receipts and period headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, IntoStaticStr, FromRepr)]
#[repr(u8)]
pub enum Month {
    #[strum(serialize = "JANEIRO")]
    January = 1,
    #[strum(serialize = "FEVEREIRO")]
    February = 2,
    #[strum(serialize = "MARÇO")]
    March = 3,
    #[strum(serialize = "ABRIL")]
    April = 4,
    #[strum(serialize = "MAIO")]
    May = 5,
    #[strum(serialize = "JUNHO")]
    June = 6,
    #[strum(serialize = "JULHO")]
    July = 7,
    #[strum(serialize = "AGOSTO")]
    August = 8,
    #[strum(serialize = "SETEMBRO")]
    September = 9,
    #[strum(serialize = "OUTUBRO")]
    October = 10,
    #[strum(serialize = "NOVEMBRO")]
    November = 11,
    #[strum(serialize = "DEZEMBRO")]
    December = 12,
}

impl Month {
    pub fn from_number(n: u32) -> Option<Self> {
        u8::try_from(n).ok().and_then(Self::from_repr)
    }

    pub fn number(self) -> u32 {
        self as u32
    }

    /// Upper-case Portuguese name, e.g. `MARÇO`.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// One payroll period: a month of a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub month: Month,
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        Month::from_number(month).map(|month| Self { month, year })
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            // month() is always 1..=12
            month: Month::from_number(date.month()).unwrap_or(Month::January),
            year: date.year(),
        }
    }

    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self { month: Month::December, year: self.year - 1 },
            m => Self {
                month: Month::from_number(m.number() - 1).unwrap_or(Month::January),
                year: self.year,
            },
        }
    }

    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self { month: Month::January, year: self.year + 1 },
            m => Self {
                month: Month::from_number(m.number() + 1).unwrap_or(Month::December),
                year: self.year,
            },
        }
    }

    /// First day of the period, stamped on new payrolls as `createdDate`.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number(), 1)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Long pt-BR date, e.g. `sexta-feira, 15 de março de 2024`.
pub fn long_date(date: NaiveDate) -> String {
    let month = Month::from_number(date.month())
        .map(|m| m.name().to_lowercase())
        .unwrap_or_default();
    format!(
        "{}, {:02} de {} de {}",
        weekday_name(date.weekday()),
        date.day(),
        month,
        date.year()
    )
}

/// Parses the date part of a backend date or datetime string.
pub fn parse_backend_date(value: &str) -> Option<NaiveDate> {
    let head = value.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn month_names_follow_calendar_order() {
        let names: Vec<&str> = Month::iter().map(Month::name).collect();
        assert_eq!(names.len(), 12);
        assert_eq!(names[0], "JANEIRO");
        assert_eq!(names[2], "MARÇO");
        assert_eq!(names[11], "DEZEMBRO");
        assert_eq!(Month::March.to_string(), "MARÇO");
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(Period::new(0, 2024).is_none());
        assert!(Period::new(13, 2024).is_none());
        assert_eq!(Period::new(12, 2024).unwrap().month, Month::December);
    }

    #[test]
    fn navigation_wraps_years() {
        let jan = Period::new(1, 2024).unwrap();
        assert_eq!(jan.previous(), Period::new(12, 2023).unwrap());
        assert_eq!(jan.previous().next(), jan);
        let dec = Period::new(12, 2024).unwrap();
        assert_eq!(dec.next(), Period::new(1, 2025).unwrap());
    }

    #[test]
    fn long_date_is_portuguese() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(long_date(d), "sexta-feira, 15 de março de 2024");
        let d = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert_eq!(long_date(d), "domingo, 02 de junho de 2024");
    }

    #[test]
    fn backend_dates_accept_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_backend_date("2024-03-05"), expected);
        assert_eq!(parse_backend_date("2024-03-05T12:00:00.000Z"), expected);
        assert_eq!(parse_backend_date("05/03/2024"), None);
        assert_eq!(parse_backend_date(""), None);
    }

    #[test]
    fn first_day_of_period() {
        let p = Period::new(2, 2024).unwrap();
        assert_eq!(p.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1));
    }
}
