//! Public-holiday check for the one-shot CLI.
//!
//! Built in: the fixed-date Korean holidays, the lunar ones (Seollal,
//! Chuseok, Buddha's Birthday, read off the Dangi calendar) and the
//! substitute days those produce. Election days and one-off temporary
//! holidays come from `EXTRA_HOLIDAYS`.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use icu_calendar::dangi::Dangi;
use icu_calendar::{Date, Ref};

/// `(month, day, first year with substitute days)` of the fixed-date holidays.
const FIXED_HOLIDAYS: &[(u32, u32, Option<i32>)] = &[
    (1, 1, None),         // 신정
    (3, 1, Some(2021)),   // 삼일절
    (5, 5, Some(2014)),   // 어린이날
    (6, 6, None),         // 현충일
    (8, 15, Some(2021)),  // 광복절
    (10, 3, Some(2021)),  // 개천절
    (10, 9, Some(2021)),  // 한글날
    (12, 25, Some(2023)), // 성탄절
];

const BUDDHAS_BIRTHDAY: (&str, u32) = ("M04", 8);
const SEOLLAL: (&str, u32) = ("M01", 1);
const CHUSEOK: (&str, u32) = ("M08", 15);

const BUDDHAS_BIRTHDAY_SUBSTITUTE_FROM: i32 = 2023;
const LUNAR_BLOCK_SUBSTITUTE_FROM: i32 = 2014;

/// When a holiday displaced onto a non-working day earns a substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Substitute {
    Never,
    /// Falls on Saturday or Sunday.
    Weekend,
    /// Falls on Sunday (the three-day Seollal and Chuseok blocks).
    Sunday,
}

#[derive(Debug, Clone, Copy)]
struct Observance {
    date: NaiveDate,
    /// Last day of the block the date belongs to; substitutes go after it.
    block_end: NaiveDate,
    substitute: Substitute,
}

#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    extra: Vec<NaiveDate>,
}

impl HolidayCalendar {
    pub fn korean(extra: Vec<NaiveDate>) -> Self {
        Self { extra }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.extra.contains(&date) || holidays_in(date.year()).contains(&date)
    }

    /// Whether today, in local time, is a holiday.
    pub fn is_today_holiday(&self) -> bool {
        self.is_holiday(Local::now().date_naive())
    }
}

/// Every built-in holiday of `year`, substitute days included.
pub fn holidays_in(year: i32) -> BTreeSet<NaiveDate> {
    let observances = observances(year);
    let mut taken: BTreeSet<NaiveDate> = observances.iter().map(|o| o.date).collect();

    let mut displaced: Vec<NaiveDate> = observances
        .iter()
        .enumerate()
        .filter(|(i, o)| {
            let overlaps = observances[..*i].iter().any(|earlier| earlier.date == o.date);
            match o.substitute {
                Substitute::Never => false,
                Substitute::Weekend => is_weekend(o.date) || overlaps,
                Substitute::Sunday => o.date.weekday() == Weekday::Sun || overlaps,
            }
        })
        .map(|(_, o)| o.block_end)
        .collect();
    displaced.sort();

    for after in displaced {
        let mut day = after;
        loop {
            let Some(next) = day.checked_add_days(Days::new(1)) else {
                break;
            };
            day = next;
            if !is_weekend(day) && !taken.contains(&day) {
                taken.insert(day);
                break;
            }
        }
    }
    taken
}

fn observances(year: i32) -> Vec<Observance> {
    let mut out = Vec::new();

    for &(month, day, substitute_from) in FIXED_HOLIDAYS {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            let substitute = match substitute_from {
                Some(from) if year >= from => Substitute::Weekend,
                _ => Substitute::Never,
            };
            out.push(Observance {
                date,
                block_end: date,
                substitute,
            });
        }
    }

    let lunar = LunarYear::scan(year);

    if let Some(date) = lunar.find(BUDDHAS_BIRTHDAY) {
        let substitute = if year >= BUDDHAS_BIRTHDAY_SUBSTITUTE_FROM {
            Substitute::Weekend
        } else {
            Substitute::Never
        };
        out.push(Observance {
            date,
            block_end: date,
            substitute,
        });
    }

    let block_substitute = if year >= LUNAR_BLOCK_SUBSTITUTE_FROM {
        Substitute::Sunday
    } else {
        Substitute::Never
    };
    for center in [lunar.find(SEOLLAL), lunar.find(CHUSEOK)].into_iter().flatten() {
        let (Some(start), Some(end)) = (
            center.checked_sub_days(Days::new(1)),
            center.checked_add_days(Days::new(1)),
        ) else {
            continue;
        };
        for date in [start, center, end] {
            out.push(Observance {
                date,
                block_end: end,
                substitute: block_substitute,
            });
        }
    }

    out
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Lunar `(month code, day)` for every day of one Gregorian year.
struct LunarYear {
    days: Vec<(NaiveDate, String, u32)>,
}

impl LunarYear {
    fn scan(year: i32) -> Self {
        let calendar = Dangi::new();
        let days = NaiveDate::from_ymd_opt(year, 1, 1)
            .into_iter()
            .flat_map(|first| first.iter_days())
            .take_while(|date| date.year() == year)
            .filter_map(|date| {
                let (code, day) = lunar_month_day(&calendar, date)?;
                Some((date, code, day))
            })
            .collect();
        Self { days }
    }

    /// The Gregorian date of a lunar `(month code, day)`. Leap months have
    /// their own code (`M04L`) and never match.
    fn find(&self, (code, day): (&str, u32)) -> Option<NaiveDate> {
        self.days
            .iter()
            .find(|(_, c, d)| c == code && *d == day)
            .map(|(date, _, _)| *date)
    }
}

fn lunar_month_day(calendar: &Dangi, date: NaiveDate) -> Option<(String, u32)> {
    let month = u8::try_from(date.month()).ok()?;
    let day = u8::try_from(date.day()).ok()?;
    let iso = Date::try_new_iso_date(date.year(), month, day).ok()?;
    let lunar = iso.to_calendar(Ref(calendar));
    Some((
        lunar.month().code.0.as_str().to_string(),
        lunar.day_of_month().0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fixed_holidays_every_year() {
        let cal = HolidayCalendar::korean(vec![]);
        for year in [2024, 2025, 2026] {
            assert!(cal.is_holiday(date(year, 1, 1)));
            assert!(cal.is_holiday(date(year, 8, 15)));
            assert!(cal.is_holiday(date(year, 10, 9)));
            assert!(cal.is_holiday(date(year, 12, 25)));
        }
    }

    #[test]
    fn seollal_and_chuseok_without_extras() {
        let cal = HolidayCalendar::korean(vec![]);
        for day in [16, 17, 18] {
            assert!(cal.is_holiday(date(2026, 2, day)), "2026-02-{day}");
        }
        for day in [24, 25, 26] {
            assert!(cal.is_holiday(date(2026, 9, day)), "2026-09-{day}");
        }
        assert!(!cal.is_holiday(date(2026, 2, 19)));
        assert!(!cal.is_holiday(date(2026, 9, 23)));
    }

    #[test]
    fn buddhas_birthday() {
        let cal = HolidayCalendar::korean(vec![]);
        assert!(cal.is_holiday(date(2024, 5, 15)));
        assert!(cal.is_holiday(date(2026, 5, 24)));
    }

    #[test]
    fn substitute_days() {
        let cal = HolidayCalendar::korean(vec![]);
        // Seollal 2024 ended on a Sunday.
        assert!(cal.is_holiday(date(2024, 2, 12)));
        // Children's Day on a Sunday.
        assert!(cal.is_holiday(date(2024, 5, 6)));
        // Buddha's Birthday and Children's Day on the same day.
        assert!(cal.is_holiday(date(2025, 5, 6)));
        // 삼일절 2026 is a Sunday, 광복절 2026 a Saturday.
        assert!(cal.is_holiday(date(2026, 3, 2)));
        assert!(cal.is_holiday(date(2026, 8, 17)));
        // Chuseok 2026 ends on a Saturday: no substitute.
        assert!(!cal.is_holiday(date(2026, 9, 28)));
    }

    #[test]
    fn ordinary_days_are_not_holidays() {
        let cal = HolidayCalendar::korean(vec![]);
        assert!(!cal.is_holiday(date(2026, 10, 19)));
        assert!(!cal.is_holiday(date(2026, 4, 14)));
    }

    #[test]
    fn extra_dates_count() {
        let cal = HolidayCalendar::korean(vec![date(2026, 6, 3)]);
        assert!(cal.is_holiday(date(2026, 6, 3)));
        assert!(!cal.is_holiday(date(2027, 6, 3)));
    }
}
