use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

/// Pure slot rules: the fixed daily template, the business-day predicate
/// and the booking horizon. Holds no reservation state and performs no I/O;
/// the same template backs both booking validation and availability
/// queries, so "what you can browse" and "what you can book" cannot drift
/// apart.
#[derive(Debug, Clone)]
pub struct SlotCalendar {
    slots: Vec<NaiveTime>,
    horizon_days: i64,
}

fn half_hour_block(from: (u32, u32), to: (u32, u32)) -> impl Iterator<Item = NaiveTime> {
    let start = from.0 * 60 + from.1;
    let end = to.0 * 60 + to.1;
    (start..=end).step_by(30).map(|minutes| {
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).expect("template time in range")
    })
}

impl Default for SlotCalendar {
    /// The clinic's daily offering: 09:00-11:30 and 14:00-17:00 in
    /// 30-minute steps (13 slots), bookable from tomorrow through 14 days
    /// out.
    fn default() -> Self {
        let slots = half_hour_block((9, 0), (11, 30))
            .chain(half_hour_block((14, 0), (17, 0)))
            .collect();
        Self {
            slots,
            horizon_days: 14,
        }
    }
}

impl SlotCalendar {
    pub fn new(slots: Vec<NaiveTime>, horizon_days: i64) -> Self {
        Self { slots, horizon_days }
    }

    /// The fixed ordered template, identical for every bookable date.
    pub fn slot_template(&self) -> &[NaiveTime] {
        &self.slots
    }

    pub fn contains_slot(&self, time: NaiveTime) -> bool {
        self.slots.contains(&time)
    }

    pub fn is_business_day(date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Candidate for booking: a business day strictly after `today` and at
    /// most `horizon_days` calendar days out. Dates outside this window are
    /// invalid, not merely unavailable.
    pub fn is_bookable_date(&self, date: NaiveDate, today: NaiveDate) -> bool {
        Self::is_business_day(date)
            && date > today
            && date <= today + Duration::days(self.horizon_days)
    }

    /// Every business day from tomorrow through `today + horizon_days`
    /// inclusive, in order.
    pub fn horizon_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (1..=self.horizon_days)
            .map(|offset| today + Duration::days(offset))
            .filter(|date| Self::is_business_day(*date))
            .collect()
    }
}
