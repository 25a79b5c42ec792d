use chrono::{DateTime, Local, NaiveDate};

/// Source of "now" for everything that validates dates against the booking
/// horizon. Injected so tests can pin time and exercise boundaries
/// deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Local calendar date, the reference point for "today" in all
    /// horizon and past-date checks.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time in the clinic's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn at_date(date: NaiveDate) -> Self {
        let midday = date.and_hms_opt(12, 0, 0).expect("valid wall time");
        Self(
            midday
                .and_local_timezone(Local)
                .earliest()
                .expect("unambiguous local time"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
