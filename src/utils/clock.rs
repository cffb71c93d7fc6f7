use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Single wall-clock seam. Stats and timestamps are deterministic given a
/// collection and one `now` reading, so tests inject a fixed instant.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn at_timestamp(ts: i64) -> Self {
        Self(Local.timestamp_opt(ts, 0).single().expect("valid unix timestamp"))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
