use chrono::Utc;
use my_space_application::Clock;

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn now_unix_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
