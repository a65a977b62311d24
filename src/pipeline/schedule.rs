// src/pipeline/schedule.rs

//! Once-a-day trigger.

use std::future::Future;

use chrono::{DateTime, Local, TimeZone};

use crate::models::ScheduleConfig;

/// Next time strictly after `now` at `hour:minute` in `now`'s time zone.
///
/// Days where that wall-clock time does not exist (DST gaps) are skipped.
pub fn next_run_after<Tz: TimeZone>(
    now: &DateTime<Tz>,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let mut date = now.date_naive();
    for _ in 0..3 {
        let naive = date.and_hms_opt(hour, minute, 0)?;
        if let Some(candidate) = tz.from_local_datetime(&naive).earliest() {
            if candidate > *now {
                return Some(candidate);
            }
        }
        date = date.succ_opt()?;
    }
    None
}

/// Fire `job` every day at the scheduled local time until `shutdown` resolves.
///
/// Each firing is spawned on its own task, so a slow run never delays the
/// next tick and runs may overlap.
pub async fn run_scheduler<F, Fut, S>(schedule: ScheduleConfig, job: F, shutdown: S)
where
    F: Fn() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    log::info!("Scheduler armed: every day at {}", schedule.label());

    let mut last_fired: Option<DateTime<Local>> = None;
    loop {
        let now = Local::now();
        // Wall clock may lag the timer; never fire the same slot twice.
        let from = last_fired.map_or(now, |fired| fired.max(now));
        let Some(next) = next_run_after(&from, schedule.hour, schedule.minute) else {
            log::error!("Cannot compute next run for {}", schedule.label());
            break;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        log::info!("Next push at {}", next.format("%Y-%m-%d %H:%M"));

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                last_fired = Some(next);
                tokio::spawn(job());
            }
            _ = &mut shutdown => {
                log::info!("Scheduler stopped");
                break;
            }
        }
    }
}
