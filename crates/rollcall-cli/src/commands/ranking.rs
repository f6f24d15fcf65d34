use std::sync::Arc;

use rollcall_core::{Config, Database, QueryService, SystemClock};

pub fn run(year: Option<i32>, month: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let clock = SystemClock::new(config.utc_offset_hours);
    let db = Arc::new(Database::open()?);
    let query = QueryService::new(clock, db);

    let report = match (year, month) {
        (Some(year), Some(month)) => {
            if !(1..=12).contains(&month) {
                return Err(format!("month out of range: {month}").into());
            }
            query.monthly_ranking(year, month)?
        }
        _ => query.current_month_ranking()?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
