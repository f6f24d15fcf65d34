use std::sync::Arc;

use rollcall_core::{Config, Database, QueryService, SystemClock};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let clock = SystemClock::new(config.utc_offset_hours);
    let db = Arc::new(Database::open()?);

    let query = QueryService::new(clock, db);
    let report = query.today()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
