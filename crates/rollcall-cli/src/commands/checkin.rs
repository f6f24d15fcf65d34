use std::sync::Arc;

use rollcall_core::{CheckInService, Config, Database, SystemClock};

pub fn run(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let clock = SystemClock::new(config.utc_offset_hours);
    let db = Arc::new(Database::open()?);

    let service = CheckInService::new(clock, db);
    let outcome = service.check_in(user_id)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
