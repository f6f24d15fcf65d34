use std::sync::Arc;

use rollcall_core::integrations::render_prompt;
use rollcall_core::{Config, DailyScheduler, DiscordWebhook, SystemClock};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if !config.prompt.enabled {
        return Err("daily prompt is disabled; set prompt.enabled = true".into());
    }

    let sink = Arc::new(DiscordWebhook::from_config(&config)?);
    let clock = SystemClock::new(config.utc_offset_hours);
    let scheduler = DailyScheduler::new(clock);
    let template = config.prompt.template.clone();

    tracing::info!(offset_hours = config.utc_offset_hours, "scheduler starting");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(scheduler.run(move |day| {
        let sink = Arc::clone(&sink);
        let text = render_prompt(&template, day);
        async move { sink.announce(&text).await }
    }));
    Ok(())
}
