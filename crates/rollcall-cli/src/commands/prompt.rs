use clap::Subcommand;

use rollcall_core::integrations::{render_prompt, DiscordWebhook};
use rollcall_core::{ClockSource, Config, SystemClock};

#[derive(Subcommand)]
pub enum PromptAction {
    /// Print today's prompt text without sending
    Preview,
    /// Post today's prompt to the configured webhook
    Send,
}

pub fn run(action: PromptAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let clock = SystemClock::new(config.utc_offset_hours);
    let text = render_prompt(&config.prompt.template, clock.today());

    match action {
        PromptAction::Preview => println!("{text}"),
        PromptAction::Send => {
            let sink = DiscordWebhook::from_config(&config)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(sink.announce(&text))?;
            println!("sent");
        }
    }
    Ok(())
}
