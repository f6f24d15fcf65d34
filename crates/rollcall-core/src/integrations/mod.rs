pub mod discord;

pub use discord::DiscordWebhook;

use chrono::NaiveDate;

use crate::clock::day_label;

/// Expand the `{date}` placeholder in a prompt template with the day label
/// of `date`.
pub fn render_prompt(template: &str, date: NaiveDate) -> String {
    template.replace("{date}", &day_label(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_prompt_expands_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            render_prompt("Roll call for {date}!", date),
            "Roll call for 2024-01-01 (Mon)!"
        );
    }

    #[test]
    fn render_prompt_without_placeholder_is_unchanged() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(render_prompt("Check in now.", date), "Check in now.");
    }
}
