// Test command - quick health check that the bot is answering

use crate::utils::emojis::random_emoji;
use crate::{Context, Error};

/// Check that the bot is alive
#[poise::command(slash_command, prefix_command)]
pub async fn test(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(format!("hello world {}", random_emoji())).await?;
    Ok(())
}
