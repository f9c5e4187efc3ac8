// Lookup command - find the stats API ids for a player so they can be added to the roster

use poise::serenity_prelude as serenity;
use tracing::error;

use crate::models::roster::Platform;
use crate::utils::config::colors;
use crate::{Context, Error};

/// Find the player and user ids for an in-game name
#[poise::command(slash_command, prefix_command)]
pub async fn lookup(
    ctx: Context<'_>,
    #[description = "Name exactly as it appears in-game"] name: String,
    #[description = "Platform the player is on"] platform: Platform,
) -> Result<(), Error> {
    ctx.defer().await?;

    let ids = match ctx.data().stats_client.lookup_player(&name, platform).await {
        Ok(ids) => ids,
        Err(e) => {
            error!("Player lookup failed: {:?}", e);
            None
        }
    };

    let embed = match ids {
        Some(ids) => serenity::CreateEmbed::new()
            .title(format!("Found IDs for {}", ids.user_name))
            .field("player_id", ids.player_id.to_string(), true)
            .field("user_id", ids.user_id.to_string(), true)
            .field("platform", platform.as_str(), true)
            .color(colors::SUCCESS),
        None => serenity::CreateEmbed::new()
            .title("Could not find IDs")
            .description(format!(
                "No **{}** player named **{}**. Make sure the name is exactly as it appears in-game.",
                platform.as_str(),
                name
            ))
            .color(colors::ERROR),
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
