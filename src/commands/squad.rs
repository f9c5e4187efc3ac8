// Squad command - show the squad leaderboard on demand

use poise::serenity_prelude as serenity;

use crate::features::poster::LeaderboardMessage;
use crate::utils::config::colors;
use crate::{Context, Error};

/// Show the squad leaderboard, ranked by K/D
#[poise::command(slash_command, prefix_command)]
pub async fn squad(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let rows = data.aggregator.fetch_leaderboard(&data.squad_handles).await;

    if rows.is_empty() {
        let embed = serenity::CreateEmbed::new()
            .title("Squad Leaderboard")
            .description("No stats available right now. Try again in a few minutes.")
            .color(colors::WARNING);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    let message = LeaderboardMessage::from_rows(&rows);
    ctx.send(poise::CreateReply::default().embed(message.to_embed()))
        .await?;

    Ok(())
}
