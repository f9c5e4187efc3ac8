// Help command - show usage guide

use poise::serenity_prelude as serenity;
use crate::{Context, Error};
use crate::utils::config::colors;

/// Show help and usage guide
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let roster_size = ctx.data().aggregator.roster().len();

    let embed = serenity::CreateEmbed::new()
        .title("🎖️ Squad Stats Bot - Help")
        .description("Battlefield squad leaderboard, powered by gametools.network")
        .color(colors::INFO)
        .field(
            "🏆 Leaderboard",
            "`/squad` - Show the squad ranked by K/D\n\
            Includes level, kills, teamwork stats and favourite class, vehicle and weapon",
            false,
        )
        .field(
            "🔎 Roster",
            format!(
                "`/lookup` - Find the player and user ids for a new squad member\n\
                Players on the roster: {}",
                roster_size
            ),
            false,
        )
        .field("🩺 Health", "`/test` - Check that the bot is answering", false)
        .footer(serenity::CreateEmbedFooter::new(
            "Rust Edition • Built with Serenity & Poise",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
