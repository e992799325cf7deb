use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serenity::all::{Command, CommandInteraction, CommandOptionType, Interaction};
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateInteractionResponseFollowup};
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::sync::Mutex;

use crate::clients::poll_client::XoyondoClient;
use crate::error::PollError;
use crate::models::poll::{DateTally, UserVotes};
use crate::service::calendar;
use crate::service::message_log::MessageLog;
use crate::service::poll_service::PollService;

/// Discord replies hard-cap at 2000 characters.
const MAX_REPLY_LEN: usize = 1900;

pub struct BotHandler {
    service: Arc<Mutex<PollService<XoyondoClient>>>,
    extra_info: AtomicBool,
}

impl BotHandler {
    pub fn new(service: Arc<Mutex<PollService<XoyondoClient>>>) -> Self {
        BotHandler {
            service,
            extra_info: AtomicBool::new(false),
        }
    }

    fn render(&self, headline: &str, messages: &[String]) -> String {
        if !self.extra_info.load(Ordering::Relaxed) || messages.is_empty() {
            return headline.to_string();
        }
        let mut out = String::from(headline);
        for message in messages {
            out.push_str("\n> ");
            out.push_str(message);
        }
        truncate_reply(out)
    }

    async fn handle_command(&self, command: &CommandInteraction) -> String {
        match command.data.name.as_str() {
            "poll_reset" => {
                let Some(dates) = string_option(command, "dates") else {
                    return "Missing `dates` argument.".to_string();
                };
                let service = self.service.lock().await;
                match service.reset_poll(&dates).await {
                    Ok(messages) => self.render("Poll has been reset.", &messages),
                    Err(err) => render_error(&err),
                }
            }
            "poll_add" => {
                let Some(dates) = string_option(command, "dates") else {
                    return "Missing `dates` argument.".to_string();
                };
                let service = self.service.lock().await;
                match service.add_dates(&dates).await {
                    Ok(messages) => self.render("Dates added.", &messages),
                    Err(err) => render_error(&err),
                }
            }
            "poll_delete" => {
                let Some(dates) = string_option(command, "dates") else {
                    return "Missing `dates` argument.".to_string();
                };
                let service = self.service.lock().await;
                match service.delete_dates(&dates).await {
                    Ok(messages) => self.render("Dates deleted.", &messages),
                    Err(err) => render_error(&err),
                }
            }
            "poll_votes" => {
                let dates = string_option(command, "dates");
                let service = self.service.lock().await;
                match service.votes_by_date(dates.as_deref()).await {
                    Ok((tallies, messages)) => self.render(&render_tallies(&tallies), &messages),
                    Err(err) => render_error(&err),
                }
            }
            "poll_user_votes" => {
                let name = string_option(command, "name");
                let service = self.service.lock().await;
                match service.votes_by_user(name.as_deref()).await {
                    Ok((users, messages)) => self.render(&render_user_votes(&users), &messages),
                    Err(err) => render_error(&err),
                }
            }
            "poll_purge" => {
                let service = self.service.lock().await;
                match service.purge_users().await {
                    Ok(messages) => self.render("All participants removed.", &messages),
                    Err(err) => render_error(&err),
                }
            }
            "poll_url" => {
                let Some(url) = string_option(command, "url") else {
                    return "Missing `url` argument.".to_string();
                };
                let mut service = self.service.lock().await;
                match service.set_url(&url) {
                    Ok(()) => "Poll URL updated.".to_string(),
                    Err(err) => render_error(&err),
                }
            }
            "poll_week" => {
                let offset = integer_option(command, "offset").unwrap_or(0);
                let week = calendar::current_week(Utc::now().date_naive(), offset);
                let log = MessageLog::new();
                match calendar::week_range(&week, &log) {
                    Ok(range) => format!("Week {} covers `{}`.", week, range),
                    Err(err) => render_error(&err),
                }
            }
            "poll_month" => {
                let offset = integer_option(command, "offset").unwrap_or(0);
                let month = calendar::current_month(Utc::now().date_naive(), offset);
                let log = MessageLog::new();
                match calendar::month_range(&month, &log) {
                    Ok(range) => format!("Month {} covers `{}`.", month, range),
                    Err(err) => render_error(&err),
                }
            }
            "poll_extra_info" => {
                let enabled = !self.extra_info.load(Ordering::Relaxed);
                self.extra_info.store(enabled, Ordering::Relaxed);
                if enabled {
                    "Extra info is now enabled.".to_string()
                } else {
                    "Extra info is now disabled.".to_string()
                }
            }
            other => format!("Unknown command {}.", other),
        }
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        println!("{} is connected!", ready.user.name);

        for builder in command_builders() {
            if let Err(err) = Command::create_global_command(&ctx.http, builder).await {
                eprintln!("Failed to register command: {:?}", err);
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        // Poll operations fan out many HTTP calls; acknowledge first so
        // the three-second interaction window cannot expire.
        let _ = command.defer(&ctx.http).await;
        let reply = self.handle_command(&command).await;
        let _ = command
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new().content(reply),
            )
            .await;
    }
}

fn command_builders() -> Vec<CreateCommand> {
    let dates_option = |description: &str, required: bool| {
        CreateCommandOption::new(CommandOptionType::String, "dates", description)
            .required(required)
    };
    vec![
        CreateCommand::new("poll_reset")
            .description("Reset the poll to the given dates and clear all votes")
            .add_option(dates_option("Date expression, e.g. 2024/05/01:2024/05/07", true)),
        CreateCommand::new("poll_add")
            .description("Add dates to the poll")
            .add_option(dates_option("Date expression, e.g. 2024/05/01,2024/05/03", true)),
        CreateCommand::new("poll_delete")
            .description("Delete dates from the poll")
            .add_option(dates_option("Date expression or indices, e.g. 0,-1", true)),
        CreateCommand::new("poll_votes")
            .description("Show vote tallies per date")
            .add_option(dates_option("Optional date expression or indices", false)),
        CreateCommand::new("poll_user_votes")
            .description("Show each participant's votes")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "name",
                    "Only participants whose name matches",
                )
                .required(false),
            ),
        CreateCommand::new("poll_purge").description("Remove every participant from the poll"),
        CreateCommand::new("poll_url")
            .description("Point the bot at another poll")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "url", "Poll admin URL")
                    .required(true),
            ),
        CreateCommand::new("poll_week")
            .description("Show the date range of the current week")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "offset",
                    "Weeks from now (negative for past)",
                )
                .required(false),
            ),
        CreateCommand::new("poll_month")
            .description("Show the date range of the current month")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "offset",
                    "Months from now (negative for past)",
                )
                .required(false),
            ),
        CreateCommand::new("poll_extra_info")
            .description("Toggle detailed per-operation messages in replies"),
    ]
}

fn string_option(command: &CommandInteraction, name: &str) -> Option<String> {
    command
        .data
        .options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| match &opt.value {
            serenity::all::CommandDataOptionValue::String(s) => Some(s.clone()),
            _ => None,
        })
        .filter(|s| !s.trim().is_empty())
}

fn integer_option(command: &CommandInteraction, name: &str) -> Option<i64> {
    command
        .data
        .options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| match &opt.value {
            serenity::all::CommandDataOptionValue::Integer(i) => Some(*i),
            _ => None,
        })
}

fn render_error(err: &PollError) -> String {
    format!(":stop_sign: **Error** - {}", err)
}

fn render_tallies(tallies: &[DateTally]) -> String {
    if tallies.is_empty() {
        return "No dates found.".to_string();
    }
    let lines: Vec<String> = tallies.iter().map(|t| t.to_string()).collect();
    truncate_reply(lines.join("\n"))
}

fn render_user_votes(users: &[UserVotes]) -> String {
    if users.is_empty() {
        return "No participants found.".to_string();
    }
    let lines: Vec<String> = users
        .iter()
        .map(|user| {
            let votes: Vec<String> = user
                .votes
                .iter()
                .map(|(date, vote)| format!("{} {}", date, vote))
                .collect();
            format!("{}: {}", user.name, votes.join(", "))
        })
        .collect();
    truncate_reply(lines.join("\n"))
}

fn truncate_reply(mut reply: String) -> String {
    if reply.len() > MAX_REPLY_LEN {
        let mut cut = MAX_REPLY_LEN;
        while !reply.is_char_boundary(cut) {
            cut -= 1;
        }
        reply.truncate(cut);
        reply.push('…');
    }
    reply
}
