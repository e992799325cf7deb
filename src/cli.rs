use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};

use crate::clients::poll_client::XoyondoClient;
use crate::error::PollError;
use crate::service::calendar;
use crate::service::message_log::MessageLog;
use crate::service::poll_service::PollService;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the poll to exactly these dates and clear all votes
    Reset { dates: String },
    /// Add dates to the poll
    Add { dates: String },
    /// Delete dates (literal dates or indices) from the poll
    Delete { dates: String },
    /// Show vote tallies per date
    Votes { dates: Option<String> },
    /// Show each participant's votes
    UserVotes { name: Option<String> },
    /// Remove every participant from the poll
    PurgeUsers,
    /// Print the date range of the current week (offset in weeks)
    Week { offset: Option<i64> },
    /// Print the date range of the current month (offset in months)
    Month { offset: Option<i64> },
    /// Prompt for a date expression and reset the poll interactively
    ResetPrompt,
}

pub async fn cli(service: PollService<XoyondoClient>) {
    // Fine to panic here
    let cli = Cli::parse();
    match &cli.command {
        Commands::Reset { dates } => {
            report(service.reset_poll(dates).await);
        }
        Commands::Add { dates } => {
            report(service.add_dates(dates).await);
        }
        Commands::Delete { dates } => {
            report(service.delete_dates(dates).await);
        }
        Commands::Votes { dates } => match service.votes_by_date(dates.as_deref()).await {
            Ok((tallies, messages)) => {
                for tally in &tallies {
                    println!("{}", tally);
                }
                print_messages(&messages);
            }
            Err(err) => println!("Error: {}", err),
        },
        Commands::UserVotes { name } => match service.votes_by_user(name.as_deref()).await {
            Ok((users, messages)) => {
                for user in &users {
                    let votes: Vec<String> = user
                        .votes
                        .iter()
                        .map(|(date, vote)| format!("{} {}", date, vote))
                        .collect();
                    println!("{}: {}", user.name, votes.join(", "));
                }
                print_messages(&messages);
            }
            Err(err) => println!("Error: {}", err),
        },
        Commands::PurgeUsers => {
            report(service.purge_users().await);
        }
        Commands::Week { offset } => {
            let week = calendar::current_week(Utc::now().date_naive(), offset.unwrap_or(0));
            let log = MessageLog::new();
            match calendar::week_range(&week, &log) {
                Ok(range) => println!("{}", range),
                Err(err) => println!("Error: {}", err),
            }
        }
        Commands::Month { offset } => {
            let month = calendar::current_month(Utc::now().date_naive(), offset.unwrap_or(0));
            let log = MessageLog::new();
            match calendar::month_range(&month, &log) {
                Ok(range) => println!("{}", range),
                Err(err) => println!("Error: {}", err),
            }
        }
        Commands::ResetPrompt => {
            if let Err(e) = reset_from_prompt(&service).await {
                println!("Failed to reset poll: {}", e);
            }
        }
    }
}

async fn reset_from_prompt(
    service: &PollService<XoyondoClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    let expression = Text::new("Dates the poll should contain:").prompt()?;
    let confirmed = Confirm::new(&format!(
        "Reset {} to `{}` and clear all votes?",
        service.url(),
        expression.trim()
    ))
    .with_default(false)
    .prompt()?;
    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }
    let messages = service
        .reset_poll(expression.trim())
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { format!("{}", e).into() })?;
    print_messages(&messages);
    Ok(())
}

fn report(result: Result<Vec<String>, PollError>) {
    match result {
        Ok(messages) => print_messages(&messages),
        Err(err) => println!("Error: {}", err),
    }
}

fn print_messages(messages: &[String]) {
    for message in messages {
        println!("{}", message);
    }
}
