use std::sync::Arc;

use serenity::model::gateway::GatewayIntents;
use tokio::sync::Mutex;

use crate::clients::poll_client::XoyondoClient;
use crate::handlers::discord::BotHandler;
use crate::service::poll_service::PollService;

/// Runs the Discord front-end until the gateway connection ends.
pub async fn run_api(service: Arc<Mutex<PollService<XoyondoClient>>>, discord_client_secret: String) {
    let intents = GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES;
    let client = serenity::Client::builder(discord_client_secret, intents)
        .event_handler(BotHandler::new(service))
        .await;

    match client {
        Ok(mut client) => {
            if let Err(why) = client.start().await {
                eprintln!("Client error: {:?}", why);
            }
        }
        Err(err) => eprintln!("Error creating Serenity client: {:?}", err),
    }
}
