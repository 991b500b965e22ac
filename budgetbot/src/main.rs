mod commands;
mod config;
mod dialogs;
mod errors;
mod handlers;
mod menus;
mod parser;
mod replies;
mod router;
mod services;
mod storages;

use std::sync::Arc;

use clap::Parser;
use config::Args;
use handlers::{handle_callback_query, handle_text_message};
use router::Router;
use storages::{Storage, YamlSheetsClient};
use teloxide::prelude::*;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    pretty_env_logger::init();
    log::info!("Starting budget bot...");

    let token = match args.get_token() {
        Ok(token) => token,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let bot = Bot::new(token);

    log::info!("Using spreadsheet documents in directory: {:?}", args.remote_dir);
    let storage = Storage::new(Arc::new(YamlSheetsClient::new(args.remote_dir)));

    // Commands in group chats come as /name@username
    let bot_name = match bot.get_me().await {
        Ok(me) => me.username().to_string(),
        Err(e) => {
            log::error!("Failed to get bot info: {}", e);
            std::process::exit(1);
        }
    };

    let router = match Router::new(&storage, bot_name) {
        Ok(router) => Arc::new(router),
        Err(e) => {
            log::error!("Invalid handler configuration: {}", e);
            std::process::exit(1);
        }
    };

    let handler = dptree::entry()
        .branch(
            Update::filter_message().branch(
                dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text_message),
            ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback_query));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
