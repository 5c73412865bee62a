//! DeadlineBuddy Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::{prelude::*, types::Update};
use tracing::{error, info, warn};

use DeadlineBuddy::{
    config::Settings,
    controller::{DeadlineCache, GroupLifecycleController},
    database::{create_pool, DeadlineStore},
    scheduler::CountdownScheduler,
    transport::{TelegramTransport, Transport},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file appender on exit
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting DeadlineBuddy Telegram Bot...");

    // Initialize database connection; failure here aborts startup
    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;

    let store = DeadlineStore::new(pool);
    store.ensure_schema().await?;

    // Initialize bot and collaborators
    let bot = Bot::new(&settings.bot.token);
    let transport: Arc<dyn Transport> = Arc::new(TelegramTransport::new(bot.clone()));
    let cache = DeadlineCache::new();
    let scheduler = Arc::new(CountdownScheduler::new(
        cache.clone(),
        Arc::clone(&transport),
        settings.schedule,
    ));
    let controller = Arc::new(GroupLifecycleController::new(
        cache,
        Arc::new(store),
        Arc::clone(&scheduler),
        transport,
        settings.schedule,
    ));

    // Reinstall one job per stored deadline before taking traffic
    info!("Rehydrating countdown jobs from storage...");
    controller.rehydrate().await?;

    info!("Setting up bot handlers...");
    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![Arc::clone(&controller)])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("DeadlineBuddy bot is ready!");
    dispatcher.dispatch().await;

    controller.shutdown().await;
    info!("DeadlineBuddy bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_group_message))
        .branch(Update::filter_my_chat_member().endpoint(handle_chat_member_update))
}

/// Handle text messages in group chats as deadline submissions
async fn handle_group_message(
    msg: Message,
    controller: Arc<GroupLifecycleController>,
) -> HandlerResult {
    // Deadline submissions only come from multi-member chats
    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };
    if text.starts_with('/') {
        return Ok(());
    }

    if let Err(e) = controller.on_deadline_submitted(msg.chat.id.0, text).await {
        error!(group_id = msg.chat.id.0, error = %e, "Error handling deadline submission");
        return Err(e.into());
    }

    Ok(())
}

/// Handle chat member updates (bot added/removed from groups)
async fn handle_chat_member_update(
    bot: Bot,
    update: teloxide::types::ChatMemberUpdated,
    controller: Arc<GroupLifecycleController>,
) -> HandlerResult {
    // Only react to the bot itself joining a group
    let bot_user = bot.get_me().await?;
    if update.new_chat_member.user.id != bot_user.id {
        return Ok(());
    }
    if !update.new_chat_member.kind.is_present() {
        return Ok(());
    }

    if let Err(e) = controller.on_group_joined(update.chat.id.0).await {
        error!(group_id = update.chat.id.0, error = %e, "Error handling group join");
        return Err(e.into());
    }

    Ok(())
}
