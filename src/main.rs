use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use qtcord::application::{
    ChatService, LoginRequest, LoginResponse, LoginUseCase, ResolveTokenUseCase,
};
use qtcord::domain::entities::{ChannelId, GuildId, LoginTicket, UserId};
use qtcord::domain::ports::{HttpPort, IconCachePort, TokenStoragePort};
use qtcord::domain::session::{DEFAULT_USER_AGENT, SessionState};
use qtcord::infrastructure::{
    AppConfig, CliArgs, Command, DiscordClient, FileTokenStorage, GuildIconCache, ReqwestHttp,
    StorageManager, read_secret,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{label}: ")?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let value = line.trim().to_string();

    if value.is_empty() {
        return Err(eyre!("{label} is required"));
    }
    Ok(value)
}

fn prompt_secret(label: &str) -> Result<String> {
    match read_secret(label)? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(eyre!("{label} is required")),
        None => Err(eyre!("{label} entry cancelled")),
    }
}

struct Services {
    session: Arc<SessionState>,
    login: LoginUseCase,
    resolve: ResolveTokenUseCase,
    chat: ChatService,
}

fn create_services(config: &AppConfig, storage: &StorageManager) -> Result<Services> {
    let session = Arc::new(SessionState::new(&config.api_base, DEFAULT_USER_AGENT));
    let http: Arc<dyn HttpPort> = Arc::new(ReqwestHttp::new()?);

    let client = Arc::new(DiscordClient::new(http.clone(), session.clone()));
    let token_storage: Arc<dyn TokenStoragePort> =
        Arc::new(FileTokenStorage::new(storage.token_path()));
    let icons: Arc<dyn IconCachePort> = Arc::new(
        GuildIconCache::new(http, storage.icon_cache_root())
            .with_cdn_base(&config.cdn_base)
            .with_user_agent(DEFAULT_USER_AGENT),
    );

    Ok(Services {
        login: LoginUseCase::new(client.clone(), token_storage.clone(), session.clone()),
        resolve: ResolveTokenUseCase::new(token_storage, session.clone()),
        chat: ChatService::new(client, icons).with_message_limit(config.effective_message_limit()),
        session,
    })
}

async fn run_login(
    services: &Services,
    email: Option<String>,
    persist_token: bool,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email")?,
    };
    let password = prompt_secret("Password")?;

    let mut request = LoginRequest::new(email, password);
    if !persist_token {
        request = request.without_persistence();
    }

    let mut response = services.login.execute(request).await?;
    if let LoginResponse::NeedsSecondFactor(ticket) = response {
        response = complete_totp(services, ticket, persist_token).await?;
    }

    match response {
        LoginResponse::Authenticated {
            token_persisted, ..
        } => {
            println!("Logged in.");
            if persist_token && !token_persisted {
                println!("Warning: the token could not be saved; you will need to log in again.");
            }
            Ok(())
        }
        LoginResponse::Failed(failure) => Err(eyre!("{}", failure.diagnostic())),
        LoginResponse::NeedsSecondFactor(_) => Err(eyre!("second factor was not completed")),
    }
}

async fn complete_totp(
    services: &Services,
    ticket: LoginTicket,
    persist_token: bool,
) -> Result<LoginResponse> {
    let code = prompt_secret("TOTP code")?.trim().to_string();
    Ok(services
        .login
        .complete_second_factor(ticket, &code, persist_token)
        .await?)
}

async fn run(command: Command, services: &Services) -> Result<()> {
    match command {
        Command::Login { email, no_persist } => run_login(services, email, !no_persist).await?,
        Command::Logout => {
            services.login.logout().await?;
            println!("Logged out.");
        }
        Command::Guilds => {
            for guild in services.chat.list_guilds().await? {
                let Some(id) = guild.id() else { continue };
                let icon = services.chat.guild_icon_path(&id);
                let icon = if icon.exists() {
                    icon.display().to_string()
                } else {
                    "-".to_string()
                };
                println!("{id}\t{}\t{icon}", guild.name().unwrap_or_default());
            }
        }
        Command::Channels { guild } => {
            let channels = services
                .chat
                .list_guild_channels(&GuildId::new(guild))
                .await?;
            println!("{}", serde_json::to_string_pretty(&channels)?);
        }
        Command::Messages {
            channel,
            limit,
            before,
        } => {
            let messages = services
                .chat
                .fetch_messages(&ChannelId::new(channel), limit, before)
                .await?;
            for message in messages {
                println!("[{}] {}: {}", message.id, message.display_name, message.content);
            }
        }
        Command::Send { channel, text } => {
            services.chat.send_message(ChannelId::new(channel), text).await?;
        }
        Command::Typing { channel } => {
            services.chat.send_typing(&ChannelId::new(channel)).await?;
        }
        Command::Friends => {
            let friends = services.chat.list_friends().await?;
            println!("{}", serde_json::to_string_pretty(&friends)?);
        }
        Command::Dm { user } => {
            let channel = services.chat.resolve_dm_channel(&UserId::new(user)).await?;
            println!("{channel}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage
        .load_config(args.config.as_deref())
        .wrap_err("failed to load configuration")?;
    config.merge_with_args(&args);

    init_logging(&config)?;
    info!(version = qtcord::VERSION, "Starting QTCord");

    let services = create_services(&config, &storage)?;

    if !matches!(args.command, Command::Login { .. } | Command::Logout) {
        let resolved = services.resolve.execute(config.token.clone()).await?;
        match resolved {
            Some(resolved) => info!(source = %resolved.source, "Session token loaded"),
            None => {
                warn!("No session token available");
                eprintln!("Not logged in; run `qtcord login` or pass --token.");
            }
        }
    }

    let result = run(args.command, &services).await;
    if result.is_err() && !services.session.current().is_authenticated() {
        warn!("Command failed without a session token");
    }
    result
}
