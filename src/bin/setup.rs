//! One-time interactive Telegram sign-in for the status server.

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tg_presence::config::Config;
use tg_presence::presence::{CodeOutcome, TelegramPresence};

/// Sign the configured Telegram account in and save its session.
#[derive(Parser, Debug)]
#[command(name = "tg-presence-setup")]
#[command(about = "Authorize the Telegram account used by tg-presence")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("tg_presence=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = Config::load_with_env(args.config).map_err(|e| {
        error!("Application initialization failed! {}", e);
        e
    })?;

    println!("======================================================================");
    println!("TG PRESENCE - TELEGRAM AUTHORIZATION");
    println!("======================================================================");

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    // Sign-in failures are reported, not fatal.
    if let Err(e) = authorize(&config, &mut input).await {
        println!("Error while authorizing you to the Telegram API: {}", e);
    }

    Ok(())
}

async fn authorize(config: &Config, input: &mut Input) -> anyhow::Result<()> {
    let telegram = TelegramPresence::connect(config).await?;
    let session = telegram.session_path().display().to_string();

    if telegram.is_authorized().await? {
        println!("Already signed in. Session: {}", session);
        return Ok(());
    }

    let phone = prompt(input, "Please enter your phone (international format): ").await?;
    let token = telegram.request_login_code(&phone).await?;
    debug!("login code requested");

    let code = prompt(input, "Please enter the code you received: ").await?;
    match telegram.sign_in(&token, &code).await? {
        CodeOutcome::SignedIn => {}
        CodeOutcome::PasswordRequired(password_token) => {
            let hint = password_token.hint().unwrap_or("none").to_string();
            let password = prompt(
                input,
                &format!("Please enter your password (hint: {}): ", hint),
            )
            .await?;
            telegram.check_password(password_token, &password).await?;
        }
    }

    telegram.save_session()?;

    println!("----------------------------------------------------------------------");
    println!("Signed in successfully! Session saved to {}", session);
    println!("======================================================================");
    Ok(())
}

async fn prompt(input: &mut Input, message: &str) -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(message.as_bytes()).await?;
    stdout.flush().await?;

    let line = input
        .next_line()
        .await?
        .ok_or_else(|| anyhow!("input closed before a value was entered"))?;

    Ok(line.trim().to_string())
}
