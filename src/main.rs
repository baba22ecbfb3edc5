use color_eyre::eyre::{
    Result,
    eyre,
};
use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

use river_lobby::client::{
    self,
    AppConfig,
    DEFAULT_PIT_BOSS_URL,
    PitBossMode,
};
use river_lobby::session::DEFAULT_OPENING_BALANCE;

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: river-lobby [--offline | --pit-boss-url <url>]\n\
         [--username <name>] [--opening-balance <chips>]\n\
         [--transcript-dir <path>]\n\
         \n\
         Flags:\n\
           --offline               Use canned pit boss lines instead of the response service\n\
           --pit-boss-url <url>    Pit boss response service endpoint (default {DEFAULT_PIT_BOSS_URL})\n\
           --username <name>       Pre-fill the landing screen's player name\n\
           --opening-balance <n>   Chips the session starts with (default {DEFAULT_OPENING_BALANCE})\n\
           --transcript-dir <path> Where chat transcripts are exported"
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<AppConfig> {
    let mut args = std::env::args().skip(1);
    let mut offline = false;
    let mut pit_boss_url: Option<String> = None;
    let mut username: Option<String> = None;
    let mut opening_balance: Option<u64> = None;
    let mut transcript_dir: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--offline" => offline = true,
            "--pit-boss-url" => {
                let url = args
                    .next()
                    .ok_or_else(|| eyre!("--pit-boss-url requires a URL argument"))?;
                if pit_boss_url.is_some() {
                    return Err(eyre!("--pit-boss-url may only be specified once"));
                }
                pit_boss_url = Some(url);
            }
            "--username" => {
                let name = args
                    .next()
                    .ok_or_else(|| eyre!("--username requires a name argument"))?;
                if username.is_some() {
                    return Err(eyre!("--username may only be specified once"));
                }
                username = Some(name);
            }
            "--opening-balance" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--opening-balance requires a chip amount"))?;
                if opening_balance.is_some() {
                    return Err(eyre!("--opening-balance may only be specified once"));
                }
                let chips = raw
                    .parse::<u64>()
                    .map_err(|_| eyre!("--opening-balance must be a non-negative integer"))?;
                opening_balance = Some(chips);
            }
            "--transcript-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--transcript-dir requires a path argument"))?;
                if transcript_dir.is_some() {
                    return Err(eyre!("--transcript-dir may only be specified once"));
                }
                transcript_dir = Some(dir);
            }
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    if offline && pit_boss_url.is_some() {
        return Err(eyre!("--offline and --pit-boss-url are mutually exclusive"));
    }
    let pit_boss = if offline {
        PitBossMode::Offline
    } else {
        PitBossMode::Http {
            url: pit_boss_url.unwrap_or_else(|| DEFAULT_PIT_BOSS_URL.to_string()),
        }
    };

    Ok(AppConfig {
        pit_boss,
        username,
        opening_balance: opening_balance.unwrap_or(DEFAULT_OPENING_BALANCE),
        transcript_dir,
    })
}

fn init_logging() {
    // The terminal is owned by the TUI; logs go to a daily rolling file.
    let file_appender = rolling::daily("logs", "river-lobby.log");
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();
    let config = parse_cli_args()?;
    tracing::info!(?config, "starting river-lobby");
    client::run_app(config).await
}
