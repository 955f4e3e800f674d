mod console;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use agrolink_agents::{TurnEnd, VoiceAgent, VoiceMode};
use agrolink_core::{
    AssistantInput, CommandInput, Language, NavigationHelper, Portal, RecordingSynthesizer,
    RouteCatalog, ScriptedRecognizer, SpeechCapability, VoiceSession,
};
use agrolink_ml::{IntentEngine, IntentModel, OpenAiConfig};
use agrolink_observability::{init_tracing, AppMetrics};
use clap::{Parser, Subcommand};

use crate::console::{ConsoleRecognizer, ConsoleSynthesizer};

const CLIENT_ID: &str = "agrolink-cli";

#[derive(Debug, Parser)]
#[command(name = "agrolink")]
#[command(about = "AgroLink voice command router")]
struct Cli {
    #[arg(long, env = "AGROLINK_LISTEN_TIMEOUT_MS", default_value_t = 4000)]
    listen_timeout_ms: u64,

    #[arg(long, env = "AGROLINK_PRELOAD_LIMIT", default_value_t = 3)]
    preload_limit: usize,

    #[arg(long, env = "AGROLINK_HTTP_CONNECT_TIMEOUT_SECONDS", default_value_t = 6)]
    http_connect_timeout_secs: u64,

    #[arg(long, env = "AGROLINK_HTTP_TIMEOUT_SECONDS", default_value_t = 20)]
    http_timeout_secs: u64,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Route a portal widget command through the keyword table.
    Command {
        #[arg(long)]
        portal: String,
        #[arg(long)]
        current_path: Option<String>,
        #[arg(long)]
        language: Option<String>,
        text: String,
    },
    /// Ask the global assistant.
    Ask {
        #[arg(long)]
        language: Option<String>,
        text: String,
    },
    /// Print the route table of a portal.
    Routes { portal: String },
    /// Interactive voice session reading transcripts from stdin.
    Listen {
        /// Portal widget to drive; the global assistant when omitted.
        #[arg(long)]
        portal: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
    /// Replay a transcript file through voice sessions.
    Replay {
        file: PathBuf,
        #[arg(long)]
        portal: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("agrolink_cli");
    let cli = Cli::parse();

    let agent = build_agent(&cli)?;
    let listen_timeout = Duration::from_millis(cli.listen_timeout_ms);

    match cli.command {
        Cmd::Command {
            portal,
            current_path,
            language,
            text,
        } => {
            let outcome = agent.handle_command(CommandInput {
                portal: parse_portal(&portal)?,
                text,
                language,
                current_path,
                client_id: Some(CLIENT_ID.to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Cmd::Ask { language, text } => {
            let reply = agent
                .ask(AssistantInput {
                    text,
                    language,
                    client_id: Some(CLIENT_ID.to_string()),
                })
                .await?;
            match reply {
                Some(reply) => println!("{}", serde_json::to_string_pretty(&reply)?),
                None => println!("nothing to answer"),
            }
        }
        Cmd::Routes { portal } => {
            let table = agent.routes(parse_portal(&portal)?);
            println!("{}", serde_json::to_string_pretty(table)?);
        }
        Cmd::Listen { portal, language } => {
            let mode = parse_mode(portal.as_deref())?;
            let language = Language::from_optional_str(language.as_deref());
            run_listen(&agent, mode, language, listen_timeout).await;
        }
        Cmd::Replay {
            file,
            portal,
            language,
        } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed reading transcripts from {}", file.display()))?;
            let mode = parse_mode(portal.as_deref())?;
            let language = Language::from_optional_str(language.as_deref());
            run_replay(&agent, &raw, mode, language, listen_timeout).await?;
        }
    }

    Ok(())
}

async fn run_listen(
    agent: &VoiceAgent<IntentEngine>,
    mode: VoiceMode,
    language: Language,
    listen_timeout: Duration,
) {
    let mut session = VoiceSession::new(listen_timeout);
    let mut capability = SpeechCapability::Supported(ConsoleRecognizer::new());
    let mut synthesizer = ConsoleSynthesizer;

    println!("AgroLink voice mode. type 'exit' to quit.");

    loop {
        let report = agent
            .run_turn(
                &mut session,
                &mut capability,
                &mut synthesizer,
                mode,
                language,
                CLIENT_ID,
            )
            .await;

        match report.end {
            TurnEnd::Stopped => break,
            TurnEnd::Completed => {
                if let Some(path) = report.navigate_to {
                    println!("-> {path}");
                }
            }
            TurnEnd::TimedOut | TurnEnd::Failed => {
                if let Some(message) = report.message {
                    println!("{message}");
                }
            }
            TurnEnd::Ignored => {}
        }
    }
}

async fn run_replay(
    agent: &VoiceAgent<IntentEngine>,
    raw: &str,
    mode: VoiceMode,
    language: Language,
    listen_timeout: Duration,
) -> Result<()> {
    let mut session = VoiceSession::new(listen_timeout);
    let mut capability = SpeechCapability::Supported(ScriptedRecognizer::from_lines(raw));
    let mut synthesizer = RecordingSynthesizer::default();

    loop {
        let report = agent
            .run_turn(
                &mut session,
                &mut capability,
                &mut synthesizer,
                mode,
                language,
                CLIENT_ID,
            )
            .await;
        if report.end == TurnEnd::Stopped {
            break;
        }
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}

fn parse_portal(value: &str) -> Result<Portal> {
    Portal::parse(value).with_context(|| format!("unknown portal '{value}'"))
}

fn parse_mode(portal: Option<&str>) -> Result<VoiceMode> {
    Ok(match portal {
        Some(portal) => VoiceMode::Widget(parse_portal(portal)?),
        None => VoiceMode::Assistant,
    })
}

fn build_agent(cli: &Cli) -> Result<VoiceAgent<IntentEngine>> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(cli.http_connect_timeout_secs))
        .timeout(Duration::from_secs(cli.http_timeout_secs))
        .build()
        .context("failed to build http client")?;
    let engine = IntentEngine::load(client, OpenAiConfig::from_env());
    tracing::debug!(model = engine.model_name(), "intent engine loaded");

    Ok(VoiceAgent::new(
        engine,
        Arc::new(NavigationHelper::new(RouteCatalog::builtin(), cli.preload_limit)),
        AppMetrics::shared(),
    ))
}
