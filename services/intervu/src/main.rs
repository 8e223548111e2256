use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use intervu_core::controller::{CallController, ControllerConfig};
use intervu_core::gateway::HttpGateway;
use intervu_core::generate::{InterviewDraft, submit_draft};
use intervu_core::route::Route;
use intervu_core::session_state::{CallStatus, InterviewContext};
use intervu_core::types::InterviewType;
use intervu_core::{Command, Input};
use intervu_service::config::Config;
use intervu_service::vapi_adapter::VapiAdapter;
use intervu_service::{assistant_loader, shell};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "AI mock interviews from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new interview for a role
    Generate(GenerateArgs),
    /// Run a voice interview and request feedback when it ends
    Interview(InterviewArgs),
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    user_id: String,
    /// The role being interviewed for, ex: "Frontend Developer"
    #[arg(long)]
    role: String,
    /// Seniority, ex: "Junior"
    #[arg(long)]
    level: String,
    /// technical, behavioural or mixed
    #[arg(long = "type", default_value = "technical")]
    interview_type: InterviewType,
    #[arg(long, default_value_t = 5)]
    amount: u32,
    /// Comma separated, ex: "React, TypeScript"
    #[arg(long, default_value = "")]
    techstack: String,
}

#[derive(Args)]
struct InterviewArgs {
    #[arg(long)]
    user_id: String,
    #[arg(long)]
    interview_id: String,
    /// Existing feedback to replace
    #[arg(long)]
    feedback_id: Option<String>,
    /// Repeat once per question, in order
    #[arg(long = "question")]
    questions: Vec<String>,
    #[arg(long, default_value = "Candidate")]
    user_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Configuration loaded successfully. Starting intervu...");

    // --- 3. Parse Command-Line Arguments ---
    let cli = Cli::parse();
    let gateway = Arc::new(HttpGateway::new(&config.app_base_url));

    match cli.command {
        Commands::Generate(args) => run_generate(&gateway, args).await,
        Commands::Interview(args) => run_interview(&config, gateway, args).await,
    }
}

async fn run_generate(gateway: &HttpGateway, args: GenerateArgs) -> Result<()> {
    let draft = InterviewDraft {
        role: args.role,
        level: args.level,
        interview_type: args.interview_type,
        question_count: args.amount,
        tech_stack: args.techstack,
    };

    match submit_draft(gateway, draft, &args.user_id).await {
        Command::Navigate(route) => {
            println!("Interview created. Back to {route}");
            Ok(())
        }
        Command::Alert(message) => anyhow::bail!("{}", message),
        other => {
            tracing::warn!("unexpected command from the generate flow: {:?}", other);
            Ok(())
        }
    }
}

async fn run_interview(config: &Config, gateway: Arc<HttpGateway>, args: InterviewArgs) -> Result<()> {
    let token = config.require_vapi_token()?;

    // --- 4. Load Prompts ---
    let prompts = match assistant_loader::load_prompts(&config.prompts_dir) {
        Ok(prompts) => {
            tracing::info!("Loaded {} prompts successfully.", prompts.len());
            prompts
        }
        Err(e) => {
            tracing::warn!("Falling back to the built-in interviewer prompt: {:?}", e);
            HashMap::new()
        }
    };
    let assistant = assistant_loader::interviewer_assistant(&prompts);
    tracing::debug!("Assistant config: {}", serde_json::to_string(&assistant)?);

    // --- 5. Connect the voice session ---
    let voice_config = voice_realtime::Config::builder()
        .with_base_url(&config.vapi_base_url)
        .with_api_key(token)
        .build();
    let voice = Arc::new(VapiAdapter::connect(voice_config).await?);

    // --- 6. Mount the call view ---
    let mut context = InterviewContext::new(&args.interview_id, &args.user_id);
    if let Some(feedback_id) = &args.feedback_id {
        context = context.with_feedback_id(feedback_id);
    }
    let controller_config = ControllerConfig::interview(context, assistant)
        .with_questions(args.questions)
        .with_error_grace(config.error_grace);

    // Create the command channel to decouple core logic from the terminal.
    let (command_tx, command_rx) = mpsc::channel::<Command>(32);
    let (input_tx, input_rx) = mpsc::channel::<Input>(8);

    let controller = CallController::mount(controller_config, voice.clone(), gateway, command_tx);
    let controller_handle = tokio::spawn(controller.run(input_rx));

    println!("{}", shell::banner(&args.user_name));
    spawn_stdin_reader(input_tx.clone());
    let command_handler = tokio::spawn(handle_commands(command_rx, voice));

    tokio::select! {
        handled = command_handler => {
            if let Some(route) = handled.context("Command handler failed")? {
                tracing::info!("Call view left for {}", route);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, leaving the interview.");
        }
    }

    // Leaving the view tears the controller down; it may already be gone.
    if input_tx.send(Input::Unmount).await.is_err() {
        tracing::debug!("controller already stopped");
    }
    controller_handle
        .await
        .context("Call controller task failed")??;
    Ok(())
}

// Prints commands until the controller navigates away or stops.
async fn handle_commands(
    mut command_rx: mpsc::Receiver<Command>,
    voice: Arc<VapiAdapter<voice_realtime::Client>>,
) -> Option<Route> {
    while let Some(command) = command_rx.recv().await {
        tracing::debug!("COMMAND RECEIVED: {:?}", command);
        if command == Command::StatusChanged(CallStatus::Finished) {
            match voice.stats().await {
                Ok(stats) => tracing::info!("Call finished. Stats: {:?}", stats),
                Err(e) => tracing::warn!("Failed to read call stats: {:?}", e),
            }
        }
        if let Some(line) = shell::render_command(&command) {
            println!("{line}");
        }
        if let Command::Navigate(route) = command {
            return Some(route);
        }
    }
    None
}

// Blocking stdin lives on its own thread so shutdown never waits on a read.
fn spawn_stdin_reader(input_tx: mpsc::Sender<Input>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else {
                break;
            };
            let Some(input) = shell::parse_input(&line) else {
                if !line.trim().is_empty() {
                    println!("Unknown command: {}", line.trim());
                }
                continue;
            };
            if input_tx.blocking_send(input).is_err() {
                break;
            }
        }
    });
}
