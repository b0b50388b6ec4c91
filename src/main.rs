use clap::{Parser, Subcommand};
use compass_rs::compass::agents::classifier::LlmClassifier;
use compass_rs::compass::agents::AgentRegistry;
use compass_rs::compass::orchestrator::Orchestrator;
use compass_rs::compass::profile::UserProfile;
use compass_rs::compass::server;
use compass_rs::compass::store::{InMemorySessionStore, SessionStore};
use compass_rs::llm::openai::OpenAiChatModel;
use dotenv::dotenv;

use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// The model to use
        #[arg(short, long, default_value = "openai/gpt-4o-mini")]
        model: String,
    },
    /// Send one chat message from the command line
    Chat {
        /// Session to continue; a fresh one is created when omitted
        #[arg(short, long)]
        session_id: Option<String>,

        /// The message to send
        #[arg(short, long)]
        message: String,

        /// Resume a turn that is waiting for input
        #[arg(short, long, default_value_t = false)]
        resume: bool,

        /// The model to use
        #[arg(long, default_value = "openai/gpt-4o-mini")]
        model: String,
    },
}

fn build_orchestrator(
    model_name: &str,
    store: Arc<dyn SessionStore>,
) -> Result<Orchestrator, Box<dyn std::error::Error + Send + Sync>> {
    let model = Arc::new(OpenAiChatModel::from_env(model_name.to_string())?);
    let classifier = Arc::new(LlmClassifier::new(model.clone()));
    let agents = AgentRegistry::with_model(model);
    Ok(Orchestrator::new(classifier, agents, store))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();
    // env_logger handles log-macro output; this subscriber catches the HTTP
    // trace layer's tracing events
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Serve { port, model } => {
            let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
            let orchestrator = Arc::new(build_orchestrator(&model, store.clone())?);
            log::info!("Starting server with model: {}", model);
            server::serve(port, orchestrator, store).await?;
        }
        Commands::Chat {
            session_id,
            message,
            resume,
            model,
        } => {
            let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
            let orchestrator = build_orchestrator(&model, store.clone())?;

            let session_id = match session_id {
                Some(id) => id,
                None => {
                    let id = store.create_session(UserProfile::default()).await?;
                    println!("Created session: {}", id);
                    id
                }
            };

            let outcome = orchestrator
                .process_turn(&session_id, &message, None, resume)
                .await;

            println!("[{}] {}", outcome.agent_type, outcome.message);
            if outcome.requires_input {
                println!(
                    "(waiting for {} input; reply with --resume)",
                    outcome.input_type.as_deref().unwrap_or("user")
                );
            }
        }
    }

    Ok(())
}
