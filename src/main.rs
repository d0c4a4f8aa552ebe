use anyhow::Result;
use clap::Parser;
use email_spam_filter::cli::{self, Cli, Commands, ProgressReporter};
use email_spam_filter::config::Config;
use email_spam_filter::error::SpamError;
use email_spam_filter::models::EmailInput;
use email_spam_filter::resources::{ensure_resources_available, LinguisticResources};
use email_spam_filter::server::ApiServer;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Exit with proper code on error
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("\nFor help, run: spam-filter --help");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("email_spam_filter=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout is reserved for JSON results
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let config = Config::load(&cli.config).await?;
    let reporter = ProgressReporter::new(!cli.verbose);

    match cli.command {
        Commands::Predict { text, file } => {
            // Missing input short-circuits before anything is loaded
            let outcome = cli::read_email_text(text, file.as_deref())
                .await
                .and_then(|text| {
                    cli::load_pipeline(&config, &reporter)?.predict(&EmailInput::from(text))
                });

            match outcome {
                Ok(result) => cli::print_json(&result)?,
                Err(e) => {
                    tracing::debug!("Prediction failed: {}", e);
                    cli::print_json_error(&e)?;
                    process::exit(1);
                }
            }
            Ok(())
        }

        Commands::Normalize { text } => {
            let text = text.ok_or(SpamError::MissingInput)?;
            let paths = ensure_resources_available(&config.resources)?;
            let normalizer = LinguisticResources::load(&paths)?.into_normalizer();

            println!("{}", normalizer.normalize(&EmailInput::from(text)));
            Ok(())
        }

        Commands::CheckResources => {
            let paths = ensure_resources_available(&config.resources)?;
            println!("WordNet:   {}", paths.wordnet_dir.display());
            match &paths.stopwords_file {
                Some(file) => println!("Stopwords: {}", file.display()),
                None => println!("Stopwords: bundled English list"),
            }

            // Loading parses every file, so a corrupt resource fails here too
            LinguisticResources::load(&paths)?;
            println!("All linguistic resources available");
            Ok(())
        }

        Commands::Serve { bind, static_dir } => {
            let addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());
            let static_dir = static_dir.or_else(|| config.server.static_dir.clone());

            // Everything is loaded before the listener accepts a request
            let pipeline = Arc::new(cli::load_pipeline(&config, &reporter)?);
            let server = ApiServer::new(pipeline, addr, static_dir);
            server.run().await?;
            Ok(())
        }

        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {:?}. Use --force to overwrite.",
                    output
                );
            }

            Config::default().save(&output).await?;
            println!("Configuration written to {:?}", output);
            Ok(())
        }
    }
}
