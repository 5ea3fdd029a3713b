use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use veriframe::config::Config;
use veriframe::error::AppError;
use veriframe::session::{Session, Tab};
use veriframe::upload::UploadFile;

/// VeriFrame - image watermarking, deepfake detection demo and report submission
#[derive(Parser, Debug)]
#[command(name = "veriframe")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stamp a centered text watermark onto an image and save it as PNG
    Watermark {
        /// Image to watermark
        #[arg(short, long)]
        input: PathBuf,

        /// Watermark text (defaults to the configured text)
        #[arg(short, long)]
        text: Option<String>,

        /// Directory receiving the PNG (overrides export.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Run the simulated deepfake detector on an image
    Detect {
        /// Image to analyze
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Submit a deepfake report
    Report {
        /// Reporter email address
        #[arg(short, long)]
        email: String,

        /// What is wrong with the image
        #[arg(short, long)]
        description: String,

        /// The suspected deepfake
        #[arg(short, long)]
        image: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .map_err(|e| anyhow::anyhow!(AppError::Config(e)))
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!(AppError::Config(e)))?;
    Ok(config)
}

fn read_upload(path: &Path) -> anyhow::Result<UploadFile> {
    UploadFile::from_path(path).with_context(|| format!("reading {}", path.display()))
}

async fn run(args: Args, mut config: Config) -> anyhow::Result<serde_json::Value> {
    if let Command::Watermark {
        output_dir: Some(dir),
        ..
    } = &args.command
    {
        config.export.output_dir = dir.clone();
    }

    let session = Session::from_config(&config)?;
    let mut state = session.new_state();

    match args.command {
        Command::Watermark { input, text, .. } => {
            session.select_tab(&mut state, Tab::Watermark);
            session
                .upload_for_watermark(&mut state, read_upload(&input)?)
                .await?;
            if let Some(text) = text {
                state.watermark.text = text;
            }

            let Some(result) = session.apply_watermark(&mut state).await? else {
                return Ok(json!({ "applied": false, "reason": "watermark text is empty" }));
            };
            let artifact = session.download_watermarked(&state)?;

            Ok(json!({
                "applied": true,
                "path": artifact.path,
                "fileName": artifact.file_name,
                "bytes": artifact.bytes,
                "width": result.width(),
                "height": result.height(),
                "fontSize": result.font_size(),
            }))
        }
        Command::Detect { input } => {
            session.select_tab(&mut state, Tab::Detect);
            session
                .upload_for_detection(&mut state, read_upload(&input)?)
                .await?;
            let result = session.run_detection(&mut state).await?;
            Ok(serde_json::to_value(result)?)
        }
        Command::Report {
            email,
            description,
            image,
        } => {
            session.select_tab(&mut state, Tab::Report);
            session
                .upload_for_report(&mut state, read_upload(&image)?)
                .await?;
            state.report.form.email = email;
            state.report.form.description = description;
            let ack = session.submit_report(&mut state).await?;
            Ok(serde_json::to_value(ack)?)
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = veriframe::logging::init_subscriber(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    tracing::info!(
        config_file = ?args.config,
        command = ?args.command,
        "Configuration loaded successfully"
    );

    match run(args, config).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            let alert = e
                .downcast_ref::<AppError>()
                .map(AppError::alert_message)
                .unwrap_or_else(|| format!("{:#}", e));
            tracing::error!(error = %format!("{:#}", e), "Command failed");
            eprintln!("{}", alert);
            std::process::exit(1);
        }
    }
}
