use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use client::api::Analyzer;
use client::config::ApiConfig;
use client::prepare;
use client::session::ResultSlot;
use shared::Label;

/// Submit an image to the DeepShield classification endpoint and print the
/// verdict.
#[derive(Parser)]
#[command(name = "deepshield", version, about)]
struct Args {
    /// Image file to analyze
    image: PathBuf,

    /// Classification endpoint; overrides DEEPSHIELD_API_URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Answer with the built-in mock classifier instead of calling the API
    #[arg(long)]
    mock: bool,

    /// Upload the file as-is instead of re-encoding it to a 600x600 JPEG
    #[arg(long)]
    no_resize: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.endpoint {
        Some(endpoint) => ApiConfig::new(endpoint)?,
        None => ApiConfig::from_env()?,
    };
    if args.mock {
        config.mock = true;
    }

    let bytes = std::fs::read(&args.image)?;
    let file_name = args
        .image
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image.jpg")
        .to_string();
    let original_image_url = format!("file://{}", args.image.display());

    let request = if args.no_resize {
        prepare::request_from_bytes(bytes, &file_name)
    } else {
        prepare::resize_for_upload(&bytes)?
    };

    info!(
        "Submitting {} ({} bytes) to {}",
        file_name,
        request.bytes.len(),
        config.endpoint
    );

    // One displayed result, guarded against out-of-order completions the
    // same way a resident front-end would hold it.
    let slot = ResultSlot::new();
    let ticket = slot.begin();

    let analyzer = Analyzer::new(config)?;
    slot.commit(ticket, analyzer.analyze(&request, &original_image_url).await?);

    if let Some(result) = slot.latest() {
        match result.label {
            Label::Real => println!("This image appears to be REAL"),
            Label::Fake => println!("This image appears to be FAKE"),
            Label::Unknown => println!("The classifier returned no readable verdict"),
        }
        println!("Confidence: {}%", result.confidence);
        if let Some(url) = &result.processed_image_url {
            println!("Processed image: {url}");
        }
    }

    Ok(())
}
