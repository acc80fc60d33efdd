use clap::Parser;
use profile_scraper::adapters::output::{render, ScrapeOutput};
use profile_scraper::domain::ports::Storage;
use profile_scraper::utils::error::{ErrorSeverity, ScrapeError};
use profile_scraper::utils::{logger, validation::Validate};
use profile_scraper::{CdpSession, CliConfig, LocalStorage, ProfileScraper, ScrapeOutcome};
use std::io::Write;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting profile-scraper");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Scrape failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> Result<(), ScrapeError> {
    let config = cli.resolve()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let options = config.scraper_options()?;
    let session = CdpSession::from_settings(&config.browser).await?;
    // open 會依 fetch/scrape 旗標導航並擷取
    let mut scraper = ProfileScraper::open(session, options).await?;

    let outcome = scraper
        .outcome()
        .cloned()
        .unwrap_or_else(|| ScrapeOutcome::NotSignedIn(Default::default()));
    if !outcome.is_signed_in() {
        eprintln!("❌ You are not logged in! Sign in with the browser first.");
        if config.scrape.close_on_complete {
            scraper.close().await?;
        }
    }

    for failure in outcome.report().failures() {
        tracing::info!("⚠️  {} -> {:?}", failure.step, failure.status);
    }

    let profile = scraper.profile().clone();
    let output = ScrapeOutput::new(&profile, outcome.report(), outcome.is_signed_in());
    let bytes = render(&output, config.output.format)?;

    match &config.output.path {
        Some(path) => {
            let storage = LocalStorage::new(".".to_string());
            let written = storage.write_file(path, &bytes).await?;
            tracing::info!("📁 Output saved to: {}", written);
            println!("📁 Output saved to: {}", written);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.write_all(b"\n")?;
        }
    }

    if !config.scrape.close_on_complete {
        tracing::info!("Browser left open (--keep-open)");
    }
    Ok(())
}
