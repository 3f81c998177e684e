mod report;
mod stages;

use clap::{Parser, Subcommand};
use cxa_core::{
    read_csv, AnnotatedReview, CleanedReview, DataLayout, PreprocessedRecord, SentimentRecord,
};
use cxa_nlp::Tokenizer;
use cxa_sentiment::Lexicon;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cxa")]
#[command(about = "Mobile-banking review analytics pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the newest Play Store reviews for every configured bank
    Collect,
    /// Merge, deduplicate, and validate the raw datasets
    Clean,
    /// Translate Amharic reviews and extract lemmatized tokens
    Preprocess,
    /// Score every review with the lexicon and the classifier
    Sentiment,
    /// Tag every review with its bank's keyword themes
    Themes,
    /// Load the cleaned dataset into PostgreSQL
    Load,
    /// Write the markdown summary report
    Report,
    /// Run collect through report, in order
    Pipeline,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cxa_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let layout = DataLayout::new(config.data_dir.clone());
    tracing::debug!(?config, command = ?cli.command, "starting");

    match cli.command {
        Commands::Collect => {
            let banks = cxa_core::load_banks(&config.banks_path)?;
            stages::run_collect(&config, &banks, &layout).await?;
        }
        Commands::Clean => {
            let banks = cxa_core::load_banks(&config.banks_path)?;
            stages::run_clean(&banks, &layout)?;
        }
        Commands::Preprocess => {
            let cleaned: Vec<CleanedReview> = read_csv(&layout.cleaned_file())?;
            let translator = stages::translator(&config)?;
            stages::run_preprocess(cleaned, translator.as_ref(), &Tokenizer::english(), &layout)
                .await?;
        }
        Commands::Sentiment => {
            let reviews: Vec<AnnotatedReview> =
                read_csv::<PreprocessedRecord>(&layout.preprocessed_file())?
                    .into_iter()
                    .map(AnnotatedReview::from)
                    .collect();
            let model = stages::sentiment_model(&config)?;
            stages::run_sentiment(reviews, &Lexicon::general(), model.as_ref(), &layout).await?;
        }
        Commands::Themes => {
            let banks = cxa_core::load_banks(&config.banks_path)?;
            let reviews: Vec<AnnotatedReview> =
                read_csv::<SentimentRecord>(&layout.sentiment_file())?
                    .into_iter()
                    .map(AnnotatedReview::from)
                    .collect();
            stages::run_themes(reviews, &banks.theme_table(), &layout)?;
        }
        Commands::Load => stages::run_load(&config, &layout).await?,
        Commands::Report => report::run_report(&layout)?,
        Commands::Pipeline => stages::run_pipeline(&config, &layout).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
