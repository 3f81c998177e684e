//! Stage command handlers for the CLI.
//!
//! Each handler takes its input rows, runs one library stage, writes that
//! stage's datasets, and prints a one-line summary. `run_pipeline` chains
//! them in memory; the single-stage subcommands read their input from the
//! previous stage's dataset.

use anyhow::Context as _;
use cxa_core::{
    write_csv, AnnotatedReview, AppConfig, BanksFile, CleanedReview, DataLayout,
    PreprocessedRecord, SentimentRecord, ThematicRecord, ThemeTable,
};
use cxa_nlp::{GoogleTranslateClient, Tokenizer, Translator};
use cxa_scraper::{CollectReport, PlayStoreClient, ReviewQuery};
use cxa_sentiment::{Lexicon, SentimentModel, TeiClassifier};

use crate::report;

pub(crate) fn translator(config: &AppConfig) -> anyhow::Result<Box<dyn Translator>> {
    let client = GoogleTranslateClient::new(
        &config.translate_url,
        config.http_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build translation client: {e}"))?;
    Ok(Box::new(client))
}

pub(crate) fn sentiment_model(config: &AppConfig) -> anyhow::Result<Box<dyn SentimentModel>> {
    let client = TeiClassifier::new(
        &config.sentiment_model_url,
        config.http_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build sentiment model client: {e}"))?;
    Ok(Box::new(client))
}

/// Scrape every configured bank and write the raw datasets.
///
/// # Errors
///
/// Returns an error if the Play Store client cannot be built, a dataset
/// cannot be written, or every bank failed. Individual bank failures are
/// logged and skipped.
pub(crate) async fn run_collect(
    config: &AppConfig,
    banks: &BanksFile,
    layout: &DataLayout,
) -> anyhow::Result<CollectReport> {
    let client = PlayStoreClient::new(
        &config.play_base_url,
        config.http_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Play Store client: {e}"))?;
    let query = ReviewQuery::newest(
        &config.review_lang,
        &config.review_country,
        config.review_count,
    );

    let collections = cxa_scraper::collect_reviews(&client, &banks.banks, &query).await;
    let report = cxa_scraper::persist_collection(layout, &collections)?;

    for (bank, count) in &report.per_bank {
        println!("{bank}: {count} reviews");
    }
    println!(
        "collect complete: {} reviews, {} files written, {} banks failed",
        report.total_reviews,
        report.files_written,
        report.failed_banks.len()
    );

    if report.all_failed() {
        anyhow::bail!(
            "review collection failed for every bank: [{}]",
            report.failed_banks.join(", ")
        );
    }
    Ok(report)
}

/// Merge the raw datasets into the cleaned dataset.
///
/// # Errors
///
/// Returns an error if no raw dataset exists or a dataset cannot be read or
/// written.
pub(crate) fn run_clean(
    banks: &BanksFile,
    layout: &DataLayout,
) -> anyhow::Result<Vec<CleanedReview>> {
    let raw = cxa_scraper::load_raw_datasets(layout, &banks.banks)
        .context("no raw review datasets to clean; run `cxa collect` first")?;
    let (cleaned, report) = cxa_scraper::normalize_reviews(raw.reviews);
    write_csv(&layout.cleaned_file(), &cleaned)?;

    println!(
        "clean complete: {} of {} rows kept ({} duplicates, {} missing, {} bad dates, {} bad ratings removed)",
        report.output_rows,
        report.input_rows,
        report.duplicates_removed,
        report.missing_removed,
        report.invalid_date_removed,
        report.invalid_rating_removed
    );
    for (bank, count) in &report.per_bank {
        println!("{bank}: {count} rows");
    }
    Ok(cleaned)
}

/// Translate and tokenize cleaned reviews.
///
/// # Errors
///
/// Returns an error if the preprocessed or quarantine dataset cannot be
/// written. Translation failures only quarantine the affected rows.
pub(crate) async fn run_preprocess(
    cleaned: Vec<CleanedReview>,
    translator: &dyn Translator,
    tokenizer: &Tokenizer,
    layout: &DataLayout,
) -> anyhow::Result<Vec<AnnotatedReview>> {
    let output = cxa_nlp::normalize_language(cleaned, translator, tokenizer).await;

    let records: Vec<PreprocessedRecord> =
        output.reviews.iter().map(PreprocessedRecord::from).collect();
    write_csv(&layout.preprocessed_file(), &records)?;
    cxa_nlp::persist_quarantine(layout, &output.quarantine)?;

    let r = output.report;
    println!(
        "preprocess complete: {} rows, {} Amharic, {} translated, {} quarantined",
        r.processed, r.foreign, r.translated, r.quarantined
    );
    Ok(output.reviews)
}

/// Score preprocessed reviews and write per-row and aggregated sentiment.
///
/// # Errors
///
/// Returns an error if a dataset cannot be written. Classifier failures fall
/// back to a neutral judgment for the affected rows.
pub(crate) async fn run_sentiment(
    reviews: Vec<AnnotatedReview>,
    lexicon: &Lexicon,
    model: &dyn SentimentModel,
    layout: &DataLayout,
) -> anyhow::Result<Vec<AnnotatedReview>> {
    let (tagged, report) = cxa_sentiment::tag_sentiment(reviews, lexicon, model).await;

    let records: Vec<SentimentRecord> = tagged.iter().map(SentimentRecord::from).collect();
    write_csv(&layout.sentiment_file(), &records)?;
    let aggregates = cxa_sentiment::aggregate_sentiment(&tagged);
    write_csv(&layout.sentiment_aggregates_file(), &aggregates)?;

    println!(
        "sentiment complete: {} rows, {} groups, {} classifier failures",
        report.processed,
        aggregates.len(),
        report.model_failures
    );
    Ok(tagged)
}

/// Tag themes and write per-row themes and per-bank theme counts.
///
/// # Errors
///
/// Returns an error if a dataset cannot be written.
pub(crate) fn run_themes(
    reviews: Vec<AnnotatedReview>,
    table: &ThemeTable,
    layout: &DataLayout,
) -> anyhow::Result<Vec<AnnotatedReview>> {
    let tagged = cxa_sentiment::tag_themes(reviews, table);

    let records: Vec<ThematicRecord> = tagged.iter().map(ThematicRecord::from).collect();
    write_csv(&layout.thematic_file(), &records)?;
    let counts = cxa_sentiment::aggregate_themes(&tagged);
    write_csv(&layout.theme_aggregates_file(), &counts)?;

    println!(
        "themes complete: {} rows, {} (bank, theme) pairs",
        tagged.len(),
        counts.len()
    );
    Ok(tagged)
}

/// Load the cleaned dataset into PostgreSQL.
///
/// The pool is closed before returning, whether or not the load succeeded.
///
/// # Errors
///
/// Returns an error if the cleaned dataset cannot be read, `DATABASE_URL` is
/// unset, the connection fails, or the load transaction is rolled back.
pub(crate) async fn run_load(config: &AppConfig, layout: &DataLayout) -> anyhow::Result<()> {
    let reviews: Vec<CleanedReview> = cxa_core::read_csv(&layout.cleaned_file())
        .context("no cleaned dataset to load; run `cxa clean` first")?;

    let pool = cxa_db::connect_pool_from_config(config).await?;
    let result = cxa_db::load_cleaned_reviews(&pool, &reviews).await;
    pool.close().await;

    let report = result.context("load rolled back")?;
    println!(
        "load complete: {} of {} reviews inserted, {} failed, {} new banks",
        report.inserted, report.attempted, report.failed, report.banks_created
    );
    Ok(())
}

/// Run every file stage in order, then write the report.
///
/// # Errors
///
/// Returns the first stage error.
pub(crate) async fn run_pipeline(config: &AppConfig, layout: &DataLayout) -> anyhow::Result<()> {
    let banks = cxa_core::load_banks(&config.banks_path)?;
    let translator = translator(config)?;
    let model = sentiment_model(config)?;

    run_collect(config, &banks, layout).await?;
    let cleaned = run_clean(&banks, layout)?;
    let preprocessed =
        run_preprocess(cleaned, translator.as_ref(), &Tokenizer::english(), layout).await?;
    let scored = run_sentiment(preprocessed, &Lexicon::general(), model.as_ref(), layout).await?;
    run_themes(scored, &banks.theme_table(), layout)?;
    report::run_report(layout)?;

    tracing::info!(data_dir = %layout.processed_dir().display(), "pipeline complete");
    Ok(())
}

#[cfg(test)]
#[path = "stages_test.rs"]
mod tests;
