use async_trait::async_trait;
use cxa_core::{read_csv, Judgment, RawReview, SentimentLabel, ThematicRecord};
use cxa_nlp::NlpError;
use cxa_sentiment::{SentimentError, ThemeCount};

use super::*;

const BANKS: &str = r"
banks:
  - name: Commercial Bank of Ethiopia
    app_id: com.combanketh.mobilebanking
    themes:
      - name: Account Access
        keywords: [login, password]
      - name: Transactions
        keywords: [transfer]
  - name: Dashen Bank
    app_id: com.dashen.dashensuperapp
";

struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _text: &str) -> Result<String, NlpError> {
        Err(NlpError::EmptyTranslation)
    }
}

struct NegativeModel;

#[async_trait]
impl SentimentModel for NegativeModel {
    async fn classify(&self, _text: &str) -> Result<Judgment, SentimentError> {
        Ok(Judgment {
            label: SentimentLabel::Negative,
            score: 0.8,
        })
    }
}

fn raw(bank: &str, text: &str, rating: f64, date: &str) -> RawReview {
    RawReview {
        bank: bank.to_owned(),
        review: Some(text.to_owned()),
        rating: Some(rating),
        date: Some(date.to_owned()),
        source: "Google Play".to_owned(),
    }
}

fn banks() -> BanksFile {
    BanksFile::from_yaml_str(BANKS).unwrap()
}

#[test]
fn clean_merges_bank_datasets_into_cleaned_file() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    write_csv(
        &layout.bank_raw_file("Commercial Bank of Ethiopia"),
        &[
            raw("Commercial Bank of Ethiopia", "Login fails", 1.0, "2024-06-01 08:00:00"),
            raw("Commercial Bank of Ethiopia", "Login fails", 1.0, "2024-06-01 08:00:00"),
        ],
    )
    .unwrap();
    write_csv(
        &layout.bank_raw_file("Dashen Bank"),
        &[raw("Dashen Bank", "Fast", 5.0, "2024-06-02 09:00:00")],
    )
    .unwrap();

    let cleaned = run_clean(&banks(), &layout).unwrap();

    assert_eq!(cleaned.len(), 2);
    let on_disk: Vec<CleanedReview> = read_csv(&layout.cleaned_file()).unwrap();
    assert_eq!(on_disk, cleaned);
}

#[test]
fn clean_without_raw_datasets_fails() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());

    let err = run_clean(&banks(), &layout).unwrap_err();

    assert!(err.to_string().contains("run `cxa collect` first"), "got {err:#}");
}

#[tokio::test]
async fn file_stages_chain_through_to_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    let banks = banks();
    let (cleaned, _) = cxa_scraper::normalize_reviews(vec![
        raw("Commercial Bank of Ethiopia", "Cannot login after the update", 1.0, "2024-06-01"),
        raw("Commercial Bank of Ethiopia", "ሰላም ጥሩ ነው", 4.0, "2024-06-01"),
        raw("Dashen Bank", "Works fine", 4.0, "2024-06-03"),
    ]);

    let preprocessed = run_preprocess(cleaned, &FailingTranslator, &Tokenizer::english(), &layout)
        .await
        .unwrap();
    let scored = run_sentiment(preprocessed, &Lexicon::general(), &NegativeModel, &layout)
        .await
        .unwrap();
    let themed = run_themes(scored, &banks.theme_table(), &layout).unwrap();
    report::run_report(&layout).unwrap();

    assert_eq!(themed[0].themes, vec!["Account Access"]);
    assert!(layout.quarantine_file().exists());

    let thematic: Vec<ThematicRecord> = read_csv(&layout.thematic_file()).unwrap();
    assert_eq!(thematic.len(), 3);
    assert!(thematic
        .iter()
        .all(|r| r.distilbert_label == SentimentLabel::Negative));

    let counts: Vec<ThemeCount> = read_csv(&layout.theme_aggregates_file()).unwrap();
    assert!(counts.iter().any(|c| c.bank == "Dashen Bank" && c.theme == "General"));

    let report = std::fs::read_to_string(layout.report_file()).unwrap();
    assert!(report.contains("| Commercial Bank of Ethiopia | 0 | 2 | 0 | 2 |"));
    assert!(report.contains("| Dashen Bank | General | 1 |"));
}
