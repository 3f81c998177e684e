//! The language normalization stage over a cleaned dataset.

use cxa_core::{write_csv, AnnotatedReview, CleanedReview, DataLayout, DatasetError};

use crate::detect::is_foreign_script;
use crate::tokenize::Tokenizer;
use crate::translate::Translator;

/// Row counts for one language normalization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanguageReport {
    pub processed: usize,
    pub foreign: usize,
    pub translated: usize,
    pub quarantined: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LanguageOutput {
    /// Every input row, in input order, with `is_foreign_script` and
    /// `tokens` set.
    pub reviews: Vec<AnnotatedReview>,
    /// Original rows whose translation failed.
    pub quarantine: Vec<CleanedReview>,
    pub report: LanguageReport,
}

/// Detect, translate, and tokenize every review.
///
/// Translation failures never fail the stage: the row keeps its original
/// text, is tokenized as-is, and is copied into the quarantine set.
pub async fn normalize_language(
    reviews: Vec<CleanedReview>,
    translator: &dyn Translator,
    tokenizer: &Tokenizer,
) -> LanguageOutput {
    let mut output = LanguageOutput {
        reviews: Vec::with_capacity(reviews.len()),
        ..LanguageOutput::default()
    };

    for review in reviews {
        output.report.processed += 1;
        let mut annotated = AnnotatedReview::new(review);
        annotated.is_foreign_script = is_foreign_script(annotated.text());

        if annotated.is_foreign_script {
            output.report.foreign += 1;
            match translator.translate(annotated.text()).await {
                Ok(translated) => {
                    annotated.review.review = translated;
                    output.report.translated += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        bank = %annotated.bank(),
                        error = %e,
                        "translation failed, keeping original text"
                    );
                    output.quarantine.push(annotated.review.clone());
                }
            }
        }

        annotated.tokens = tokenizer.tokenize(annotated.text());
        output.reviews.push(annotated);
    }

    output.report.quarantined = output.quarantine.len();
    tracing::info!(
        processed = output.report.processed,
        foreign = output.report.foreign,
        translated = output.report.translated,
        quarantined = output.report.quarantined,
        "language normalization complete"
    );
    output
}

/// Write the quarantine dataset if any row failed translation.
///
/// Returns `true` when a file was written.
///
/// # Errors
///
/// Returns [`DatasetError`] if the dataset cannot be written.
pub fn persist_quarantine(
    layout: &DataLayout,
    quarantine: &[CleanedReview],
) -> Result<bool, DatasetError> {
    if quarantine.is_empty() {
        return Ok(false);
    }
    let path = layout.quarantine_file();
    write_csv(&path, quarantine)?;
    tracing::info!(path = %path.display(), rows = quarantine.len(), "wrote untranslated reviews");
    Ok(true)
}
