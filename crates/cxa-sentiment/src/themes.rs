//! Keyword-based theme tagging.

use std::collections::BTreeMap;

use cxa_core::{AnnotatedReview, ThemeDefinition, ThemeTable, GENERAL_THEME};
use serde::{Deserialize, Serialize};

/// Review count for one `(bank, theme)` pair. A row of `theme_aggregates.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCount {
    pub bank: String,
    #[serde(rename = "themes")]
    pub theme: String,
    pub count: usize,
}

/// Names of every theme with a keyword in `text`, in definition order.
///
/// Falls back to `["General"]` when nothing matches, including when
/// `definitions` is empty.
#[must_use]
pub fn assign_themes(text: &str, definitions: &[ThemeDefinition]) -> Vec<String> {
    let lowered = text.to_lowercase();
    let matched: Vec<String> = definitions
        .iter()
        .filter(|d| d.matches(&lowered))
        .map(|d| d.name.clone())
        .collect();

    if matched.is_empty() {
        vec![GENERAL_THEME.to_owned()]
    } else {
        matched
    }
}

/// Set `themes` on every review from its bank's definitions.
#[must_use]
pub fn tag_themes(mut reviews: Vec<AnnotatedReview>, table: &ThemeTable) -> Vec<AnnotatedReview> {
    for review in &mut reviews {
        review.themes = assign_themes(review.text(), table.themes_for(review.bank()));
    }
    tracing::info!(reviews = reviews.len(), "theme tagging complete");
    reviews
}

/// Count reviews per `(bank, theme)`, sorted by that key.
///
/// A review with several themes counts once for each.
#[must_use]
pub fn aggregate_themes(reviews: &[AnnotatedReview]) -> Vec<ThemeCount> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for review in reviews {
        for theme in &review.themes {
            *counts.entry((review.bank(), theme.as_str())).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|((bank, theme), count)| ThemeCount {
            bank: bank.to_owned(),
            theme: theme.to_owned(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cxa_core::{BanksFile, CleanedReview};

    const BANKS: &str = r"
banks:
  - name: Commercial Bank of Ethiopia
    app_id: com.combanketh.mobilebanking
    themes:
      - name: Account Access
        keywords: [login, access, sign, account, authentication]
      - name: Transactions
        keywords: [transfer, payment, withdraw, deposit, send]
  - name: Dashen Bank
    app_id: com.dashen.dashensuperapp
";

    fn table() -> ThemeTable {
        BanksFile::from_yaml_str(BANKS).unwrap().theme_table()
    }

    fn review(bank: &str, text: &str) -> AnnotatedReview {
        AnnotatedReview::new(CleanedReview {
            bank: bank.to_owned(),
            review: text.to_owned(),
            rating: 3,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            source: "Google Play".to_owned(),
        })
    }

    #[test]
    fn login_issue_is_account_access() {
        let table = table();
        let themes = assign_themes(
            "Login issues with the app",
            table.themes_for("Commercial Bank of Ethiopia"),
        );
        assert_eq!(themes, vec!["Account Access"]);
    }

    #[test]
    fn multiple_matches_keep_definition_order() {
        let table = table();
        let themes = assign_themes(
            "Cannot send money after TRANSFER, then login fails",
            table.themes_for("Commercial Bank of Ethiopia"),
        );
        assert_eq!(themes, vec!["Account Access", "Transactions"]);
    }

    #[test]
    fn no_match_is_general() {
        let table = table();
        let themes = assign_themes("Nice colors", table.themes_for("Commercial Bank of Ethiopia"));
        assert_eq!(themes, vec!["General"]);
    }

    #[test]
    fn bank_without_definitions_is_always_general() {
        let table = table();
        assert_eq!(
            assign_themes("login transfer", table.themes_for("Dashen Bank")),
            vec!["General"]
        );
        assert_eq!(
            assign_themes("login transfer", table.themes_for("Unknown Bank")),
            vec!["General"]
        );
    }

    #[test]
    fn aggregate_counts_once_per_theme() {
        let tagged = tag_themes(
            vec![
                review("Commercial Bank of Ethiopia", "login then transfer"),
                review("Commercial Bank of Ethiopia", "login again"),
                review("Commercial Bank of Ethiopia", "pretty"),
                review("Dashen Bank", "fine"),
            ],
            &table(),
        );

        let counts = aggregate_themes(&tagged);

        let as_tuples: Vec<(&str, &str, usize)> = counts
            .iter()
            .map(|c| (c.bank.as_str(), c.theme.as_str(), c.count))
            .collect();
        assert_eq!(
            as_tuples,
            vec![
                ("Commercial Bank of Ethiopia", "Account Access", 2),
                ("Commercial Bank of Ethiopia", "General", 1),
                ("Commercial Bank of Ethiopia", "Transactions", 1),
                ("Dashen Bank", "General", 1),
            ]
        );
    }

    #[test]
    fn every_tagged_review_has_a_theme() {
        let tagged = tag_themes(
            vec![review("Commercial Bank of Ethiopia", ""), review("Dashen Bank", "x")],
            &table(),
        );
        assert!(tagged.iter().all(|r| !r.themes.is_empty()));
    }
}
