//! The five fixed document corpora Gavel retrieves from.

use serde::{Deserialize, Serialize};

/// One of the five document corpora queried for every question.
///
/// Every in-depth answer fans out across all five; the declaration order
/// here is the order their documents appear in the combined prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corpus {
    /// City council meeting minutes.
    Minutes,
    /// Committee meeting transcripts.
    Committees,
    /// Agendas, reports, and ordinances ingested from PDFs.
    Pdfs,
    /// Press releases and press coverage.
    Press,
    /// News articles.
    News,
}

impl Corpus {
    /// All corpora, in combine order.
    pub const ALL: [Corpus; 5] = [
        Corpus::Minutes,
        Corpus::Committees,
        Corpus::Pdfs,
        Corpus::Press,
        Corpus::News,
    ];

    /// Short tag used in configuration and on the CLI.
    pub fn tag(&self) -> &'static str {
        match self {
            Corpus::Minutes => "minutes",
            Corpus::Committees => "committees",
            Corpus::Pdfs => "pdfs",
            Corpus::Press => "press",
            Corpus::News => "news",
        }
    }

    /// File name of the SQLite database backing this corpus.
    pub fn db_file(&self) -> &'static str {
        match self {
            Corpus::Minutes => "minutes.db",
            Corpus::Committees => "committees.db",
            Corpus::Pdfs => "pdfs.db",
            Corpus::Press => "press.db",
            Corpus::News => "news.db",
        }
    }
}

impl std::fmt::Display for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for Corpus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minutes" => Ok(Corpus::Minutes),
            "committees" => Ok(Corpus::Committees),
            "pdfs" => Ok(Corpus::Pdfs),
            "press" => Ok(Corpus::Press),
            "news" => Ok(Corpus::News),
            _ => Err(format!(
                "Unknown corpus: {} (expected one of: minutes, committees, pdfs, press, news)",
                s
            )),
        }
    }
}
