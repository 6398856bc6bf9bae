//! CLI output formatting utilities.

use crate::answer::Citation;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one citation, fields in display order.
    pub fn citation(citation: &Citation) {
        println!();
        if let Some(v) = &citation.title {
            Self::kv("Title", v);
        }
        if let Some(v) = &citation.published {
            Self::kv("Published", v);
        }
        if let Some(v) = &citation.url {
            Self::kv("URL", v);
        }
        if let Some(v) = &citation.video_timestamp {
            Self::kv("Video timestamp", v);
        }
        if let Some(v) = &citation.name {
            Self::kv("Name", v);
        }
        if let Some(v) = citation.page_number {
            Self::kv("Page Number", &v.to_string());
        }
    }

    /// Print one metric result line.
    pub fn metric(name: &str, score: f64, threshold: f64, passed: bool, reason: &str) {
        let marker = if passed {
            style("PASS").green().bold()
        } else {
            style("FAIL").red().bold()
        };
        println!(
            "  {} {} {:.2} (threshold {:.2})",
            marker,
            style(name).bold(),
            score,
            threshold
        );
        if !reason.is_empty() {
            println!("       {}", style(reason).dim());
        }
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
