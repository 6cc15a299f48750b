// Colored terminal output for ranked recommendations.

use colored::Colorize;

use super::truncate_chars;
use crate::pipeline::recommend::Recommendation;
use crate::similarity::{Method, ScoredCandidate};

/// Display the ranked candidates with their component scores.
pub fn display_recommendation(rec: &Recommendation) {
    let config = &rec.config;
    let method = match config.method {
        Method::Combined => format!(
            "combined, topic weight {:.2}",
            config.effective_weight()
        ),
        other => other.to_string(),
    };

    println!(
        "\n{}",
        format!("=== Adjacent to {} ({}) ===", rec.target.id, method).bold()
    );
    println!(
        "  {} candidates scored, {} shown",
        rec.pool_size,
        rec.ranked.len()
    );
    println!();

    if rec.ranked.is_empty() {
        println!("  {}", "No related repositories above the threshold.".yellow());
        return;
    }

    println!(
        "  {:>4}  {:<36} {:>6}  {:>6}  {:>6}  {}",
        "Rank".dimmed(),
        "Repository".dimmed(),
        "Score".dimmed(),
        "Topic".dimmed(),
        "Readme".dimmed(),
        "Shared topics".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    for (i, candidate) in rec.ranked.iter().enumerate() {
        println!(
            "  {:>4}. {:<36} {}  {:>6}  {:>6}  {}",
            i + 1,
            truncate_chars(&candidate.id().full_name(), 33),
            colorize_score(candidate.score),
            component(candidate.topic_score),
            component(candidate.content_score),
            candidate.shared_topics.join(", ").dimmed(),
        );
        let description = candidate.description().trim();
        if !description.is_empty() {
            println!("        {}", truncate_chars(description, 80).dimmed());
        }
    }
    println!();
}

/// Print the rendered README block for `--dry-run`.
pub fn display_section_preview(block: &str, ranked: &[ScoredCandidate]) {
    println!("\n{}", "=== README section (dry run) ===".bold());
    println!("{block}");
    println!("  {} entries, README not modified", ranked.len());
}

fn component(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{s:.3}"))
}

fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:>6.3}");
    if score >= 0.5 {
        text.green().bold()
    } else if score >= 0.25 {
        text.green()
    } else {
        text.yellow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_formats_missing_as_dash() {
        assert_eq!(component(None), "-");
        assert_eq!(component(Some(1.0 / 3.0)), "0.333");
    }
}
