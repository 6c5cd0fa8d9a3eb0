//! Markdown dashboard generation.
//!
//! This module renders the digest - summary statistics, category and
//! significance distributions, and one card per claim - as Markdown,
//! plus a JSON variant for machine consumption.

use crate::config::ReportConfig;
use crate::models::{Claim, Digest, DigestMetadata};
use anyhow::Result;

const BAR_WIDTH: usize = 24;

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(digest: &Digest, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# ClaimLens Digest\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&digest.metadata));

    // Dashboard suppressed entirely when there are no claims
    if digest.claims.is_empty() {
        output.push_str("No claims were extracted from the source text.\n\n");
        output.push_str(&generate_footer());
        return output;
    }

    // Stats row
    output.push_str(&generate_stats_section(digest));

    // Distribution charts
    output.push_str(&generate_category_section(digest));
    output.push_str(&generate_significance_section(digest));

    // Claim cards
    output.push_str(&generate_claims_section(&digest.claims, config));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(digest: &Digest) -> Result<String> {
    Ok(serde_json::to_string_pretty(digest)?)
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &DigestMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model Used:** `{}`\n", metadata.model_used));
    section.push_str(&format!("- **Source Length:** {} chars\n", metadata.source_chars));
    section.push_str(&format!("- **Claims Extracted:** {}\n", metadata.total_claims));
    section.push_str(&format!(
        "- **Extraction Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push_str("\n");

    section
}

/// Generate the stats row (totals, average impact, predictions).
fn generate_stats_section(digest: &Digest) -> String {
    let stats = &digest.stats;
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Total Insights | Avg. Impact Score | Predictions |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {:.1}/10 | {} |\n\n",
        stats.total, stats.avg_significance, stats.predictions
    ));

    section
}

/// Generate the category distribution chart.
fn generate_category_section(digest: &Digest) -> String {
    let counts = &digest.stats.category_counts;
    if counts.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("### Category Distribution\n\n");
    section.push_str("```\n");

    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1);
    let widest = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    for (name, count) in counts {
        section.push_str(&format!(
            "{:<width$}  {} {}\n",
            name,
            bar(*count, max),
            count,
            width = widest
        ));
    }

    section.push_str("```\n\n");
    section
}

/// Generate the significance breakdown histogram.
fn generate_significance_section(digest: &Digest) -> String {
    let buckets = &digest.stats.significance_buckets;
    if buckets.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("### Significance Breakdown\n\n");
    section.push_str("```\n");

    let max = buckets.iter().map(|(_, n)| *n).max().unwrap_or(1);

    for (bucket, count) in buckets {
        section.push_str(&format!("{:>2}  {} {}\n", bucket, bar(*count, max), count));
    }

    section.push_str("```\n\n");
    section
}

/// Render a proportional text bar.
fn bar(count: usize, max: usize) -> String {
    let len = if max == 0 {
        0
    } else {
        (count * BAR_WIDTH).div_ceil(max)
    };
    "#".repeat(len)
}

/// Generate the claim cards section.
fn generate_claims_section(claims: &[Claim], config: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str("## Detailed Breakdown\n\n");

    let shown = match config.max_cards {
        Some(n) => &claims[..claims.len().min(n)],
        None => claims,
    };

    for claim in shown {
        section.push_str(&generate_claim_card(claim, config));
    }

    if shown.len() < claims.len() {
        section.push_str(&format!(
            "*...and {} more claims not shown.*\n\n",
            claims.len() - shown.len()
        ));
    }

    section
}

/// Generate a single claim card.
fn generate_claim_card(claim: &Claim, config: &ReportConfig) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {}\n\n", claim.summary));

    // Badges line: category, subcategory, type, sentiment
    let mut badges = vec![format!("`{}`", claim.category)];
    if !claim.subcategory.is_empty() {
        badges.push(format!("`{}`", claim.subcategory));
    }
    badges.push(format!("`{}`", claim.claim_type));
    badges.push(format!(
        "{} {}",
        claim.sentiment.emoji(),
        claim.sentiment
    ));
    block.push_str(&format!("{}\n\n", badges.join(" ")));

    block.push_str(&format!(
        "**Significance:** {}/10\n\n",
        claim.significance
    ));

    if claim.is_prediction {
        let timeframe = claim.prediction_timeframe.as_deref().unwrap_or("Future");
        block.push_str(&format!("**Prediction:** {}\n\n", timeframe));
    }

    if config.include_raw_text && !claim.raw_text.is_empty() {
        block.push_str(&format!("> \"{}\"\n\n", claim.raw_text));
    }

    if !claim.entities.is_empty() {
        let names: Vec<String> = claim.entities.all().cloned().collect();
        block.push_str(&format!("**Entities:** {}\n\n", names.join(", ")));
    }

    if config.include_search_queries && !claim.search_queries.is_empty() {
        block.push_str("**Verify:**\n");
        for query in &claim.search_queries {
            block.push_str(&format!("- {}\n", query));
        }
        block.push_str("\n");
    }

    block.push_str("---\n\n");

    block
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "*Generated by ClaimLens v{}. Model output may be inaccurate; verify important claims.*\n",
        env!("CARGO_PKG_VERSION")
    )
}
