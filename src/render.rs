use sentiscope_core::{Category, ErrorExt, FetchResult, PostRecord};

const HIGHLY_NEGATIVE_FLAG: &str = "🛑 ";

/// Per-category count and share of the total, in display order.
pub fn distribution(records: &[PostRecord]) -> Vec<(Category, usize, f64)> {
    let total = records.len();
    Category::ALL
        .iter()
        .map(|&category| {
            let count = records.iter().filter(|r| r.category == category).count();
            let share = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            (category, count, share)
        })
        .collect()
}

pub fn render_outcome(keyword: &str, outcome: &FetchResult) -> String {
    match outcome {
        Err(error) => format!("❌ {}\n", error.user_friendly_message()),
        Ok(records) if records.is_empty() => format!(
            "No posts found for '{}'. Try another keyword or try again later.\n",
            keyword
        ),
        Ok(records) => render_dashboard(keyword, records),
    }
}

fn render_dashboard(keyword: &str, records: &[PostRecord]) -> String {
    let average =
        records.iter().map(|r| r.sentiment.compound).sum::<f64>() / records.len() as f64;

    let mut out = format!(
        "Analyzed {} posts for '{}' (average compound {:+.3})\n\n",
        records.len(),
        keyword,
        average
    );

    out.push_str("Distribution\n");
    for (category, count, share) in distribution(records) {
        out.push_str(&format!(
            "  {:<16}{:>4}  ({:>5.1}%)\n",
            category.label(),
            count,
            share
        ));
    }

    for category in Category::ALL {
        let group: Vec<_> = records.iter().filter(|r| r.category == category).collect();
        if group.is_empty() {
            continue;
        }

        out.push_str(&format!("\n{} ({})\n", category, group.len()));
        for record in group {
            let flag = if category == Category::HighlyNegative {
                HIGHLY_NEGATIVE_FLAG
            } else {
                ""
            };
            out.push_str(&format!(
                "  {}[{:+.3}] {}\n      id {} | {}\n",
                flag,
                record.sentiment.compound,
                single_line(&record.text),
                record.id,
                record.sentiment
            ));
        }
    }

    out
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Raw dump of the outcome: the record list, or the tagged error.
pub fn render_json(outcome: &FetchResult) -> Result<String, serde_json::Error> {
    match outcome {
        Ok(records) => serde_json::to_string_pretty(records),
        Err(error) => serde_json::to_string_pretty(error),
    }
}

pub fn render_sample_notice(keyword: &str, available: &[String]) -> String {
    if available.is_empty() {
        format!("No sample data for '{}'. The sample file is empty.\n", keyword)
    } else {
        format!(
            "No sample data for '{}'. Available keywords: {}\n",
            keyword,
            available.join(", ")
        )
    }
}
