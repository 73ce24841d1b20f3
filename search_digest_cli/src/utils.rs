use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::WordCount;

const BAR_WIDTH: usize = 40;

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(data)?.as_bytes())?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Horizontal bar chart, one row per word, scaled to the largest count.
pub fn render_bar_chart(words: &[WordCount]) -> String {
    let Some(max) = words.iter().map(|w| w.count).max() else {
        return String::new();
    };
    let label_width = words.iter().map(|w| w.word.chars().count()).max().unwrap_or(0);

    words
        .iter()
        .map(|w| {
            let len = ((w.count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
            format!(
                "{:<label_width$} | {} {}\n",
                w.word,
                "#".repeat(len.max(1)),
                w.count
            )
        })
        .collect()
}
