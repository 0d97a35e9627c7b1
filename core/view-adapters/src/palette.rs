//! FILENAME: core/view-adapters/src/palette.rs
//! Fixed display colors. Labeling hints only; nothing is computed from them.

use crate::view::SeriesColor;

/// Synthetic gender label of the pooled demographic series.
pub const OVERALL_LABEL: &str = "Overall";

pub const CATEGORY_COLORS: [(&str, &str); 4] = [
    ("Clothing", "#FFEDA0"),
    ("Footwear", "#FEB24C"),
    ("Accessories", "#FC4E2A"),
    ("Outerwear", "#BD0026"),
];

pub const GENDER_COLORS: [(&str, &str); 3] = [
    ("Male", "#3CB371"),
    ("Female", "#EE82EE"),
    (OVERALL_LABEL, "#000000"),
];

/// Used for labels without a fixed color, cycling by position.
pub const FALLBACK_SEQUENCE: [&str; 4] = ["#EE82EE", "#87CEFA", "#3CB371", "#F4A460"];

fn lookup(table: &[(&str, &'static str)], label: &str, position: usize) -> &'static str {
    table
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_SEQUENCE[position % FALLBACK_SEQUENCE.len()])
}

pub fn category_color(category: &str, position: usize) -> &'static str {
    lookup(&CATEGORY_COLORS, category, position)
}

pub fn gender_color(gender: &str, position: usize) -> &'static str {
    lookup(&GENDER_COLORS, gender, position)
}

/// One color entry per distinct label, in the order given.
pub fn colors_for<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    color: fn(&str, usize) -> &'static str,
) -> Vec<SeriesColor> {
    let mut out: Vec<SeriesColor> = Vec::new();
    for label in labels {
        if out.iter().any(|c| c.label == label) {
            continue;
        }
        let position = out.len();
        out.push(SeriesColor {
            label: label.to_string(),
            color: color(label, position).to_string(),
        });
    }
    out
}
