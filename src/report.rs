//! Fixed-width text rendering of language stats

use compact_str::{CompactString, ToCompactString, format_compact};
use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

use crate::domain::LanguageStat;

const NAME_WIDTH: usize = 10;
const COUNT_WIDTH: usize = 7;
const BAR_CELLS: usize = 21;

/// Empty cell, then one to seven eighths, then a full cell
const BAR_GLYPHS: [char; 9] = ['░', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

const UNITS: [(&str, f64); 6] = [
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
];

/// One line per stat, in the order given
pub fn render(languages: &[LanguageStat]) -> String {
    languages.iter().map(render_line).join("\n")
}

pub fn render_line(stat: &LanguageStat) -> String {
    let name = pad_end(&truncate(&stat.name, NAME_WIDTH), NAME_WIDTH);
    let counts = format!(
        "{:>width$}/{:>width$}",
        format_compact!("+{}", format_abbrev(stat.additions)),
        format_compact!("-{}", format_abbrev(stat.deletions)),
        width = COUNT_WIDTH,
    );
    let bar = bar_chart(stat.percent, BAR_CELLS);

    format!("{name} {counts} {bar}{:>5.1}%", stat.percent)
}

/// `1500` becomes `1.5k`, values under a thousand are printed as-is
pub fn format_abbrev(n: u64) -> CompactString {
    for (unit, scale) in UNITS {
        let top = n as f64 / scale;
        if top >= 1.0 {
            return format_compact!("{top:.1}{unit}");
        }
    }
    n.to_compact_string()
}

/// Keep at most `len` characters, marking a cut with an ellipsis
pub fn truncate(s: &str, len: usize) -> CompactString {
    if s.chars().count() > len {
        let mut cut: CompactString = s.chars().take(len.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        s.into()
    }
}

fn pad_end(s: &str, width: usize) -> CompactString {
    let mut padded = CompactString::from(s);
    for _ in s.width()..width {
        padded.push(' ');
    }
    padded
}

/// Bar of `size` cells filled to `percent` in eighth-cell steps
pub fn bar_chart(percent: f64, size: usize) -> CompactString {
    let full_glyph = BAR_GLYPHS[8];
    let eighths = ((size * 8) as f64 * percent / 100.0).floor().max(0.0) as usize;
    let full = eighths / 8;

    if full >= size {
        return std::iter::repeat_n(full_glyph, size).collect();
    }

    let mut bar: CompactString = std::iter::repeat_n(full_glyph, full).collect();
    bar.push(BAR_GLYPHS[eighths % 8]);
    bar.extend(std::iter::repeat_n(BAR_GLYPHS[0], size - full - 1));
    bar
}
