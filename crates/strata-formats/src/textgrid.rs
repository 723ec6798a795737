//! Praat TextGrid (long textual form) reader and writer.
//!
//! TextGrid files carry interval tiers (`IntervalTier`) and point tiers
//! (`TextTier`) with a full time coverage: Praat leaves no gap between
//! intervals. The writer therefore fills tier gaps with empty-text
//! intervals, and the reader drops them, so gap-tolerant tiers round-trip.
//! Point radii, scores, alternative tags, metadata, media and hierarchy
//! are outside the format's capability vector; a disjoint annotation
//! degrades to its bounding span on write.

use std::fs;
use std::path::Path;

use strata_core::{Annotation, Label, Localization, Location, Tag, Tier, TimePoint, Transcription};

use crate::adapter::FormatAdapter;
use crate::caps::Capabilities;
use crate::errors::{FormatError, Result};

/// Adapter for the Praat TextGrid format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextGridAdapter;

const CAPS: Capabilities = Capabilities {
    multi_tier: true,
    point: true,
    interval: true,
    ..Capabilities::NONE
};

impl FormatAdapter for TextGridAdapter {
    fn name(&self) -> &'static str {
        "TextGridAdapter"
    }

    fn software(&self) -> &'static str {
        "Praat"
    }

    fn default_extension(&self) -> &'static str {
        "textgrid"
    }

    fn capabilities(&self) -> Capabilities {
        CAPS
    }

    fn read(&self, path: &Path) -> Result<Transcription> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| FormatError::Encoding {
            path: path.to_path_buf(),
            detail: format!("TextGrid is not UTF-8 (UTF-16 files must be converted): {e}"),
        })?;
        parse_textgrid(&content, path)
    }

    fn write(&self, path: &Path, trs: &Transcription) -> Result<()> {
        fs::write(path, render_textgrid(trs))?;
        Ok(())
    }

    fn detect(&self, path: &Path) -> bool {
        match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes[..bytes.len().min(256)])
                .contains("ooTextFile"),
            Err(_) => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reader
// ─────────────────────────────────────────────────────────────────────────────

struct Cursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    path: &'a Path,
}

impl<'a> Cursor<'a> {
    fn new(content: &'a str, path: &'a Path) -> Self {
        Self {
            lines: content.lines().collect(),
            pos: 0,
            path,
        }
    }

    fn err(&self, detail: String) -> FormatError {
        FormatError::Parse {
            path: self.path.to_path_buf(),
            line: self.pos.min(self.lines.len()),
            detail,
        }
    }

    /// Advance to the next `key = value` line for `key` and return the
    /// raw value.
    fn value_of(&mut self, key: &str) -> Result<String> {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos].trim_start();
            self.pos += 1;
            if line.starts_with(key) {
                if let Some((_, value)) = line.split_once('=') {
                    return Ok(value.trim().to_owned());
                }
            }
        }
        Err(self.err(format!("expected '{key} =' before end of file")))
    }

    fn number_of(&mut self, key: &str) -> Result<f64> {
        let raw = self.value_of(key)?;
        raw.parse::<f64>()
            .map_err(|_| self.err(format!("'{raw}' is not a valid '{key}' number")))
    }

    fn count_of(&mut self, key: &str) -> Result<usize> {
        let raw = self.value_of(key)?;
        raw.parse::<usize>()
            .map_err(|_| self.err(format!("'{raw}' is not a valid '{key}' count")))
    }

    /// A quoted value; consumes extra lines when the text spans several.
    fn text_of(&mut self, key: &str) -> Result<String> {
        let mut raw = self.value_of(key)?;
        if raw.starts_with('"') {
            while !has_closing_quote(&raw) {
                if self.pos >= self.lines.len() {
                    return Err(self.err(format!("unterminated quoted '{key}' value")));
                }
                raw.push('\n');
                raw.push_str(self.lines[self.pos]);
                self.pos += 1;
            }
        }
        Ok(unquote(raw.trim()))
    }
}

fn has_closing_quote(raw: &str) -> bool {
    // an opening quote plus a non-doubled closing quote at the end
    let trimmed = raw.trim_end();
    trimmed.len() >= 2 && trimmed.ends_with('"')
}

fn unquote(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw);
    inner.replace("\"\"", "\"")
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn parse_textgrid(content: &str, path: &Path) -> Result<Transcription> {
    let mut cursor = Cursor::new(content, path);

    let header = cursor.value_of("File type")?;
    if !header.contains("ooTextFile") {
        return Err(cursor.err(format!("'{header}' is not a TextGrid header")));
    }
    let class = cursor.value_of("Object class")?;
    if !class.contains("TextGrid") {
        return Err(cursor.err(format!("'{class}' is not a TextGrid object class")));
    }

    let _xmin = cursor.number_of("xmin")?;
    let _xmax = cursor.number_of("xmax")?;
    let tier_count = cursor.count_of("size")?;

    let mut trs = Transcription::new();
    for _ in 0..tier_count {
        let class = cursor.text_of("class")?;
        let name = cursor.text_of("name")?;
        let mut tier = Tier::new(&name);
        let _tier_xmin = cursor.number_of("xmin")?;
        let _tier_xmax = cursor.number_of("xmax")?;

        match class.as_str() {
            "IntervalTier" => {
                let count = cursor.count_of("intervals: size")?;
                for _ in 0..count {
                    let xmin = cursor.number_of("xmin")?;
                    let xmax = cursor.number_of("xmax")?;
                    let text = cursor.text_of("text")?;
                    if text.is_empty() {
                        // gap filler written by Praat, not an annotation
                        continue;
                    }
                    let interval = strata_core::TimeInterval::from_bounds(xmin, xmax)?;
                    let _ = tier.create_annotation(
                        Location::new(interval),
                        vec![Label::new(Tag::string(&text))],
                    )?;
                }
            }
            "TextTier" => {
                let count = cursor.count_of("points: size")?;
                for _ in 0..count {
                    let number = cursor.number_of("number")?;
                    let mark = cursor.text_of("mark")?;
                    let labels = if mark.is_empty() {
                        vec![]
                    } else {
                        vec![Label::new(Tag::string(&mark))]
                    };
                    let _ = tier.create_annotation(
                        Location::new(TimePoint::new(number)),
                        labels,
                    )?;
                }
            }
            other => {
                return Err(cursor.err(format!("unknown tier class '{other}'")));
            }
        }
        trs.append_tier(tier)?;
    }
    Ok(trs)
}

// ─────────────────────────────────────────────────────────────────────────────
// Writer
// ─────────────────────────────────────────────────────────────────────────────

fn span_of(trs: &Transcription) -> (f64, f64) {
    let mut xmin = f64::INFINITY;
    let mut xmax = f64::NEG_INFINITY;
    for tier in trs.iter() {
        if let (Some(first), Some(last)) = (tier.first(), tier.last()) {
            xmin = xmin.min(first.start_point().midpoint());
            xmax = xmax.max(last.end_point().midpoint());
        }
    }
    if xmin > xmax {
        (0.0, 0.0)
    } else {
        (xmin.min(0.0), xmax)
    }
}

fn render_textgrid(trs: &Transcription) -> String {
    let (xmin, xmax) = span_of(trs);
    let mut out = String::new();
    out.push_str("File type = \"ooTextFile\"\n");
    out.push_str("Object class = \"TextGrid\"\n\n");
    out.push_str(&format!("xmin = {xmin}\n"));
    out.push_str(&format!("xmax = {xmax}\n"));
    out.push_str("tiers? <exists>\n");
    out.push_str(&format!("size = {}\n", trs.len()));
    out.push_str("item []:\n");

    for (index, tier) in trs.iter().enumerate() {
        out.push_str(&format!("    item [{}]:\n", index + 1));
        if tier.is_point() {
            render_point_tier(&mut out, tier, xmin, xmax);
        } else {
            render_interval_tier(&mut out, tier, xmin, xmax);
        }
    }
    out
}

fn render_interval_tier(out: &mut String, tier: &Tier, xmin: f64, xmax: f64) {
    // materialize the gap fillers first so the size line is correct
    let mut entries: Vec<(f64, f64, String)> = Vec::new();
    let mut cursor = xmin;
    for ann in tier.iter() {
        let (b, e) = annotation_span(ann);
        if b > cursor {
            entries.push((cursor, b, String::new()));
        }
        entries.push((b, e, ann.text()));
        cursor = cursor.max(e);
    }
    if xmax > cursor {
        entries.push((cursor, xmax, String::new()));
    }

    out.push_str("        class = \"IntervalTier\"\n");
    out.push_str(&format!("        name = {}\n", quote(tier.name())));
    out.push_str(&format!("        xmin = {xmin}\n"));
    out.push_str(&format!("        xmax = {xmax}\n"));
    out.push_str(&format!("        intervals: size = {}\n", entries.len()));
    for (i, (b, e, text)) in entries.iter().enumerate() {
        out.push_str(&format!("        intervals [{}]:\n", i + 1));
        out.push_str(&format!("            xmin = {b}\n"));
        out.push_str(&format!("            xmax = {e}\n"));
        out.push_str(&format!("            text = {}\n", quote(text)));
    }
}

fn render_point_tier(out: &mut String, tier: &Tier, xmin: f64, xmax: f64) {
    out.push_str("        class = \"TextTier\"\n");
    out.push_str(&format!("        name = {}\n", quote(tier.name())));
    out.push_str(&format!("        xmin = {xmin}\n"));
    out.push_str(&format!("        xmax = {xmax}\n"));
    out.push_str(&format!("        points: size = {}\n", tier.len()));
    for (i, ann) in tier.iter().enumerate() {
        out.push_str(&format!("        points [{}]:\n", i + 1));
        out.push_str(&format!(
            "            number = {}\n",
            ann.start_point().midpoint()
        ));
        out.push_str(&format!("            mark = {}\n", quote(&ann.text())));
    }
}

/// Interval span of an annotation; a disjoint one degrades to its
/// bounding span.
fn annotation_span(ann: &Annotation) -> (f64, f64) {
    match ann.best_localization() {
        Localization::Point(p) => (p.midpoint(), p.midpoint()),
        _ => (
            ann.start_point().midpoint(),
            ann.end_point().midpoint(),
        ),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use strata_core::TimeInterval;

    const SAMPLE: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

xmin = 0
xmax = 2.3
tiers? <exists>
size = 2
item []:
    item [1]:
        class = "IntervalTier"
        name = "Mary"
        xmin = 0
        xmax = 2.3
        intervals: size = 3
        intervals [1]:
            xmin = 0
            xmax = 0.7
            text = "hello"
        intervals [2]:
            xmin = 0.7
            xmax = 1.6
            text = ""
        intervals [3]:
            xmin = 1.6
            xmax = 2.3
            text = "world"
    item [2]:
        class = "TextTier"
        name = "bell"
        xmin = 0
        xmax = 2.3
        points: size = 1
        points [1]:
            number = 0.9
            mark = "ding"
"#;

    #[test]
    fn parse_sample() {
        let trs = parse_textgrid(SAMPLE, Path::new("s.textgrid")).unwrap();
        assert_eq!(trs.len(), 2);
        let mary = trs.tier("Mary").unwrap();
        assert!(mary.is_interval());
        // the empty interval is a gap filler, not an annotation
        assert_eq!(mary.len(), 2);
        assert_eq!(mary.get(0).unwrap().text(), "hello");
        assert_eq!(mary.get(1).unwrap().start_point().midpoint(), 1.6);
        let bell = trs.tier("bell").unwrap();
        assert!(bell.is_point());
        assert_eq!(bell.get(0).unwrap().start_point().midpoint(), 0.9);
        assert_eq!(bell.get(0).unwrap().text(), "ding");
    }

    #[test]
    fn bad_header_rejected() {
        assert_matches!(
            parse_textgrid("File type = \"nonsense\"\n", Path::new("x.textgrid")),
            Err(FormatError::Parse { line: 1, .. })
        );
    }

    #[test]
    fn truncated_file_reports_line() {
        let truncated = &SAMPLE[..SAMPLE.find("intervals [2]").unwrap()];
        assert_matches!(
            parse_textgrid(truncated, Path::new("x.textgrid")),
            Err(FormatError::Parse { .. })
        );
    }

    #[test]
    fn quoted_quotes_unescape() {
        assert_eq!(unquote("\"say \"\"hi\"\"\""), "say \"hi\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn writer_fills_gaps() {
        let mut trs = Transcription::new();
        let tier = trs.create_tier("Tokens").unwrap();
        let _ = tier
            .create_annotation(
                Location::new(TimeInterval::from_bounds(1.0, 2.0).unwrap()),
                vec![Label::new(Tag::string("a"))],
            )
            .unwrap();
        let _ = tier
            .create_annotation(
                Location::new(TimeInterval::from_bounds(3.0, 4.0).unwrap()),
                vec![Label::new(Tag::string("b"))],
            )
            .unwrap();
        let rendered = render_textgrid(&trs);
        // leading gap [0,1], middle gap [2,3]: four intervals in total
        assert!(rendered.contains("intervals: size = 4"));
        let back = parse_textgrid(&rendered, Path::new("x.textgrid")).unwrap();
        let tokens = back.tier("Tokens").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.get(0).unwrap().start_point().midpoint(), 1.0);
        assert_eq!(tokens.get(1).unwrap().text(), "b");
    }

    #[test]
    fn point_tier_roundtrip() {
        let mut trs = Transcription::new();
        let tier = trs.create_tier("bell").unwrap();
        let _ = tier
            .create_annotation(
                Location::new(TimePoint::new(0.9)),
                vec![Label::new(Tag::string("ding"))],
            )
            .unwrap();
        let rendered = render_textgrid(&trs);
        assert!(rendered.contains("class = \"TextTier\""));
        let back = parse_textgrid(&rendered, Path::new("x.textgrid")).unwrap();
        assert!(back.tier("bell").unwrap().is_point());
        assert_eq!(back.tier("bell").unwrap().get(0).unwrap().text(), "ding");
    }

    #[test]
    fn multiline_text_value() {
        let grid = SAMPLE.replace("text = \"hello\"", "text = \"hello\nthere\"");
        let trs = parse_textgrid(&grid, Path::new("x.textgrid")).unwrap();
        assert_eq!(trs.tier("Mary").unwrap().get(0).unwrap().text(), "hello there");
    }
}
