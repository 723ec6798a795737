//! Plain-text adapters: column-based CSV and the raw-text fallback.

use std::fs;
use std::path::Path;

use strata_core::{Label, Location, Tag, Tier, TimeInterval, TimePoint, Transcription};

use crate::adapter::FormatAdapter;
use crate::caps::Capabilities;
use crate::errors::{FormatError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// CSV
// ─────────────────────────────────────────────────────────────────────────────

/// Column-based adapter: one `tier,begin,end,text` row per annotation.
///
/// A row whose begin equals its end is a point annotation. Rows may arrive
/// in any order and may overlap; tiers are created on first sight, in row
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAdapter;

const CSV_CAPS: Capabilities = Capabilities {
    multi_tier: true,
    point: true,
    interval: true,
    gaps: true,
    overlaps: true,
    ..Capabilities::NONE
};

impl FormatAdapter for CsvAdapter {
    fn name(&self) -> &'static str {
        "CsvAdapter"
    }

    fn software(&self) -> &'static str {
        "spreadsheet"
    }

    fn default_extension(&self) -> &'static str {
        "csv"
    }

    fn capabilities(&self) -> Capabilities {
        CSV_CAPS
    }

    fn read(&self, path: &Path) -> Result<Transcription> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| FormatError::Encoding {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        parse_csv(&content, path)
    }

    fn write(&self, path: &Path, trs: &Transcription) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        for tier in trs.iter() {
            for ann in tier.iter() {
                let begin = ann.start_point().midpoint();
                let end = ann.end_point().midpoint();
                writer
                    .write_record([
                        tier.name(),
                        &begin.to_string(),
                        &end.to_string(),
                        &ann.text(),
                    ])
                    .map_err(|e| csv_error(&e, path))?;
            }
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| FormatError::Encoding {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        fs::write(path, bytes)?;
        Ok(())
    }

    fn detect(&self, path: &Path) -> bool {
        let Ok(bytes) = fs::read(path) else {
            return false;
        };
        let Ok(content) = String::from_utf8(bytes) else {
            return false;
        };
        let mut reader = csv_reader(&content);
        let mut rows = 0usize;
        for record in reader.records().take(10) {
            let Ok(record) = record else { return false };
            if record.len() != 4 {
                return false;
            }
            if record[1].trim().parse::<f64>().is_err() || record[2].trim().parse::<f64>().is_err()
            {
                return false;
            }
            rows += 1;
        }
        rows > 0
    }
}

fn csv_reader(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
}

fn csv_error(e: &csv::Error, path: &Path) -> FormatError {
    let line = match e.position() {
        Some(position) => position.line() as usize,
        None => 0,
    };
    FormatError::Parse {
        path: path.to_path_buf(),
        line,
        detail: e.to_string(),
    }
}

fn parse_csv(content: &str, path: &Path) -> Result<Transcription> {
    let mut trs = Transcription::new();
    let mut reader = csv_reader(content);
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(&e, path))?;
        let line = record
            .position()
            .map_or(row + 1, |p| p.line() as usize);
        if record.len() != 4 {
            return Err(FormatError::Parse {
                path: path.to_path_buf(),
                line,
                detail: format!("expected 4 columns, got {}", record.len()),
            });
        }
        let begin: f64 = record[1].trim().parse().map_err(|_| FormatError::Parse {
            path: path.to_path_buf(),
            line,
            detail: format!("'{}' is not a valid begin time", &record[1]),
        })?;
        let end: f64 = record[2].trim().parse().map_err(|_| FormatError::Parse {
            path: path.to_path_buf(),
            line,
            detail: format!("'{}' is not a valid end time", &record[2]),
        })?;

        // tier names are normalized at creation, so resolve through a
        // throwaway tier to find or create the right one
        let normalized = Tier::new(&record[0]).name().to_owned();
        if trs.tier(&normalized).is_none() {
            trs.append_tier(Tier::new_with_overlaps(&record[0]))?;
        }
        let location = if begin == end {
            Location::new(TimePoint::new(begin))
        } else {
            Location::new(TimeInterval::from_bounds(begin, end)?)
        };
        let labels = vec![Label::new(Tag::string(&record[3]))];
        let tier = trs
            .tier_mut(&normalized)
            .ok_or_else(|| FormatError::Parse {
                path: path.to_path_buf(),
                line,
                detail: format!("cannot resolve tier '{}'", &record[0]),
            })?;
        let _ = tier.create_annotation(location, labels)?;
    }
    Ok(trs)
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw text
// ─────────────────────────────────────────────────────────────────────────────

/// Fallback adapter: one transcript line per annotation.
///
/// The format carries no time information: the reader anchors each line at
/// its 1-based rank as a point tier named "Transcription". The writer
/// serializes the best text of each annotation of the first tier, one per
/// line — the format cannot represent more than one tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTextAdapter;

const RAW_CAPS: Capabilities = Capabilities {
    point: true,
    gaps: true,
    ..Capabilities::NONE
};

impl RawTextAdapter {
    /// Extension of the fallback adapter, used by the registry heuristic.
    pub const EXTENSION: &'static str = "txt";
}

impl FormatAdapter for RawTextAdapter {
    fn name(&self) -> &'static str {
        "RawTextAdapter"
    }

    fn software(&self) -> &'static str {
        "text editor"
    }

    fn default_extension(&self) -> &'static str {
        Self::EXTENSION
    }

    fn capabilities(&self) -> Capabilities {
        RAW_CAPS
    }

    fn read(&self, path: &Path) -> Result<Transcription> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| FormatError::Encoding {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let mut trs = Transcription::new();
        let tier = trs.create_tier("Transcription")?;
        for (rank, line) in content.lines().enumerate() {
            let labels = if line.trim().is_empty() {
                vec![]
            } else {
                vec![Label::new(Tag::string(line))]
            };
            let _ = tier.create_annotation(
                Location::new(TimePoint::new((rank + 1) as f64)),
                labels,
            )?;
        }
        Ok(trs)
    }

    fn write(&self, path: &Path, trs: &Transcription) -> Result<()> {
        let mut out = String::new();
        if let Some(tier) = trs.get(0) {
            for ann in tier.iter() {
                out.push_str(&ann.text());
                out.push('\n');
            }
        }
        fs::write(path, out)?;
        Ok(())
    }

    /// The raw-text adapter accepts any readable UTF-8 file; it is the
    /// heuristic's last resort.
    fn detect(&self, path: &Path) -> bool {
        matches!(fs::read(path), Ok(bytes) if std::str::from_utf8(&bytes).is_ok())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn csv_parse_groups_by_tier() {
        let content = "Tokens,0.0,1.0,a\nTokens,1.0,2.0,b\nPhones,0.0,0.5,p\n";
        let trs = parse_csv(content, Path::new("x.csv")).unwrap();
        assert_eq!(trs.len(), 2);
        assert_eq!(trs.tier("Tokens").unwrap().len(), 2);
        assert_eq!(trs.tier("Phones").unwrap().len(), 1);
    }

    #[test]
    fn csv_equal_bounds_make_a_point() {
        let content = "Pitch,0.5,0.5,120\n";
        let trs = parse_csv(content, Path::new("x.csv")).unwrap();
        assert!(trs.tier("Pitch").unwrap().is_point());
    }

    #[test]
    fn csv_quoted_text_with_comma() {
        let content = "Tokens,0.0,1.0,\"a, b\"\n";
        let trs = parse_csv(content, Path::new("x.csv")).unwrap();
        assert_eq!(trs.tier("Tokens").unwrap().get(0).unwrap().text(), "a, b");
    }

    #[test]
    fn csv_bad_number_reports_line() {
        let content = "Tokens,0.0,1.0,a\nTokens,zzz,2.0,b\n";
        assert_matches!(
            parse_csv(content, Path::new("x.csv")),
            Err(FormatError::Parse { line: 2, .. })
        );
    }

    #[test]
    fn csv_reversed_bounds_are_data_error() {
        let content = "Tokens,2.0,1.0,a\n";
        assert_matches!(
            parse_csv(content, Path::new("x.csv")),
            Err(FormatError::Data(_))
        );
    }

    #[test]
    fn csv_roundtrip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let content = "Tokens,0,1,a\nTokens,1,2,b\n";
        fs::write(&path, content).unwrap();
        let trs = CsvAdapter.read(&path).unwrap();
        let out = dir.path().join("out.csv");
        CsvAdapter.write(&out, &trs).unwrap();
        let back = CsvAdapter.read(&out).unwrap();
        assert_eq!(back.tier("Tokens").unwrap().len(), 2);
        assert_eq!(back.tier("Tokens").unwrap().get(1).unwrap().text(), "b");
    }

    #[test]
    fn csv_detect() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.dat");
        fs::write(&good, "T,0,1,a\nT,1,2,b\n").unwrap();
        assert!(CsvAdapter.detect(&good));
        let bad = dir.path().join("b.dat");
        fs::write(&bad, "just a line of prose\n").unwrap();
        assert!(!CsvAdapter.detect(&bad));
    }

    #[test]
    fn rawtext_read_anchors_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        fs::write(&path, "hello\nworld\n").unwrap();
        let trs = RawTextAdapter.read(&path).unwrap();
        let tier = trs.tier("Transcription").unwrap();
        assert!(tier.is_point());
        assert_eq!(tier.len(), 2);
        assert_eq!(tier.get(0).unwrap().start_point().midpoint(), 1.0);
        assert_eq!(tier.get(1).unwrap().text(), "world");
    }

    #[test]
    fn rawtext_write_first_tier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        fs::write(&path, "a\nb\n").unwrap();
        let trs = RawTextAdapter.read(&path).unwrap();
        let out = dir.path().join("o.txt");
        RawTextAdapter.write(&out, &trs).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "a\nb\n");
    }

    #[test]
    fn rawtext_detects_any_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.bin");
        fs::write(&path, "anything at all").unwrap();
        assert!(RawTextAdapter.detect(&path));
        fs::write(&path, [0xFFu8, 0xFE, 0x00]).unwrap();
        assert!(!RawTextAdapter.detect(&path));
    }
}
