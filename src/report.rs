use crate::models::CodepointCount;
use crate::processor::PageScore;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// `rank hex glyph count`, one entry per line
    #[default]
    Text,
    Csv,
    Json,
}

#[derive(Serialize)]
struct RankRow {
    rank: usize,
    codepoint: String,
    glyph: char,
    count: u32,
}

#[derive(Serialize)]
struct ScoreRow<'a> {
    rank: usize,
    title: &'a str,
    id: u64,
    known: usize,
    learning: usize,
    unknown: usize,
}

fn rank_rows(entries: &[CodepointCount]) -> impl Iterator<Item = RankRow> + '_ {
    entries.iter().enumerate().map(|(rank, e)| RankRow {
        rank,
        codepoint: format!("{:04X}", e.codepoint as u32),
        glyph: e.codepoint,
        count: e.count,
    })
}

fn score_rows(scores: &[PageScore]) -> impl Iterator<Item = ScoreRow<'_>> {
    scores.iter().enumerate().map(|(rank, s)| ScoreRow {
        rank,
        title: &s.title,
        id: s.id,
        known: s.known,
        learning: s.learning,
        unknown: s.unknown,
    })
}

/// Writes a ranked code point report. Rank is the 0-based position in `entries`.
pub fn write_ranking<W: Write>(entries: &[CodepointCount], format: ReportFormat, mut w: W) -> Result<()> {
    match format {
        ReportFormat::Text => {
            for row in rank_rows(entries) {
                writeln!(w, "{:5} {} {} {}", row.rank, row.codepoint, row.glyph, row.count)?;
            }
        }
        ReportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut w);
            for row in rank_rows(entries) {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        ReportFormat::Json => {
            let rows: Vec<RankRow> = rank_rows(entries).collect();
            serde_json::to_writer_pretty(&mut w, &rows).context("Failed to write JSON report")?;
            writeln!(w)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Writes difficulty results in the order given.
pub fn write_scores<W: Write>(scores: &[PageScore], format: ReportFormat, mut w: W) -> Result<()> {
    match format {
        ReportFormat::Text => {
            for row in score_rows(scores) {
                writeln!(
                    w,
                    "{:5} {} known={} learning={} unknown={}",
                    row.rank, row.title, row.known, row.learning, row.unknown
                )?;
            }
        }
        ReportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut w);
            for row in score_rows(scores) {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        ReportFormat::Json => {
            let rows: Vec<ScoreRow> = score_rows(scores).collect();
            serde_json::to_writer_pretty(&mut w, &rows).context("Failed to write JSON report")?;
            writeln!(w)?;
        }
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<CodepointCount> {
        vec![
            CodepointCount {
                codepoint: '中',
                count: 2,
            },
            CodepointCount {
                codepoint: '国',
                count: 1,
            },
        ]
    }

    fn render(format: ReportFormat) -> String {
        let mut out = Vec::new();
        write_ranking(&entries(), format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_ranking_lines() {
        assert_eq!(render(ReportFormat::Text), "    0 4E2D 中 2\n    1 56FD 国 1\n");
    }

    #[test]
    fn csv_ranking_has_header() {
        let out = render(ReportFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "rank,codepoint,glyph,count");
        assert_eq!(lines[1], "0,4E2D,中,2");
        assert_eq!(lines[2], "1,56FD,国,1");
    }

    #[test]
    fn json_ranking_parses() {
        let value: serde_json::Value = serde_json::from_str(&render(ReportFormat::Json)).unwrap();
        assert_eq!(value[0]["glyph"], "中");
        assert_eq!(value[0]["count"], 2);
        assert_eq!(value[1]["codepoint"], "56FD");
    }

    #[test]
    fn empty_ranking_writes_nothing_in_text() {
        let mut out = Vec::new();
        write_ranking(&[], ReportFormat::Text, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn score_lines() {
        let scores = vec![PageScore {
            title: "中国".to_string(),
            id: 13,
            known: 3,
            learning: 1,
            unknown: 0,
        }];
        let mut out = Vec::new();
        write_scores(&scores, ReportFormat::Text, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "    0 中国 known=3 learning=1 unknown=0\n"
        );

        let mut out = Vec::new();
        write_scores(&scores, ReportFormat::Csv, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("rank,title,id,known,learning,unknown\n"));
        assert!(out.contains("0,中国,13,3,1,0"));
    }
}
