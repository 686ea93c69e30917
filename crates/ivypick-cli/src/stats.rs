//! `stats` command: read adapter output, run the pipeline, print the report.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use ivypick_core::{
    load_overrides, AppConfig, Catalog, ConfidenceTier, ManualOverrides, MappedProduct,
    MatchStatus, RawProductRecord, StatisticsEntry,
};
use ivypick_mapping::{Pipeline, PipelineOptions, PipelineReport};
use serde::Serialize;

use crate::OutputFormat;

/// On-disk form of a finished report.
#[derive(Debug, Serialize)]
struct PickingListFile<'a> {
    generated_at: String,
    total_quantity: u64,
    statistics: &'a [StatisticsEntry],
    confidence: BTreeMap<ConfidenceTier, usize>,
    review: Vec<ReviewLine<'a>>,
    unmapped: Vec<UnmappedLine<'a>>,
}

/// A counted line whose mapping scored below the high tier.
#[derive(Debug, Serialize)]
struct ReviewLine<'a> {
    name: &'a str,
    spec: &'a str,
    source: &'static str,
    product: &'a str,
    confidence: f64,
    tier: ConfidenceTier,
}

impl<'a> ReviewLine<'a> {
    fn collect(report: &'a PipelineReport) -> Vec<Self> {
        report
            .mapped
            .iter()
            .filter(|m| m.mapping.is_mapped() && m.mapping.tier() != ConfidenceTier::High)
            .map(|m| Self {
                name: &m.record.name,
                spec: &m.record.spec,
                source: m.record.source.source_label(),
                product: m.mapping.template_product.as_deref().unwrap_or_default(),
                confidence: m.mapping.confidence,
                tier: m.mapping.tier(),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct UnmappedLine<'a> {
    name: &'a str,
    spec: &'a str,
    source: &'static str,
    quantity: u32,
    status: MatchStatus,
}

impl<'a> From<&'a MappedProduct> for UnmappedLine<'a> {
    fn from(item: &'a MappedProduct) -> Self {
        Self {
            name: &item.record.name,
            spec: &item.record.spec,
            source: item.record.source.source_label(),
            quantity: item.record.quantity,
            status: item.mapping.status,
        }
    }
}

/// Run the pipeline over every input file and print the statistics.
///
/// # Errors
///
/// Returns an error if an input or override file cannot be read or parsed,
/// the pipeline fails a guard, or the report cannot be written.
pub(crate) fn run_stats(
    config: &AppConfig,
    catalog: &Catalog,
    inputs: &[PathBuf],
    overrides_path: Option<&Path>,
    format: OutputFormat,
    write: bool,
) -> anyhow::Result<()> {
    let mut records = Vec::new();
    for path in inputs {
        let batch = read_records(path)?;
        tracing::info!(path = %path.display(), lines = batch.len(), "loaded picking lines");
        records.extend(batch);
    }

    let overrides = match overrides_path {
        Some(path) => load_overrides(path)
            .with_context(|| format!("failed to load overrides {}", path.display()))?,
        None => ManualOverrides::default(),
    };

    let report = Pipeline::new(catalog)
        .with_overrides(&overrides)
        .with_options(PipelineOptions {
            combo_default_unit_count: config.combo_default_unit_count,
        })
        .run(records)?;

    match format {
        OutputFormat::Table => print!("{}", render_table(&report)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.statistics)?),
    }

    if write {
        let path = write_report(&config.output_dir, &report)?;
        println!("report written to {}", path.display());
    }

    Ok(())
}

fn read_records(path: &Path) -> anyhow::Result<Vec<RawProductRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Statistics table with a closing total row, followed by the confidence
/// breakdown, the lines worth a second look, and the lines that did not make
/// it into the statistics.
fn render_table(report: &PipelineReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    if report.statistics.is_empty() {
        writeln!(out, "no picking statistics; every line was filtered or unrecognised")?;
    } else {
        writeln!(out, "{:<20}{:<6}{:<12}{:>8}", "品名", "欄", "規格", "數量")?;
        for entry in &report.statistics {
            let column = entry
                .column
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            let spec = entry.spec.as_deref().unwrap_or("-");
            writeln!(
                out,
                "{:<20}{:<6}{:<12}{:>8}",
                entry.name, column, spec, entry.quantity
            )?;
        }
        writeln!(
            out,
            "{:<20}{:<6}{:<12}{:>8}",
            "總計",
            "",
            format!("{} 項", report.statistics.len()),
            report.total_quantity()
        )?;

        let breakdown = report.confidence_breakdown();
        let tiers: Vec<String> = [ConfidenceTier::High, ConfidenceTier::Medium, ConfidenceTier::Low]
            .into_iter()
            .map(|tier| format!("{tier} {}", breakdown.get(&tier).copied().unwrap_or(0)))
            .collect();
        writeln!(out)?;
        writeln!(out, "信心分布: {}", tiers.join(" / "))?;
    }

    let review = ReviewLine::collect(report);
    if !review.is_empty() {
        writeln!(out)?;
        writeln!(out, "待確認 ({}):", review.len())?;
        for line in &review {
            writeln!(
                out,
                "  [{}] {} / {} -> {} ({} {:.2})",
                line.source, line.name, line.spec, line.product, line.tier, line.confidence
            )?;
        }
    }

    if !report.unmapped.is_empty() {
        writeln!(out)?;
        writeln!(out, "未對應 ({}):", report.unmapped.len())?;
        for item in &report.unmapped {
            let line = UnmappedLine::from(item);
            let status = match line.status {
                MatchStatus::Filtered => "filtered",
                MatchStatus::Unrecognized | MatchStatus::Matched => "unrecognised",
            };
            writeln!(
                out,
                "  [{}] {} / {} x{} ({status})",
                line.source, line.name, line.spec, line.quantity
            )?;
        }
    }

    Ok(out)
}

fn report_file_name() -> String {
    format!("picking-list-{}.json", Local::now().format("%Y%m%d"))
}

fn write_report(output_dir: &Path, report: &PipelineReport) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let file = PickingListFile {
        generated_at: Local::now().to_rfc3339(),
        total_quantity: report.total_quantity(),
        statistics: &report.statistics,
        confidence: report.confidence_breakdown(),
        review: ReviewLine::collect(report),
        unmapped: report.unmapped.iter().map(UnmappedLine::from).collect(),
    };

    let path = output_dir.join(report_file_name());
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = file.statistics.len(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use ivypick_core::{Column, ConsolidatedRecord, MappingResult, Platform, SplitRecord};

    use super::*;

    fn report() -> PipelineReport {
        let unmapped = MappedProduct {
            record: SplitRecord::passthrough(ConsolidatedRecord {
                name: "運費".to_string(),
                spec: String::new(),
                quantity: 1,
                source: Platform::Shopee,
                raw_payload: None,
            }),
            mapping: MappingResult::filtered(),
        };
        let inferred = MappedProduct {
            record: SplitRecord::passthrough(ConsolidatedRecord {
                name: "【艾薇】無調味核桃".to_string(),
                spec: String::new(),
                quantity: 2,
                source: Platform::Shopee,
                raw_payload: None,
            }),
            mapping: MappingResult {
                template_product: Some("無調味-核桃".to_string()),
                template_column: None,
                template_spec: None,
                multiplier: 1,
                mapped_quantity: 2,
                confidence: 0.85,
                status: MatchStatus::Matched,
            },
        };
        PipelineReport {
            statistics: vec![
                StatisticsEntry {
                    name: "豆塔-焦糖".to_string(),
                    column: Some(Column::B),
                    spec: Some("10入袋裝".to_string()),
                    flavor: "焦糖".to_string(),
                    quantity: 7,
                },
                StatisticsEntry {
                    name: "鳳凰酥".to_string(),
                    column: None,
                    spec: None,
                    flavor: String::new(),
                    quantity: 2,
                },
            ],
            mapped: vec![inferred, unmapped.clone()],
            unmapped: vec![unmapped],
        }
    }

    #[test]
    fn table_shows_tiers_and_flags_inferred_lines() {
        let table = render_table(&report()).unwrap();
        assert!(table.contains("信心分布: high 0 / medium 1 / low 0"));
        assert!(table.contains("待確認 (1):"));
        assert!(table.contains("[蝦皮] 【艾薇】無調味核桃 -> 無調味-核桃 (medium 0.85)"));
    }

    #[test]
    fn review_lines_skip_high_confidence_and_unmapped() {
        let mut report = report();
        report.mapped[0].mapping.confidence = 0.95;
        assert!(ReviewLine::collect(&report).is_empty());
        assert!(!render_table(&report).unwrap().contains("待確認"));
    }

    #[test]
    fn table_ends_with_total_row() {
        let table = render_table(&report()).unwrap();
        let total = table
            .lines()
            .find(|l| l.starts_with("總計"))
            .expect("total row present");
        assert!(total.contains("2 項"));
        assert!(total.trim_end().ends_with('9'));
    }

    #[test]
    fn table_lists_unmapped_lines_with_source_label() {
        let table = render_table(&report()).unwrap();
        assert!(table.contains("未對應 (1):"));
        assert!(table.contains("[蝦皮] 運費"));
        assert!(table.contains("(filtered)"));
    }

    #[test]
    fn empty_report_says_so() {
        let empty = PipelineReport {
            statistics: Vec::new(),
            mapped: Vec::new(),
            unmapped: Vec::new(),
        };
        assert!(render_table(&empty).unwrap().starts_with("no picking statistics"));
    }

    #[test]
    fn report_file_name_is_dated() {
        let name = report_file_name();
        assert!(name.starts_with("picking-list-"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "picking-list-YYYYMMDD.json".len());
    }

    #[test]
    fn read_records_reports_missing_file() {
        let err = read_records(Path::new("/nonexistent/ivypick/input.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
