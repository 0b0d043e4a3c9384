//! Data source inspection: file-type sniffing and per-format summarization.
//!
//! The inspector never fails a run: processing errors are recorded on the
//! returned summary (and logged) so the pipeline can still tell a story
//! about whatever it could extract.

use std::path::Path;
use std::process::Command;

use serde_json::{Map, Value, json};

use super::{DataSummary, DataType};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const VISUALIZATION_EXTENSIONS: [&str; 3] = ["twb", "twbx", "pbix"];

/// Maximum characters of PDF text quoted as a sample
const PDF_SAMPLE_CHARS: usize = 500;

/// Classifies data sources and extracts summaries
pub struct DataInspector {
    has_tabcmd: bool,
    has_pbicli: bool,
}

impl DataInspector {
    /// Create an inspector, probing for the external conversion tools
    pub fn new() -> Self {
        let has_tabcmd = probe_tool("tabcmd");
        let has_pbicli = probe_tool("pbicli");

        if !has_tabcmd {
            log::warn!("Tableau command-line tool (tabcmd) not found. Tableau file conversion will be limited.");
        }
        if !has_pbicli {
            log::warn!("Power BI command-line tool (pbicli) not found. Power BI file conversion will be limited.");
        }

        Self { has_tabcmd, has_pbicli }
    }

    /// Create an inspector with explicit tool availability (for tests)
    pub fn with_tools(has_tabcmd: bool, has_pbicli: bool) -> Self {
        Self { has_tabcmd, has_pbicli }
    }

    /// Summarize a data source: a file path or a free-text description
    pub fn summarize(&self, data_source: &str) -> DataSummary {
        let path = Path::new(data_source);
        if path.is_file() {
            self.summarize_file(path)
        } else {
            DataSummary::description(data_source)
        }
    }

    fn summarize_file(&self, path: &Path) -> DataSummary {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            self.summarize_image(path)
        } else if ext == "pdf" {
            self.summarize_pdf(path)
        } else if ext == "csv" {
            self.summarize_csv(path)
        } else if VISUALIZATION_EXTENSIONS.contains(&ext.as_str()) {
            self.summarize_visualization(path, &ext)
        } else {
            DataSummary::new(
                DataType::Unknown,
                format!("Unrecognized file format: .{}", ext),
            )
            .with_insight("No automated insights available for this file type.")
        }
    }

    fn summarize_image(&self, path: &Path) -> DataSummary {
        let name = file_name(path);
        match image::image_dimensions(path) {
            Ok((width, height)) => {
                let format = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_uppercase();
                DataSummary::new(DataType::Image, format!("Image file ({}): {}", format, name))
                    .with_file_name(&name)
                    .with_metadata("dimensions", json!(format!("{}x{}", width, height)))
                    .with_metadata("format", json!(format))
                    .with_insight("Image data requires visual analysis.")
            }
            Err(e) => {
                log::error!("Error processing image {}: {}", path.display(), e);
                DataSummary::new(DataType::Image, format!("Image file: {}", name))
                    .with_file_name(&name)
                    .with_error(e.to_string())
                    .with_insight("Error processing image data.")
            }
        }
    }

    fn summarize_pdf(&self, path: &Path) -> DataSummary {
        let name = file_name(path);
        match pdf_extract::extract_text(path) {
            Ok(text) => {
                // pdf-extract separates pages with form feeds
                let pages: Vec<&str> = text.split('\x0c').collect();
                let sample: String = pages
                    .first()
                    .map(|p| p.chars().take(PDF_SAMPLE_CHARS).collect::<String>() + "...")
                    .unwrap_or_default();

                DataSummary::new(DataType::Pdf, format!("PDF document: {}", name))
                    .with_file_name(&name)
                    .with_metadata("pages", json!(pages.len()))
                    .with_metadata("sample_text", json!(sample))
                    .with_insight("PDF requires text extraction and analysis.")
            }
            Err(e) => {
                log::error!("Error processing PDF {}: {}", path.display(), e);
                DataSummary::new(DataType::Pdf, format!("PDF document: {}", name))
                    .with_file_name(&name)
                    .with_error(e.to_string())
                    .with_insight("Error processing PDF data.")
            }
        }
    }

    fn summarize_csv(&self, path: &Path) -> DataSummary {
        let name = file_name(path);
        match csv_statistics(path) {
            Ok(stats) => {
                let shape = format!(
                    "Dataset contains {} rows and {} columns.",
                    stats.rows,
                    stats.columns.len()
                );
                let numeric = format!("Numeric columns: {}", stats.numeric_names.join(", "));
                DataSummary::new(DataType::Csv, format!("CSV data file: {}", name))
                    .with_file_name(&name)
                    .with_metadata("rows", json!(stats.rows))
                    .with_metadata("columns", json!(stats.columns))
                    .with_metadata("statistics", Value::Object(stats.numeric))
                    .with_insight(shape)
                    .with_insight(numeric)
            }
            Err(e) => {
                log::error!("Error processing CSV {}: {}", path.display(), e);
                DataSummary::new(DataType::Csv, format!("CSV data file: {}", name))
                    .with_file_name(&name)
                    .with_error(e.to_string())
                    .with_insight("Error processing CSV data.")
            }
        }
    }

    /// Convert a Tableau/Power BI file to PDF, then summarize the PDF.
    fn summarize_visualization(&self, path: &Path, ext: &str) -> DataSummary {
        let name = file_name(path);

        match self.convert_to_pdf(path, ext) {
            Ok(pdf_path) => {
                let mut summary = self.summarize_pdf(&pdf_path);
                summary.data_type = DataType::Visualization;
                summary.description = format!("Visualization file: {}", name);
                summary.file_name = Some(name);
                let _ = std::fs::remove_file(&pdf_path);
                summary
            }
            Err(e) => {
                log::error!("Error converting {} to PDF: {}", path.display(), e);
                DataSummary::new(DataType::Visualization, format!("Visualization file: {}", name))
                    .with_file_name(&name)
                    .with_error("Failed to convert to PDF")
                    .with_insight("Unable to process visualization file. Please convert to PDF manually.")
            }
        }
    }

    fn convert_to_pdf(&self, path: &Path, ext: &str) -> Result<std::path::PathBuf, String> {
        let output_pdf = std::env::temp_dir().join(format!("storyloom-converted-{}.pdf", std::process::id()));

        let status = match ext {
            "twb" | "twbx" => {
                if !self.has_tabcmd {
                    return Err("Tableau command-line tool not available".to_string());
                }
                Command::new("tabcmd")
                    .arg("export")
                    .arg(path)
                    .arg("--pdf")
                    .arg("--output")
                    .arg(&output_pdf)
                    .status()
            }
            "pbix" => {
                if !self.has_pbicli {
                    return Err("Power BI command-line tool not available".to_string());
                }
                Command::new("pbicli")
                    .arg("export")
                    .arg(path)
                    .arg("--format")
                    .arg("pdf")
                    .arg("--output")
                    .arg(&output_pdf)
                    .status()
            }
            other => return Err(format!("not a visualization format: .{}", other)),
        };

        match status {
            Ok(s) if s.success() && output_pdf.exists() => Ok(output_pdf),
            Ok(s) => Err(format!("conversion exited with {}", s)),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl Default for DataInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether an external CLI tool responds to --version
fn probe_tool(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

struct CsvStatistics {
    rows: usize,
    columns: Vec<String>,
    numeric_names: Vec<String>,
    numeric: Map<String, Value>,
}

/// Basic statistical analysis of a CSV file: per-numeric-column
/// mean/std/min/max, using sample standard deviation.
fn csv_statistics(path: &Path) -> Result<CsvStatistics, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];
    let mut non_numeric = vec![false; columns.len()];
    let mut rows = 0usize;

    for record in reader.records() {
        let record = record?;
        rows += 1;
        for (i, field) in record.iter().enumerate().take(columns.len()) {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            match field.parse::<f64>() {
                Ok(v) => values[i].push(v),
                Err(_) => non_numeric[i] = true,
            }
        }
    }

    let mut numeric_names = Vec::new();
    let mut numeric = Map::new();

    for (i, column) in columns.iter().enumerate() {
        if non_numeric[i] || values[i].is_empty() {
            continue;
        }

        let data = &values[i];
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let std = if data.len() > 1 {
            (data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        numeric_names.push(column.clone());
        numeric.insert(
            column.clone(),
            json!({ "mean": mean, "std": std, "min": min, "max": max }),
        );
    }

    Ok(CsvStatistics {
        rows,
        columns,
        numeric_names,
        numeric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn inspector() -> DataInspector {
        DataInspector::with_tools(false, false)
    }

    #[test]
    fn test_description_when_not_a_file() {
        let summary = inspector().summarize("weekly active users, trending up since March");
        assert_eq!(summary.data_type, DataType::Description);
        assert_eq!(summary.description, "weekly active users, trending up since March");
        assert!(summary.insights.is_empty());
    }

    #[test]
    fn test_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.parquet");
        std::fs::write(&path, b"whatever").unwrap();

        let summary = inspector().summarize(path.to_str().unwrap());
        assert_eq!(summary.data_type, DataType::Unknown);
        assert!(summary.description.contains(".parquet"));
        assert_eq!(
            summary.insights,
            vec!["No automated insights available for this file type."]
        );
    }

    #[test]
    fn test_csv_statistics() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "region,units,price\nnorth,10,2.5\nsouth,20,3.5\neast,30,4.5\n").unwrap();

        let summary = inspector().summarize(path.to_str().unwrap());
        assert_eq!(summary.data_type, DataType::Csv);
        assert_eq!(summary.file_name.as_deref(), Some("sales.csv"));
        assert_eq!(summary.metadata["rows"], json!(3));
        assert_eq!(summary.metadata["columns"], json!(["region", "units", "price"]));

        let stats = &summary.metadata["statistics"];
        // region is non-numeric and excluded
        assert!(stats.get("region").is_none());
        assert_eq!(stats["units"]["mean"], json!(20.0));
        assert_eq!(stats["units"]["min"], json!(10.0));
        assert_eq!(stats["units"]["max"], json!(30.0));
        assert_eq!(stats["units"]["std"], json!(10.0));

        assert!(summary.insights[0].contains("3 rows and 3 columns"));
        assert!(summary.insights[1].contains("units, price"));
    }

    #[test]
    fn test_csv_malformed_records_error_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b\n1,2,3,4,5\n\"unclosed\n").unwrap();

        let summary = inspector().summarize(path.to_str().unwrap());
        assert_eq!(summary.data_type, DataType::Csv);
        assert!(summary.metadata.contains_key("error"));
        assert_eq!(summary.insights, vec!["Error processing CSV data."]);
    }

    #[test]
    fn test_image_error_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"not a real png").unwrap();

        let summary = inspector().summarize(path.to_str().unwrap());
        assert_eq!(summary.data_type, DataType::Image);
        assert!(summary.metadata.contains_key("error"));
        assert_eq!(summary.insights, vec!["Error processing image data."]);
    }

    #[test]
    fn test_pdf_error_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"not a real pdf").unwrap();

        let summary = inspector().summarize(path.to_str().unwrap());
        assert_eq!(summary.data_type, DataType::Pdf);
        assert!(summary.metadata.contains_key("error"));
        assert_eq!(summary.insights, vec!["Error processing PDF data."]);
    }

    #[test]
    fn test_visualization_without_tools() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.twbx");
        std::fs::write(&path, b"binary").unwrap();

        let summary = inspector().summarize(path.to_str().unwrap());
        assert_eq!(summary.data_type, DataType::Visualization);
        assert_eq!(summary.metadata["error"], json!("Failed to convert to PDF"));
        assert_eq!(
            summary.insights,
            vec!["Unable to process visualization file. Please convert to PDF manually."]
        );
    }

    #[test]
    fn test_extension_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("DATA.CSV");
        std::fs::write(&path, "x\n1\n").unwrap();

        let summary = inspector().summarize(path.to_str().unwrap());
        assert_eq!(summary.data_type, DataType::Csv);
    }
}
