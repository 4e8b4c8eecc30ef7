use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook};

use crate::db::Repository;
use crate::error::Result;
use crate::models::Article;

const COLUMNS: [&str; 7] = [
    "id",
    "source",
    "author",
    "title",
    "url",
    "published_at",
    "fetched_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

/// Dumps the whole store to a timestamped file in `output_dir`.
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Returns the written path, or `None` when the store is empty and no
    /// file was created.
    pub async fn export(&self, repository: &Repository, format: ExportFormat) -> Result<Option<PathBuf>> {
        let articles = repository.all_articles().await?;
        if articles.is_empty() {
            return Ok(None);
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(export_file_name(format, Local::now()));

        match format {
            ExportFormat::Csv => write_csv(&path, &articles)?,
            ExportFormat::Excel => write_xlsx(&path, &articles)?,
        }

        tracing::info!("Exported {} articles to {}", articles.len(), path.display());

        Ok(Some(path))
    }
}

fn export_file_name(format: ExportFormat, now: DateTime<Local>) -> String {
    format!(
        "news_export_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn write_csv(path: &Path, articles: &[Article]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for article in articles {
        writer.serialize(article)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &Path, articles: &[Article]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (i, article) in articles.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, article.id as f64)?;
        worksheet.write_string(row, 1, &article.source)?;
        worksheet.write_string(row, 2, &article.author)?;
        worksheet.write_string(row, 3, &article.title)?;
        worksheet.write_string(row, 4, &article.url)?;
        worksheet.write_string(row, 5, &article.published_at)?;
        worksheet.write_string(row, 6, &article.fetched_at)?;
    }

    workbook.save(path)?;
    Ok(())
}
