use forecast_core::domain::ForecastView;
use forecast_core::ports::{ForecastWriter, Result};
use forecast_core::utils::{format_timestamp_to_local, sanitize_filename};
use std::fs;
use std::path::{Path, PathBuf};

/// Markdown writer adapter implementation
pub struct MarkdownWriterAdapter {
    output_folder: PathBuf,
}

impl MarkdownWriterAdapter {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    /// File a report for this area lands in: `<area>-<first date>.md`
    pub fn report_path(&self, area_code: &str, views: &[ForecastView]) -> Option<PathBuf> {
        let first = views.first()?;
        let filename = format!(
            "{}-{}.md",
            sanitize_filename(area_code),
            first.forecast_date.format("%Y-%m-%d")
        );
        Some(self.output_folder.join(filename))
    }

    /// Formats the stored days of one area into markdown
    fn format_markdown(&self, area_code: &str, views: &[ForecastView]) -> String {
        if views.is_empty() {
            return String::new();
        }

        let mut output = String::new();
        output.push_str(&format!("# {} ({})\n\n", views[0].area_name, area_code));
        output.push_str(&format!("*{} days*\n\n", views.len()));
        output.push_str("---\n\n");

        for view in views {
            output.push_str(&format!("## {}\n\n", view.forecast_date.format("%Y-%m-%d (%a)")));
            output.push_str(&format!(
                "![{}]({}) **{}**\n\n",
                view.weather_description, view.icon_path, view.weather_description
            ));
            output.push_str(&format!(
                "- Temperature: {} / {}\n",
                celsius(view.temperature_min),
                celsius(view.temperature_max)
            ));
            output.push_str(&format!(
                "- Chance of rain: {}\n",
                view.precipitation_probability
                    .map(|p| format!("{}%", p))
                    .unwrap_or_else(|| "--".to_string())
            ));
            output.push_str(&format!(
                "- Updated: {}\n\n",
                format_timestamp_to_local(&view.updated_at)
            ));
            output.push_str("---\n\n");
        }

        output
    }
}

fn celsius(value: Option<i32>) -> String {
    value
        .map(|t| format!("{}℃", t))
        .unwrap_or_else(|| "--".to_string())
}

impl ForecastWriter for MarkdownWriterAdapter {
    fn write(&self, area_code: &str, views: &[ForecastView]) -> Result<()> {
        let Some(file_path) = self.report_path(area_code, views) else {
            return Ok(());
        };

        // Create output directory if it doesn't exist
        fs::create_dir_all(Path::new(&self.output_folder))?;

        fs::write(&file_path, self.format_markdown(area_code, views))?;
        tracing::info!(path = %file_path.display(), days = views.len(), "Forecast report written");
        Ok(())
    }
}
