//! HTML rendering for the dashboard page.

use askama::Template;
use palette::{LinSrgb, Mix, Srgb};

use crate::{
    api::session::Session,
    config::Settings,
    data::{Preview, DIAGNOSIS_COLUMN, SUGGESTED_COLUMN, TEXT_COLUMN},
    error::DatasetError,
};

pub const INSTRUCTIONS: &[&str] = &[
    "Upload your healthcare dataset (CSV) with a TEXT column.",
    "Click 'Clean Data' to annotate each note with linked medical concepts.",
    "Download the cleaned dataset.",
    "Review the diagnosis distribution and suggested diagnoses.",
];

const LABEL_WIDTH: usize = 180;
const BAR_AREA_WIDTH: usize = 480;
const COUNT_WIDTH: usize = 60;
const ROW_HEIGHT: usize = 26;

/// Viridis anchor colours, dark to light.
const VIRIDIS: [Srgb<u8>; 5] = [
    Srgb::new(68, 1, 84),
    Srgb::new(59, 82, 139),
    Srgb::new(33, 145, 140),
    Srgb::new(94, 201, 98),
    Srgb::new(253, 231, 37),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub count: usize,
    pub y: usize,
    pub text_y: usize,
    pub width: String,
    pub colour: String,
}

/// Horizontal frequency chart, most frequent value on top.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    pub width: usize,
    pub height: usize,
    pub label_width: usize,
    pub count_x: usize,
}

impl BarChart {
    /// Lay out bars for counts already ordered by descending frequency.
    pub fn from_counts(counts: &[(String, usize)]) -> Self {
        let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
        let bars = counts
            .iter()
            .enumerate()
            .map(|(idx, (label, count))| {
                let width = *count as f64 / max as f64 * BAR_AREA_WIDTH as f64;
                Bar {
                    label: label.clone(),
                    count: *count,
                    y: idx * ROW_HEIGHT,
                    text_y: idx * ROW_HEIGHT + ROW_HEIGHT / 2 + 4,
                    width: format!("{width:.1}"),
                    colour: viridis(idx, counts.len()),
                }
            })
            .collect();
        Self {
            bars,
            width: LABEL_WIDTH + BAR_AREA_WIDTH + COUNT_WIDTH,
            height: counts.len().max(1) * ROW_HEIGHT,
            label_width: LABEL_WIDTH,
            count_x: LABEL_WIDTH + BAR_AREA_WIDTH + 6,
        }
    }
}

/// Colour for bar `idx` of `total`, blended in linear RGB between viridis anchors.
fn viridis(idx: usize, total: usize) -> String {
    let t = if total <= 1 {
        0.0
    } else {
        idx as f32 / (total - 1) as f32
    };
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(VIRIDIS.len() - 1);
    let anchor = |i: usize| -> LinSrgb { VIRIDIS[i].into_format::<f32>().into_linear() };
    let blended = anchor(lo).mix(anchor(hi), scaled - lo as f32);
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(blended).into_format();
    format!("#{rgb:x}")
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub flash: Option<String>,
    pub phase: &'static str,
    pub file_name: Option<String>,
    pub raw_preview: Option<Preview>,
    pub cleaned_preview: Option<Preview>,
    pub cleaned_at: Option<String>,
    pub chart: Option<BarChart>,
    pub suggestions: Option<Preview>,
    pub instructions: &'static [&'static str],
}

impl DashboardPage {
    pub fn build(
        session: &Session,
        flash: Option<String>,
        settings: &Settings,
    ) -> Result<Self, DatasetError> {
        let mut page = Self {
            flash,
            phase: session.phase(),
            file_name: None,
            raw_preview: None,
            cleaned_preview: None,
            cleaned_at: None,
            chart: None,
            suggestions: None,
            instructions: INSTRUCTIONS,
        };

        match session {
            Session::Empty => {}
            Session::Loaded { file_name, raw } => {
                page.file_name = Some(file_name.clone());
                page.raw_preview = Some(raw.preview(settings.preview_rows)?);
            }
            Session::Cleaned {
                file_name,
                raw,
                cleaned,
                cleaned_at,
            } => {
                page.file_name = Some(file_name.clone());
                page.raw_preview = Some(raw.preview(settings.preview_rows)?);
                page.cleaned_preview = Some(cleaned.preview(settings.preview_rows)?);
                page.cleaned_at = Some(cleaned_at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
                if let Some(counts) = cleaned.value_counts(DIAGNOSIS_COLUMN)? {
                    page.chart = Some(BarChart::from_counts(&counts));
                }
                page.suggestions = Some(cleaned.preview_columns(
                    &[TEXT_COLUMN, SUGGESTED_COLUMN],
                    settings.suggestion_rows,
                )?);
            }
        }
        Ok(page)
    }
}
