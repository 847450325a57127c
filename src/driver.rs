//! The per-day loop: locate the date, fetch four slices, compose and write the figure.

use std::{fs, path::PathBuf};

use chrono::NaiveDate;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::PipelineError,
    field::GridSlice,
    layer::{Layer, Role},
    render::{
        colormap::{linear_ticks, ColorScale, ALGAE, CHLOROPHYLL_TICKS, THERMAL},
        figure_file_name,
        projection::MeshGrid,
        Figure, FigureWriter, Panel,
    },
    time_index::{self, TimeAxis},
};

/// What a run produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<NaiveDate>,
}

pub struct Driver<'a, W: FigureWriter> {
    config: &'a Config,
    layers: Vec<Layer>,
    writer: &'a W,
    progress: ProgressBar,
}

impl<'a, W: FigureWriter> Driver<'a, W> {
    pub fn new(
        config: &'a Config,
        mut layers: Vec<Layer>,
        writer: &'a W,
    ) -> Result<Self, PipelineError> {
        if layers.is_empty() {
            return Err(PipelineError::NoLayers);
        }
        layers.sort_by_key(|layer| layer.role);

        Ok(Driver {
            config,
            layers,
            writer,
            progress: ProgressBar::hidden(),
        })
    }

    /// Reports each finished day on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Writes one figure per day of the configured range.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let axes = self.time_axes().await?;

        let reference = &self.layers[0];
        let coordinates = reference
            .dataset
            .coordinates()
            .await
            .map_err(|source| PipelineError::Fetch {
                dataset: reference.label().to_string(),
                source,
            })?;
        let mesh = MeshGrid::new(&coordinates.lat, &coordinates.lon).ok_or_else(|| {
            PipelineError::Coordinates {
                dataset: reference.label().to_string(),
                message: "latitude and longitude must span a non-empty area".to_string(),
            }
        })?;
        let expected = (coordinates.lat.len(), coordinates.lon.len());

        fs::create_dir_all(&self.config.output_dir)?;

        let mut report = RunReport::default();
        for date in self.config.dates() {
            let timestamp = time_index::midnight_timestamp(date);
            let index = match time_index::resolve(&axes, &timestamp) {
                Ok(index) => index,
                Err(e) if e.is_date_not_found() && self.config.skip_missing => {
                    warn!("Skipping {}: {}", date, e);
                    report.skipped.push(date);
                    self.progress.inc(1);
                    continue;
                }
                Err(e) => return Err(e),
            };
            debug!("{} is at time index {}", timestamp, index);

            let slices = self.read_slices(index, expected).await?;
            let panels = self.panels(&slices);
            let figure = Figure::new(date, &mesh, panels)?;

            let path = self.config.output_dir.join(figure_file_name(date));
            self.writer.write(&figure, &path)?;
            info!("Saved {}", path.display());

            report.written.push(path);
            self.progress.inc(1);
        }

        Ok(report)
    }

    async fn time_axes(&self) -> Result<Vec<TimeAxis>, PipelineError> {
        let mut axes = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let times = layer
                .dataset
                .time_coordinate()
                .await
                .map_err(|source| PipelineError::Fetch {
                    dataset: layer.label().to_string(),
                    source,
                })?;
            axes.push(TimeAxis {
                dataset: layer.label().to_string(),
                times,
            });
        }

        Ok(axes)
    }

    async fn read_slices(
        &self,
        index: usize,
        expected: (usize, usize),
    ) -> Result<Vec<(Role, GridSlice)>, PipelineError> {
        let mut slices = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let raw = layer
                .dataset
                .read_slice(&layer.variable, index)
                .await
                .map_err(|source| PipelineError::Fetch {
                    dataset: layer.label().to_string(),
                    source,
                })?;
            let slice =
                GridSlice::from_raw(raw, layer.role.kind()).map_err(|source| PipelineError::Field {
                    dataset: layer.label().to_string(),
                    source,
                })?;
            if slice.shape() != expected {
                return Err(PipelineError::ShapeMismatch {
                    dataset: layer.label().to_string(),
                    expected,
                    found: slice.shape(),
                });
            }
            slices.push((layer.role, slice));
        }

        Ok(slices)
    }

    fn panels<'s>(&self, slices: &'s [(Role, GridSlice)]) -> Vec<Panel<'s>> {
        let [sst_min, sst_max] = self.config.sst_range;
        let [chl_min, chl_max] = self.config.chlorophyll_range;

        slices
            .iter()
            .map(|(role, slice)| match role {
                Role::RawSst | Role::CloudFreeSst => Panel {
                    title: role.panel_title(),
                    slice,
                    scale: ColorScale::Linear {
                        min: sst_min,
                        max: sst_max,
                    },
                    colormap: THERMAL,
                    ticks: linear_ticks(sst_min, sst_max, self.config.sst_tick_step),
                },
                Role::RawChlorophyll | Role::CloudFreeChlorophyll => Panel {
                    title: role.panel_title(),
                    slice,
                    scale: ColorScale::Log {
                        min: chl_min,
                        max: chl_max,
                    },
                    colormap: ALGAE,
                    ticks: CHLOROPHYLL_TICKS
                        .iter()
                        .copied()
                        .filter(|&t| t >= chl_min && t <= chl_max)
                        .collect(),
                },
            })
            .collect()
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use std::{path::Path, sync::Mutex};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        dataset::{Coordinates, Dataset},
        field::RawSlice,
        opendap,
        render::RenderError,
    };

    struct MockDataset {
        label: String,
        times: Vec<String>,
        rows: usize,
        cols: usize,
        value: f64,
    }

    impl MockDataset {
        fn new(label: &str, days: &[u32], value: f64) -> Self {
            MockDataset {
                label: label.to_string(),
                times: days.iter().map(|d| format!("2017-04-{:02}T00:00:00Z", d)).collect(),
                rows: 2,
                cols: 3,
                value,
            }
        }
    }

    #[async_trait]
    impl Dataset for MockDataset {
        fn label(&self) -> &str {
            &self.label
        }

        async fn time_coordinate(&self) -> opendap::Result<Vec<String>> {
            Ok(self.times.clone())
        }

        async fn coordinates(&self) -> opendap::Result<Coordinates> {
            Ok(Coordinates {
                lat: (0..self.rows).map(|i| 30.0 + i as f64).collect(),
                lon: (0..self.cols).map(|i| -80.0 + i as f64).collect(),
            })
        }

        async fn read_slice(
            &self,
            _variable: &str,
            _time_index: usize,
        ) -> opendap::Result<RawSlice> {
            Ok(RawSlice {
                shape: vec![1, self.rows, self.cols],
                values: vec![self.value; self.rows * self.cols],
                fill_values: vec![],
            })
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        figures: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FigureWriter for RecordingWriter {
        fn write(&self, figure: &Figure<'_>, path: &Path) -> Result<(), RenderError> {
            fs::write(path, b"").map_err(|e| RenderError::Draw {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let titles = figure.panels.iter().map(|p| p.title.clone()).collect();
            self.figures.lock().unwrap().push((figure.title.clone(), titles));
            Ok(())
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 4, d).unwrap()
    }

    fn config(dir: &TempDir, start: u32, end: u32) -> Config {
        Config {
            start_date: date(start),
            end_date: date(end),
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn layer(role: Role, variable: &str, label: &str, days: &[u32], value: f64) -> Layer {
        Layer::new(role, variable, Box::new(MockDataset::new(label, days, value)))
    }

    fn layers(days: &[u32]) -> Vec<Layer> {
        // Deliberately out of layout order.
        vec![
            layer(Role::CloudFreeChlorophyll, "chlor_a", "dineof/chla", days, 1.0),
            layer(Role::RawSst, "sst", "modis/sst", days, 20.0),
            layer(Role::RawChlorophyll, "chlor_a", "modis/chla", days, -1.0),
            layer(Role::CloudFreeSst, "sst", "dineof/sst", days, 21.0),
        ]
    }

    fn files_in(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn should_write_one_figure_for_a_single_day() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, 13, 13);
        let writer = RecordingWriter::default();

        let report = Driver::new(&config, layers(&[12, 13, 14]), &writer)
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.written, vec![dir.path().join("secoora_20170413.png")]);
        assert_eq!(files_in(&dir), vec!["secoora_20170413.png"]);

        let figures = writer.figures.lock().unwrap();
        assert_eq!(figures[0].0, "4km Observed and Cloud Free: 13 Apr 2017 00UTC");
    }

    #[tokio::test]
    async fn should_write_one_figure_per_day_inclusive() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, 13, 16);
        let writer = RecordingWriter::default();

        let report = Driver::new(&config, layers(&[13, 14, 15, 16, 17]), &writer)
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.written.len() as u64, config.day_count());
        assert_eq!(
            files_in(&dir),
            vec![
                "secoora_20170413.png",
                "secoora_20170414.png",
                "secoora_20170415.png",
                "secoora_20170416.png",
            ]
        );
    }

    #[tokio::test]
    async fn should_lay_out_panels_in_fixed_order() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, 13, 13);
        let writer = RecordingWriter::default();

        Driver::new(&config, layers(&[13]), &writer).unwrap().run().await.unwrap();

        let figures = writer.figures.lock().unwrap();
        assert_eq!(
            figures[0].1,
            vec![
                "Original SST (°C)",
                "Cloud Free SST (°C)",
                "Original Chl-a (mg/m³)",
                "Cloud Free Chl-a (mg/m³)",
            ]
        );
    }

    #[tokio::test]
    async fn should_fail_on_missing_date_without_writing_it() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, 13, 14);
        let writer = RecordingWriter::default();

        let result = Driver::new(&config, layers(&[13, 15]), &writer).unwrap().run().await;

        match result {
            Err(PipelineError::DateNotFound { timestamp, .. }) => {
                assert_eq!(timestamp, "2017-04-14T00:00:00Z")
            }
            other => panic!("expected DateNotFound, got {:?}", other),
        }
        assert_eq!(files_in(&dir), vec!["secoora_20170413.png"]);
    }

    #[tokio::test]
    async fn should_skip_missing_dates_when_asked() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            skip_missing: true,
            ..config(&dir, 13, 15)
        };
        let writer = RecordingWriter::default();

        let report = Driver::new(&config, layers(&[13, 15]), &writer)
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.skipped, vec![date(14)]);
        assert_eq!(files_in(&dir), vec!["secoora_20170413.png", "secoora_20170415.png"]);
    }

    #[tokio::test]
    async fn should_reject_disagreeing_time_indices() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, 13, 13);
        let writer = RecordingWriter::default();
        let mut layers = layers(&[12, 13]);
        layers[0] = Layer::new(
            Role::CloudFreeChlorophyll,
            "chlor_a",
            Box::new(MockDataset::new("dineof/chla", &[13], 1.0)),
        );

        let result = Driver::new(&config, layers, &writer).unwrap().run().await;

        assert!(matches!(
            result,
            Err(PipelineError::TimeIndexMismatch { index: 0, reference_index: 1, .. })
        ));
        assert!(files_in(&dir).is_empty());
    }

    #[tokio::test]
    async fn should_reject_slices_off_the_shared_grid() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, 13, 13);
        let writer = RecordingWriter::default();
        let mut layers = layers(&[13]);
        let mut wide = MockDataset::new("dineof/sst", &[13], 21.0);
        wide.cols = 4;
        layers[3] = Layer::new(Role::CloudFreeSst, "sst", Box::new(wide));

        let result = Driver::new(&config, layers, &writer).unwrap().run().await;

        assert!(matches!(
            result,
            Err(PipelineError::ShapeMismatch {
                expected: (2, 3),
                found: (2, 4),
                ..
            })
        ));
    }

    #[test]
    fn should_require_layers() {
        let config = Config::default();
        let writer = RecordingWriter::default();

        assert!(matches!(Driver::new(&config, vec![], &writer), Err(PipelineError::NoLayers)));
    }
}
