use crate::core::Pipeline;
use crate::domain::model::DuplicateReport;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ScanEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
    quiet: bool,
}

impl<P: Pipeline> ScanEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
            quiet: false,
        }
    }

    /// Suppresses the stage banners on stdout.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn banner(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    pub async fn run(&self) -> Result<DuplicateReport> {
        self.monitor.log_stats("Scan started");

        // Extract
        self.banner("Indexing...");
        let index = self.pipeline.extract().await?;
        self.monitor.log_stats("Indexing finished");

        // Transform
        self.banner("Calculating md5...");
        let hashed = self.pipeline.transform(index).await?;
        self.monitor.log_stats("Hashing finished");

        // Load
        self.banner("Duplicate searching...");
        let report = self.pipeline.load(hashed).await?;
        self.monitor.log_stats("Duplicate search finished");
        self.monitor.log_final_stats();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{HashResult, IndexResult};
    use crate::utils::error::DupError;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPipeline {
        calls: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<IndexResult> {
            self.calls.lock().unwrap().push("extract");
            Ok(IndexResult {
                root: PathBuf::from("/data"),
                files: vec![PathBuf::from("/data/a")],
                ..Default::default()
            })
        }

        async fn transform(&self, index: IndexResult) -> Result<HashResult> {
            self.calls.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(DupError::TaskError {
                    message: "worker crashed".to_string(),
                });
            }
            Ok(HashResult {
                root: index.root,
                files_indexed: index.files.len(),
                ..Default::default()
            })
        }

        async fn load(&self, hashed: HashResult) -> Result<DuplicateReport> {
            self.calls.lock().unwrap().push("load");
            Ok(DuplicateReport {
                root: hashed.root,
                files_indexed: hashed.files_indexed,
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_run_executes_stages_in_order() {
        let engine = ScanEngine::new(RecordingPipeline::default()).quiet(true);

        let report = tokio_test::block_on(engine.run()).unwrap();

        assert_eq!(report.files_indexed, 1);
        assert_eq!(
            *engine.pipeline.calls.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_stage_error() {
        let pipeline = RecordingPipeline {
            fail_transform: true,
            ..Default::default()
        };
        let engine = ScanEngine::new_with_monitoring(pipeline, false).quiet(true);

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, DupError::TaskError { .. }));
        assert_eq!(
            *engine.pipeline.calls.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
