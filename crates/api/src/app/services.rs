//! Service wiring: repositories, job subsystem, token codec.

use std::sync::Arc;

use cropsight_auth::Hs256Jwt;
use cropsight_infra::{CatalogRepo, DatasetRepo, Settings, TokioScriptRunner, UserRepo};
use cropsight_jobs::{
    ExecutorConfig, InMemoryJobStore, JobExecutor, JobLauncher, JobManager, ModelTrainer,
    ScriptRunner, SimulatedTrainer, StatusReporter,
};

pub type SharedJobStore = Arc<InMemoryJobStore>;

/// Everything the handlers need, built once at startup.
pub struct AppServices {
    pub settings: Settings,
    pub jwt: Arc<Hs256Jwt>,
    pub users: UserRepo,
    pub catalog: CatalogRepo,
    pub datasets: Arc<DatasetRepo>,
    pub launcher: JobLauncher<SharedJobStore, Arc<DatasetRepo>>,
    pub reporter: StatusReporter<SharedJobStore>,
    pub manager: JobManager<SharedJobStore>,
}

impl AppServices {
    pub fn build(settings: Settings, jwt: Arc<Hs256Jwt>) -> Self {
        let store = InMemoryJobStore::arc();
        let datasets = Arc::new(DatasetRepo::new());

        let trainer: Arc<dyn ModelTrainer> = Arc::new(SimulatedTrainer::new(
            settings.trainer_min_delay_secs,
            settings.trainer_max_delay_secs,
        ));
        let scripts: Arc<dyn ScriptRunner> = Arc::new(TokioScriptRunner::new(
            settings.python_executable.clone(),
            settings.analysis_script.clone(),
        ));

        let executor = Arc::new(JobExecutor::new(
            store.clone(),
            trainer,
            scripts,
            ExecutorConfig {
                max_concurrent: settings.max_concurrent_jobs,
                analysis_mode: settings.analysis_mode.clone(),
                default_crop_type: settings.default_crop_type.clone(),
                output_dir: settings.output_dir.clone(),
            },
        ));

        Self {
            settings,
            jwt,
            users: UserRepo::new(),
            catalog: CatalogRepo::new(),
            datasets: datasets.clone(),
            launcher: JobLauncher::new(store.clone(), datasets, executor),
            reporter: StatusReporter::new(store.clone()),
            manager: JobManager::new(store),
        }
    }
}
