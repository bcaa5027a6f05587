use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::contract::{Contract, ContractAssembler, ContractDrafter, ContractRequest};
use crate::database::{GenerationKind, GenerationRecord, GenerationStats, Repository};
use crate::enhancer::{EnhanceRequest, PromptEnhancer, PromptVariation};
use crate::file_utils::FileManager;
use crate::generator::{GeneratedScript, ScriptGenerator, ScriptRequest};
use crate::providers::{self, LlmClient};
use crate::script::{chunk_for_tts, render_chunks, CleanReport, ScriptCleaner};

// @module: Application controller wiring configuration, providers and storage

/// Outcome of cleaning every script in a directory
#[derive(Debug, Clone, Default)]
pub struct CleanSummary {
    /// Narration files written
    pub written: Vec<PathBuf>,
    /// Files that could not be read or written
    pub failed: usize,
    /// Files skipped because their output already exists
    pub skipped: usize,
    /// Removal counts summed over all cleaned files
    pub report: CleanReport,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Client for the active provider
    client: Arc<dyn LlmClient>,
    // @field: History store, absent when storage is disabled
    repository: Option<Repository>,
    cleaner: ScriptCleaner,
}

impl Controller {
    /// Create a controller with the mock provider and in-memory storage
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.generation.provider = crate::app_config::AiProvider::Mock;
        let client = providers::build_client(&config.generation)?;
        Ok(Self::with_parts(config, client, Some(Repository::new_in_memory()?)))
    }

    // @method: Create a controller from configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let client = providers::build_client(&config.generation)?;

        let repository = if config.storage.enabled {
            let path = config.database_path()?;
            Some(Repository::new(
                crate::database::DatabaseConnection::new(&path)
                    .with_context(|| format!("Failed to open history database at {}", path.display()))?,
            ))
        } else {
            debug!("Result storage is disabled");
            None
        };

        Ok(Self::with_parts(config, client, repository))
    }

    // @method: Create a controller from already built parts
    pub fn with_parts(config: Config, client: Arc<dyn LlmClient>, repository: Option<Repository>) -> Self {
        let cleaner = ScriptCleaner::with_options(config.cleaner.options());
        Self {
            config,
            client,
            repository,
            cleaner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &Arc<dyn LlmClient> {
        &self.client
    }

    /// Whether results are persisted
    pub fn is_storing(&self) -> bool {
        self.repository.is_some()
    }

    // =========================================================================
    // Cleaning
    // =========================================================================

    /// Clean one script
    pub fn clean_text(&self, script: &str) -> (String, CleanReport) {
        let (narration, report) = self.cleaner.clean_with_report(script);
        debug!("Cleaned script: {}", report);
        (narration, report)
    }

    /// Clean one script and split it into TTS chunks
    pub fn clean_into_chunks(&self, script: &str, max_chars: usize) -> Vec<String> {
        let (narration, _) = self.clean_text(script);
        chunk_for_tts(&narration, max_chars)
    }

    /// Clean one file into `<stem>.narration.txt`, chunked when `chunk_chars` is set
    pub fn clean_file(&self, input: &Path, output_dir: Option<&Path>, chunk_chars: Option<usize>) -> Result<(PathBuf, CleanReport)> {
        let script = FileManager::read_to_string(input)?;
        let (narration, report) = self.clean_text(&script);

        let output_path = FileManager::narration_output_path(input, output_dir);
        FileManager::write_to_file(&output_path, &render_chunks(&narration, chunk_chars))?;

        Ok((output_path, report))
    }

    /// Clean every script file under `dir` with a progress bar
    pub fn clean_directory(
        &self,
        dir: &Path,
        output_dir: Option<&Path>,
        chunk_chars: Option<usize>,
        force_overwrite: bool,
    ) -> Result<CleanSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", dir));
        }

        let files = FileManager::find_script_files(dir)?;
        if files.is_empty() {
            return Err(anyhow!("No script files (.txt, .md) found in directory: {:?}", dir));
        }

        let progress_bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let mut summary = CleanSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress_bar.set_message(file_name.clone());

            let output_path = FileManager::narration_output_path(file, output_dir);
            if output_path.exists() && !force_overwrite {
                warn!("Skipping {}, narration already exists (use --force to overwrite)", file_name);
                summary.skipped += 1;
                progress_bar.inc(1);
                continue;
            }

            match self.clean_file(file, output_dir, chunk_chars) {
                Ok((path, report)) => {
                    summary.report.timestamps += report.timestamps;
                    summary.report.directions += report.directions;
                    summary.report.scene_markers += report.scene_markers;
                    summary.report.empty_emphasis += report.empty_emphasis;
                    summary.report.speaker_labels += report.speaker_labels;
                    summary.report.metadata_lines += report.metadata_lines;
                    summary.report.dropped_lines += report.dropped_lines;
                    summary.report.passes = summary.report.passes.max(report.passes);
                    summary.written.push(path);
                }
                Err(e) => {
                    error!("Error cleaning {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Cleaning complete");

        info!(
            "Cleaned {} file(s), {} skipped, {} error(s) in {:.1}s",
            summary.written.len(),
            summary.skipped,
            summary.failed,
            start_time.elapsed().as_secs_f64()
        );

        Ok(summary)
    }

    // =========================================================================
    // Generation
    // =========================================================================

    fn enhancer(&self) -> PromptEnhancer {
        // Sampling stays at the enhancer defaults
        PromptEnhancer::new(self.client.clone())
    }

    fn generator(&self) -> ScriptGenerator {
        let common = &self.config.generation.common;
        ScriptGenerator::new(self.client.clone())
            .with_cleaner(self.cleaner.clone())
            .with_chunk_chars(self.config.cleaner.tts_chunk_chars)
            .with_sampling(common.temperature, common.max_tokens)
    }

    fn drafter(&self) -> ContractDrafter {
        ContractDrafter::new(self.client.clone())
    }

    /// Enhance a prompt and store the variations
    pub async fn enhance(&self, request: &EnhanceRequest) -> Result<Vec<PromptVariation>> {
        let variations = self.enhancer().enhance(request).await?;

        let content = serde_json::to_string_pretty(&variations).context("Failed to serialize variations")?;
        self.store(GenerationKind::Enhancement, request.prompt.trim(), content, None)
            .await;

        Ok(variations)
    }

    /// Generate one script and store it with its narration
    pub async fn generate_script(&self, request: &ScriptRequest) -> Result<GeneratedScript> {
        let script = self.generator().generate(request).await?;

        self.store(
            GenerationKind::Script,
            &script.topic,
            script.raw.clone(),
            Some(script.narration.clone()),
        )
        .await;

        Ok(script)
    }

    /// Generate several scripts concurrently, showing a progress bar
    pub async fn generate_scripts(&self, requests: Vec<ScriptRequest>) -> Vec<Result<GeneratedScript>> {
        let concurrency = self.config.generation.optimal_concurrent_requests();

        let progress_bar = ProgressBar::new(requests.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} scripts ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let bar = progress_bar.clone();
        let results = self
            .generator()
            .generate_many(requests, concurrency, move |completed, _total| {
                bar.set_position(completed as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        let mut output = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(script) => {
                    self.store(
                        GenerationKind::Script,
                        &script.topic,
                        script.raw.clone(),
                        Some(script.narration.clone()),
                    )
                    .await;
                    output.push(Ok(script));
                }
                Err(e) => output.push(Err(e.into())),
            }
        }

        output
    }

    /// Assemble a contract, drafting its body through the provider when `use_ai` is set
    pub async fn build_contract(&self, request: &ContractRequest, use_ai: bool) -> Result<Contract> {
        let contract = if use_ai {
            self.drafter().draft(request).await?
        } else {
            ContractAssembler::new().assemble(request, None)?
        };

        let prompt = serde_json::to_string(request).context("Failed to serialize contract request")?;
        self.store(GenerationKind::Contract, &prompt, contract.markdown.clone(), None)
            .await;

        Ok(contract)
    }

    // Storage failures never fail the command that produced the result
    async fn store(&self, kind: GenerationKind, prompt: &str, content: String, narration: Option<String>) {
        let Some(repository) = &self.repository else {
            return;
        };

        let mut record = GenerationRecord::new(
            kind,
            prompt.to_string(),
            content,
            self.client.name().to_string(),
            self.client.model().to_string(),
        );
        record.narration = narration;

        match repository.save_generation(&record).await {
            Ok(()) => debug!("Stored {} result {}", kind, record.id),
            Err(e) => warn!("Failed to store {} result: {}", kind, e),
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    fn repository(&self) -> Result<&Repository> {
        self.repository
            .as_ref()
            .ok_or_else(|| anyhow!("Result storage is disabled in the configuration"))
    }

    pub async fn history_list(&self, kind: Option<GenerationKind>, limit: usize) -> Result<Vec<GenerationRecord>> {
        self.repository()?.list_generations(kind, limit).await
    }

    pub async fn history_show(&self, id: &str) -> Result<GenerationRecord> {
        self.repository()?
            .get_generation(id)
            .await?
            .ok_or_else(|| anyhow!("No stored result with id {}", id))
    }

    pub async fn history_delete(&self, id: &str) -> Result<()> {
        if self.repository()?.delete_generation(id).await? {
            Ok(())
        } else {
            Err(anyhow!("No stored result with id {}", id))
        }
    }

    pub async fn history_stats(&self) -> Result<GenerationStats> {
        self.repository()?.stats().await
    }
}
