use crate::cli::main_types::{BisectArgs, ConfigCommands};
use crate::core::args::Args;
use crate::core::bisection::{Bisection, Boundary};
use crate::core::probe::CommandProbe;
use crate::core::threading::{threaded_named, wait_for_results};
use crate::display::TableDisplay;
use crate::error::{AppError, CliError, TaskError, UtilsError};
use crate::storage::config::{BisectSettings, Config};
use crate::utils::bytes::ByteSize;
use crate::utils::input::{EnvConfigReader, EnvOverrides};
use crate::utils::validation::{parse_range, validate_argument_count, validate_separator};
use std::path::PathBuf;
use std::time::Duration;

fn table_display() -> TableDisplay {
    TableDisplay::new().with_colors(!EnvConfigReader::read_no_color())
}

/// Effective `bisect` options after merging flags over environment and file
#[derive(Debug, Clone, PartialEq)]
pub struct BisectPlan {
    pub arguments: Vec<Args<String>>,
    pub settings: BisectSettings,
    pub command: Vec<String>,
    pub show_output: bool,
}

impl BisectPlan {
    pub fn from_args(
        args: BisectArgs,
        defaults: &BisectSettings,
        env: &EnvOverrides,
    ) -> Result<Self, AppError> {
        let mut settings = defaults.clone().with_overrides(env);
        if let Some(expect) = args.expect {
            settings.expect = expect;
        }
        settings.allow_all_expected |= args.allow_all_expected;
        settings.probe_timeout_secs = args.probe_timeout.or(settings.probe_timeout_secs);
        settings.overall_timeout_secs = args.timeout.or(settings.overall_timeout_secs);
        if let Some(separator) = args.separator {
            settings.separator = separator;
        }
        validate_separator(settings.separator)?;

        let arguments = match args.range {
            Some(range) => parse_range(&range)?
                .into_iter()
                .map(|value| Args::Scalar(value.to_string()))
                .collect(),
            None => Args::parse_list(&args.values, settings.separator),
        };
        validate_argument_count(arguments.len())?;

        if args.command.is_empty() {
            return Err(CliError::MissingCommand.into());
        }

        Ok(Self {
            arguments,
            settings,
            command: args.command,
            show_output: args.show_output,
        })
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.settings.probe_timeout_secs.map(Duration::from_secs)
    }

    pub fn overall_timeout(&self) -> Option<Duration> {
        self.settings.overall_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Default)]
pub struct BisectHandler;

impl BisectHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        args: BisectArgs,
        config: &Config,
        verbose: u8,
    ) -> Result<(), AppError> {
        let json = args.json;
        let env = EnvConfigReader::read_overrides();
        let plan = BisectPlan::from_args(args, &config.bisect, &env)?;
        let boundary = self.run(plan).await?;

        if json {
            let rendered =
                serde_json::to_string(&boundary).map_err(|e| UtilsError::Serialization {
                    message: e.to_string(),
                })?;
            println!("{}", rendered);
        } else {
            println!("{}", boundary.value);
        }

        if verbose > 0 {
            eprintln!("{}", table_display().render_boundary(&boundary));
        }
        Ok(())
    }

    /// Search on a worker thread so the overall timeout can fire while a
    /// probe is still running.
    pub async fn run(&self, plan: BisectPlan) -> Result<Boundary<Args<String>>, AppError> {
        let probe = CommandProbe::new(plan.command.clone())?
            .with_timeout(plan.probe_timeout())
            .show_output(plan.show_output);
        let bisection =
            Bisection::new(plan.settings.expect).allow_all_expected(plan.settings.allow_all_expected);
        let overall_timeout = plan.overall_timeout();
        let arguments = plan.arguments;

        log::info!(
            "Bisecting {} arguments with '{}', expecting {}",
            arguments.len(),
            probe.program(),
            bisection.expected_result()
        );

        let kill_switch = probe.kill_switch();
        let handle = threaded_named("bisect", move || {
            bisection
                .try_search(&arguments, |arg| probe.run(arg).map_err(AppError::from))
                .map(|boundary| boundary.cloned())
        })?;

        let outcome = match overall_timeout {
            Some(timeout) => wait_for_results(vec![handle], timeout)
                .await
                .inspect_err(|_| kill_switch.trigger())?
                .pop()
                .ok_or_else(|| TaskError::Disconnected {
                    task: "bisect".to_string(),
                })?,
            None => handle.result().await?,
        };

        let boundary = outcome?;
        log::info!(
            "Boundary '{}' at index {} after {} probes",
            boundary.value,
            boundary.index,
            boundary.probes
        );
        Ok(boundary)
    }
}

#[derive(Default)]
pub struct BytesHandler;

impl BytesHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, value: &str, human: bool) -> Result<(), AppError> {
        let size: ByteSize = value.parse()?;
        if human {
            println!("{}", size.human());
        } else {
            println!("{}", table_display().render_byte_size(&size));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config: &mut Config,
        config_path: Option<PathBuf>,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                println!("{}", table_display().render_config(&config.entries()));
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                config.set(&key, &value)?;
                config.save(config_path)?;
                println!("✅ Set {} = {}", key, value);
                Ok(())
            }
            ConfigCommands::Path => {
                let path = match config_path {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bisection::Orientation;
    use crate::core::probe::ProbeOutcome;
    use crate::error::BisectError;

    fn bisect_args(range: Option<&str>, values: &[&str], command: &[&str]) -> BisectArgs {
        BisectArgs {
            range: range.map(str::to_string),
            values: values.iter().map(|v| v.to_string()).collect(),
            expect: None,
            allow_all_expected: false,
            probe_timeout: None,
            timeout: None,
            separator: None,
            show_output: false,
            json: false,
            command: command.iter().map(|c| c.to_string()).collect(),
        }
    }

    // Plans built without reading the process environment
    fn plan_without_env(
        args: BisectArgs,
        defaults: &BisectSettings,
    ) -> Result<BisectPlan, AppError> {
        BisectPlan::from_args(args, defaults, &EnvOverrides::default())
    }

    #[test]
    fn test_plan_from_range_and_flags() {
        let mut args = bisect_args(Some("0..4"), &[], &["true"]);
        args.expect = Some(ProbeOutcome::Failure);
        args.probe_timeout = Some(3);

        let plan = plan_without_env(args, &BisectSettings::default()).unwrap();
        assert_eq!(plan.arguments.len(), 4);
        assert_eq!(plan.arguments[3], Args::Scalar("3".to_string()));
        assert_eq!(plan.settings.expect, ProbeOutcome::Failure);
        assert_eq!(plan.probe_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_plan_flags_override_file_defaults() {
        let defaults = BisectSettings {
            separator: ':',
            overall_timeout_secs: Some(30),
            ..BisectSettings::default()
        };

        let plan =
            plan_without_env(bisect_args(None, &["a:1", "b:2"], &["true"]), &defaults).unwrap();
        assert_eq!(
            plan.arguments[1],
            Args::Tuple(vec!["b".to_string(), "2".to_string()])
        );

        let mut args = bisect_args(None, &["a:1", "b:2"], &["true"]);
        args.separator = Some(';');
        args.timeout = Some(5);
        let plan = plan_without_env(args, &defaults).unwrap();
        assert_eq!(plan.arguments[0], Args::Scalar("a:1".to_string()));
        assert_eq!(plan.overall_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_plan_flags_override_environment() {
        let env = EnvOverrides {
            expect: Some(ProbeOutcome::Failure),
            probe_timeout_secs: Some(9),
            overall_timeout_secs: Some(90),
        };
        let defaults = BisectSettings::default();

        let plan = BisectPlan::from_args(bisect_args(Some("0..4"), &[], &["true"]), &defaults, &env)
            .unwrap();
        assert_eq!(plan.settings.expect, ProbeOutcome::Failure);
        assert_eq!(plan.probe_timeout(), Some(Duration::from_secs(9)));

        let mut args = bisect_args(Some("0..4"), &[], &["true"]);
        args.expect = Some(ProbeOutcome::Success);
        args.timeout = Some(2);
        let plan = BisectPlan::from_args(args, &defaults, &env).unwrap();
        assert_eq!(plan.settings.expect, ProbeOutcome::Success);
        assert_eq!(plan.overall_timeout(), Some(Duration::from_secs(2)));
        assert_eq!(plan.probe_timeout(), Some(Duration::from_secs(9)));
    }

    #[test]
    fn test_plan_rejects_short_lists() {
        let result = plan_without_env(
            bisect_args(None, &["only"], &["true"]),
            &BisectSettings::default(),
        );
        assert!(matches!(
            result,
            Err(AppError::Bisect(BisectError::TooFewArguments { len: 1 }))
        ));
    }

    #[test]
    fn test_plan_requires_command() {
        let result =
            plan_without_env(bisect_args(Some("0..4"), &[], &[]), &BisectSettings::default());
        assert!(matches!(result, Err(AppError::Cli(CliError::MissingCommand))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_finds_boundary() {
        let mut args = bisect_args(Some("0..1600"), &[], &["sh", "-c", "test {} -ge 1386"]);
        args.expect = Some(ProbeOutcome::Success);
        let plan = plan_without_env(args, &BisectSettings::default()).unwrap();

        let boundary = BisectHandler::new().run(plan).await.unwrap();
        assert_eq!(boundary.value, Args::Scalar("1386".to_string()));
        assert_eq!(boundary.index, 1386);
        assert_eq!(boundary.orientation, Orientation::RightToLeft);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_overall_timeout() {
        let mut args = bisect_args(Some("0..64"), &[], &["sh", "-c", "sleep 3"]);
        args.timeout = Some(1);
        let plan = plan_without_env(args, &BisectSettings::default()).unwrap();

        let result = BisectHandler::new().run(plan).await;
        assert!(matches!(
            result,
            Err(AppError::Task(TaskError::Timeout { pending: 1, .. }))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_overall_timeout_kills_running_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("survivor");
        let script = format!("(sleep 2; touch '{}') & wait", marker.display());
        let mut args = bisect_args(Some("0..8"), &[], &["sh", "-c", &script]);
        args.timeout = Some(1);
        let plan = plan_without_env(args, &BisectSettings::default()).unwrap();

        let result = BisectHandler::new().run(plan).await;
        assert!(matches!(result, Err(AppError::Task(TaskError::Timeout { .. }))));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_no_boundary() {
        let mut args = bisect_args(Some("0..10"), &[], &["false"]);
        args.expect = Some(ProbeOutcome::Success);
        let plan = plan_without_env(args, &BisectSettings::default()).unwrap();

        let result = BisectHandler::new().run(plan).await;
        assert!(matches!(
            result,
            Err(AppError::Bisect(BisectError::NoBoundary { .. }))
        ));
    }

    #[test]
    fn test_bytes_handler_rejects_garbage() {
        assert!(BytesHandler::new().handle("lots", false).is_err());
        assert!(BytesHandler::new().handle("4 MB", true).is_ok());
    }

    #[test]
    fn test_config_handler_set_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();

        ConfigHandler::new()
            .handle(
                ConfigCommands::Set {
                    key: "bisect.expect".to_string(),
                    value: "failure".to_string(),
                },
                &mut config,
                Some(path.clone()),
            )
            .unwrap();

        assert_eq!(config.bisect.expect, ProbeOutcome::Failure);
        assert_eq!(Config::load(Some(path)).unwrap(), config);
    }
}
