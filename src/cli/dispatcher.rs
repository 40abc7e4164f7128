use crate::cli::command_handlers::{BisectHandler, BytesHandler, ConfigHandler};
use crate::cli::main_types::Commands;
use crate::error::AppError;
use crate::storage::config::Config;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    verbose: u8,
}

impl Dispatcher {
    pub fn new(config: Config, config_path: Option<PathBuf>, verbose: u8) -> Self {
        Self {
            config,
            config_path,
            verbose,
        }
    }

    pub async fn dispatch(mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Bisect(args) => {
                log::debug!("Dispatching bisect command");
                BisectHandler::new()
                    .handle(args, &self.config, self.verbose)
                    .await
            }
            Commands::Bytes { value, human } => {
                log::debug!("Dispatching bytes command");
                BytesHandler::new().handle(&value, human)
            }
            Commands::Config { command } => {
                log::debug!("Dispatching config command: {:?}", command);
                ConfigHandler::new().handle(command, &mut self.config, self.config_path)
            }
        }
    }
}
