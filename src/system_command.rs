//! Handing files and URLs to the operating system

use std::any::Any;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use log::info;

/// Opens files and URLs with whatever the platform associates with them
pub trait SystemCommandExecutor: Send {
    fn open(&self, target: &str) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}

/// Uses the desktop's default handlers (`xdg-open`, `open`, `start`)
pub struct RealSystemCommandExecutor;

impl SystemCommandExecutor for RealSystemCommandExecutor {
    fn open(&self, target: &str) -> Result<()> {
        info!("Opening {target} with the system handler");
        open::that(target).with_context(|| format!("failed to open {target}"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Records every target instead of opening it
#[derive(Default)]
pub struct MockSystemCommandExecutor {
    executed_commands: Mutex<Vec<String>>,
    fail: bool,
}

impl MockSystemCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor whose every call fails, like a blocked pop-up
    pub fn failing() -> Self {
        Self {
            executed_commands: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn get_executed_commands(&self) -> Vec<String> {
        self.executed_commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl SystemCommandExecutor for MockSystemCommandExecutor {
    fn open(&self, target: &str) -> Result<()> {
        self.executed_commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(target.to_string());
        if self.fail {
            bail!("no handler for {target}");
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
