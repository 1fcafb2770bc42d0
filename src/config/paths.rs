use std::{
    env, fs,
    io::{Error, ErrorKind},
    path::PathBuf,
};

const APP_DIR: &str = "tuneline";

/// Where tuneline reads its config and writes its logs.
pub struct ConfigPaths;

impl ConfigPaths {
    /// `$XDG_CONFIG_HOME/tuneline`, or `$HOME/.config/tuneline`.
    ///
    /// # Errors
    /// Returns `NotFound` if neither variable is set.
    pub fn config_dir() -> Result<PathBuf, Error> {
        let base = match env::var("XDG_CONFIG_HOME") {
            Ok(config_home) => PathBuf::from(config_home),
            Err(_) => home()?.join(".config"),
        };
        Ok(base.join(APP_DIR))
    }

    /// `config.toml` inside [`config_dir`](Self::config_dir). The file may not
    /// exist.
    ///
    /// # Errors
    /// Returns `NotFound` if neither `XDG_CONFIG_HOME` nor `HOME` is set.
    pub fn main_config() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// `$HOME/.tuneline/logs`, created on first use.
    ///
    /// # Errors
    /// Returns an error if `HOME` is unset or the directory cannot be created.
    pub fn log_dir() -> Result<PathBuf, Error> {
        let dir = home()?.join(format!(".{APP_DIR}")).join("logs");
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

fn home() -> Result<PathBuf, Error> {
    env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| Error::new(ErrorKind::NotFound, "HOME is not set"))
}
