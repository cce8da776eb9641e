//! Connection configuration
//!
//! The destination comes from command-line flags, or, when no host is given
//! there, from a TOML file in the user's home directory:
//!
//! ```toml
//! [connection]
//! host = "192.168.1.20"
//! port = 6980
//! streamname = "Command1"
//! ```

use directories::BaseDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::error::ConfigError;
use crate::protocol::BitrateIndex;

/// Destination of the text requests
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_streamname")]
    pub streamname: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_streamname() -> String {
    DEFAULT_STREAM_NAME.to_string()
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            streamname: default_streamname(),
        }
    }
}

impl Connection {
    /// `host:port` as passed to address resolution
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Layout of the config file
#[derive(Debug, Deserialize)]
struct ConfigFile {
    connection: Option<Connection>,
}

/// Anything that can supply a fallback [`Connection`]
pub trait ConnectionSource {
    fn load(&self) -> Result<Connection, ConfigError>;
}

/// Reads the `[connection]` table of a TOML file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<home>/.vbantxt_cli/config.toml`
    pub fn home() -> Result<Self, ConfigError> {
        let dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
        Ok(Self::new(
            dirs.home_dir().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionSource for FileSource {
    fn load(&self) -> Result<Connection, ConfigError> {
        if !self.path.is_file() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }

        let text = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "Loaded config file");
        parse_connection(&text)
    }
}

/// [`FileSource::home`], located only when actually consulted
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeSource;

impl ConnectionSource for HomeSource {
    fn load(&self) -> Result<Connection, ConfigError> {
        FileSource::home()?.load()
    }
}

/// Fixed in-memory connection
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub Connection);

impl ConnectionSource for StaticSource {
    fn load(&self) -> Result<Connection, ConfigError> {
        Ok(self.0.clone())
    }
}

/// Parse config file contents; a missing `[connection]` table yields an empty host
pub fn parse_connection(text: &str) -> Result<Connection, ConfigError> {
    let file: ConfigFile = toml::from_str(text)?;
    Ok(file.connection.unwrap_or_default())
}

/// Endpoint values given on the command line
#[derive(Debug, Clone, Default)]
pub struct EndpointArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub streamname: Option<String>,
}

/// Work out where to send.
///
/// A non-empty `--host` wins and is combined with the port and stream name
/// flags (or their defaults). Otherwise `source` provides the connection and
/// explicitly passed port/stream name flags override its values. The config
/// source is only consulted when no host was given.
pub fn resolve(
    args: &EndpointArgs,
    source: &dyn ConnectionSource,
) -> Result<Connection, ConfigError> {
    let mut conn = match args.host.as_deref() {
        Some(host) if !host.is_empty() => Connection {
            host: host.to_string(),
            ..Connection::default()
        },
        _ => source.load()?,
    };

    if let Some(port) = args.port {
        conn.port = port;
    }
    if let Some(name) = &args.streamname {
        conn.streamname = name.clone();
    }

    if conn.host.is_empty() {
        return Err(ConfigError::MissingHost);
    }

    Ok(conn)
}

/// Header and pacing parameters for a batch of requests
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub bitrate: BitrateIndex,
    pub channel: u8,
    /// Pause between consecutive requests
    pub delay: Duration,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            bitrate: BitrateIndex::AUTO,
            channel: 0,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails the test if it is ever consulted
    struct Unreachable;

    impl ConnectionSource for Unreachable {
        fn load(&self) -> Result<Connection, ConfigError> {
            panic!("config source should not be read when --host is set");
        }
    }

    struct Counting(Cell<usize>, Connection);

    impl ConnectionSource for Counting {
        fn load(&self) -> Result<Connection, ConfigError> {
            self.0.set(self.0.get() + 1);
            Ok(self.1.clone())
        }
    }

    #[test]
    fn test_parse_full_file() {
        let conn = parse_connection(
            r#"
            [connection]
            host = "gate.local"
            port = 6990
            streamname = "Desk"
            "#,
        )
        .unwrap();

        assert_eq!(conn.host, "gate.local");
        assert_eq!(conn.port, 6990);
        assert_eq!(conn.streamname, "Desk");
    }

    #[test]
    fn test_parse_uses_defaults() {
        let conn = parse_connection("[connection]\nhost = \"10.0.0.2\"\n").unwrap();
        assert_eq!(conn.port, 6980);
        assert_eq!(conn.streamname, "Command1");
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = parse_connection("[connection\nhost = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_flag_host_skips_source() {
        let args = EndpointArgs {
            host: Some("mixer.lan".into()),
            ..Default::default()
        };
        let conn = resolve(&args, &Unreachable).unwrap();
        assert_eq!(conn.address(), "mixer.lan:6980");
        assert_eq!(conn.streamname, "Command1");
    }

    #[test]
    fn test_empty_flag_host_falls_back() {
        let source = Counting(
            Cell::new(0),
            Connection {
                host: "10.0.0.9".into(),
                port: 7000,
                streamname: "Remote".into(),
            },
        );
        let args = EndpointArgs {
            host: Some(String::new()),
            streamname: Some("Override".into()),
            ..Default::default()
        };

        let conn = resolve(&args, &source).unwrap();
        assert_eq!(source.0.get(), 1);
        assert_eq!(conn.host, "10.0.0.9");
        assert_eq!(conn.port, 7000);
        assert_eq!(conn.streamname, "Override");
    }

    #[test]
    fn test_empty_host_everywhere_is_error() {
        let err = resolve(&EndpointArgs::default(), &StaticSource::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingHost));
    }

    #[test]
    fn test_missing_file_reported() {
        let path = std::env::temp_dir().join("vbantxt-no-such-dir").join("config.toml");
        let err = FileSource::new(&path).load().unwrap_err();
        match err {
            ConfigError::NotFound(p) => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_home_source_path() {
        // No home directory in some CI sandboxes
        if let Ok(source) = FileSource::home() {
            assert!(source.path().ends_with(".vbantxt_cli/config.toml"));
        }
    }

    #[test]
    fn test_file_source_reads_toml() {
        let dir = std::env::temp_dir().join(format!("vbantxt-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[connection]\nhost = \"127.0.0.1\"\nport = 6981\n").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.path(), path.as_path());

        let conn = source.load().unwrap();
        assert_eq!(conn.address(), "127.0.0.1:6981");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
