use std::{fmt, fs, io, path};

use arbint_core::Base;
use serde::Deserialize;

use crate::file_paths;

pub const DEFAULT_CONFIG_FILE: &str = r#"# arbint configuration file
#
# Place this file at $ARBINT_CONFIG_DIR/config.toml or in your platform's
# config directory (see `arbint --help` for the exact location).

# The prompt shown in interactive mode
prompt = "> "

# Radix used for literals without a 0b/0o/0x or `radix#` prefix (2 to 36)
input-radix = 10

# Radix used to print results (2 to 36)
output-radix = 10

# Whether results in binary, octal, hex or custom radixes are printed with
# their prefix, e.g. `0xff` or `3#120`
show-prefix = true

# Maximum number of lines kept in the history file
max-history-size = 1000
"#;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub prompt: String,
    pub input_radix: u32,
    pub output_radix: u32,
    pub show_prefix: bool,
    pub max_history_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            input_radix: 10,
            output_radix: 10,
            show_prefix: true,
            max_history_size: 1000,
        }
    }
}

impl Config {
    pub fn input_base(&self) -> Base {
        Base::from_radix(self.input_radix).unwrap_or(Base::Decimal)
    }

    pub fn output_base(&self) -> Base {
        Base::from_radix(self.output_radix).unwrap_or(Base::Decimal)
    }

    fn validate(self) -> Result<Self, ReadConfigErr> {
        for (key, radix) in [
            ("input-radix", self.input_radix),
            ("output-radix", self.output_radix),
        ] {
            if let Err(e) = Base::from_radix(radix) {
                return Err(ReadConfigErr::InvalidValue(key, e.to_string()));
            }
        }
        Ok(self)
    }
}

#[derive(Debug)]
enum ReadConfigErr {
    FileReadingError(io::Error),
    DeserializationError(toml::de::Error),
    InvalidValue(&'static str, String),
}

impl fmt::Display for ReadConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileReadingError(e) => write!(f, "{e}"),
            Self::DeserializationError(e) => write!(f, "{e}"),
            Self::InvalidValue(key, message) => write!(f, "invalid value for `{key}`: {message}"),
        }
    }
}

impl From<io::Error> for ReadConfigErr {
    fn from(err: io::Error) -> Self {
        Self::FileReadingError(err)
    }
}

impl From<toml::de::Error> for ReadConfigErr {
    fn from(err: toml::de::Error) -> Self {
        Self::DeserializationError(err)
    }
}

fn parse_config(contents: &str) -> Result<Config, ReadConfigErr> {
    toml::from_str::<Config>(contents)?.validate()
}

fn read_config_file(path: &path::Path) -> Result<Option<Config>, ReadConfigErr> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    parse_config(&contents).map(Some)
}

pub fn read() -> Config {
    let Some(path) = file_paths::get_config_file_location() else {
        return Config::default();
    };
    match read_config_file(&path) {
        Ok(Some(config)) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Invalid config file in {}: {}", path.display(), e);
            eprintln!("Using the default configuration");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_file_matches_defaults() {
        assert_eq!(parse_config(DEFAULT_CONFIG_FILE).unwrap(), Config::default());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config = parse_config("output-radix = 16\nshow-prefix = false\n").unwrap();
        assert_eq!(config.output_base(), Base::Hex);
        assert_eq!(config.input_base(), Base::Decimal);
        assert!(!config.show_prefix);
        assert_eq!(config.prompt, "> ");
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(matches!(
            parse_config("input-radix = 37"),
            Err(ReadConfigErr::InvalidValue("input-radix", _))
        ));
        assert!(matches!(
            parse_config("output-radix = 1"),
            Err(ReadConfigErr::InvalidValue("output-radix", _))
        ));
        assert!(matches!(
            parse_config("colour = true"),
            Err(ReadConfigErr::DeserializationError(_))
        ));
        assert!(matches!(
            parse_config("prompt = 5"),
            Err(ReadConfigErr::DeserializationError(_))
        ));
    }
}
