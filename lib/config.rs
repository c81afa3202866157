//! Reading potential configurations.
//!
//! A configuration has two sections:
//! ```text
//! [parameters]
//! <name> = <expression>
//!
//! [regions]
//! <label> = <domain expression>|<value expression>
//! ```
//! `[parameters]` is optional; `[regions]` is required. Entry order is
//! preserved, and neither a section nor a key within a section may be
//! repeated.

use std::{
    collections::HashSet,
    fs,
    path::{ Path, PathBuf },
    sync::Arc,
};
use ini::{ Ini, ParseOption };
use tracing::debug;
use crate::{
    error::{ PotError, PotResult },
    eval::{ eval_str, Params },
    region::RegionTable,
};

/// Name of the parameter section.
pub const PARAMETERS: &str = "parameters";

/// Name of the region section.
pub const REGIONS: &str = "regions";

/// Path recorded for configurations that didn't come from a file.
pub const MEMORY_PATH: &str = "<memory>";

/// Raw, uncompiled contents of a configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Where the configuration was read from.
    pub path: PathBuf,
    /// `(name, expression)` entries of `[parameters]`.
    pub parameters: Vec<(String, String)>,
    /// `(label, spec)` entries of `[regions]`.
    pub regions: Vec<(String, String)>,
}

impl Config {
    /// Read a configuration file.
    pub fn read<P>(path: P) -> PotResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let text
            = fs::read_to_string(path)
            .map_err(|source| {
                PotError::ConfigNotFound { path: path.to_path_buf(), source }
            })?;
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        debug!(path = %path.display(), "read potential configuration");
        Self::parse(&text, path)
    }

    /// Parse configuration text; `path` is used only for diagnostics.
    pub fn parse(text: &str, path: PathBuf) -> PotResult<Self> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini
            = Ini::load_from_str_opt(text, opt)
            .map_err(|source| PotError::ConfigSyntax { path: path.clone(), source })?;
        let entries = |name: &str| -> PotResult<Option<Vec<(String, String)>>> {
            let mut sections = ini.section_all(Some(name));
            let Some(props) = sections.next() else { return Ok(None); };
            if sections.next().is_some() {
                return Err(PotError::DuplicateSection {
                    path: path.clone(),
                    section: name.to_string(),
                });
            }
            let mut seen: HashSet<&str> = HashSet::new();
            props.iter()
                .map(|(k, v)| {
                    if seen.insert(k) {
                        Ok((k.to_string(), v.to_string()))
                    } else {
                        Err(PotError::DuplicateKey {
                            path: path.clone(),
                            section: name.to_string(),
                            key: k.to_string(),
                        })
                    }
                })
                .collect::<PotResult<Vec<_>>>()
                .map(Some)
        };
        let parameters = entries(PARAMETERS)?.unwrap_or_default();
        let Some(regions) = entries(REGIONS)? else {
            return Err(PotError::MissingRegions(path));
        };
        Ok(Self { path, parameters, regions })
    }

    /// Evaluate every parameter expression.
    ///
    /// Parameter expressions are evaluated with only the built-ins in scope;
    /// they can't refer to each other.
    pub fn eval_params(&self) -> PotResult<Params> {
        let bare = Arc::new(Params::new());
        self.parameters.iter()
            .map(|(name, src)| {
                eval_str(src, &bare)
                    .map(|value| (name.as_str(), value))
                    .map_err(PotError::expr(format!("parameter '{name}'"), src.as_str()))
            })
            .collect()
    }

    /// Compile `[regions]` against `params`.
    pub fn compile_regions(&self, params: &Arc<Params>) -> PotResult<RegionTable> {
        RegionTable::compile(
            self.regions.iter().map(|(label, spec)| (label.as_str(), spec.as_str())),
            params,
        )
    }
}

/// Read a configuration file and produce its parameter environment and
/// compiled region table.
pub fn load<P>(path: P) -> PotResult<(Params, RegionTable)>
where P: AsRef<Path>
{
    let config = Config::read(path)?;
    let params = Arc::new(config.eval_params()?);
    let regions = config.compile_regions(&params)?;
    let params = Arc::try_unwrap(params).unwrap_or_else(|shared| (*shared).clone());
    Ok((params, regions))
}
