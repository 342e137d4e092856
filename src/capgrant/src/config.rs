use std::time::Duration;

use anyhow::Context;
use clap::ArgMatches;
use runtime::MissingTargetPolicy;

/// Everything one invocation needs, taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `0` when not given.
    pub pid: i32,
    /// Empty when not given.
    pub container: String,
    pub capabilities: Vec<String>,
    pub docker_endpoint: String,
    pub timeout: Duration,
    pub missing_target: MissingTargetPolicy,
    pub list: bool,
    pub verbosity: u64,
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let pid = match matches.value_of("pid") {
            Some(pid) => pid
                .parse::<i32>()
                .with_context(|| format!("failed to parse pid {:?}", pid))?,
            None => 0,
        };
        let capabilities = matches
            .value_of("cap-add")
            .map(|caps| caps.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        let timeout = matches
            .value_of("timeout")
            .context("no timeout")?
            .parse::<u64>()
            .context("failed to parse timeout")?;
        if timeout == 0 {
            anyhow::bail!("timeout must be at least one second");
        }
        let missing_target = matches
            .value_of("missing-target")
            .context("no missing-target policy")?
            .parse()?;
        Ok(Self {
            pid,
            container: matches.value_of("name").unwrap_or_default().to_string(),
            capabilities,
            docker_endpoint: matches
                .value_of("docker-endpoint")
                .context("no docker endpoint")?
                .to_string(),
            timeout: Duration::from_secs(timeout),
            missing_target,
            list: matches.is_present("list"),
            verbosity: matches.occurrences_of("v"),
        })
    }
}
