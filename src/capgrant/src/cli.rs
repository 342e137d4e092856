use anyhow::Context;
use auth::{AssignmentEngine, CapabilityNameRegistry, KernelTransport};
use clap::{Arg, Command};
use runtime::{DockerRuntime, TargetResolver, DEFAULT_DOCKER_ENDPOINT};

use crate::{config::Config, report};

pub fn command() -> Command<'static> {
    Command::new("capgrant")
        .about("Grant Linux capabilities to a running process or container")
        .arg(Arg::new("v").multiple_occurrences(true).short('v'))
        .arg(
            Arg::new("pid")
                .long("pid")
                .takes_value(true)
                .help("The process id"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .takes_value(true)
                .help("The name of container"),
        )
        .arg(
            Arg::new("cap-add")
                .long("cap-add")
                .takes_value(true)
                .required_unless_present("list")
                .help("Capabilities separated by comma, like NET_ADMIN,SYS_ADMIN"),
        )
        .arg(
            Arg::new("docker-endpoint")
                .long("docker-endpoint")
                .takes_value(true)
                .default_value(DEFAULT_DOCKER_ENDPOINT)
                .help("Docker daemon socket"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .takes_value(true)
                .default_value("10")
                .help("Seconds to wait for the docker daemon"),
        )
        .arg(
            Arg::new("missing-target")
                .long("missing-target")
                .takes_value(true)
                .possible_values(["reject", "self"])
                .default_value("reject")
                .help("Without --pid and --name: fail, or target this process"),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("Print the capabilities the kernel supports and exit"),
        )
}

pub fn cli_main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    let config = Config::from_matches(&matches)?;
    let level = logger::raise(logger::level_from_env(), config.verbosity);
    logger::init(level).map_err(|_| anyhow::anyhow!("failed to set log level"))?;
    run(&config)
}

pub fn run(config: &Config) -> anyhow::Result<()> {
    let registry = CapabilityNameRegistry::build();
    if config.list {
        print!("{}", report::render_registry(&registry));
        return Ok(());
    }

    let docker = DockerRuntime::new(&config.docker_endpoint, config.timeout);
    let resolver = TargetResolver::new(docker, config.missing_target);
    let pid = resolver
        .resolve_pid(config.pid, &config.container)
        .context("failed to resolve target process")?;
    println!("PID: {}", pid);

    let engine = AssignmentEngine::new(&registry, KernelTransport::new(registry.last_cap()));
    let pending = engine
        .prepare(pid, config.capabilities.as_slice())
        .with_context(|| format!("failed to prepare capabilities for process {}", pid))?;
    println!("Process {} capabilities before:", pid);
    print!("{}", report::render_state(&registry, &pending.before));
    println!();
    println!("Requested capabilities before:");
    print!(
        "{}",
        report::render_requested(&registry, pending.requested, &pending.before)
    );

    let assignment = engine
        .commit(pending)
        .with_context(|| format!("failed to grant capabilities to process {}", pid))?;
    println!();
    print!("{}", report::render_assignment(&registry, &assignment));
    if !assignment.is_consistent() {
        logger::warn!(
            "{} requested capabilities are not held by process {}",
            assignment.inconsistencies.len(),
            pid
        );
    }
    Ok(())
}
