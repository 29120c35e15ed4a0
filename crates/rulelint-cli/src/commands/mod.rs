use std::io;

use anyhow::Result;
use rulelint_core::models::RunStatus;
use rulelint_core::{
    BackendConfig, BackendOverrides, BackendRuleSource, PrometheusClient, RuleFileSource,
    RuleSource, Validator,
};

use crate::cli::Cli;

mod support;


pub(crate) use self::support::{FATAL_EXIT_STATUS, exit_status};
use self::support::{LineSink, print_json};

pub(crate) fn run(cli: Cli) -> Result<RunStatus> {
    let config = BackendConfig::resolve(BackendOverrides {
        url: cli.url,
        bearer_token: cli.bearer_token,
        timeout_ms: cli.timeout_ms,
    })?;
    let client = PrometheusClient::new(config)?;
    log::info!("checking rules against {}", client.config().base_url);

    let source: Box<dyn RuleSource + '_> = if cli.rules_files.is_empty() {
        Box::new(BackendRuleSource::new(&client))
    } else {
        Box::new(RuleFileSource::new(cli.rules_files))
    };

    let mut sink = LineSink::new(io::stderr().lock());
    let report = Validator::new(&client).run(source.as_ref(), &mut sink)?;
    if cli.json {
        print_json(&report)?;
    }
    Ok(report.status)
}
