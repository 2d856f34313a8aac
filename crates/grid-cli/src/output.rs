//! Output formatting utilities

use crate::error::CliResult;
use colored::*;
use grid_types::{Deployment, ResultState};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Print a single item in the specified format
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
    }
    Ok(())
}

/// One workload line of a deployment table
#[derive(Debug, Tabled)]
pub struct WorkloadRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "TYPE")]
    pub workload_type: String,
    #[tabled(rename = "VERSION")]
    pub version: u32,
    #[tabled(rename = "STATE")]
    pub state: String,
    #[tabled(rename = "ERROR")]
    pub error: String,
}

impl WorkloadRow {
    pub fn rows(deployment: &Deployment) -> Vec<Self> {
        deployment
            .workloads
            .iter()
            .map(|wl| WorkloadRow {
                name: wl.name.clone(),
                workload_type: wl.workload_type.to_string(),
                version: wl.version,
                state: state_label(wl.result.state).to_string(),
                error: wl.result.error.clone(),
            })
            .collect()
    }
}

fn state_label(state: ResultState) -> &'static str {
    match state {
        ResultState::Unknown => "unknown",
        ResultState::Init => "init",
        ResultState::Ok => "ok",
        ResultState::Error => "error",
        ResultState::Deleted => "deleted",
        ResultState::Paused => "paused",
    }
}

/// Print a deployment, as a workload table or serialized
pub fn print_deployment(deployment: &Deployment, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "Contract: {}  Version: {}  Twin: {}",
                deployment.contract_id, deployment.version, deployment.twin_id
            );
            let rows = WorkloadRow::rows(deployment);
            if rows.is_empty() {
                println!("{}", "No workloads".dimmed());
            } else {
                println!("{}", Table::new(rows));
            }
            Ok(())
        }
        _ => print_single(deployment, format),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_types::{Workload, WorkloadData, ZMount};

    #[test]
    fn test_workload_rows() {
        let mut wl = Workload::new("disk", WorkloadData::ZMount(ZMount { size: 1024 })).unwrap();
        wl.result.state = ResultState::Error;
        wl.result.error = "no space left".into();
        let dl = Deployment::new(11, vec![wl]);

        let rows = WorkloadRow::rows(&dl);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].workload_type, "zmount");
        assert_eq!(rows[0].state, "error");
        assert_eq!(rows[0].error, "no space left");

        let table = Table::new(rows).to_string();
        assert!(table.contains("NAME"));
        assert!(table.contains("no space left"));
    }
}
