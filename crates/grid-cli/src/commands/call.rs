//! Raw bus call

use crate::error::{CliError, CliResult};
use crate::output::{print_single, OutputFormat};
use grid_rmb::RmbClient;
use grid_types::TwinId;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Arguments of a raw call
#[derive(Debug, clap::Args)]
pub struct CallArgs {
    /// Destination twin
    #[arg(short, long)]
    pub twin: TwinId,

    /// Remote function, e.g. zos.network.interfaces
    #[arg(long = "cmd")]
    pub command: String,

    /// JSON payload
    #[arg(short, long, default_value = "null")]
    pub data: String,
}

/// Send one request and print the reply
pub async fn execute(
    args: CallArgs,
    rmb: &dyn RmbClient,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> CliResult<()> {
    let payload = parse_payload(&args.data)?;
    let reply = rmb.call(cancel, args.twin, &args.command, &payload).await?;

    if reply.is_empty() {
        return Ok(());
    }
    let value: Value = serde_json::from_str(&reply)?;
    print_single(&value, format)
}

fn parse_payload(data: &str) -> CliResult<Value> {
    serde_json::from_str(data)
        .map_err(|e| CliError::InvalidInput(format!("payload is not valid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_rmb::MockRmbClient;
    use serde_json::json;

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload("null").unwrap(), Value::Null);
        assert_eq!(
            parse_payload(r#"{"contract_id": 5}"#).unwrap(),
            json!({"contract_id": 5})
        );
        assert!(matches!(
            parse_payload("{contract_id"),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_sends_payload() {
        let rmb = MockRmbClient::new();
        rmb.reply(12, "zos.statistics.get", json!({"total": {"cru": 4}}));
        let args = CallArgs {
            twin: 12,
            command: "zos.statistics.get".into(),
            data: r#"{"verbose": true}"#.into(),
        };

        execute(args, &rmb, &CancellationToken::new(), OutputFormat::Json)
            .await
            .unwrap();
        assert_eq!(
            rmb.calls(12, "zos.statistics.get"),
            vec![json!({"verbose": true})]
        );
    }

    #[tokio::test]
    async fn test_execute_remote_error() {
        let rmb = MockRmbClient::new();
        rmb.remote_error(12, "zos.statistics.get", "permission denied");
        let args = CallArgs {
            twin: 12,
            command: "zos.statistics.get".into(),
            data: "null".into(),
        };

        let err = execute(args, &rmb, &CancellationToken::new(), OutputFormat::Json)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bus error: permission denied");
    }
}
