use bollard::container::LogOutput;
use bollard::exec::{CreateExecOptions, StartExecResults};
use futures::StreamExt;
use crate::errors::HarnessError;
use super::manager::TargetContainer;
use tracing::debug;

/// Captured result of a command run inside the target container.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    /// Raw stdout, kept as bytes so binary response bodies survive.
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub exit_code: Option<i64>,
}

impl TargetContainer {
    /// Execute a shell command in the container and collect its output.
    pub async fn exec(&self, command: &str) -> Result<ExecOutput, HarnessError> {
        debug!(command = %crate::utils::truncation::truncate_chars(command, 200), "Executing in container");

        let exec = self.docker().create_exec(
            self.container_name(),
            CreateExecOptions {
                cmd: Some(vec!["sh", "-c", command]),
                attach_stdout: Some(true),
                attach_stderr: Some(true),
                ..Default::default()
            },
        ).await
        .map_err(|e| HarnessError::Container(format!("Failed to create exec: {}", e)))?;

        let mut output = self.collect_exec_output(&exec.id).await
            .map_err(|e| HarnessError::Container(format!("Exec failed: {}", e)))?;

        output.exit_code = self.docker().inspect_exec(&exec.id).await
            .ok()
            .and_then(|inspect| inspect.exit_code);

        Ok(output)
    }

    async fn collect_exec_output(&self, exec_id: &str) -> Result<ExecOutput, bollard::errors::Error> {
        let start_result = self.docker().start_exec(exec_id, None).await?;

        let mut collected = ExecOutput::default();

        if let StartExecResults::Attached { mut output, .. } = start_result {
            while let Some(msg) = output.next().await {
                match msg {
                    Ok(LogOutput::StdOut { message }) | Ok(LogOutput::Console { message }) => {
                        collected.stdout.extend_from_slice(&message);
                    }
                    Ok(LogOutput::StdErr { message }) => {
                        collected.stderr.push_str(&String::from_utf8_lossy(&message));
                    }
                    Ok(LogOutput::StdIn { .. }) => {}
                    Err(e) => {
                        collected.stderr.push_str(&format!("\n[exec error: {}]", e));
                        break;
                    }
                }
            }
        }

        Ok(collected)
    }
}
