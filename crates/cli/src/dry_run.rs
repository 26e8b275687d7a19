use codeprompt_invoke::{CommandInvoker, InvocationResult, Invoke, InvokerConfig};

/// Answers every request with the command line it would have run
pub struct DryRunInvoker {
    inner: CommandInvoker,
}

impl DryRunInvoker {
    pub fn new(config: InvokerConfig) -> Self {
        Self {
            inner: CommandInvoker::new(config),
        }
    }
}

impl Invoke for DryRunInvoker {
    fn invoke(
        &self,
        prompt: &str,
        content: Option<&str>,
    ) -> codeprompt_invoke::Result<InvocationResult> {
        let line = self.inner.build(prompt, content);
        log::info!("dry run: not starting {}", line.program);
        Ok(InvocationResult {
            output: line.render(),
            success: true,
            exit_code: Some(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reports_rendered_line() {
        let invoker = DryRunInvoker::new(InvokerConfig {
            program: "codeprompt-definitely-not-installed".to_string(),
            ..InvokerConfig::default()
        });
        let result = invoker.invoke("hi", None).unwrap();
        assert_eq!(result.output, "codeprompt-definitely-not-installed -p \"hi\"");
        assert!(result.success);
    }
}
