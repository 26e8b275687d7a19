use crate::error::{InvokeError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// How snippet content reaches the external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentDelivery {
    /// Fenced content is written to the child's stdin
    #[default]
    Stdin,
    /// Fenced content is appended to the prompt argument
    Inline,
}

/// Which executable to run and how to shape its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokerConfig {
    /// Executable name or path
    pub program: String,

    /// Arguments placed before the prompt flag
    #[serde(default)]
    pub args: Vec<String>,

    /// Flag introducing the prompt (`-p`)
    pub prompt_flag: String,

    #[serde(default)]
    pub delivery: ContentDelivery,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            program: "claude".to_string(),
            args: Vec::new(),
            prompt_flag: "-p".to_string(),
            delivery: ContentDelivery::Stdin,
        }
    }
}

/// A fully built invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    /// Bytes for the child's stdin, if any
    pub stdin: Option<String>,
}

impl CommandLine {
    /// Shell-style rendering for logs and dry runs. Never executed.
    pub fn render(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.starts_with('-') && !arg.contains(char::is_whitespace) {
                line.push_str(arg);
            } else {
                line.push('"');
                line.push_str(&escape_double_quotes(arg));
                line.push('"');
            }
        }
        if let Some(input) = &self.stdin {
            line.push_str(" <<'CODEPROMPT_EOF'\n");
            line.push_str(input);
            line.push_str("\nCODEPROMPT_EOF");
        }
        line
    }
}

/// Escape text for display inside a double-quoted shell word
pub fn escape_double_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Wrap content in a plain code fence
pub fn fence(content: &str) -> String {
    format!("```\n{content}\n```")
}

/// What the external tool produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// stdout followed by stderr
    pub output: String,
    pub success: bool,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

/// Classified [`InvocationResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Successful run with something to show
    Reply(String),
    /// Successful run that printed nothing at all
    Empty,
    /// Non-zero exit; `output` is the captured text, verbatim
    Failed { code: Option<i32>, output: String },
}

impl InvocationResult {
    pub fn classify(self) -> Outcome {
        if !self.success {
            return Outcome::Failed {
                code: self.exit_code,
                output: self.output,
            };
        }
        if self.output.is_empty() {
            Outcome::Empty
        } else {
            Outcome::Reply(self.output)
        }
    }
}

/// Seam between the flows and the external assistant
pub trait Invoke {
    /// Run the assistant on `prompt` with optional snippet `content`
    fn invoke(&self, prompt: &str, content: Option<&str>) -> Result<InvocationResult>;
}

/// Runs the configured executable as a child process
#[derive(Debug, Clone, Default)]
pub struct CommandInvoker {
    config: InvokerConfig,
}

impl CommandInvoker {
    pub fn new(config: InvokerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Build the argument vector for a request without running it
    pub fn build(&self, prompt: &str, content: Option<&str>) -> CommandLine {
        let mut args = self.config.args.clone();
        args.push(self.config.prompt_flag.clone());

        let stdin = match (content, self.config.delivery) {
            (Some(content), ContentDelivery::Stdin) => {
                args.push(prompt.to_string());
                Some(fence(content))
            }
            (Some(content), ContentDelivery::Inline) => {
                args.push(format!("{prompt}\n\n{}", fence(content)));
                None
            }
            (None, _) => {
                args.push(prompt.to_string());
                None
            }
        };

        CommandLine {
            program: self.config.program.clone(),
            args,
            stdin,
        }
    }

    /// Run a built command line to completion
    pub fn execute(&self, line: &CommandLine) -> Result<InvocationResult> {
        log::debug!("running {}", line.render());

        let mut command = Command::new(&line.program);
        command
            .args(&line.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if line.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = command.spawn().map_err(|source| InvokeError::Spawn {
            program: line.program.clone(),
            source,
        })?;

        // Feed stdin from a separate thread so a chatty child cannot
        // deadlock against a full stdout pipe.
        let writer = match (child.stdin.take(), line.stdin.clone()) {
            (Some(mut pipe), Some(input)) => Some(thread::spawn(move || {
                pipe.write_all(input.as_bytes())
            })),
            _ => None,
        };

        let output = child.wait_with_output().map_err(|source| InvokeError::Wait {
            program: line.program.clone(),
            source,
        })?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    log::warn!("failed to write stdin of `{}`: {e}", line.program);
                }
                Err(_) => log::warn!("stdin writer for `{}` panicked", line.program),
                _ => {}
            }
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        log::debug!(
            "`{}` exited with {:?}, {} bytes of output",
            line.program,
            output.status.code(),
            text.len()
        );
        Ok(InvocationResult {
            output: text,
            success: output.status.success(),
            exit_code: output.status.code(),
        })
    }
}

impl Invoke for CommandInvoker {
    fn invoke(&self, prompt: &str, content: Option<&str>) -> Result<InvocationResult> {
        let line = self.build(prompt, content);
        self.execute(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn invoker(delivery: ContentDelivery) -> CommandInvoker {
        CommandInvoker::new(InvokerConfig {
            delivery,
            ..InvokerConfig::default()
        })
    }

    #[test]
    fn prompt_only() {
        let line = invoker(ContentDelivery::Stdin).build("hello", None);
        assert_eq!(line.program, "claude");
        assert_eq!(line.args, vec!["-p", "hello"]);
        assert_eq!(line.stdin, None);
    }

    #[test]
    fn stdin_delivery_fences_content() {
        let line = invoker(ContentDelivery::Stdin).build("what does this do", Some("print(1)"));
        assert_eq!(line.args, vec!["-p", "what does this do"]);
        assert_eq!(line.stdin.as_deref(), Some("```\nprint(1)\n```"));
    }

    #[test]
    fn inline_delivery_appends_fence_to_prompt() {
        let line = invoker(ContentDelivery::Inline).build("explain", Some("x = \"y\""));
        assert_eq!(line.args, vec!["-p", "explain\n\n```\nx = \"y\"\n```"]);
        assert_eq!(line.stdin, None);
    }

    #[test]
    fn extra_args_come_first() {
        let invoker = CommandInvoker::new(InvokerConfig {
            program: "/opt/bin/assistant".to_string(),
            args: vec!["--model".to_string(), "small".to_string()],
            prompt_flag: "--print".to_string(),
            delivery: ContentDelivery::Stdin,
        });
        let line = invoker.build("q", None);
        assert_eq!(line.args, vec!["--model", "small", "--print", "q"]);
    }

    #[test]
    fn render_escapes_quotes() {
        let line = invoker(ContentDelivery::Inline).build("say \"hi\" for $5", Some("`x`"));
        assert_eq!(
            line.render(),
            "claude -p \"say \\\"hi\\\" for \\$5\n\n\\`\\`\\`\n\\`x\\`\n\\`\\`\\`\""
        );
    }

    #[test]
    fn render_shows_stdin_as_heredoc() {
        let line = invoker(ContentDelivery::Stdin).build("q", Some("a"));
        assert_eq!(line.render(), "claude -p \"q\" <<'CODEPROMPT_EOF'\n```\na\n```\nCODEPROMPT_EOF");
    }

    #[test]
    fn classify_outcomes() {
        let ok = InvocationResult {
            output: "answer".to_string(),
            success: true,
            exit_code: Some(0),
        };
        assert_eq!(ok.classify(), Outcome::Reply("answer".to_string()));

        let empty = InvocationResult {
            output: String::new(),
            success: true,
            exit_code: Some(0),
        };
        assert_eq!(empty.classify(), Outcome::Empty);

        // only zero-length output counts as empty
        let spaces = InvocationResult {
            output: " \n".to_string(),
            success: true,
            exit_code: Some(0),
        };
        assert_eq!(spaces.classify(), Outcome::Reply(" \n".to_string()));

        let failed = InvocationResult {
            output: "boom".to_string(),
            success: false,
            exit_code: Some(2),
        };
        assert_eq!(
            failed.classify(),
            Outcome::Failed {
                code: Some(2),
                output: "boom".to_string()
            }
        );
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let invoker = CommandInvoker::new(InvokerConfig {
            program: "codeprompt-definitely-not-installed".to_string(),
            ..InvokerConfig::default()
        });
        assert!(matches!(
            invoker.invoke("q", None),
            Err(InvokeError::Spawn { .. })
        ));
    }
}
