use crate::config::Config;
use crate::error::{FlowError, Result};
use crate::insert::{test_file_for, InsertionCoordinator};
use crate::prompts;
use crate::render::ResponseRenderer;
use codeprompt_context::{resolve_language, ContextExtractor, ContextMode, ExtensionTable, Snippet};
use codeprompt_editor::EditorHost;
use codeprompt_invoke::{Invoke, Outcome, TempArtifactManager};
use std::time::Duration;

/// The user-facing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Ask,
    Explain,
    ExplainFunction,
    Generate,
    Tests,
}

impl CommandId {
    pub const ALL: [CommandId; 5] = [
        CommandId::Ask,
        CommandId::Explain,
        CommandId::ExplainFunction,
        CommandId::Generate,
        CommandId::Tests,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandId::Ask => "ClaudeAsk",
            CommandId::Explain => "ClaudeExplain",
            CommandId::ExplainFunction => "ClaudeExplainFunction",
            CommandId::Generate => "ClaudeGenerate",
            CommandId::Tests => "ClaudeTests",
        }
    }

    pub fn default_chord(self) -> &'static str {
        match self {
            CommandId::Ask => "<leader>ca",
            CommandId::Explain => "<leader>ce",
            CommandId::ExplainFunction => "<leader>cf",
            CommandId::Generate => "<leader>cg",
            CommandId::Tests => "<leader>ct",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CommandId::Ask => "Ask a question about a selection, function, file or line range",
            CommandId::Explain => "Explain the visual selection",
            CommandId::ExplainFunction => "Explain the function under the cursor",
            CommandId::Generate => "Generate a function from a description and insert it",
            CommandId::Tests => "Generate tests for the selection or current function",
        }
    }

    /// Case-insensitive lookup by command name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }
}

/// A command together with its effective keychord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBinding {
    pub id: CommandId,
    pub chord: String,
}

/// Wires commands to the extract → invoke → render/insert flows
pub struct CommandSurface<'a> {
    config: &'a Config,
    invoker: &'a dyn Invoke,
    extensions: ExtensionTable,
    temp: TempArtifactManager,
}

impl<'a> CommandSurface<'a> {
    pub fn new(config: &'a Config, invoker: &'a dyn Invoke) -> Self {
        Self {
            config,
            invoker,
            extensions: config.extension_table(),
            temp: TempArtifactManager::new(config.temp_dir.clone()),
        }
    }

    /// Every command with its chord, configured overrides applied
    pub fn bindings(&self) -> Vec<CommandBinding> {
        CommandId::ALL
            .into_iter()
            .map(|id| CommandBinding {
                id,
                chord: self
                    .config
                    .keymaps
                    .get(id.name())
                    .cloned()
                    .unwrap_or_else(|| id.default_chord().to_string()),
            })
            .collect()
    }

    /// Find a command by name or keychord
    pub fn resolve(&self, name_or_chord: &str) -> Option<CommandId> {
        let wanted = name_or_chord.trim();
        CommandId::from_name(wanted).or_else(|| {
            self.bindings()
                .into_iter()
                .find(|binding| binding.chord == wanted)
                .map(|binding| binding.id)
        })
    }

    /// Run the command named by `name_or_chord`. Returns false when it is
    /// unknown or failed; either way the user has been notified.
    pub fn dispatch(&self, host: &mut dyn EditorHost, name_or_chord: &str) -> bool {
        match self.resolve(name_or_chord) {
            Some(id) => self.run(host, id),
            None => {
                let err = FlowError::UnknownCommand(name_or_chord.to_string());
                host.notify(&err.to_string(), err.severity());
                false
            }
        }
    }

    /// Run `id`, reporting any failure as exactly one notification
    pub fn run(&self, host: &mut dyn EditorHost, id: CommandId) -> bool {
        log::debug!("running {}", id.name());
        match self.execute(host, id) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("{} failed: {e:?}", id.name());
                host.notify(&e.to_string(), e.severity());
                false
            }
        }
    }

    /// Run `id` and hand back the error instead of notifying
    pub fn execute(&self, host: &mut dyn EditorHost, id: CommandId) -> Result<()> {
        match id {
            CommandId::Ask => self.ask(host),
            CommandId::Explain => self.explain_selection(host),
            CommandId::ExplainFunction => self.explain_function(host),
            CommandId::Generate => self.generate_function(host),
            CommandId::Tests => self.generate_tests(host),
        }
    }

    /// Pick a context mode, ask a free-form question, show the answer
    pub fn ask(&self, host: &mut dyn EditorHost) -> Result<()> {
        let choices: Vec<String> = ContextMode::CHOICES.iter().map(|c| c.to_string()).collect();
        let Some(choice) = host.select("Analyze:", &choices) else {
            log::debug!("ask cancelled at context choice");
            return Ok(());
        };

        let mode = match choice {
            0 => ContextMode::Selection,
            1 => ContextMode::Function,
            2 => ContextMode::File,
            _ => {
                let Some(start) = read_line_number(host, "Start line: ")? else {
                    return Ok(());
                };
                let Some(end) = read_line_number(host, "End line: ")? else {
                    return Ok(());
                };
                ContextMode::Range { start, end }
            }
        };

        let snippet = self.extractor().extract(host, mode)?;
        let Some(question) = read_text(host, "Ask Claude: ") else {
            return Ok(());
        };

        let reply = self.consult(host, &question, Some(&snippet))?;
        self.renderer().render(host, &snippet.mode.to_string(), &reply)
    }

    pub fn explain_selection(&self, host: &mut dyn EditorHost) -> Result<()> {
        let snippet = self.extractor().selection(host)?;
        let prompt = prompts::explain_selection(&snippet.filetype);
        let reply = self.consult(host, &prompt, Some(&snippet))?;
        self.renderer().render(host, "Explain Selection", &reply)
    }

    pub fn explain_function(&self, host: &mut dyn EditorHost) -> Result<()> {
        let snippet = self.extractor().enclosing_function(host, host.cursor())?;
        let prompt = prompts::explain_function(&snippet.filetype);
        let reply = self.consult(host, &prompt, Some(&snippet))?;
        self.renderer().render(host, "Explain Function", &reply)
    }

    /// Describe a function, generate it, insert the chosen candidate.
    ///
    /// The current file goes along as context when it has any text.
    pub fn generate_function(&self, host: &mut dyn EditorHost) -> Result<()> {
        let Some(description) = read_text(host, "Describe the function: ") else {
            return Ok(());
        };

        let context = self.file_context(host)?;
        let filetype = match &context {
            Some(snippet) => snippet.filetype.clone(),
            None => resolve_language(host).1,
        };
        let prompt = prompts::generate_function(&filetype, &description, context.is_some());
        let reply = self.consult(host, &prompt, context.as_ref())?;

        let mut coordinator = InsertionCoordinator::new(&self.config.window, &self.config.title_prefix);
        self.offer(host, &mut coordinator, &description, &reply)
    }

    /// Tests for the selection (or the function under the cursor), inserted
    /// or written to a sibling `test_*` file
    pub fn generate_tests(&self, host: &mut dyn EditorHost) -> Result<()> {
        let extractor = self.extractor();
        let snippet = if host.visual_selection().is_some() {
            extractor.selection(host)?
        } else {
            extractor.enclosing_function(host, host.cursor())?
        };

        let prompt = prompts::generate_tests(&snippet.filetype);
        let reply = self.consult(host, &prompt, Some(&snippet))?;

        let new_file = snippet
            .path
            .as_deref()
            .and_then(|path| test_file_for(path, &snippet.extension));
        let mut coordinator = InsertionCoordinator::new(&self.config.window, &self.config.title_prefix)
            .with_new_file(new_file);
        self.offer(host, &mut coordinator, "Generate tests", &reply)
    }

    fn offer(
        &self,
        host: &mut dyn EditorHost,
        coordinator: &mut InsertionCoordinator<'_>,
        prompt: &str,
        reply: &str,
    ) -> Result<()> {
        let candidates = codeprompt_blocks::extract(reply);
        if candidates.iter().all(|block| block.is_blank()) {
            // Show what came back so the answer is not lost
            self.renderer().render(host, "Response", reply)?;
            return Err(FlowError::NoCodeBlocks);
        }
        let state = coordinator.run(host, prompt, &candidates)?;
        log::debug!("insertion finished in {state:?}");
        Ok(())
    }

    /// Send `prompt` and `snippet` to the assistant and return its reply.
    ///
    /// A snippet that is not the whole saved file goes through a scratch
    /// file, released once the host's loop next runs or after
    /// `temp_release_ms`, whichever comes first.
    fn consult(
        &self,
        host: &mut dyn EditorHost,
        prompt: &str,
        snippet: Option<&Snippet>,
    ) -> Result<String> {
        let content = match snippet {
            None => None,
            Some(snippet) if snippet.mode.is_whole_file() => Some(snippet.text.clone()),
            Some(snippet) => {
                let artifact = self.temp.write(&snippet.text, &snippet.extension)?;
                let content = artifact.read();
                let handle = artifact.release_after(self.config.temp_release());
                host.defer(Duration::ZERO, Box::new(move || handle.release()));
                Some(content?)
            }
        };

        let program = &self.config.command;
        log::info!(
            "asking {program} ({} bytes of context)",
            content.as_deref().map_or(0, str::len)
        );
        match self.invoker.invoke(prompt, content.as_deref())?.classify() {
            Outcome::Reply(text) => Ok(text),
            Outcome::Empty => Err(FlowError::EmptyResponse {
                program: program.clone(),
            }),
            Outcome::Failed { code, output } => Err(FlowError::ToolFailed {
                program: program.clone(),
                code,
                output,
            }),
        }
    }

    /// The saved file, or the unsaved buffer as a line range, or nothing
    fn file_context(&self, host: &dyn EditorHost) -> Result<Option<Snippet>> {
        if host.all_lines().iter().all(|line| line.trim().is_empty()) {
            return Ok(None);
        }
        let extractor = self.extractor();
        let snippet = if host.buffer_path().is_some() {
            extractor.entire_file(host)?
        } else {
            extractor.line_range(host, 1, host.line_count())?
        };
        Ok(Some(snippet))
    }

    fn extractor(&self) -> ContextExtractor<'_> {
        ContextExtractor::new(&self.extensions)
    }

    fn renderer(&self) -> ResponseRenderer<'a> {
        ResponseRenderer::new(&self.config.window, &self.config.title_prefix)
    }
}

/// Non-blank input, trimmed; `None` when cancelled or empty
fn read_text(host: &mut dyn EditorHost, prompt: &str) -> Option<String> {
    host.input(prompt)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn read_line_number(host: &mut dyn EditorHost, prompt: &str) -> Result<Option<usize>> {
    match read_text(host, prompt) {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| FlowError::InvalidNumber(text)),
    }
}
