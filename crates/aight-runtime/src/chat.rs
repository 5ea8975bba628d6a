//! Line-oriented chat: each message is either a command, a refinement of the
//! last configuration, or a new request.

use std::io::Write;

use aight_client::{
    ClientError, ConfigAssistant, DeployOutcome, DiagnosticReport, GenerateRequest, HostConnection,
};
use aight_core::{
    ConfigType, ConversationContext, EntityCatalog, detect_config_type, detect_relevant_domains, is_refinement_request,
    is_reload_command, relevant_entities,
};

use crate::input::LineInput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    Empty,
    Quit,
    Deploy,
    Refresh,
    ReloadAutomations,
    Refine(String),
    Request(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn classify(message: &str, has_config: bool) -> ChatAction {
    let message = message.trim();
    match message {
        "" => ChatAction::Empty,
        "/quit" | "/exit" => ChatAction::Quit,
        "/deploy" => ChatAction::Deploy,
        "/refresh" => ChatAction::Refresh,
        _ if is_reload_command(message) => ChatAction::ReloadAutomations,
        _ if is_refinement_request(message, has_config) => ChatAction::Refine(message.to_string()),
        _ => ChatAction::Request(message.to_string()),
    }
}

pub struct ChatSession<'a, C, W> {
    assistant: &'a ConfigAssistant<C>,
    catalog: EntityCatalog,
    ctx: ConversationContext,
    /// Domains detected for the current request; reported on failure.
    domains: Vec<&'static str>,
    out: W,
}

impl<'a, C: HostConnection, W: Write> ChatSession<'a, C, W> {
    pub fn new(assistant: &'a ConfigAssistant<C>, catalog: EntityCatalog, out: W) -> Self {
        Self {
            assistant,
            catalog,
            ctx: ConversationContext::default(),
            domains: Vec::new(),
            out,
        }
    }

    pub fn context(&self) -> &ConversationContext {
        &self.ctx
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Handle one message. Service failures are reported in the transcript
    /// and do not end the session; only output errors propagate.
    pub async fn handle(&mut self, message: &str) -> anyhow::Result<Flow> {
        match classify(message, self.ctx.has_config()) {
            ChatAction::Empty => {}
            ChatAction::Quit => return Ok(Flow::Quit),
            ChatAction::Deploy => self.deploy().await?,
            ChatAction::Refresh => self.refresh().await?,
            ChatAction::ReloadAutomations => self.reload_automations().await?,
            ChatAction::Refine(request) => self.refine(&request).await?,
            ChatAction::Request(prompt) => self.request(&prompt).await?,
        }
        Ok(Flow::Continue)
    }

    async fn request(&mut self, prompt: &str) -> anyhow::Result<()> {
        let snapshot = self.catalog.snapshot();
        let domains = detect_relevant_domains(prompt);
        let entities: Vec<String> = relevant_entities(prompt, &domains, &snapshot)
            .into_iter()
            .map(|r| r.entity_id.clone())
            .collect();
        let config_type = detect_config_type(prompt);
        tracing::debug!(?domains, entities = entities.len(), %config_type, "new chat request");

        self.ctx = ConversationContext::start(prompt, config_type, entities);
        self.domains = domains;
        let request = GenerateRequest {
            prompt: prompt.to_string(),
            config_type,
            entities: self.ctx.confirmed_ids(),
        };
        match self.assistant.generate(&request).await {
            Ok(generated) => {
                writeln!(self.out, "Great! I've created {} for you:", config_type.noun_phrase())?;
                writeln!(self.out, "{}", generated.config.trim_end())?;
                if !generated.explanation.is_empty() {
                    writeln!(self.out, "{}", generated.explanation)?;
                }
                self.ctx
                    .record_generated(generated.config, config_type, request.entities);
            }
            Err(e) => {
                writeln!(self.out, "Sorry, I couldn't generate that: {e}")?;
                self.report_failure(&request, snapshot.len(), &e)?;
            }
        }
        Ok(())
    }

    async fn refine(&mut self, message: &str) -> anyhow::Result<()> {
        let total = self.catalog.len();
        let config_type = self.ctx.refinement_type();
        let prompt = self.ctx.refined_prompt(message);
        let request = GenerateRequest {
            prompt: prompt.clone(),
            config_type,
            entities: self.ctx.confirmed_entities.clone(),
        };
        match self.assistant.generate(&request).await {
            Ok(generated) => {
                writeln!(self.out, "I've updated the {config_type} based on your request:")?;
                writeln!(self.out, "{}", generated.config.trim_end())?;
                self.ctx.record_refined(prompt, generated.config);
            }
            Err(e) => {
                writeln!(self.out, "Sorry, I couldn't update it: {e}")?;
                self.report_failure(&request, total, &e)?;
            }
        }
        Ok(())
    }

    fn report_failure(
        &mut self,
        request: &GenerateRequest,
        total_entities: usize,
        err: &ClientError,
    ) -> anyhow::Result<()> {
        let report = DiagnosticReport::new(request, &self.domains, total_entities).with_error(err);
        write!(self.out, "{report}")?;
        Ok(())
    }

    async fn deploy(&mut self) -> anyhow::Result<()> {
        let (Some(config), Some(config_type)) = (&self.ctx.last_config, self.ctx.last_config_type) else {
            writeln!(self.out, "Nothing to deploy yet. Describe what you want first.")?;
            return Ok(());
        };
        match self.assistant.deploy(config, config_type).await {
            Ok(DeployOutcome::Deployed) => {
                writeln!(self.out, "Deployed the {config_type}.")?;
                if config_type == ConfigType::Automation {
                    writeln!(self.out, "Type \"reload\" to reload automations.")?;
                }
            }
            Ok(DeployOutcome::Manual(steps)) => {
                writeln!(self.out, "The host could not deploy it automatically. To install by hand:")?;
                writeln!(self.out, "{steps}")?;
            }
            Err(e) => writeln!(self.out, "Deploy failed: {e}")?,
        }
        Ok(())
    }

    async fn reload_automations(&mut self) -> anyhow::Result<()> {
        match self.assistant.reload_automations().await {
            Ok(()) => writeln!(self.out, "Automations reloaded.")?,
            Err(e) => writeln!(self.out, "Reload failed: {e}")?,
        }
        Ok(())
    }

    async fn refresh(&mut self) -> anyhow::Result<()> {
        match self.assistant.fetch_snapshot().await {
            Ok((records, _skipped)) => {
                let count = records.len();
                self.catalog.replace(records);
                writeln!(self.out, "Loaded {count} entities.")?;
            }
            Err(e) => writeln!(self.out, "Refresh failed: {e}")?,
        }
        Ok(())
    }
}

/// Run the chat loop on stdin/stdout until `/quit` or end of input.
pub async fn cmd_chat(app: &crate::app::App) -> anyhow::Result<()> {
    let assistant = app.connect().await?;
    let records = app.records_via(&assistant).await?;
    let catalog = EntityCatalog::new(records);
    println!(
        "Connected; {} entities loaded. Describe a configuration, or /deploy, /refresh, /quit.",
        catalog.len()
    );

    let mut session = ChatSession::new(&assistant, catalog, std::io::stdout());
    let mut input = LineInput::stdin();
    while let Some(line) = input.ask("> ").await? {
        if session.handle(&line).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
