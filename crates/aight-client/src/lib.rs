//! aight-client: IO boundary between the matcher and the host platform.
//! Websocket connection, event subscriptions, the assistant service calls,
//! debouncing and failure diagnostics. No matching logic lives here.

pub mod assistant;
pub mod connection;
pub mod debounce;
pub mod diagnostic;
pub mod error;
pub mod outcome;
pub mod protocol;
pub mod services;
pub mod subscription;
pub mod ws;

pub use assistant::ConfigAssistant;
pub use connection::HostConnection;
pub use debounce::Debouncer;
pub use diagnostic::DiagnosticReport;
pub use error::ClientError;
pub use outcome::{DeployOutcome, GeneratedConfig, PreviewReport, ValidationReport};
pub use services::{ConfigPayload, GenerateRequest, manual_install_steps};
pub use subscription::EventSubscription;
pub use ws::WsConnection;
