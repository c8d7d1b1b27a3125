//! Yes/no decisions for destructive actions

use async_trait::async_trait;
use dialoguer::Confirm;

/// Asks the user to approve an action
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Interactive terminal prompt, defaulting to "no"
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

#[async_trait]
impl Confirmer for TerminalConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let prompt = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await;

        match answer {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(e)) => {
                tracing::warn!("Confirmation prompt failed, treating as no: {}", e);
                false
            }
            Err(e) => {
                tracing::warn!("Confirmation prompt aborted: {}", e);
                false
            }
        }
    }
}

/// Fixed answer, for `--yes` and tests
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmer for AutoConfirm {
    async fn confirm(&self, message: &str) -> bool {
        tracing::debug!("Auto-answering '{}' with {}", message, self.0);
        self.0
    }
}
