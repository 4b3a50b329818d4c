//! Core chat session management.
//!
//! This module provides the `ClassChat` struct which binds one class to its
//! assistant, owns the conversation state, and drives exchanges against a
//! [`Completion`] backend.

use std::sync::Arc;
use std::time::Instant;

use crate::binding::{AssistantBinding, AssistantDirectory};
use crate::catalog::{ClassCatalog, ClassId, ClassRecord};
use crate::chat::exchange::{self, Begin, SkipReason, Settled};
use crate::chat::state::{ChatState, Message};
use crate::completion::Completion;
use crate::error::Result;
use crate::observability::{
    EXCHANGE_BUSY, EXCHANGE_DURATION, EXCHANGE_ERRORS, EXCHANGE_SKIPPED, EXCHANGES,
};
use crate::render::Renderer;

/// What a call to [`ClassChat::send`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The input was empty or the class has no binding; nothing changed.
    Skipped(SkipReason),
    /// An exchange was already in flight; nothing changed.
    Busy,
    /// The reply was appended.
    Replied,
    /// The exchange failed; the error slot holds this text.
    Failed(String),
}

/// A chat bound to one class.
pub struct ClassChat<C: Completion> {
    catalog: Arc<dyn ClassCatalog>,
    directory: Arc<dyn AssistantDirectory>,
    completion: C,
    class: ClassRecord,
    binding: Option<AssistantBinding>,
    state: ChatState,
    sidebar_open: bool,
}

impl<C: Completion> ClassChat<C> {
    /// Resolves `class_id` and opens an empty chat for it.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the catalog has no such class; no session
    /// is created in that case.
    pub fn open(
        catalog: Arc<dyn ClassCatalog>,
        directory: Arc<dyn AssistantDirectory>,
        class_id: ClassId,
        completion: C,
    ) -> Result<Self> {
        let class = catalog.resolve(class_id).inspect_err(|_| {
            tracing::warn!(%class_id, "class not found");
        })?;
        let binding = usable_binding(directory.as_ref(), &class.code);
        if binding.is_none() {
            tracing::warn!(class_code = %class.code, "no assistant bound to class");
        }
        Ok(Self {
            catalog,
            directory,
            completion,
            class,
            binding,
            state: ChatState::new(),
            sidebar_open: true,
        })
    }

    /// Switches to another class, recomputing the binding and starting a fresh
    /// transcript.  On error the session is unchanged.
    pub fn select_class(&mut self, class_id: ClassId) -> Result<()> {
        let class = self.catalog.resolve(class_id).inspect_err(|_| {
            tracing::warn!(%class_id, "class not found");
        })?;
        self.binding = usable_binding(self.directory.as_ref(), &class.code);
        self.class = class;
        self.state = ChatState::new();
        Ok(())
    }

    /// Sends the input buffer to the assistant.
    ///
    /// This method:
    /// 1. Records the user message and clears the input
    /// 2. Calls the completion backend with the text and class code
    /// 3. Appends the rendered reply, or sets the error slot on failure
    ///
    /// Failures never escape; they are reported through the renderer and the
    /// error slot.
    pub async fn send(&mut self, renderer: &mut dyn Renderer) -> SendOutcome {
        let pending = match exchange::begin(&mut self.state, self.binding.as_ref()) {
            Begin::Started(pending) => pending,
            Begin::Skipped(reason) => {
                EXCHANGE_SKIPPED.click();
                tracing::debug!(?reason, "exchange skipped");
                return SendOutcome::Skipped(reason);
            }
            Begin::Busy => {
                EXCHANGE_BUSY.click();
                tracing::warn!("exchange already in flight; dropping send");
                return SendOutcome::Busy;
            }
        };
        EXCHANGES.click();
        tracing::debug!(class_code = %self.class.code, "exchange started");

        renderer.start_loading();
        let start = Instant::now();
        let outcome = self
            .completion
            .complete(&pending.text, &self.class.code)
            .await;
        EXCHANGE_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &outcome {
            tracing::error!(class_code = %self.class.code, error = %err, "error sending message");
        }
        let settled = exchange::settle(&mut self.state, outcome);
        renderer.finish_loading();

        match settled {
            Settled::Replied(_) => {
                tracing::debug!(class_code = %self.class.code, "exchange settled");
                if let Some(reply) = self.state.messages().last() {
                    renderer.print_message(reply);
                }
                SendOutcome::Replied
            }
            Settled::Failed(message) => {
                EXCHANGE_ERRORS.click();
                renderer.print_error(&message);
                SendOutcome::Failed(message)
            }
        }
    }

    /// Replaces the input buffer and sends it.
    pub async fn send_text(&mut self, text: &str, renderer: &mut dyn Renderer) -> SendOutcome {
        self.state.set_input(text);
        self.send(renderer).await
    }

    /// Starts a new chat by clearing the transcript.
    pub fn new_chat(&mut self) {
        self.state.reset();
    }

    /// Flips the sidebar and returns whether it is now open.
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    /// Draws the whole view: header, sidebar, transcript and error banner.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.print_header(&self.class);
        if self.sidebar_open {
            renderer.print_sidebar(&self.class);
        }
        for message in self.state.messages() {
            renderer.print_message(message);
        }
        if let Some(error) = self.state.error() {
            renderer.print_error(error);
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.set_input(text);
    }

    pub fn class(&self) -> &ClassRecord {
        &self.class
    }

    pub fn binding(&self) -> Option<&AssistantBinding> {
        self.binding.as_ref()
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }
}

/// Looks up the binding for `class_code`, treating a blank assistant id as
/// no binding at all.
fn usable_binding(
    directory: &dyn AssistantDirectory,
    class_code: &str,
) -> Option<AssistantBinding> {
    directory
        .binding_for(class_code)
        .filter(AssistantBinding::is_bound)
}
