use crate::error::EdubotError;
use crate::events::EventRepository;
use crate::inference::InferenceConfig;
use crate::intents;
use crate::store::Store;
use crate::tramites::TramiteRepository;
use crate::types::io::{
    ChatInput, ChatReply, MessageInput, MessageReply, Resolution, TramiteInput, TramiteReceipt,
};
use crate::types::tramite::Tramite;
use crate::validation::validate_tramite;
use edubot_events::bus::EventBus;
use edubot_events::types::{DEFAULT_CHANNEL, Event, EventType, NewEvent};
use edubot_pdf::Renderer;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: Option<String>,
}

impl RequestContext {
    pub fn new(correlation_id: Option<String>) -> Self {
        Self { correlation_id }
    }
}

pub struct Edubot<S: Store> {
    store: S,
    event_bus: EventBus,
    inference: Option<InferenceConfig>,
    renderer: Renderer,
}

impl<S: Store> Edubot<S> {
    pub fn new(
        store: S,
        event_bus: EventBus,
        inference: Option<InferenceConfig>,
        renderer: Renderer,
    ) -> Self {
        Self {
            store,
            event_bus,
            inference,
            renderer,
        }
    }

    pub fn messages(&self) -> MessagesApi<'_, S> {
        MessagesApi { core: self }
    }

    pub fn tramites(&self) -> TramitesApi<'_, S> {
        TramitesApi { core: self }
    }

    pub fn events(&self) -> EventsApi<'_, S> {
        EventsApi { core: self }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends an audit event and publishes it to the live bus. Failures are
    /// logged and swallowed so auxiliary logging never fails the primary
    /// operation.
    fn record(&self, event: NewEvent) -> Option<Event> {
        match self.store.events().append(event) {
            Ok(event) => {
                let _ = self.event_bus.publish(event.clone());
                Some(event)
            }
            Err(err) => {
                warn!(error = %err, "event append failed");
                None
            }
        }
    }
}

pub struct MessagesApi<'a, S: Store> {
    core: &'a Edubot<S>,
}

impl<'a, S: Store> MessagesApi<'a, S> {
    pub fn handle(
        &self,
        ctx: &RequestContext,
        input: MessageInput,
    ) -> Result<MessageReply, EdubotError> {
        let channel = input
            .channel
            .clone()
            .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
        self.core.record(NewEvent {
            event_type: EventType::MessageSent,
            intent: None,
            text: Some(input.text.clone()),
            channel: Some(channel.clone()),
        });

        let resolution = self.resolve(ctx, &input.text, &channel);

        self.core.record(NewEvent {
            event_type: EventType::MessageReceived,
            intent: Some(resolution.intent.clone()),
            text: Some(resolution.reply.clone()),
            channel: Some(channel),
        });
        Ok(MessageReply {
            reply: resolution.reply,
            intent: resolution.intent,
        })
    }

    /// Legacy keyword-only chat endpoint; no event trail.
    pub fn chat(&self, input: ChatInput) -> ChatReply {
        let resolution = intents::resolve(&input.pregunta);
        ChatReply {
            respuesta: resolution.reply,
        }
    }

    fn resolve(&self, ctx: &RequestContext, text: &str, channel: &str) -> Resolution {
        let Some(config) = &self.core.inference else {
            return intents::resolve(text);
        };
        self.core.record(NewEvent {
            event_type: EventType::InferenceQuestion,
            intent: None,
            text: Some(text.to_string()),
            channel: Some(channel.to_string()),
        });
        match config.resolve(text) {
            Ok(resolution) => {
                self.core.record(NewEvent {
                    event_type: EventType::InferenceAnswer,
                    intent: Some(resolution.intent.clone()),
                    text: Some(resolution.reply.clone()),
                    channel: Some(channel.to_string()),
                });
                resolution
            }
            Err(err) => {
                warn!(
                    correlation_id = ?ctx.correlation_id,
                    error = %err,
                    "inference failed, using keyword resolver"
                );
                intents::resolve(text)
            }
        }
    }
}

pub struct TramitesApi<'a, S: Store> {
    core: &'a Edubot<S>,
}

impl<'a, S: Store> TramitesApi<'a, S> {
    pub fn submit(
        &self,
        ctx: &RequestContext,
        input: TramiteInput,
    ) -> Result<TramiteReceipt, EdubotError> {
        let channel = input.channel.clone();
        let tramite = validate_tramite(input)?;
        let tramite = self.core.store.tramites().insert(tramite)?;

        self.core.record(NewEvent {
            event_type: EventType::TramiteSubmitted,
            intent: Some(tramite.tipo.clone()),
            text: Some(format!(
                "{} - {} - {}",
                tramite.tipo, tramite.nombre, tramite.grado
            )),
            channel,
        });

        // The submission stands once persisted; rendering only degrades.
        let fields = render_fields(&tramite);
        let pdf = match self.core.renderer.render(tramite.id, &tramite.tipo, &fields) {
            Ok(document) => document.file_name,
            Err(err) => {
                warn!(
                    correlation_id = ?ctx.correlation_id,
                    tramite_id = tramite.id,
                    error = %err,
                    "document rendering failed"
                );
                Renderer::pdf_name(tramite.id)
            }
        };

        Ok(TramiteReceipt {
            ok: true,
            id: tramite.id,
            pdf,
        })
    }

    pub fn list(&self) -> Result<Vec<Tramite>, EdubotError> {
        Ok(self.core.store.tramites().list()?)
    }

    pub fn get(&self, id: i64) -> Result<Option<Tramite>, EdubotError> {
        Ok(self.core.store.tramites().get(id)?)
    }
}

pub struct EventsApi<'a, S: Store> {
    core: &'a Edubot<S>,
}

impl<'a, S: Store> EventsApi<'a, S> {
    pub fn list(&self, limit: Option<u32>) -> Result<Vec<Event>, EdubotError> {
        Ok(self.core.store.events().list(limit)?)
    }
}

fn render_fields(tramite: &Tramite) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    fields.insert("nombre".to_string(), tramite.nombre.clone());
    fields.insert("grado".to_string(), tramite.grado.clone());
    for (key, value) in &tramite.extra {
        fields.insert(key.clone(), display_value(value));
    }
    fields
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
