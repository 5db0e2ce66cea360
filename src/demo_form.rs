//! Demo request form with simulated submission

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use log::info;
use regex::Regex;
use thiserror::Error;

pub const SUBMIT_LABEL: &str = "Solicitar demo";
pub const SENDING_LABEL: &str = "Enviando...";
pub const SENT_LABEL: &str = "¡Solicitud Enviada!";
pub const SUCCESS_MESSAGE: &str =
    "✅ ¡Perfecto! Te contactaremos muy pronto para configurar tu Inti Bot.";

const SENDING: Duration = Duration::from_millis(1500);
const SENT: Duration = Duration::from_secs(3);

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{6,15}$").expect("Failed to compile phone regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Business,
    Phone,
    Email,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Business, Field::Phone, Field::Email];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Nombre",
            Field::Business => "Negocio",
            Field::Phone => "WhatsApp",
            Field::Email => "Correo (opcional)",
        }
    }

    fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("El campo {} es obligatorio", .0.label())]
    Required(Field),

    #[error("Ingresa un número de WhatsApp válido")]
    InvalidPhone,

    #[error("Ingresa un correo electrónico válido")]
    InvalidEmail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoRequest {
    pub name: String,
    pub business: String,
    pub phone: String,
    pub email: String,
}

impl DemoRequest {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Business => &self.business,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Business => &mut self.business,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
        }
    }

    /// Every problem with the request, in field order
    pub fn validate(&self) -> Vec<FormError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FormError::Required(Field::Name));
        }
        if self.business.trim().is_empty() {
            errors.push(FormError::Required(Field::Business));
        }
        let phone: String = self
            .phone
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if phone.is_empty() {
            errors.push(FormError::Required(Field::Phone));
        } else if !PHONE_RE.is_match(&phone) {
            errors.push(FormError::InvalidPhone);
        }
        let email = self.email.trim();
        if !email.is_empty() && !EMAIL_RE.is_match(email) {
            errors.push(FormError::InvalidEmail);
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Editing,
    Sending { until: Instant },
    Sent { until: Instant },
}

#[derive(Debug)]
pub struct DemoForm {
    request: DemoRequest,
    focus: Field,
    state: SubmitState,
    errors: Vec<FormError>,
}

impl Default for DemoForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoForm {
    pub fn new() -> Self {
        Self {
            request: DemoRequest::default(),
            focus: Field::Name,
            state: SubmitState::Editing,
            errors: Vec::new(),
        }
    }

    pub fn request(&self) -> &DemoRequest {
        &self.request
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn errors(&self) -> &[FormError] {
        &self.errors
    }

    pub fn is_editable(&self) -> bool {
        self.state == SubmitState::Editing
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn push_char(&mut self, c: char) {
        if self.is_editable() {
            self.request.value_mut(self.focus).push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.is_editable() {
            self.request.value_mut(self.focus).pop();
        }
    }

    /// Validate and start the simulated submission
    pub fn submit(&mut self, now: Instant) -> Result<(), FormError> {
        if !self.is_editable() {
            return Ok(());
        }
        self.errors = self.request.validate();
        if let Some(first) = self.errors.first() {
            return Err(first.clone());
        }
        info!("Demo requested for business {:?}", self.request.business.trim());
        self.state = SubmitState::Sending {
            until: now + SENDING,
        };
        Ok(())
    }

    /// Advance the submission timers. Returns true if the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            SubmitState::Sending { until } if now >= until => {
                self.state = SubmitState::Sent {
                    until: until + SENT,
                };
                true
            }
            SubmitState::Sent { until } if now >= until => {
                *self = Self::new();
                true
            }
            _ => false,
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self.state {
            SubmitState::Editing => SUBMIT_LABEL,
            SubmitState::Sending { .. } => SENDING_LABEL,
            SubmitState::Sent { .. } => SENT_LABEL,
        }
    }

    pub fn success_message(&self) -> Option<&'static str> {
        matches!(self.state, SubmitState::Sent { .. }).then_some(SUCCESS_MESSAGE)
    }
}
